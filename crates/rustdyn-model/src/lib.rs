//! DynamoDB wire types and attribute marshalling for the rustdyn client.
//!
//! The JSON API (version `2011-12-05`) encodes every attribute as a
//! single-key object such as `{"S": "hello"}` or `{"NS": ["1", "2"]}`. This
//! crate provides:
//!
//! - [`AttributeValue`]: the wire tagged union.
//! - [`Value`] and [`Item`]: native values as callers see them.
//! - [`codec`]: conversions between the two, key construction and update
//!   descriptors.
//! - [`input`], [`output`], [`types`]: serde types for every action's
//!   request and response shape.
//! - [`AmazonError`]: the structured error a non-200 response turns into.

pub mod attribute_value;
pub mod codec;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;
pub mod value;

pub use attribute_value::{AttributeValue, WireItem};
pub use codec::{KeySpec, UpdateAction, parse, stringify, to_keys, update_attributes};
pub use error::{AmazonError, ErrorCode, MarshalError};
pub use operations::Operation;
pub use value::{Item, Value};
