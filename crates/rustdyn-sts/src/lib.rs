//! Credential providers for the rustdyn client.
//!
//! Requests are signed with either long-lived credentials
//! ([`StaticCredentials`]) or temporary credentials obtained from the token
//! service with `GetSessionToken` ([`SessionCredentialProvider`]). Session
//! credentials are cached until their expiration passes and then fetched
//! again on the next request.

pub mod client;
pub mod error;
pub mod provider;
pub mod xml;

pub use client::{StsClient, TokenService};
pub use error::StsError;
pub use provider::{
    CredentialsFuture, ProvideCredentials, SessionCredentialProvider, StaticCredentials,
};
