//! Table-name prefixing for outgoing requests and incoming responses.
//!
//! A prefix lets several environments share one account: callers use bare
//! table names and the client adds the prefix on the way out and removes it
//! on the way back.

use serde_json::{Map, Value as Json};

const REQUEST_NAME_FIELDS: &[&str] = &["TableName", "ExclusiveStartTableName"];
const REQUEST_TABLE_MAPS: &[&str] = &["RequestItems"];
const RESPONSE_TABLE_MAPS: &[&str] = &["Responses", "UnprocessedItems", "UnprocessedKeys"];
const RESPONSE_DESCRIPTIONS: &[&str] = &["Table", "TableDescription"];

/// An optional table-name prefix. Without a prefix both directions are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableNamePrefix(Option<String>);

impl TableNamePrefix {
    /// Use `prefix`; an empty prefix disables prefixing.
    #[must_use]
    pub fn new(prefix: Option<&str>) -> Self {
        Self(prefix.filter(|p| !p.is_empty()).map(str::to_owned))
    }

    /// Prefixed form of `name`.
    #[must_use]
    pub fn prefixed(&self, name: &str) -> String {
        match &self.0 {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_owned(),
        }
    }

    /// `name` without the prefix. Names that do not carry it are returned
    /// unchanged.
    #[must_use]
    pub fn stripped<'a>(&self, name: &'a str) -> &'a str {
        match &self.0 {
            Some(prefix) => name.strip_prefix(prefix.as_str()).unwrap_or(name),
            None => name,
        }
    }

    /// Prefix every table name in a request body.
    pub fn apply(&self, params: &mut Json) {
        if self.0.is_none() {
            return;
        }
        let Some(object) = params.as_object_mut() else {
            return;
        };
        for field in REQUEST_NAME_FIELDS {
            if let Some(Json::String(name)) = object.get_mut(*field) {
                *name = self.prefixed(name);
            }
        }
        for field in REQUEST_TABLE_MAPS {
            if let Some(Json::Object(tables)) = object.get_mut(*field) {
                rekey(tables, |name| self.prefixed(name));
            }
        }
    }

    /// Remove the prefix from every table name in a response body.
    pub fn strip(&self, response: &mut Json) {
        if self.0.is_none() {
            return;
        }
        let Some(object) = response.as_object_mut() else {
            return;
        };
        for field in RESPONSE_TABLE_MAPS {
            if let Some(Json::Object(tables)) = object.get_mut(*field) {
                rekey(tables, |name| self.stripped(name).to_owned());
            }
        }
        if let Some(Json::Array(names)) = object.get_mut("TableNames") {
            for name in names.iter_mut() {
                self.strip_string(name);
            }
        }
        if let Some(name) = object.get_mut("LastEvaluatedTableName") {
            self.strip_string(name);
        }
        for field in RESPONSE_DESCRIPTIONS {
            if let Some(name) = object
                .get_mut(*field)
                .and_then(|description| description.get_mut("TableName"))
            {
                self.strip_string(name);
            }
        }
    }

    fn strip_string(&self, value: &mut Json) {
        if let Json::String(name) = value {
            *name = self.stripped(name).to_owned();
        }
    }
}

fn rekey(tables: &mut Map<String, Json>, rename: impl Fn(&str) -> String) {
    *tables = std::mem::take(tables)
        .into_iter()
        .map(|(name, value)| (rename(&name), value))
        .collect();
}
