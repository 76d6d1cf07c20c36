//! Generic response value shared by XML and JSON payloads.
//!
//! Both formats normalize into [`ApiResponse`] so the pipeline reads fields the
//! same way regardless of what the server sent. Scalars are always strings;
//! an XML element that was empty in the document comes back as an empty list,
//! so use [`ApiResponse::scalar`] when a missing scalar should read as `""`.

use std::collections::BTreeMap;

use serde::Serialize;

/// A normalized XML or JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Null,
    String(String),
    List(Vec<ApiResponse>),
    Map(BTreeMap<String, ApiResponse>),
}

impl ApiResponse {
    /// Look up a key in a map value
    pub fn get(&self, key: &str) -> Option<&ApiResponse> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a chain of map keys, e.g. `["book", "work", "original_publication_year"]`
    pub fn path(&self, keys: &[&str]) -> Option<&ApiResponse> {
        keys.iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text, with anything that isn't a string (notably the empty
    /// list an empty XML element decodes to) read as `""`
    pub fn scalar(&self) -> &str {
        self.as_str().unwrap_or_default()
    }

    #[cfg(test)]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Null, or a list/map with nothing in it
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }
}

/// Read a scalar field at `keys`, treating a missing field like an empty one
pub fn scalar_at<'a>(value: &'a ApiResponse, keys: &[&str]) -> &'a str {
    value.path(keys).map(ApiResponse::scalar).unwrap_or_default()
}

impl From<serde_json::Value> for ApiResponse {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::String(b.to_string()),
            Value::Number(n) => Self::String(n.to_string()),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ApiResponse {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}
