//! Input tree consumed by the validation engine.
//!
//! A [`Value`] is what request bodies and forms decode into: scalars, ordered
//! objects, arrays and uploaded files. Objects keep insertion order so that
//! wildcard expansion visits keys the way the payload listed them.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// VALUE
// ============================================================================

/// A node of the nested input under validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicit `null`.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or floating point number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An ordered list.
    Array(Vec<Value>),
    /// An insertion-ordered map.
    Object(IndexMap<String, Value>),
    /// An uploaded file.
    File(UploadedFile),
}

/// Client-side metadata of an uploaded file.
///
/// Every attribute is optional because multipart clients are free to omit
/// them; file rules treat a missing attribute as a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub client_filename: Option<String>,
    /// Media type as sent by the client.
    pub client_media_type: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl UploadedFile {
    /// Creates a file with a client file name.
    pub fn new(client_filename: impl Into<String>) -> Self {
        Self {
            client_filename: Some(client_filename.into()),
            ..Self::default()
        }
    }

    /// Sets the client media type.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.client_media_type = Some(media_type.into());
        self
    }

    /// Sets the size in bytes.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Returns the extension of the client file name, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.client_filename.as_deref()?;
        std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

impl Value {
    /// Looks up a direct child.
    ///
    /// Objects are indexed by key, arrays by a key that parses as an index.
    /// Scalars have no children.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            Self::Array(items) => array_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Returns true if `key` names a direct child.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over direct children in natural order.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Self::Object(map) => Box::new(map.values()),
            Self::Array(items) => Box::new(items.iter()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Iterates over `(key, child)` pairs; array keys are their indices.
    pub fn entries(&self) -> Vec<(Cow<'_, str>, &Value)> {
        match self {
            Self::Object(map) => map
                .iter()
                .map(|(key, value)| (Cow::Borrowed(key.as_str()), value))
                .collect(),
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, value)| (Cow::Owned(i.to_string()), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns true for arrays and objects.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// Returns the number as `f64` (numbers only, strings are not coerced).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the numeric reading of a number or a numeric string.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::String(s) => parse_numeric(s),
            _ => None,
        }
    }

    /// Returns the textual form of strings and numbers.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Returns the size of countable values: characters for strings,
    /// elements for arrays and objects.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Array(items) => Some(items.len()),
            Self::Object(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Returns true for empty strings and empty containers.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::File(_) => "file",
        }
    }
}

/// Reads `key` as an array index: plain decimal digits, no sign and no
/// leading zero.
fn array_index(key: &str) -> Option<usize> {
    let canonical = match key.as_bytes() {
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    canonical.then(|| key.parse().ok()).flatten()
}

/// Parses a string the way numeric rules read it.
///
/// Leading and trailing whitespace is ignored; the only letters allowed are
/// exponent markers, so `inf` and `NaN` are not numeric.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty()
        || s
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no number representation and become `Null`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Object(map)
    }
}

impl From<UploadedFile> for Value {
    fn from(file: UploadedFile) -> Self {
        Self::File(file)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ============================================================================
// SERDE
// ============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(map) => map.serialize(serializer),
            Self::File(file) => file.serialize(serializer),
        }
    }
}

/// Deserializes from the JSON data model; files never come out of a plain
/// payload, they are attached by the multipart layer.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            other => {
                let rendered = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
