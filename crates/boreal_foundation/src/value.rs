//! Script-visible local variables.
//!
//! Entities and the global table store named values set by scripts and
//! consumed by dialog conditions and save files. The variant set mirrors the
//! legacy scripting VM types; `Object` holds an id that the save layer
//! re-resolves after load.

use crate::object::ObjectId;

/// A dynamically typed value stored on an entity or in the global table.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalValue {
    /// No value; the result of reading an unset variable.
    Null,
    /// Signed 32-bit integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
    /// UTF-8 string.
    String(String),
    /// Boolean flag.
    Bool(bool),
    /// Object reference, re-resolved after save load.
    Object(ObjectId),
}

impl LocalValue {
    /// Wire tag used by the save format.
    #[must_use]
    pub fn tag(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::String(_) => 3,
            Self::Bool(_) => 4,
            Self::Object(_) => 5,
        }
    }

    /// Returns the integer payload if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float payload if this is a `Float`.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean payload if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the object payload if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether this value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for LocalValue {
    fn default() -> Self {
        Self::Null
    }
}

impl From<i32> for LocalValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for LocalValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for LocalValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for LocalValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for LocalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ObjectId> for LocalValue {
    fn from(value: ObjectId) -> Self {
        Self::Object(value)
    }
}
