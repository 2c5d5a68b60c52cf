//! Describing heterogeneous values through a closed sum type.

use crate::User;

/// A value whose kind is only known at runtime.
///
/// Anything that is not text, an integer or a user record lands in
/// [`Value::Unknown`], which keeps the name of the kind it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    User(Box<User>),
    Unknown(String),
}

impl Value {
    /// Classifies a decoded JSON value.
    ///
    /// Objects are treated as users when they decode as one.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Unknown("number".to_string()),
            },
            serde_json::Value::Object(map) => {
                match serde_json::from_value::<User>(serde_json::Value::Object(map)) {
                    Ok(user) => Value::User(Box::new(user)),
                    Err(_) => Value::Unknown("object".to_string()),
                }
            }
            serde_json::Value::Null => Value::Unknown("null".to_string()),
            serde_json::Value::Bool(_) => Value::Unknown("bool".to_string()),
            serde_json::Value::Array(_) => Value::Unknown("array".to_string()),
        }
    }

    /// Returns a one-line description tagged with the value's kind.
    pub fn describe(&self) -> String {
        match self {
            Value::Text(s) => format!("String: {s}"),
            Value::Integer(i) => format!("Integer: {i}"),
            Value::User(user) => format!("User: {}", user.name()),
            Value::Unknown(kind) => format!("Unknown type: {kind}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<User> for Value {
    fn from(user: User) -> Self {
        Value::User(Box::new(user))
    }
}
