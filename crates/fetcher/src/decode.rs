//! Decoding user records from response bodies.

use directory::User;
use serde::{Deserialize, Serialize};

/// Response envelope some user sources wrap their payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

/// Decodes a user from a JSON body.
///
/// Accepts either a bare user document or an [`ApiResponse`] envelope whose
/// `data` field holds the user. The whole body is decoded or nothing is.
pub fn decode_user(body: &[u8]) -> Result<User, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if value.get("data").is_some() {
        let envelope: ApiResponse<User> = serde_json::from_value(value)?;
        return Ok(envelope.data);
    }
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory::{Role, UserId};

    #[test]
    fn decodes_bare_user() {
        let body = br#"{
            "id": 1,
            "name": "Alice",
            "email": "alice@example.com",
            "role": "admin",
            "created_at": "2024-01-15T10:30:00Z"
        }"#;

        let user = decode_user(body).unwrap();
        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.role(), &Role::Admin);
        assert_eq!(user.created_at().to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn decodes_enveloped_user() {
        let body = br#"{
            "data": {"id": 2, "name": "Bob", "email": "bob@example.com", "role": "user"},
            "status": 200,
            "message": "Success"
        }"#;

        let user = decode_user(body).unwrap();
        assert_eq!(user.name(), "Bob");
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(decode_user(br#"{"id": 3, "name": "Charlie"}"#).is_err());
    }

    #[test]
    fn rejects_truncated_body() {
        assert!(decode_user(br#"{"id": 3, "name": "Char"#).is_err());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(
            decode_user(br#"{"id": "3", "name": "C", "email": "c@example.com", "role": "user"}"#)
                .is_err()
        );
    }
}
