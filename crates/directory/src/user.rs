//! The user record and its role tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Role tag carried by a user.
///
/// The three well-known roles get their own variants; any other tag is kept
/// verbatim in [`Role::Other`] so decoding never rejects an unfamiliar role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Moderator,
    Other(String),
}

impl Role {
    /// Parses a role tag. Unknown tags become [`Role::Other`].
    pub fn parse(tag: &str) -> Self {
        match tag {
            "admin" => Role::Admin,
            "user" => Role::User,
            "moderator" => Role::Moderator,
            other => Role::Other(other.to_string()),
        }
    }

    /// Returns the wire tag for this role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Other(tag) => tag,
        }
    }

    /// Human-readable description of what the role grants.
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator with full access",
            Role::User => "Regular user",
            Role::Moderator => "User with moderation privileges",
            Role::Other(_) => "Custom role",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        match Role::parse(&tag) {
            Role::Other(_) => Role::Other(tag),
            known => known,
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Role::parse(tag)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// A user record.
///
/// Users are immutable once built; the `with_*` methods return a new record
/// rather than editing this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    #[serde(default)]
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user stamped with the current time.
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<Role>,
    ) -> Self {
        Self::with_created_at(id, name, email, role, Utc::now())
    }

    /// Creates a user with an explicit creation timestamp.
    pub fn with_created_at(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<Role>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `"name <email>"`.
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns a greeting addressed to this user.
    pub fn greeting(&self) -> String {
        format!("Hello, {}!", self.name)
    }

    /// Returns a copy of this user with a different email.
    pub fn with_email(&self, email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this user with a different role.
    pub fn with_role(&self, role: impl Into<Role>) -> Self {
        Self {
            role: role.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new(1, "Alice", "alice@example.com", Role::Admin)
    }

    #[test]
    fn display_name_combines_name_and_email() {
        assert_eq!(alice().display_name(), "Alice <alice@example.com>");
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert!(alice().is_admin());
        assert!(!alice().with_role("moderator").is_admin());
        assert!(!alice().with_role("Admin").is_admin());
    }

    #[test]
    fn greeting_uses_name() {
        assert_eq!(alice().greeting(), "Hello, Alice!");
    }

    #[test]
    fn with_email_leaves_original_untouched() {
        let original = alice();
        let updated = original.with_email("alice@new.example.com");

        assert_eq!(original.email(), "alice@example.com");
        assert_eq!(updated.email(), "alice@new.example.com");
        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.created_at(), original.created_at());
    }

    #[test]
    fn unknown_role_tags_are_preserved() {
        let role = Role::parse("auditor");
        assert_eq!(role, Role::Other("auditor".to_string()));
        assert_eq!(role.to_string(), "auditor");
        assert_eq!(role.description(), "Custom role");
    }

    #[test]
    fn role_descriptions() {
        assert_eq!(Role::Admin.description(), "Administrator with full access");
        assert_eq!(Role::User.description(), "Regular user");
        assert_eq!(
            Role::Moderator.description(),
            "User with moderation privileges"
        );
    }

    #[test]
    fn user_json_uses_role_tags() {
        let user = alice();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["id"], 1);

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn missing_created_at_defaults_to_epoch() {
        let user: User = serde_json::from_str(
            r#"{"id":2,"name":"Bob","email":"bob@example.com","role":"user"}"#,
        )
        .unwrap();
        assert_eq!(user.created_at(), DateTime::<Utc>::default());
        assert_eq!(user.role(), &Role::User);
    }
}
