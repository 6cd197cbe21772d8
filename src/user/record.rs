//! Native user records as produced by a user store.
//!
//! A [`NativeUserRecord`] is the raw, platform-side representation of a user.
//! The factory never mutates records; it only reads them to pick a wrapper
//! class and hands them to that class's constructor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Numeric identifier of a user inside a store.
///
/// Stores hand out ids starting at 1; `0` never names a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw numeric identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse an identifier from its decimal string form.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for anything that is
    /// not a plain positive integer.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed
            .parse::<u64>()
            .ok()
            .filter(|&id| id > 0)
            .map(Self)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw user data owned by the user store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeUserRecord {
    pub id: UserId,
    pub login: String,
    pub email: String,
    pub display_name: String,
    /// Role slugs in the order the store assigned them.
    #[serde(default)]
    pub roles: Vec<String>,
    pub registered: DateTime<Utc>,
    /// Arbitrary per-user meta.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NativeUserRecord {
    /// Check whether the record carries the given role slug.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Look up a single meta attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Insert payload for stores that assign ids themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub login: String,
    pub email: String,
    /// Defaults to the login when left empty.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Defaults to the store's default role when left empty.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl NewUser {
    /// Start a new user with the given login and email.
    pub fn new(login: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Add a role slug.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Set a meta attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_parse() {
        assert_eq!(UserId::parse("42"), Some(UserId::new(42)));
        assert_eq!(UserId::parse(" 7 "), Some(UserId::new(7)));
        assert_eq!(UserId::parse(""), None);
        assert_eq!(UserId::parse("-1"), None);
        assert_eq!(UserId::parse("1.5"), None);
        assert_eq!(UserId::parse("abc"), None);
        assert_eq!(UserId::parse("0"), None);
        assert_eq!(UserId::parse("000"), None);
        assert_eq!(UserId::parse("007"), Some(UserId::new(7)));
    }

    #[test]
    fn test_record_serialization() {
        let record = NativeUserRecord {
            id: UserId::new(3),
            login: "ddd".to_string(),
            email: "ed@example.com".to_string(),
            display_name: "Ed".to_string(),
            roles: vec!["editor".to_string()],
            registered: DateTime::parse_from_rfc3339("2020-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
            attributes: Map::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(3));
        assert_eq!(value["roles"], json!(["editor"]));

        let back: NativeUserRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
        assert!(back.has_role("editor"));
        assert!(!back.has_role("administrator"));
    }

    #[test]
    fn test_new_user_builder() {
        let user = NewUser::new("bbb", "admin@example.com")
            .with_role("administrator")
            .with_attribute("nickname", json!("boss"));

        assert_eq!(user.roles, vec!["administrator"]);
        assert_eq!(user.display_name, None);
        assert_eq!(user.attributes["nickname"], json!("boss"));
    }
}
