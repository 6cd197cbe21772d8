//! The default wrapper class.

use super::object::{UserClass, UserObject};
use super::record::{NativeUserRecord, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;

/// Class name of the default wrapper.
pub const DEFAULT_USER_CLASS: &str = "User";

/// Base user wrapper.
///
/// Custom wrapper classes are usually newtypes around `User`, see
/// [`impl_user_class!`](crate::impl_user_class).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct User {
    record: NativeUserRecord,
}

impl User {
    /// Wrap a native record.
    pub fn from_record(record: NativeUserRecord) -> Self {
        Self { record }
    }

    pub fn login(&self) -> &str {
        &self.record.login
    }

    pub fn email(&self) -> &str {
        &self.record.email
    }

    /// Display name, falling back to the login when the store left it blank.
    pub fn name(&self) -> &str {
        if self.record.display_name.trim().is_empty() {
            &self.record.login
        } else {
            &self.record.display_name
        }
    }

    pub fn roles(&self) -> &[String] {
        &self.record.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.record.has_role(role)
    }

    pub fn registered(&self) -> DateTime<Utc> {
        self.record.registered
    }

    /// Look up a meta attribute.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.record.attribute(key)
    }

    /// Unwrap the native record.
    pub fn into_record(self) -> NativeUserRecord {
        self.record
    }
}

impl UserObject for User {
    fn id(&self) -> UserId {
        self.record.id
    }

    fn class_name(&self) -> &str {
        DEFAULT_USER_CLASS
    }

    fn record(&self) -> &NativeUserRecord {
        &self.record
    }

    fn clone_boxed(&self) -> Box<dyn UserObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl UserClass for User {
    const CLASS_NAME: &'static str = DEFAULT_USER_CLASS;

    fn build(record: NativeUserRecord) -> Self {
        Self::from_record(record)
    }
}
