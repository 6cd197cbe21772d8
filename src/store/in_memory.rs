//! In-memory user store.
//!
//! This module provides an implementation of [`UserStore`] backed by a
//! `BTreeMap` behind an `Arc<RwLock<..>>`. Clones share the same data, so a
//! test can keep inserting users through one handle while a factory reads
//! through another. Intended for testing and development.
//!
//! # Supported criteria
//!
//! | key            | value                               |
//! |----------------|-------------------------------------|
//! | `role`         | role slug or array; user needs all  |
//! | `role__in`     | array; user needs at least one      |
//! | `role__not_in` | array; user needs none              |
//! | `include`      | array of ids                        |
//! | `exclude`      | array of ids                        |
//! | `login`        | exact login                         |
//! | `email`        | email, ignoring ASCII case          |
//! | `search`       | substring of login, email or name   |
//! | `orderby`      | `ID`, `login`, `email`, `display_name`, `registered` |
//! | `order`        | `ASC` or `DESC`                     |
//! | `number`       | limit                               |
//! | `offset`       | number of results to skip           |
//!
//! Results default to ascending login order. Unknown keys are rejected.

use crate::store::{QueryCriteria, StoreError, UserStore};
use crate::user::{NativeUserRecord, NewUser, UserId};
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Role given to users created without any role.
pub const DEFAULT_ROLE: &str = "subscriber";

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, NativeUserRecord>,
    last_id: u64,
}

/// Thread-safe in-memory user store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryUserStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::internal("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::internal("user store lock poisoned"))
    }

    /// Create a user and return its freshly assigned id.
    ///
    /// Ids are assigned sequentially starting at 1. Logins must be unique.
    pub fn create(&self, new_user: NewUser) -> Result<UserId, StoreError> {
        let mut state = self.write()?;

        if state.users.values().any(|u| u.login == new_user.login) {
            return Err(StoreError::DuplicateLogin {
                login: new_user.login,
            });
        }

        state.last_id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::internal("user id sequence exhausted"))?;
        let id = UserId::new(state.last_id);

        let roles = if new_user.roles.is_empty() {
            vec![DEFAULT_ROLE.to_string()]
        } else {
            new_user.roles
        };
        let display_name = new_user
            .display_name
            .unwrap_or_else(|| new_user.login.clone());

        let record = NativeUserRecord {
            id,
            login: new_user.login,
            email: new_user.email,
            display_name,
            roles,
            registered: Utc::now(),
            attributes: new_user.attributes,
        };
        log::trace!("Created user {} ({})", id, record.login);
        state.users.insert(id, record);

        Ok(id)
    }

    /// Insert or replace a complete record under its own id.
    ///
    /// Returns the record previously stored under that id.
    pub fn insert(&self, record: NativeUserRecord) -> Result<Option<NativeUserRecord>, StoreError> {
        let mut state = self.write()?;

        if state
            .users
            .values()
            .any(|u| u.login == record.login && u.id != record.id)
        {
            return Err(StoreError::DuplicateLogin {
                login: record.login,
            });
        }

        state.last_id = state.last_id.max(record.id.get());
        Ok(state.users.insert(record.id, record))
    }

    /// Fetch a record by id.
    pub fn get(&self, id: UserId) -> Result<Option<NativeUserRecord>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.users.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.users.is_empty())
    }

    /// Remove every user and restart the id sequence.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.users.clear();
        state.last_id = 0;
        Ok(())
    }
}

impl UserStore for InMemoryUserStore {
    type Error = StoreError;

    fn find_by_id(&self, id: UserId) -> Result<Option<NativeUserRecord>, Self::Error> {
        self.get(id)
    }

    fn query(&self, criteria: &QueryCriteria) -> Result<Vec<NativeUserRecord>, Self::Error> {
        let filter = CriteriaFilter::parse(criteria)?;
        let state = self.read()?;
        Ok(filter.apply(state.users.values()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderBy {
    Id,
    Login,
    Email,
    DisplayName,
    Registered,
}

#[derive(Debug, Default)]
struct CriteriaFilter {
    roles_all: Vec<String>,
    roles_any: Vec<String>,
    roles_none: Vec<String>,
    include: Option<Vec<UserId>>,
    exclude: Vec<UserId>,
    login: Option<String>,
    email: Option<String>,
    search: Option<String>,
    order_by: Option<OrderBy>,
    descending: bool,
    number: Option<usize>,
    offset: usize,
}

impl CriteriaFilter {
    fn parse(criteria: &QueryCriteria) -> Result<Self, StoreError> {
        let mut filter = Self::default();

        for (key, value) in criteria.iter() {
            match key.as_str() {
                "role" => filter.roles_all = string_list(key, value)?,
                "role__in" => filter.roles_any = string_list(key, value)?,
                "role__not_in" => filter.roles_none = string_list(key, value)?,
                "include" => filter.include = Some(id_list(key, value)?),
                "exclude" => filter.exclude = id_list(key, value)?,
                "login" => filter.login = Some(string_value(key, value)?.to_string()),
                "email" => filter.email = Some(string_value(key, value)?.to_string()),
                "search" => {
                    let term = string_value(key, value)?
                        .trim_matches('*')
                        .to_lowercase();
                    filter.search = (!term.is_empty()).then_some(term);
                }
                "orderby" => {
                    filter.order_by = Some(match string_value(key, value)? {
                        "ID" | "id" => OrderBy::Id,
                        "login" | "user_login" => OrderBy::Login,
                        "email" | "user_email" => OrderBy::Email,
                        "display_name" => OrderBy::DisplayName,
                        "registered" | "user_registered" => OrderBy::Registered,
                        other => {
                            return Err(StoreError::invalid_criteria(
                                key,
                                format!("unsupported sort field '{}'", other),
                            ));
                        }
                    })
                }
                "order" => {
                    let order = string_value(key, value)?;
                    filter.descending = if order.eq_ignore_ascii_case("desc") {
                        true
                    } else if order.eq_ignore_ascii_case("asc") {
                        false
                    } else {
                        return Err(StoreError::invalid_criteria(
                            key,
                            format!("expected ASC or DESC, got '{}'", order),
                        ));
                    };
                }
                "number" => filter.number = Some(count_value(key, value)?),
                "offset" => filter.offset = count_value(key, value)?,
                _ => {
                    return Err(StoreError::invalid_criteria(key, "unknown criteria key"));
                }
            }
        }

        Ok(filter)
    }

    fn matches(&self, record: &NativeUserRecord) -> bool {
        if !self.roles_all.iter().all(|role| record.has_role(role)) {
            return false;
        }
        if !self.roles_any.is_empty() && !self.roles_any.iter().any(|role| record.has_role(role)) {
            return false;
        }
        if self.roles_none.iter().any(|role| record.has_role(role)) {
            return false;
        }
        if let Some(include) = &self.include {
            if !include.contains(&record.id) {
                return false;
            }
        }
        if self.exclude.contains(&record.id) {
            return false;
        }
        if let Some(login) = &self.login {
            if &record.login != login {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !record.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let hit = [&record.login, &record.email, &record.display_name]
                .iter()
                .any(|field| field.to_lowercase().contains(term.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &NativeUserRecord, b: &NativeUserRecord) -> Ordering {
        let ordering = match self.order_by.unwrap_or(OrderBy::Login) {
            OrderBy::Id => a.id.cmp(&b.id),
            OrderBy::Login => a.login.cmp(&b.login),
            OrderBy::Email => a.email.cmp(&b.email),
            OrderBy::DisplayName => a.display_name.cmp(&b.display_name),
            OrderBy::Registered => a.registered.cmp(&b.registered),
        }
        .then_with(|| a.id.cmp(&b.id));

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    fn apply<'a>(&self, records: impl Iterator<Item = &'a NativeUserRecord>) -> Vec<NativeUserRecord> {
        let mut matched: Vec<&NativeUserRecord> = records.filter(|r| self.matches(r)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        matched
            .into_iter()
            .skip(self.offset)
            .take(self.number.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

fn string_value<'a>(key: &str, value: &'a Value) -> Result<&'a str, StoreError> {
    value
        .as_str()
        .ok_or_else(|| StoreError::invalid_criteria(key, "expected a string"))
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>, StoreError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    StoreError::invalid_criteria(key, "expected an array of strings")
                })
            })
            .collect(),
        _ => Err(StoreError::invalid_criteria(
            key,
            "expected a string or an array of strings",
        )),
    }
}

fn id_list(key: &str, value: &Value) -> Result<Vec<UserId>, StoreError> {
    let items = value
        .as_array()
        .ok_or_else(|| StoreError::invalid_criteria(key, "expected an array of ids"))?;

    items
        .iter()
        .map(|item| {
            let id = match item {
                Value::Number(n) => n.as_u64().map(UserId::new),
                Value::String(s) => UserId::parse(s),
                _ => None,
            };
            id.ok_or_else(|| {
                StoreError::invalid_criteria(key, format!("'{}' is not a user id", item))
            })
        })
        .collect()
}

fn count_value(key: &str, value: &Value) -> Result<usize, StoreError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| StoreError::invalid_criteria(key, "expected a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        store
            .create(NewUser::new("ccc", "author@example.com").with_role("author"))
            .unwrap();
        store
            .create(NewUser::new("aaa", "sub@example.com"))
            .unwrap();
        store
            .create(
                NewUser::new("bbb", "admin@example.com")
                    .with_display_name("The Admin")
                    .with_role("administrator")
                    .with_role("editor"),
            )
            .unwrap();
        store
    }

    fn logins(records: &[NativeUserRecord]) -> Vec<&str> {
        records.iter().map(|r| r.login.as_str()).collect()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = seeded();
        assert_eq!(store.len().unwrap(), 3);

        let sub = store.get(UserId::new(2)).unwrap().unwrap();
        assert_eq!(sub.login, "aaa");
        assert_eq!(sub.roles, vec![DEFAULT_ROLE]);
        assert_eq!(sub.display_name, "aaa");
    }

    #[test]
    fn test_create_rejects_duplicate_login() {
        let store = seeded();
        let err = store
            .create(NewUser::new("aaa", "other@example.com"))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateLogin {
                login: "aaa".to_string()
            }
        );
    }

    #[test]
    fn test_insert_bumps_sequence() {
        let store = InMemoryUserStore::new();
        let record = NativeUserRecord {
            id: UserId::new(40),
            login: "imported".to_string(),
            email: "imported@example.com".to_string(),
            display_name: "Imported".to_string(),
            roles: vec![],
            registered: Utc::now(),
            attributes: Default::default(),
        };
        assert!(store.insert(record).unwrap().is_none());

        let next = store.create(NewUser::new("fresh", "fresh@example.com")).unwrap();
        assert_eq!(next, UserId::new(41));
    }

    #[test]
    fn test_create_fails_when_sequence_is_exhausted() {
        let store = InMemoryUserStore::new();
        let record = NativeUserRecord {
            id: UserId::new(u64::MAX),
            login: "last".to_string(),
            email: "last@example.com".to_string(),
            display_name: "Last".to_string(),
            roles: vec![],
            registered: Utc::now(),
            attributes: Default::default(),
        };
        store.insert(record).unwrap();

        let err = store
            .create(NewUser::new("next", "next@example.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Internal { .. }));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_clear_resets_sequence() {
        let store = seeded();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());

        let id = store.create(NewUser::new("zzz", "z@example.com")).unwrap();
        assert_eq!(id, UserId::new(1));
    }

    #[test]
    fn test_default_order_is_login() {
        let store = seeded();
        let all = store.query(&QueryCriteria::new()).unwrap();
        assert_eq!(logins(&all), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_role_filters() {
        let store = seeded();

        let any = store
            .query(&QueryCriteria::new().with("role__in", json!(["administrator", "author"])))
            .unwrap();
        assert_eq!(logins(&any), vec!["bbb", "ccc"]);

        let all = store
            .query(&QueryCriteria::new().with("role", json!(["administrator", "editor"])))
            .unwrap();
        assert_eq!(logins(&all), vec!["bbb"]);

        let none = store
            .query(&QueryCriteria::new().with("role__not_in", json!(["subscriber"])))
            .unwrap();
        assert_eq!(logins(&none), vec!["bbb", "ccc"]);

        let empty_in = store
            .query(&QueryCriteria::new().with("role__in", json!([])))
            .unwrap();
        assert_eq!(empty_in.len(), 3);
    }

    #[test]
    fn test_include_exclude_and_login() {
        let store = seeded();

        let included = store
            .query(&QueryCriteria::new().with("include", json!([1, "3"])))
            .unwrap();
        assert_eq!(logins(&included), vec!["bbb", "ccc"]);

        let excluded = store
            .query(&QueryCriteria::new().with("exclude", json!([2])))
            .unwrap();
        assert_eq!(logins(&excluded), vec!["bbb", "ccc"]);

        let by_login = store
            .query(&QueryCriteria::new().with("login", json!("ccc")))
            .unwrap();
        assert_eq!(by_login.len(), 1);
        assert_eq!(by_login[0].id, UserId::new(1));

        let by_email = store
            .query(&QueryCriteria::new().with("email", json!("ADMIN@example.com")))
            .unwrap();
        assert_eq!(logins(&by_email), vec!["bbb"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = seeded();
        let found = store
            .query(&QueryCriteria::new().with("search", json!("*ADMIN*")))
            .unwrap();
        assert_eq!(logins(&found), vec!["bbb"]);
    }

    #[test]
    fn test_ordering_and_pagination() {
        let store = seeded();

        let by_id_desc = store
            .query(
                &QueryCriteria::new()
                    .with("orderby", json!("ID"))
                    .with("order", json!("desc")),
            )
            .unwrap();
        assert_eq!(logins(&by_id_desc), vec!["bbb", "aaa", "ccc"]);

        let page = store
            .query(
                &QueryCriteria::new()
                    .with("number", json!(1))
                    .with("offset", json!(1)),
            )
            .unwrap();
        assert_eq!(logins(&page), vec!["bbb"]);
    }

    #[test]
    fn test_malformed_criteria() {
        let store = seeded();

        let unknown = store
            .query(&QueryCriteria::new().with("colour", json!("blue")))
            .unwrap_err();
        assert!(matches!(unknown, StoreError::InvalidCriteria { ref key, .. } if key == "colour"));

        let bad_roles = store
            .query(&QueryCriteria::new().with("role__in", json!([1, 2])))
            .unwrap_err();
        assert!(matches!(bad_roles, StoreError::InvalidCriteria { .. }));

        let bad_order = store
            .query(&QueryCriteria::new().with("order", json!("sideways")))
            .unwrap_err();
        assert!(matches!(bad_order, StoreError::InvalidCriteria { .. }));

        let negative = store
            .query(&QueryCriteria::new().with("number", json!(-1)))
            .unwrap_err();
        assert!(matches!(negative, StoreError::InvalidCriteria { .. }));
    }

    #[test]
    fn test_clones_share_data() {
        let store = InMemoryUserStore::new();
        let handle = store.clone();
        let id = store.create(NewUser::new("shared", "s@example.com")).unwrap();
        assert!(handle.find_by_id(id).unwrap().is_some());
    }
}
