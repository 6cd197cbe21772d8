//! User store abstraction.
//!
//! The factory reads users through the [`UserStore`] trait and never writes
//! to it. A store resolves single ids, runs criteria queries and executes
//! pre-built query objects, returning native records in its own natural
//! order.
//!
//! # Example Usage
//!
//! ```rust
//! use user_factory::store::{InMemoryUserStore, QueryCriteria, UserStore};
//! use user_factory::user::NewUser;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryUserStore::new();
//! let id = store.create(NewUser::new("bbb", "admin@example.com").with_role("administrator"))?;
//!
//! let found = store.find_by_id(id)?;
//! assert!(found.is_some());
//!
//! let admins = store.query(&QueryCriteria::new().with("role", json!("administrator")))?;
//! assert_eq!(admins.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod errors;
pub mod in_memory;
pub mod query;

pub use errors::StoreError;
pub use in_memory::{DEFAULT_ROLE, InMemoryUserStore};
pub use query::{QueryCriteria, UserQuery};

use crate::user::{NativeUserRecord, UserId};
use std::sync::Arc;

/// Read access to user data.
///
/// Implementations own the consistency of their data. All calls are
/// blocking and complete or fail before returning.
pub trait UserStore {
    /// The error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve a single id.
    ///
    /// Returns `Ok(None)` when no such user exists.
    fn find_by_id(&self, id: UserId) -> Result<Option<NativeUserRecord>, Self::Error>;

    /// Run a criteria query.
    ///
    /// Malformed criteria are reported through `Self::Error`.
    fn query(&self, criteria: &QueryCriteria) -> Result<Vec<NativeUserRecord>, Self::Error>;

    /// Execute a pre-built query object.
    ///
    /// Defaults to running the query's criteria.
    fn execute_query(&self, query: &UserQuery) -> Result<Vec<NativeUserRecord>, Self::Error> {
        self.query(query.criteria())
    }
}

impl<S: UserStore + ?Sized> UserStore for &S {
    type Error = S::Error;

    fn find_by_id(&self, id: UserId) -> Result<Option<NativeUserRecord>, Self::Error> {
        (**self).find_by_id(id)
    }

    fn query(&self, criteria: &QueryCriteria) -> Result<Vec<NativeUserRecord>, Self::Error> {
        (**self).query(criteria)
    }

    fn execute_query(&self, query: &UserQuery) -> Result<Vec<NativeUserRecord>, Self::Error> {
        (**self).execute_query(query)
    }
}

impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    type Error = S::Error;

    fn find_by_id(&self, id: UserId) -> Result<Option<NativeUserRecord>, Self::Error> {
        (**self).find_by_id(id)
    }

    fn query(&self, criteria: &QueryCriteria) -> Result<Vec<NativeUserRecord>, Self::Error> {
        (**self).query(criteria)
    }

    fn execute_query(&self, query: &UserQuery) -> Result<Vec<NativeUserRecord>, Self::Error> {
        (**self).execute_query(query)
    }
}
