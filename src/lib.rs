//! User factory library for Rust.
//!
//! Turns user ids, native user records, already wrapped users, query
//! criteria and pre-built queries into wrapped user objects, choosing the
//! wrapper class per record through pluggable class-mapping hooks.
//!
//! # Core Components
//!
//! - [`UserFactory`] - Resolves any [`UserInput`] into wrapped users
//! - [`UserStore`] - Trait for the backend that owns user data
//! - [`ClassResolver`] - Hooks deciding which wrapper class a record becomes
//! - [`ClassRegistry`] - Constructors for the available wrapper classes
//!
//! # Quick Start
//!
//! ```rust
//! use user_factory::{UserFactory, UserInput};
//! use user_factory::class_map::RoleClassMap;
//! use user_factory::store::InMemoryUserStore;
//! use user_factory::user::{NewUser, User};
//! use user_factory::impl_user_class;
//!
//! #[derive(Debug, Clone)]
//! pub struct AdminUser(User);
//! impl_user_class!(AdminUser);
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryUserStore::new();
//! let admin = store.create(NewUser::new("bbb", "admin@example.com").with_role("administrator"))?;
//! let normie = store.create(NewUser::new("aaa", "someone@example.com"))?;
//!
//! let mut factory = UserFactory::new(store);
//! factory.class_registry_mut().register::<AdminUser>();
//! factory
//!     .class_resolver_mut()
//!     .add_hook(RoleClassMap::new().map_role("administrator", "AdminUser"));
//!
//! let users = factory.from([admin, normie])?.into_users();
//! assert!(users[0].is::<AdminUser>());
//! assert!(users[1].is::<User>());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod class_map;
pub mod error;
pub mod factory;
pub mod store;
pub mod user;

// Re-export commonly used types for convenience
pub use class_map::{ClassMapHook, ClassRegistry, ClassResolver, HookId};
pub use error::{FactoryError, FactoryResult};
pub use factory::{
    FactoryConfig, InvalidElementPolicy, Resolved, UserFactory, UserFactoryBuilder, UserInput,
};
pub use store::{InMemoryUserStore, QueryCriteria, StoreError, UserQuery, UserStore};
pub use user::{NativeUserRecord, NewUser, User, UserClass, UserId, UserObject};
