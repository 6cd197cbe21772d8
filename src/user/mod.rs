//! User data model and wrapper classes.
//!
//! - [`NativeUserRecord`] - raw record owned by a [`UserStore`](crate::store::UserStore)
//! - [`UserObject`] - trait implemented by every wrapped user
//! - [`UserClass`] - wrapper classes constructible by name
//! - [`User`] - the default wrapper class

pub mod base;
pub mod object;
pub mod record;

pub use base::{DEFAULT_USER_CLASS, User};
pub use object::{UserClass, UserObject};
pub use record::{NativeUserRecord, NewUser, UserId};
