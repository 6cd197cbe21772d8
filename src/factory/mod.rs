//! The user factory.
//!
//! [`UserFactory`] dispatches on the shape of its [`UserInput`], asks the
//! store for native records where needed and wraps each record in the class
//! picked by its class resolver.

pub mod builder;
pub mod core;
pub mod input;

pub use builder::{FactoryConfig, InvalidElementPolicy, UserFactoryBuilder};
pub use self::core::{Resolved, UserFactory};
pub use input::UserInput;
