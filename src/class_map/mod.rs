//! Class mapping: which wrapper class a native record becomes.
//!
//! Resolution happens in two steps. The [`ClassResolver`] runs its hooks to
//! pick a class name, then the [`ClassRegistry`] builds that class.

pub mod registry;
pub mod resolver;

pub use registry::{ClassRegistry, FnUserConstructor, GenericUserConstructor, UserConstructor};
pub use resolver::{ClassMapHook, ClassResolver, DEFAULT_PRIORITY, HookId, RoleClassMap};
