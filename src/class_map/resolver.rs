//! Class resolver hooks.
//!
//! A [`ClassResolver`] turns a default class name and a native record into
//! the name of the wrapper class to build. Hooks run in ascending priority
//! order; hooks sharing a priority run in registration order. Each hook sees
//! the name produced by the hooks before it, so a hook that returns its
//! input unchanged passes the decision on, and otherwise the last hook to
//! run wins.

use crate::user::NativeUserRecord;
use std::fmt;

/// Priority used by [`ClassResolver::add_hook`].
pub const DEFAULT_PRIORITY: i32 = 10;

/// A class-mapping hook.
///
/// Implemented for any `Fn(&str, &NativeUserRecord) -> String`. Closures
/// need their parameter types spelled out:
///
/// ```rust
/// use user_factory::class_map::ClassResolver;
/// use user_factory::user::NativeUserRecord;
///
/// let mut resolver = ClassResolver::new();
/// resolver.add_hook(|class: &str, user: &NativeUserRecord| {
///     if user.has_role("administrator") {
///         "AdminUser".to_string()
///     } else {
///         class.to_string()
///     }
/// });
/// ```
pub trait ClassMapHook: Send + Sync {
    /// Return the class to build for `record`, given the class chosen so far.
    fn map_class(&self, class_name: &str, record: &NativeUserRecord) -> String;
}

impl<F> ClassMapHook for F
where
    F: Fn(&str, &NativeUserRecord) -> String + Send + Sync,
{
    fn map_class(&self, class_name: &str, record: &NativeUserRecord) -> String {
        self(class_name, record)
    }
}

/// Handle returned when a hook is registered, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u64);

struct RegisteredHook {
    id: HookId,
    priority: i32,
    hook: Box<dyn ClassMapHook>,
}

/// Ordered set of class-mapping hooks.
#[derive(Default)]
pub struct ClassResolver {
    hooks: Vec<RegisteredHook>,
    next_id: u64,
}

impl ClassResolver {
    /// Create a resolver with no hooks (identity mapping).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook at [`DEFAULT_PRIORITY`].
    pub fn add_hook<H>(&mut self, hook: H) -> HookId
    where
        H: ClassMapHook + 'static,
    {
        self.add_hook_with_priority(DEFAULT_PRIORITY, hook)
    }

    /// Register a hook at the given priority. Lower priorities run first.
    pub fn add_hook_with_priority<H>(&mut self, priority: i32, hook: H) -> HookId
    where
        H: ClassMapHook + 'static,
    {
        self.next_id += 1;
        let id = HookId(self.next_id);

        self.hooks.push(RegisteredHook {
            id,
            priority,
            hook: Box::new(hook),
        });
        // Stable sort keeps registration order within a priority
        self.hooks.sort_by_key(|h| h.priority);

        log::debug!("Registered class map hook {:?} at priority {}", id, priority);
        id
    }

    /// Remove a previously registered hook.
    ///
    /// Returns `false` if the hook was already removed.
    pub fn remove_hook(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|h| h.id != id);
        let removed = self.hooks.len() != before;
        if removed {
            log::debug!("Removed class map hook {:?}", id);
        }
        removed
    }

    /// Remove every hook.
    pub fn clear(&mut self) {
        self.hooks.clear();
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the hooks over `default_class` for `record`.
    pub fn resolve(&self, default_class: &str, record: &NativeUserRecord) -> String {
        self.hooks
            .iter()
            .fold(default_class.to_string(), |class_name, registered| {
                registered.hook.map_class(&class_name, record)
            })
    }
}

impl fmt::Debug for ClassResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassResolver")
            .field(
                "hooks",
                &self
                    .hooks
                    .iter()
                    .map(|h| (h.id, h.priority))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Hook mapping role slugs to class names.
///
/// Rules are checked in the order they were added; the first role the
/// record carries decides the class. Records matching no rule keep the
/// class they came in with.
#[derive(Debug, Clone, Default)]
pub struct RoleClassMap {
    rules: Vec<(String, String)>,
}

impl RoleClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map users with `role` to `class_name`.
    pub fn map_role(mut self, role: impl Into<String>, class_name: impl Into<String>) -> Self {
        self.rules.push((role.into(), class_name.into()));
        self
    }
}

impl ClassMapHook for RoleClassMap {
    fn map_class(&self, class_name: &str, record: &NativeUserRecord) -> String {
        self.rules
            .iter()
            .find(|(role, _)| record.has_role(role))
            .map(|(_, mapped)| mapped.clone())
            .unwrap_or_else(|| class_name.to_string())
    }
}
