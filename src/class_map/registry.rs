//! Registry of wrapper-class constructors.
//!
//! Maps the class names produced by the [`ClassResolver`](super::ClassResolver)
//! to constructors. The default [`User`] class is always present.

use crate::error::{FactoryError, FactoryResult};
use crate::user::{NativeUserRecord, User, UserClass, UserObject};
use std::collections::HashMap;
use std::marker::PhantomData;

/// Builds one wrapper class from native records.
pub trait UserConstructor: Send + Sync {
    /// Name the constructor is registered under.
    fn class_name(&self) -> &str;

    /// Build a fresh wrapped user.
    fn construct(&self, record: NativeUserRecord) -> Box<dyn UserObject>;
}

/// Constructor for any [`UserClass`].
pub struct GenericUserConstructor<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T: UserClass> GenericUserConstructor<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: UserClass> Default for GenericUserConstructor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: UserClass> UserConstructor for GenericUserConstructor<T> {
    fn class_name(&self) -> &str {
        T::CLASS_NAME
    }

    fn construct(&self, record: NativeUserRecord) -> Box<dyn UserObject> {
        Box::new(T::build(record))
    }
}

/// Constructor backed by a closure.
pub struct FnUserConstructor<F> {
    class_name: String,
    build: F,
}

impl<F> UserConstructor for FnUserConstructor<F>
where
    F: Fn(NativeUserRecord) -> Box<dyn UserObject> + Send + Sync,
{
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn construct(&self, record: NativeUserRecord) -> Box<dyn UserObject> {
        (self.build)(record)
    }
}

/// Class name → constructor lookup.
pub struct ClassRegistry {
    constructors: HashMap<String, Box<dyn UserConstructor>>,
}

impl ClassRegistry {
    /// Create a registry holding only the default [`User`] class.
    pub fn new() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register::<User>();
        registry
    }

    /// Register a wrapper class under its [`UserClass::CLASS_NAME`].
    pub fn register<T: UserClass>(&mut self) -> &mut Self {
        self.register_constructor(Box::new(GenericUserConstructor::<T>::new()));
        self
    }

    /// Register a closure building the class `class_name`.
    pub fn register_fn<F>(&mut self, class_name: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(NativeUserRecord) -> Box<dyn UserObject> + Send + Sync + 'static,
    {
        self.register_constructor(Box::new(FnUserConstructor {
            class_name: class_name.into(),
            build,
        }));
        self
    }

    /// Register a constructor, replacing any previous one with the same name.
    ///
    /// Returns `true` if a constructor was replaced.
    pub fn register_constructor(&mut self, constructor: Box<dyn UserConstructor>) -> bool {
        let name = constructor.class_name().to_string();
        let replaced = self.constructors.insert(name.clone(), constructor).is_some();
        if replaced {
            log::debug!("Replaced constructor for user class '{}'", name);
        }
        replaced
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build `class_name` around `record`.
    pub fn build(
        &self,
        class_name: &str,
        record: NativeUserRecord,
    ) -> FactoryResult<Box<dyn UserObject>> {
        let constructor = self
            .constructors
            .get(class_name)
            .ok_or_else(|| FactoryError::unknown_class(class_name))?;
        Ok(constructor.construct(record))
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.class_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_user_class;
    use crate::user::UserId;
    use chrono::Utc;

    #[derive(Debug, Clone)]
    struct AdminUser(User);

    impl_user_class!(AdminUser);

    fn record() -> NativeUserRecord {
        NativeUserRecord {
            id: UserId::new(2),
            login: "bbb".to_string(),
            email: "admin@example.com".to_string(),
            display_name: "bbb".to_string(),
            roles: vec!["administrator".to_string()],
            registered: Utc::now(),
            attributes: Default::default(),
        }
    }

    #[test]
    fn test_default_registry() {
        let registry = ClassRegistry::new();
        assert!(registry.contains("User"));
        assert_eq!(registry.class_names(), vec!["User"]);

        let user = registry.build("User", record()).unwrap();
        assert!(user.is::<User>());
    }

    #[test]
    fn test_register_class() {
        let mut registry = ClassRegistry::new();
        registry.register::<AdminUser>();

        let admin = registry.build("AdminUser", record()).unwrap();
        assert!(admin.is::<AdminUser>());
        assert_eq!(admin.id(), UserId::new(2));
        assert_eq!(registry.class_names(), vec!["AdminUser", "User"]);
    }

    #[test]
    fn test_register_fn_replaces() {
        let mut registry = ClassRegistry::new();
        registry.register_fn("User", |record: NativeUserRecord| -> Box<dyn UserObject> {
            Box::new(AdminUser(User::from_record(record)))
        });

        let built = registry.build("User", record()).unwrap();
        assert!(built.is::<AdminUser>());
    }

    #[test]
    fn test_unknown_class() {
        let registry = ClassRegistry::new();
        let err = registry.build("GhostUser", record()).unwrap_err();
        assert!(matches!(err, FactoryError::UnknownClass { ref class_name } if class_name == "GhostUser"));
    }
}
