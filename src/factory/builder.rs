//! Factory configuration and builder.

use crate::class_map::{ClassMapHook, ClassRegistry, ClassResolver};
use crate::error::{FactoryError, FactoryResult};
use crate::factory::UserFactory;
use crate::store::UserStore;
use crate::user::{DEFAULT_USER_CLASS, UserClass};
use serde::{Deserialize, Serialize};

/// What a batch does with an element the factory cannot accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidElementPolicy {
    /// Put `None` at the element's position and keep going.
    #[default]
    NullEntry,
    /// Fail the whole call with the element's error.
    FailFast,
}

/// Configuration for a [`UserFactory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Class name fed to the class resolver before any hook runs.
    pub default_class: String,

    pub invalid_element_policy: InvalidElementPolicy,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_class: DEFAULT_USER_CLASS.to_string(),
            invalid_element_policy: InvalidElementPolicy::NullEntry,
        }
    }
}

impl FactoryConfig {
    pub fn validate(&self) -> FactoryResult<()> {
        if self.default_class.trim().is_empty() {
            return Err(FactoryError::invalid_configuration(
                "default class cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Builder for configuring and creating [`UserFactory`] instances.
///
/// ```rust
/// use user_factory::{InvalidElementPolicy, UserFactoryBuilder};
/// use user_factory::class_map::RoleClassMap;
/// use user_factory::store::InMemoryUserStore;
/// use user_factory::user::User;
/// use user_factory::impl_user_class;
///
/// #[derive(Debug, Clone)]
/// pub struct AdminUser(User);
/// impl_user_class!(AdminUser);
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let factory = UserFactoryBuilder::new(InMemoryUserStore::new())
///     .register_class::<AdminUser>()
///     .with_hook(RoleClassMap::new().map_role("administrator", "AdminUser"))
///     .with_invalid_element_policy(InvalidElementPolicy::FailFast)
///     .build()?;
/// assert!(factory.class_registry().contains("AdminUser"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct UserFactoryBuilder<S> {
    store: S,
    config: FactoryConfig,
    resolver: ClassResolver,
    registry: ClassRegistry,
}

impl<S: UserStore> UserFactoryBuilder<S> {
    /// Start from the default configuration, no hooks and only the `User` class.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: FactoryConfig::default(),
            resolver: ClassResolver::new(),
            registry: ClassRegistry::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_default_class(mut self, class_name: impl Into<String>) -> Self {
        self.config.default_class = class_name.into();
        self
    }

    pub fn with_invalid_element_policy(mut self, policy: InvalidElementPolicy) -> Self {
        self.config.invalid_element_policy = policy;
        self
    }

    /// Use a prepared resolver instead of an empty one.
    pub fn with_resolver(mut self, resolver: ClassResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Use a prepared registry instead of the default one.
    pub fn with_registry(mut self, registry: ClassRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a hook at the default priority.
    pub fn with_hook<H: ClassMapHook + 'static>(mut self, hook: H) -> Self {
        self.resolver.add_hook(hook);
        self
    }

    pub fn register_class<T: UserClass>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Build the factory.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidConfiguration`] if the configuration is
    /// invalid or its default class has no registered constructor.
    pub fn build(self) -> FactoryResult<UserFactory<S>> {
        self.config.validate()?;
        if !self.registry.contains(&self.config.default_class) {
            return Err(FactoryError::invalid_configuration(format!(
                "default class '{}' is not registered",
                self.config.default_class
            )));
        }
        Ok(UserFactory::from_parts(
            self.store,
            self.config,
            self.resolver,
            self.registry,
        ))
    }
}
