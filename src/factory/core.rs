//! Core user factory implementation.

use super::builder::{FactoryConfig, InvalidElementPolicy, UserFactoryBuilder};
use super::input::UserInput;
use crate::class_map::{ClassRegistry, ClassResolver};
use crate::error::{FactoryError, FactoryResult};
use crate::store::{QueryCriteria, UserQuery, UserStore};
use crate::user::{NativeUserRecord, UserId, UserObject};
use log::{debug, trace, warn};
use serde_json::Value;

/// What [`UserFactory::from`] produced.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Result of a single-user input; `None` when the user does not exist.
    One(Option<Box<dyn UserObject>>),
    /// Result of a list, criteria or query input, in order.
    Many(Vec<Option<Box<dyn UserObject>>>),
}

impl Resolved {
    pub fn is_one(&self) -> bool {
        matches!(self, Self::One(_))
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// The single user, if this is a `One` holding a user.
    pub fn into_single(self) -> Option<Box<dyn UserObject>> {
        match self {
            Self::One(user) => user,
            Self::Many(_) => None,
        }
    }

    /// Every position as a list; a `One` becomes a one-element list.
    pub fn into_list(self) -> Vec<Option<Box<dyn UserObject>>> {
        match self {
            Self::One(user) => vec![user],
            Self::Many(users) => users,
        }
    }

    /// The users that were found, dropping empty positions.
    pub fn into_users(self) -> Vec<Box<dyn UserObject>> {
        self.into_list().into_iter().flatten().collect()
    }
}

/// Normalizes ids, records, wrapped users, criteria and queries into
/// wrapped user objects.
///
/// ```rust
/// use user_factory::UserFactory;
/// use user_factory::store::InMemoryUserStore;
/// use user_factory::user::{NewUser, UserId};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryUserStore::new();
/// let id = store.create(NewUser::new("aaa", "me@example.com"))?;
///
/// let factory = UserFactory::new(store);
/// let user = factory.from(id)?.into_single();
/// assert_eq!(user.map(|u| u.id()), Some(id));
///
/// assert!(factory.from(UserId::new(3345))?.into_single().is_none());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct UserFactory<S: UserStore> {
    store: S,
    config: FactoryConfig,
    resolver: ClassResolver,
    registry: ClassRegistry,
}

impl<S: UserStore> UserFactory<S> {
    /// Create a factory with the default configuration.
    pub fn new(store: S) -> Self {
        Self::from_parts(
            store,
            FactoryConfig::default(),
            ClassResolver::new(),
            ClassRegistry::new(),
        )
    }

    pub fn builder(store: S) -> UserFactoryBuilder<S> {
        UserFactoryBuilder::new(store)
    }

    pub(crate) fn from_parts(
        store: S,
        config: FactoryConfig,
        resolver: ClassResolver,
        registry: ClassRegistry,
    ) -> Self {
        Self {
            store,
            config,
            resolver,
            registry,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn class_resolver(&self) -> &ClassResolver {
        &self.resolver
    }

    /// Mutable access for registering and removing hooks.
    pub fn class_resolver_mut(&mut self) -> &mut ClassResolver {
        &mut self.resolver
    }

    pub fn class_registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn class_registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    /// Resolve any supported input.
    ///
    /// Single-user inputs yield [`Resolved::One`]; lists, criteria and
    /// queries yield [`Resolved::Many`].
    ///
    /// # Errors
    ///
    /// - [`FactoryError::InvalidArgument`] for unsupported top-level input
    /// - [`FactoryError::UnknownClass`] if a hook picks an unregistered class
    /// - [`FactoryError::Store`] for store failures
    pub fn from(&self, input: impl Into<UserInput>) -> FactoryResult<Resolved> {
        let input = input.into();
        debug!("Resolving {}", input.type_name());

        match input {
            UserInput::Id(id) => self.from_id(id).map(Resolved::One),
            UserInput::Text(text) => {
                let id = parse_id(&text)?;
                self.from_id(id).map(Resolved::One)
            }
            UserInput::Record(record) => self.from_record(record).map(|u| Resolved::One(Some(u))),
            UserInput::Wrapped(user) => Ok(Resolved::One(Some(user))),
            UserInput::List(items) => self.from_batch(items).map(Resolved::Many),
            UserInput::Criteria(criteria) => self
                .from_criteria(&criteria)
                .map(|users| Resolved::Many(users.into_iter().map(Some).collect())),
            UserInput::Query(query) => self
                .from_query(&query)
                .map(|users| Resolved::Many(users.into_iter().map(Some).collect())),
            UserInput::Unsupported { type_name } => Err(FactoryError::unsupported_input(type_name)),
        }
    }

    /// Look up one user. A missing user is `Ok(None)`.
    pub fn from_id(&self, id: UserId) -> FactoryResult<Option<Box<dyn UserObject>>> {
        match self.store.find_by_id(id).map_err(FactoryError::store)? {
            Some(record) => self.build(record).map(Some),
            None => {
                trace!("No user with id {}", id);
                Ok(None)
            }
        }
    }

    /// Wrap a native record in its resolved class.
    pub fn from_record(&self, record: NativeUserRecord) -> FactoryResult<Box<dyn UserObject>> {
        self.build(record)
    }

    /// Run criteria through the store and wrap every result, in store order.
    pub fn from_criteria(&self, criteria: &QueryCriteria) -> FactoryResult<Vec<Box<dyn UserObject>>> {
        let records = self.store.query(criteria).map_err(FactoryError::store)?;
        self.build_all(records)
    }

    /// Execute a pre-built query and wrap every result, in store order.
    pub fn from_query(&self, query: &UserQuery) -> FactoryResult<Vec<Box<dyn UserObject>>> {
        let records = self.store.execute_query(query).map_err(FactoryError::store)?;
        self.build_all(records)
    }

    /// Look up a single user by `id`, `login` or `email`.
    ///
    /// Returns `Ok(None)` when no user matches, including ids that are not
    /// numeric. Login matches are exact; email matches ignore ASCII case.
    ///
    /// # Errors
    ///
    /// [`FactoryError::InvalidArgument`] for any other field name.
    pub fn get_user_by(
        &self,
        field: &str,
        value: &str,
    ) -> FactoryResult<Option<Box<dyn UserObject>>> {
        let key = match field {
            "id" | "ID" => {
                return match UserId::parse(value) {
                    Some(id) => self.from_id(id),
                    None => {
                        trace!("'{}' cannot match any user id", value);
                        Ok(None)
                    }
                };
            }
            "login" => "login",
            "email" => "email",
            other => {
                return Err(FactoryError::invalid_argument(format!(
                    "cannot look up users by '{}'",
                    other
                )));
            }
        };

        let criteria = QueryCriteria::new()
            .with(key, Value::from(value))
            .with("number", Value::from(1));
        Ok(self.from_criteria(&criteria)?.into_iter().next())
    }

    /// Resolve each item independently, preserving order.
    ///
    /// Unknown ids become `None`. Items that are invalid arguments (including
    /// nested lists, criteria and queries) become `None` as well unless the
    /// factory uses [`InvalidElementPolicy::FailFast`]. Other errors abort
    /// the batch.
    pub fn from_batch(
        &self,
        items: Vec<UserInput>,
    ) -> FactoryResult<Vec<Option<Box<dyn UserObject>>>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut users = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            let user = match self.resolve_element(item) {
                Ok(user) => user,
                Err(err)
                    if err.is_invalid_argument()
                        && self.config.invalid_element_policy
                            == InvalidElementPolicy::NullEntry =>
                {
                    warn!("Skipping batch element {}: {}", position, err);
                    None
                }
                Err(err) => return Err(err),
            };
            users.push(user);
        }

        Ok(users)
    }

    fn resolve_element(&self, item: UserInput) -> FactoryResult<Option<Box<dyn UserObject>>> {
        match item {
            UserInput::Id(id) => self.from_id(id),
            UserInput::Text(text) => self.from_id(parse_id(&text)?),
            UserInput::Record(record) => self.from_record(record).map(Some),
            UserInput::Wrapped(user) => Ok(Some(user)),
            nested @ (UserInput::List(_) | UserInput::Criteria(_) | UserInput::Query(_)) => {
                Err(FactoryError::invalid_argument(format!(
                    "{} is not allowed inside a batch",
                    nested.type_name()
                )))
            }
            UserInput::Unsupported { type_name } => Err(FactoryError::unsupported_input(type_name)),
        }
    }

    fn build_all(&self, records: Vec<NativeUserRecord>) -> FactoryResult<Vec<Box<dyn UserObject>>> {
        records.into_iter().map(|record| self.build(record)).collect()
    }

    fn build(&self, record: NativeUserRecord) -> FactoryResult<Box<dyn UserObject>> {
        let class_name = self.resolver.resolve(&self.config.default_class, &record);
        trace!("User {} resolved to class '{}'", record.id, class_name);
        self.registry.build(&class_name, record)
    }
}

fn parse_id(text: &str) -> FactoryResult<UserId> {
    UserId::parse(text).ok_or_else(|| {
        FactoryError::invalid_argument(format!("'{}' is not a numeric user id", text))
    })
}
