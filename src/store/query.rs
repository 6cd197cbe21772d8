//! Query criteria and pre-built query objects.
//!
//! Both types are opaque to the factory: it hands them to the store
//! unchanged and maps whatever records come back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter keys mapped to values, in insertion order.
///
/// ```rust
/// use user_factory::store::QueryCriteria;
/// use serde_json::json;
///
/// let criteria = QueryCriteria::new()
///     .with("role__in", json!(["administrator", "author"]))
///     .with("orderby", json!("login"));
/// assert_eq!(criteria.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryCriteria(Map<String, Value>);

impl QueryCriteria {
    /// Create empty criteria (matches every user).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter key, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Set a filter key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for QueryCriteria {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for QueryCriteria {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A pre-built query, executed by the store on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserQuery {
    criteria: QueryCriteria,
}

impl UserQuery {
    pub fn new(criteria: QueryCriteria) -> Self {
        Self { criteria }
    }

    /// The criteria this query was built from.
    pub fn criteria(&self) -> &QueryCriteria {
        &self.criteria
    }

    pub fn into_criteria(self) -> QueryCriteria {
        self.criteria
    }
}

impl From<QueryCriteria> for UserQuery {
    fn from(criteria: QueryCriteria) -> Self {
        Self::new(criteria)
    }
}
