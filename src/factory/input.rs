//! Tagged input accepted by [`UserFactory::from`](super::UserFactory::from).

use crate::store::{QueryCriteria, UserQuery};
use crate::user::{NativeUserRecord, User, UserId, UserObject};
use serde_json::Value;

/// Every shape of input the factory knows how to resolve.
#[derive(Debug, Clone)]
pub enum UserInput {
    /// A numeric user id.
    Id(UserId),
    /// A string; resolved as an id when it holds one, rejected otherwise.
    Text(String),
    /// A native record straight from the store.
    Record(NativeUserRecord),
    /// An already wrapped user, passed through untouched.
    Wrapped(Box<dyn UserObject>),
    /// A batch resolved element by element.
    List(Vec<UserInput>),
    /// Criteria handed to [`UserStore::query`](crate::store::UserStore::query).
    Criteria(QueryCriteria),
    /// A pre-built query handed to
    /// [`UserStore::execute_query`](crate::store::UserStore::execute_query).
    Query(UserQuery),
    /// Anything else. Always rejected.
    Unsupported { type_name: String },
}

impl UserInput {
    /// Input standing in for a value of type `T` the factory cannot handle.
    pub fn unsupported<T: ?Sized>() -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Map a JSON value onto an input.
    ///
    /// Non-negative integers become ids, strings stay text, arrays become
    /// lists (converted element-wise), objects become criteria. Everything
    /// else is unsupported.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(id) => Self::Id(UserId::new(id)),
                None => Self::Unsupported {
                    type_name: format!("number {}", n),
                },
            },
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_value).collect()),
            Value::Object(map) => Self::Criteria(map.into()),
            Value::Bool(_) => Self::Unsupported {
                type_name: "bool".to_string(),
            },
            Value::Null => Self::Unsupported {
                type_name: "null".to_string(),
            },
        }
    }

    /// Short description of the input's shape, for logs and errors.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Id(_) => "user id",
            Self::Text(_) => "string",
            Self::Record(_) => "user record",
            Self::Wrapped(_) => "user object",
            Self::List(_) => "list",
            Self::Criteria(_) => "query criteria",
            Self::Query(_) => "user query",
            Self::Unsupported { type_name } => type_name,
        }
    }
}

impl From<UserId> for UserInput {
    fn from(id: UserId) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for UserInput {
    fn from(id: u64) -> Self {
        Self::Id(UserId::new(id))
    }
}

impl From<u32> for UserInput {
    fn from(id: u32) -> Self {
        Self::Id(UserId::new(u64::from(id)))
    }
}

impl From<i64> for UserInput {
    fn from(id: i64) -> Self {
        match u64::try_from(id) {
            Ok(id) => Self::Id(UserId::new(id)),
            Err(_) => Self::Unsupported {
                type_name: format!("negative integer {}", id),
            },
        }
    }
}

impl From<i32> for UserInput {
    fn from(id: i32) -> Self {
        Self::from(i64::from(id))
    }
}

impl From<usize> for UserInput {
    fn from(id: usize) -> Self {
        match u64::try_from(id) {
            Ok(id) => Self::Id(UserId::new(id)),
            Err(_) => Self::Unsupported {
                type_name: format!("integer {}", id),
            },
        }
    }
}

impl From<&str> for UserInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for UserInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NativeUserRecord> for UserInput {
    fn from(record: NativeUserRecord) -> Self {
        Self::Record(record)
    }
}

impl From<Box<dyn UserObject>> for UserInput {
    fn from(user: Box<dyn UserObject>) -> Self {
        Self::Wrapped(user)
    }
}

impl From<User> for UserInput {
    fn from(user: User) -> Self {
        Self::Wrapped(Box::new(user))
    }
}

impl From<QueryCriteria> for UserInput {
    fn from(criteria: QueryCriteria) -> Self {
        Self::Criteria(criteria)
    }
}

impl From<UserQuery> for UserInput {
    fn from(query: UserQuery) -> Self {
        Self::Query(query)
    }
}

impl<T: Into<UserInput>> From<Vec<T>> for UserInput {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<UserInput>, const N: usize> From<[T; N]> for UserInput {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for UserInput {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_shapes() {
        assert!(matches!(UserInput::from_value(json!(7)), UserInput::Id(id) if id == UserId::new(7)));
        assert!(matches!(UserInput::from_value(json!("7")), UserInput::Text(ref s) if s == "7"));
        assert!(matches!(UserInput::from_value(json!({"role": "author"})), UserInput::Criteria(_)));
        assert!(matches!(UserInput::from_value(json!(true)), UserInput::Unsupported { .. }));
        assert!(matches!(UserInput::from_value(json!(null)), UserInput::Unsupported { .. }));
        assert!(matches!(UserInput::from_value(json!(-3)), UserInput::Unsupported { .. }));
        assert!(matches!(UserInput::from_value(json!(1.5)), UserInput::Unsupported { .. }));
    }

    #[test]
    fn test_from_value_list_is_recursive() {
        let input = UserInput::from_value(json!([1, "2", false]));
        let UserInput::List(items) = input else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], UserInput::Id(_)));
        assert!(matches!(items[1], UserInput::Text(_)));
        assert!(matches!(items[2], UserInput::Unsupported { .. }));
    }

    #[test]
    fn test_conversions() {
        assert!(matches!(UserInput::from(-1i64), UserInput::Unsupported { .. }));
        assert!(matches!(UserInput::from(5i64), UserInput::Id(_)));
        assert!(matches!(UserInput::from(3345), UserInput::Id(id) if id == UserId::new(3345)));
        assert!(matches!(UserInput::from(-7i32), UserInput::Unsupported { .. }));
        assert!(matches!(UserInput::from(12usize), UserInput::Id(id) if id == UserId::new(12)));
        assert!(matches!(UserInput::from([1u64, 2u64]), UserInput::List(ref v) if v.len() == 2));
        assert!(matches!(UserInput::from(Vec::<UserId>::new()), UserInput::List(ref v) if v.is_empty()));

        struct BadUser;
        let bad = UserInput::unsupported::<BadUser>();
        assert!(bad.type_name().ends_with("BadUser"));
    }
}
