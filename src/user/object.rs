//! Core traits for wrapped user objects.
//!
//! Every value the factory hands back implements [`UserObject`]. Concrete
//! wrapper classes additionally implement [`UserClass`] so the class registry
//! can build them from a native record by name.

use super::record::{NativeUserRecord, UserId};
use std::any::Any;
use std::fmt::Debug;

/// A user wrapped around a native record.
///
/// Downcasting to the concrete wrapper goes through [`UserObject::as_any`], or
/// the `is`/`downcast_ref` helpers on `dyn UserObject`.
pub trait UserObject: Debug + Send + Sync {
    /// Identifier of the wrapped record.
    fn id(&self) -> UserId;

    /// Name of the wrapper class this object was built as.
    fn class_name(&self) -> &str;

    /// The wrapped native record.
    fn record(&self) -> &NativeUserRecord;

    /// Clone the object as a boxed trait object
    fn clone_boxed(&self) -> Box<dyn UserObject>;

    /// Get type information for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl dyn UserObject {
    /// Check whether this object is a `T`.
    pub fn is<T: UserObject + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow this object as a `T` if it is one.
    pub fn downcast_ref<T: UserObject + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl Clone for Box<dyn UserObject> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// A wrapper class that can be registered with a
/// [`ClassRegistry`](crate::class_map::ClassRegistry).
pub trait UserClass: UserObject + Sized + 'static {
    /// Name the class resolver uses for this class.
    const CLASS_NAME: &'static str;

    /// Build a fresh instance around the record.
    fn build(record: NativeUserRecord) -> Self;
}

/// Implement [`UserObject`] and [`UserClass`] for a newtype around
/// [`User`](crate::user::User).
///
/// The class name defaults to the type name.
///
/// ```rust
/// use user_factory::impl_user_class;
/// use user_factory::user::User;
///
/// #[derive(Debug, Clone)]
/// pub struct AdminUser(User);
///
/// impl_user_class!(AdminUser);
/// ```
#[macro_export]
macro_rules! impl_user_class {
    ($type:ident) => {
        $crate::impl_user_class!($type, stringify!($type));
    };
    ($type:ident, $name:expr) => {
        impl $crate::user::UserObject for $type {
            fn id(&self) -> $crate::user::UserId {
                $crate::user::UserObject::id(&self.0)
            }

            fn class_name(&self) -> &str {
                $name
            }

            fn record(&self) -> &$crate::user::NativeUserRecord {
                $crate::user::UserObject::record(&self.0)
            }

            fn clone_boxed(&self) -> Box<dyn $crate::user::UserObject> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl $crate::user::UserClass for $type {
            const CLASS_NAME: &'static str = $name;

            fn build(record: $crate::user::NativeUserRecord) -> Self {
                Self($crate::user::User::from_record(record))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;
    use chrono::Utc;

    #[derive(Debug, Clone)]
    struct AdminUser(User);

    impl_user_class!(AdminUser);

    #[derive(Debug, Clone)]
    struct Member(User);

    impl_user_class!(Member, "SiteMember");

    fn record(id: u64) -> NativeUserRecord {
        NativeUserRecord {
            id: UserId::new(id),
            login: format!("user{}", id),
            email: format!("user{}@example.com", id),
            display_name: format!("User {}", id),
            roles: vec!["subscriber".to_string()],
            registered: Utc::now(),
            attributes: Default::default(),
        }
    }

    #[test]
    fn test_macro_class_names() {
        assert_eq!(AdminUser::CLASS_NAME, "AdminUser");
        assert_eq!(Member::CLASS_NAME, "SiteMember");

        let member = Member::build(record(4));
        assert_eq!(member.class_name(), "SiteMember");
        assert_eq!(member.id(), UserId::new(4));
    }

    #[test]
    fn test_downcast_helpers() {
        let boxed: Box<dyn UserObject> = Box::new(AdminUser::build(record(1)));

        assert!(boxed.is::<AdminUser>());
        assert!(!boxed.is::<User>());
        assert!(boxed.downcast_ref::<AdminUser>().is_some());

        let cloned = boxed.clone();
        assert!(cloned.is::<AdminUser>());
        assert_eq!(cloned.record(), boxed.record());
    }
}
