//! Shared fixtures for user factory integration tests.

#![allow(dead_code)]

use user_factory::impl_user_class;
use user_factory::store::InMemoryUserStore;
use user_factory::user::{NativeUserRecord, NewUser, User, UserId};
use user_factory::UserFactory;

#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl_user_class!(AdminUser);

#[derive(Debug, Clone)]
pub struct SpecialUser(pub User);

impl_user_class!(SpecialUser);

/// Install a test logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Class map hook turning administrators into [`AdminUser`].
pub fn admin_class_map(class: &str, user: &NativeUserRecord) -> String {
    if user.has_role("administrator") {
        "AdminUser".to_string()
    } else {
        class.to_string()
    }
}

/// Fresh store plus a factory reading from it, with the test classes registered.
pub fn setup() -> (InMemoryUserStore, UserFactory<InMemoryUserStore>) {
    init_logging();
    let store = InMemoryUserStore::new();
    let mut factory = UserFactory::new(store.clone());
    factory
        .class_registry_mut()
        .register::<AdminUser>()
        .register::<SpecialUser>();
    (store, factory)
}

pub fn create_user(store: &InMemoryUserStore, login: &str, email: &str) -> UserId {
    store
        .create(NewUser::new(login, email))
        .expect("failed to create user")
}

pub fn create_user_with_role(
    store: &InMemoryUserStore,
    login: &str,
    email: &str,
    role: &str,
) -> UserId {
    store
        .create(NewUser::new(login, email).with_role(role))
        .expect("failed to create user")
}
