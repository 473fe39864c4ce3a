//! Fixtures shared by the service and router tests.

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use sso_api::Role;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::extractors::Principal;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordManager;
use crate::auth::services::AuthService;
use crate::clients::{CleanupError, UserDataCleaner};
use crate::db::memory::MemoryStore;

pub const TEST_SECRET: &str = "test_secret_for_sso_routes_and_services";

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(
        TEST_SECRET,
        ChronoDuration::minutes(15),
        ChronoDuration::hours(720),
    )
}

/// Service over `store` with bcrypt at its minimum cost.
pub fn auth_service(store: &Arc<MemoryStore>) -> AuthService {
    AuthService::new(
        store.clone(),
        store.clone(),
        token_issuer(),
        PasswordManager::new(4),
        Duration::from_secs(5),
    )
}

pub fn principal_for(user_id: i64, email: &str, role: Role) -> Principal {
    Principal {
        user_id,
        email: email.to_string(),
        role,
    }
}

/// Inserts an admin account and returns it as a principal.
pub fn admin_principal(store: &MemoryStore) -> Principal {
    let email = "admin@example.com";
    let id = store.insert_user(email, "unused", Role::Admin);
    principal_for(id, email, Role::Admin)
}

/// Remembers which users it was asked to purge.
#[derive(Default)]
pub struct RecordingCleaner {
    calls: Mutex<Vec<i64>>,
    fail: bool,
}

impl RecordingCleaner {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDataCleaner for RecordingCleaner {
    async fn delete_user_data(&self, user_id: i64) -> Result<(), CleanupError> {
        self.calls.lock().unwrap().push(user_id);
        if self.fail {
            return Err(CleanupError::Forbidden);
        }
        Ok(())
    }
}
