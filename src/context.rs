//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;

use crm_listview::{ApiClient, ApiError, HttpBackend, Role, Session};

use crate::config::AppConfig;
use crate::storage::BrowserTokenStore;
use crate::store::{AppStateStoreFields, AppStore, Section};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<AppConfig>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(config: AppConfig, store: AppStore) -> Self {
        Self {
            config: StoredValue::new(config),
            store,
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    /// Backend client carrying the stored session
    pub fn api(&self) -> ApiClient<HttpBackend> {
        ApiClient::new(
            HttpBackend::new(self.config().api_base),
            Session::new(BrowserTokenStore),
        )
    }

    /// Role of the logged-in user (untracked)
    pub fn role(&self) -> Option<Role> {
        self.store.user().get_untracked().map(|u| u.role)
    }

    /// Route-level reaction to an error: a 401 drops back to login.
    /// A 403 stays on the page and is only shown in the error slot.
    pub fn report(&self, err: &ApiError) {
        if err.requires_login() {
            log::info!("session expired, returning to login");
            *self.store.user().write() = None;
        }
    }

    pub fn navigate(&self, section: Section) {
        *self.store.section().write() = section;
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
