//! Browser Token Storage
//!
//! `localStorage` holds the bearer token and nothing else.

use std::fmt::Debug;

use crm_listview::TokenStore;

const TOKEN_KEY: &str = "crm_token";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Log a failed storage call; returns whether it succeeded
fn checked<E: Debug>(result: Result<(), E>, action: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not {} session token: {:?}", action, e);
            false
        }
    }
}

/// Token store backed by `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn read(&self) -> Option<String> {
        local_storage()?.get_item(TOKEN_KEY).ok().flatten()
    }

    fn write(&self, token: &str) {
        match local_storage() {
            Some(storage) => {
                checked(storage.set_item(TOKEN_KEY, token), "persist");
            }
            None => log::warn!("localStorage unavailable, session token not persisted"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            checked(storage.remove_item(TOKEN_KEY), "remove");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_reports_failure() {
        assert!(checked::<&str>(Ok(()), "remove"));
        assert!(!checked(Err("QuotaExceededError"), "remove"));
    }
}
