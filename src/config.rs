//! Application Configuration
//!
//! Values baked in at build time from environment variables, with defaults.

use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_FETCH_PAGE_SIZE: u32 = 50;
pub const DEFAULT_VIEW_PAGE_SIZE: usize = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = crm_listview::debounce::DEFAULT_DELAY_MS;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend origin, without trailing slash
    pub api_base: String,
    /// Page size asked of paged list endpoints
    pub fetch_page_size: u32,
    /// Rows per rendered page
    pub view_page_size: usize,
    /// Search debounce window
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            fetch_page_size: DEFAULT_FETCH_PAGE_SIZE,
            view_page_size: DEFAULT_VIEW_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl AppConfig {
    /// Read `CRM_*` variables captured at compile time
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("CRM_API_BASE"),
            option_env!("CRM_FETCH_PAGE_SIZE"),
            option_env!("CRM_VIEW_PAGE_SIZE"),
            option_env!("CRM_DEBOUNCE_MS"),
        )
    }

    fn from_values(
        api_base: Option<&str>,
        fetch_page_size: Option<&str>,
        view_page_size: Option<&str>,
        debounce_ms: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_base: api_base
                .map(|b| b.trim().trim_end_matches('/').to_string())
                .filter(|b| !b.is_empty())
                .unwrap_or(defaults.api_base),
            fetch_page_size: parse_or("CRM_FETCH_PAGE_SIZE", fetch_page_size, defaults.fetch_page_size),
            view_page_size: parse_or("CRM_VIEW_PAGE_SIZE", view_page_size, defaults.view_page_size),
            debounce_ms: parse_or("CRM_DEBOUNCE_MS", debounce_ms, defaults.debounce_ms),
        }
    }
}

/// Parse a positive number, falling back to `default` with a warning
fn parse_or<T>(name: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Display + Copy,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            log::warn!("{}={:?} is not a positive number, using {}", name, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(AppConfig::from_values(None, None, None, None), AppConfig::default());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = AppConfig::from_values(Some("https://crm.example.com/"), Some("100"), Some("25"), Some("150"));
        assert_eq!(config.api_base, "https://crm.example.com");
        assert_eq!(config.fetch_page_size, 100);
        assert_eq!(config.view_page_size, 25);
        assert_eq!(config.debounce_ms, 150);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AppConfig::from_values(None, Some("lots"), Some("0"), Some("-5"));
        assert_eq!(config.fetch_page_size, DEFAULT_FETCH_PAGE_SIZE);
        assert_eq!(config.view_page_size, DEFAULT_VIEW_PAGE_SIZE);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }
}
