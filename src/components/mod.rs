//! UI Components
//!
//! Reusable Leptos components shared by the list pages.

mod search_bar;
mod category_filter;
mod pager;
mod delete_confirm_button;
mod error_banner;
mod modal_frame;
mod form;
mod nav_bar;
mod log_panel;

pub use search_bar::SearchBar;
pub use category_filter::{CategoryFilter, humanize};
pub use pager::Pager;
pub use delete_confirm_button::DeleteConfirmButton;
pub use error_banner::ErrorBanner;
pub use modal_frame::ModalFrame;
pub use form::{TextField, TextAreaField, SelectField, enum_options};
pub use nav_bar::NavBar;
pub use log_panel::LogPanel;
