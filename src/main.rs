//! CRM Frontend Entry Point

mod config;
mod logging;
mod storage;
mod store;
mod context;
mod list_page;
mod components;
mod pages;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = logging::init() {
        web_sys::console::warn_1(&format!("logger already set: {}", e).into());
    }
    mount_to_body(App);
}
