//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crm_listview::{CurrentUser, Role};

/// Top-level screens; which ones are reachable depends on the role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    Employees,
    #[default]
    Leads,
    Tasks,
    Clients,
}

impl Section {
    pub fn label(self, role: Role) -> &'static str {
        match (self, role) {
            (Section::Employees, _) => "Employees",
            (Section::Leads, Role::Employee) => "My Leads",
            (Section::Leads, _) => "Leads",
            (Section::Tasks, Role::Employee) => "My Tasks",
            (Section::Tasks, _) => "Tasks",
            (Section::Clients, Role::Employee) => "My Clients",
            (Section::Clients, _) => "Clients",
        }
    }

    /// Navigation entries for a role, in display order
    pub fn for_role(role: Role) -> &'static [Section] {
        match role {
            Role::Admin => &[Section::Employees, Section::Leads, Section::Clients],
            Role::Manager => &[Section::Leads, Section::Tasks, Section::Clients],
            Role::Employee => &[Section::Leads, Section::Tasks, Section::Clients],
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Logged-in user; `None` shows the login page
    pub user: Option<CurrentUser>,
    /// Current screen
    pub section: Section,
    /// True until the stored credential has been checked on startup
    pub restoring: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            restoring: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;
