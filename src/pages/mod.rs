//! Pages
//!
//! One page per navigation section plus the login screen.

mod login;
mod employees;
mod leads;
mod tasks;
mod clients;

pub use login::LoginPage;
pub use employees::EmployeesPage;
pub use leads::LeadsPage;
pub use tasks::TasksPage;
pub use clients::ClientsPage;
