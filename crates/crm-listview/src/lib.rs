//! CRM List View Core
//!
//! Client-side list view pattern shared by every CRM page:
//! - loader: fetch every page of a remote collection, normalize, deduplicate
//! - filter: categorical + free-text predicate stage
//! - paginate: fixed-size slicing with per-sub-list cursors
//! - debounce: committed search term after a pause in typing
//! - mutation: validated create/update/delete followed by a full reload
//!
//! The REST backend is reached through the `Backend` trait so everything
//! above the transport runs the same natively (tests) and in the browser.

pub mod auth;
pub mod backend;
pub mod debounce;
pub mod draft;
pub mod entity;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mutation;
pub mod paginate;
pub mod resource;
pub mod session;
pub mod validate;
pub mod view;

#[cfg(test)]
mod testing;

pub use auth::{login, logout, current_user, CurrentUser};
pub use backend::{ApiClient, ApiRequest, Backend, HttpBackend, Method, RawResponse};
pub use debounce::Debouncer;
pub use draft::{
    AssignmentPatch, ClientDraft, ConversionRequest, ConversionReview, Credentials, EmployeeDraft,
    LeadDraft, StatusPatch, TaskDraft,
};
pub use entity::{lookup, Client, Employee, Lead, LeadRef, Record, Role, Searchable, Task, UserRef};
pub use error::{ApiError, ApiResult};
pub use filter::{filter_records, partition_by};
pub use loader::{dedup_by_id, load_all};
pub use mutation::{ConfirmedDelete, MutationCoordinator, PendingDelete};
pub use paginate::{paginate, Page, PageCursor};
pub use resource::Resource;
pub use session::{MemoryTokenStore, Session, TokenStore};
pub use validate::Validate;
pub use view::{ListView, LoadTicket, ModalState, PageView};
