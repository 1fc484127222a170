//! Money manager tracker
//!
//! Client-side services for the expense tracker: the persisted session,
//! the notification log of backend interactions, and the expense workflow
//! that talks to the backend through the `api` crate.

pub mod config;
pub mod error;
pub mod expenses;
pub mod notifications;
pub mod session;
pub mod state;
pub mod stats;
pub mod validation;

pub use crate::config::AppConfig;
pub use error::{ServiceError, ServiceResult};
pub use expenses::{
    Decision, ExpenseService, PendingSuggestion, ProfileForm, RegisterForm, Submission,
};
pub use notifications::{Notification, NotificationKind, NotificationLog};
pub use session::SessionStore;
pub use state::AppState;
