//! Shared client core for the helpdesk web and command line clients.
//!
//! Everything here is DOM-free: the browser shell and the CLI plug in their
//! own [`transport::HttpTransport`] and [`session::SessionStore`]
//! implementations and drive the flows through [`app::HelpdeskApp`] or the
//! [`client::ApiClient`] directly.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod models;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod session;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tickets;
pub mod transport;

pub use app::HelpdeskApp;
pub use client::{ApiClient, ResponseBody};
pub use config::ClientConfig;
pub use endpoints::{Endpoints, TicketFilter};
pub use error::{ApiError, SessionStoreError, TransportError, UploadError};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use state::{AppAction, AppState, Notice, NoticeKind, Page, apply_action};
pub use tickets::{SelectedFiles, UploadOutcome, UploadReport};
pub use transport::{FilePart, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody};
