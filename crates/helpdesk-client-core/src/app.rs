//! The event handlers behind every page, modal and button.
//!
//! [`HelpdeskApp`] owns the API client and the page state. Handlers take
//! `&self` so a shell can share the app behind an `Rc` and run several
//! handlers concurrently on one thread; state is only borrowed between
//! awaits, never across them.

use std::cell::RefCell;

use crate::auth::{AuthFlowError, AuthInputError, RegisterForm, register_error_message};
use crate::client::ApiClient;
use crate::endpoints::TicketFilter;
use crate::error::ApiError;
use crate::models::CreateTicketRequest;
use crate::session::SessionStore;
use crate::state::{AppAction, AppState, NoticeKind, apply_action};
use crate::tickets::SelectedFiles;
use crate::transport::HttpTransport;

pub const NOTICE_LOGIN_OK: &str = "Login successful!";
pub const NOTICE_LOGIN_FAILED: &str = "Invalid email or password";
pub const NOTICE_REGISTER_OK: &str = "Registration successful!";
pub const NOTICE_REGISTER_RETRY: &str = "Registration failed. Please try again.";
pub const NOTICE_LOGGED_OUT: &str = "Logged out successfully";
pub const NOTICE_SESSION_EXPIRED: &str = "Session expired. Please log in again.";
pub const NOTICE_NETWORK: &str = "Network error. Please try again.";
pub const NOTICE_TICKETS_FAILED: &str = "Failed to load tickets";
pub const NOTICE_TICKET_CREATED: &str = "Ticket created successfully!";
pub const NOTICE_TICKET_CREATE_FAILED: &str = "Failed to create ticket";
pub const NOTICE_SOME_UPLOADS_FAILED: &str = "Some files failed to upload";
pub const NOTICE_UPLOADS_FAILED: &str = "Failed to upload files";
pub const NOTICE_UPLOADS_OK: &str = "Files uploaded successfully!";
pub const NOTICE_NO_FILES: &str = "Please select files to upload";
pub const NOTICE_DETAIL_FAILED: &str = "Failed to load ticket details";
pub const NOTICE_MESSAGE_SENT: &str = "Message sent successfully!";
pub const NOTICE_MESSAGE_FAILED: &str = "Failed to send message";
pub const NOTICE_ATTACHMENT_DELETED: &str = "Attachment deleted successfully!";
pub const NOTICE_ATTACHMENT_DELETE_FAILED: &str = "Failed to delete attachment";

/// How long a notice stays visible in the browser.
pub const NOTICE_DISMISS_AFTER_MS: u32 = 4_000;

/// Confirmation prompt shown before deleting an attachment.
pub const CONFIRM_DELETE_ATTACHMENT: &str = "Are you sure you want to delete this attachment?";

type Observer = Box<dyn Fn(&AppState)>;

pub struct HelpdeskApp<T, S> {
    client: ApiClient<T, S>,
    state: RefCell<AppState>,
    observers: RefCell<Vec<Observer>>,
}

/// Keeps the spinner up for the lifetime of a handler.
struct LoadingGuard<'a, T: HttpTransport, S: SessionStore> {
    app: &'a HelpdeskApp<T, S>,
}

impl<T: HttpTransport, S: SessionStore> Drop for LoadingGuard<'_, T, S> {
    fn drop(&mut self) {
        self.app.dispatch(AppAction::EndLoading);
    }
}

impl<T: HttpTransport, S: SessionStore> HelpdeskApp<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self {
            client,
            state: RefCell::new(AppState::default()),
            observers: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Registers a callback run after every state transition.
    pub fn subscribe(&self, observer: impl Fn(&AppState) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    pub fn dispatch(&self, action: AppAction) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            apply_action(&mut state, action);
            state.clone()
        };
        for observer in self.observers.borrow().iter() {
            observer(&snapshot);
        }
    }

    /// Shows the dashboard and loads tickets when a complete session was
    /// persisted, otherwise the login page.
    pub async fn boot(&self) {
        let session = self.client.session();
        if session.is_authenticated() {
            tracing::debug!("restored persisted session");
            self.dispatch(AppAction::SignedIn {
                display_name: session.display_name().map(str::to_string),
            });
            self.load_tickets().await;
        } else {
            self.dispatch(AppAction::ShowLogin);
        }
    }

    pub fn show_login(&self) {
        self.dispatch(AppAction::ShowLogin);
    }

    pub fn show_register(&self) {
        self.dispatch(AppAction::ShowRegister);
    }

    pub fn dismiss_notice(&self, seq: u64) {
        self.dispatch(AppAction::DismissNotice { seq });
    }

    pub async fn submit_login(&self, email: &str, password: &str) {
        let signed_in = {
            let _loading = self.begin_loading();
            match self.client.login(email, password).await {
                Ok(_) => {
                    self.sign_in(NOTICE_LOGIN_OK);
                    true
                }
                Err(AuthFlowError::Input(error)) => {
                    self.notify(error.to_string(), NoticeKind::Error);
                    false
                }
                Err(AuthFlowError::Api(error)) => {
                    self.report(&error, NOTICE_LOGIN_FAILED);
                    false
                }
            }
        };
        if signed_in {
            self.load_tickets().await;
        }
    }

    pub async fn submit_register(&self, form: RegisterForm) {
        let signed_in = {
            let _loading = self.begin_loading();
            match self.client.register(form).await {
                Ok(_) => {
                    self.sign_in(NOTICE_REGISTER_OK);
                    true
                }
                Err(AuthFlowError::Input(error @ AuthInputError::PasswordMismatch)) => {
                    self.notify(error.to_string(), NoticeKind::Error);
                    false
                }
                Err(AuthFlowError::Input(_)) => {
                    self.notify(NOTICE_REGISTER_RETRY, NoticeKind::Error);
                    false
                }
                Err(AuthFlowError::Api(ApiError::Http { body, .. })) => {
                    self.notify(register_error_message(&body), NoticeKind::Error);
                    false
                }
                Err(AuthFlowError::Api(error)) => {
                    self.report(&error, NOTICE_REGISTER_RETRY);
                    false
                }
            }
        };
        if signed_in {
            self.load_tickets().await;
        }
    }

    pub async fn logout(&self) {
        let _loading = self.begin_loading();
        self.client.logout().await;
        self.dispatch(AppAction::SignedOut);
        self.notify(NOTICE_LOGGED_OUT, NoticeKind::Info);
    }

    /// Replaces the ticket list. On failure the previous list stays on screen.
    pub async fn load_tickets(&self) {
        let _loading = self.begin_loading();
        match self.client.list_tickets(&TicketFilter::default()).await {
            Ok(tickets) => self.dispatch(AppAction::TicketsLoaded(tickets)),
            Err(error) => self.report(&error, NOTICE_TICKETS_FAILED),
        }
    }

    /// Opens the create form and fills the order picker; order failures are
    /// only logged.
    pub async fn open_create_ticket(&self) {
        self.dispatch(AppAction::OpenCreateTicket);
        match self.client.list_orders().await {
            Ok(orders) => self.dispatch(AppAction::OrdersLoaded(orders)),
            Err(error @ (ApiError::Network { .. } | ApiError::AuthExpired)) => {
                self.report(&error, NOTICE_NETWORK);
            }
            Err(error) => tracing::debug!(error = %error, "order picker left empty"),
        }
    }

    pub fn close_create_ticket(&self) {
        self.dispatch(AppAction::CloseCreateTicket);
    }

    /// Creates the ticket, then uploads any files. Upload failures never
    /// undo the created ticket.
    pub async fn submit_create_ticket(
        &self,
        request: CreateTicketRequest,
        files: impl Into<SelectedFiles>,
    ) {
        let files = files.into();
        let created = {
            let _loading = self.begin_loading();
            match self.client.create_ticket(&request).await {
                Ok(ticket) => {
                    let report = self.client.upload_selection(&ticket.id, files).await;
                    if report.auth_expired() {
                        self.expire_session();
                        false
                    } else {
                        self.dispatch(AppAction::TicketCreated);
                        if report.all_succeeded() {
                            self.notify(NOTICE_TICKET_CREATED, NoticeKind::Success);
                        } else {
                            self.notify(NOTICE_SOME_UPLOADS_FAILED, NoticeKind::Error);
                        }
                        true
                    }
                }
                Err(error) => {
                    self.report(&error, NOTICE_TICKET_CREATE_FAILED);
                    false
                }
            }
        };
        if created {
            self.load_tickets().await;
        }
    }

    /// Loads the full detail bundle and opens the detail view. Nothing is
    /// shown unless all four parts arrive.
    pub async fn view_ticket(&self, ticket_id: &str) {
        let _loading = self.begin_loading();
        match self.client.fetch_ticket_detail(ticket_id).await {
            Ok(detail) => self.dispatch(AppAction::DetailLoaded(detail)),
            Err(error) => self.report(&error, NOTICE_DETAIL_FAILED),
        }
    }

    pub fn close_detail(&self) {
        self.dispatch(AppAction::CloseDetail);
    }

    pub async fn submit_message(&self, ticket_id: &str, text: &str) {
        let sent = {
            let _loading = self.begin_loading();
            match self.client.add_message(ticket_id, text).await {
                Ok(sent) => {
                    if sent {
                        self.notify(NOTICE_MESSAGE_SENT, NoticeKind::Success);
                    }
                    sent
                }
                Err(error) => {
                    self.report(&error, NOTICE_MESSAGE_FAILED);
                    false
                }
            }
        };
        if sent {
            self.view_ticket(ticket_id).await;
        }
    }

    pub async fn add_attachments(&self, ticket_id: &str, files: impl Into<SelectedFiles>) {
        let files = files.into();
        if files.is_empty() {
            self.notify(NOTICE_NO_FILES, NoticeKind::Error);
            return;
        }
        {
            let _loading = self.begin_loading();
            let report = self.client.upload_selection(ticket_id, files).await;
            if report.auth_expired() {
                self.expire_session();
                return;
            }
            if report.all_succeeded() {
                self.notify(NOTICE_UPLOADS_OK, NoticeKind::Success);
            } else if report.succeeded() == 0 {
                self.notify(NOTICE_UPLOADS_FAILED, NoticeKind::Error);
            } else {
                self.notify(NOTICE_SOME_UPLOADS_FAILED, NoticeKind::Error);
            }
        }
        self.view_ticket(ticket_id).await;
    }

    /// Deletes after the user confirmed; a declined confirmation sends nothing.
    pub async fn delete_attachment(&self, ticket_id: &str, attachment_id: &str, confirmed: bool) {
        if !confirmed {
            return;
        }
        let deleted = {
            let _loading = self.begin_loading();
            match self.client.delete_attachment(ticket_id, attachment_id).await {
                Ok(()) => {
                    self.notify(NOTICE_ATTACHMENT_DELETED, NoticeKind::Success);
                    true
                }
                Err(error) => {
                    self.report(&error, NOTICE_ATTACHMENT_DELETE_FAILED);
                    false
                }
            }
        };
        if deleted {
            self.view_ticket(ticket_id).await;
        }
    }

    fn begin_loading(&self) -> LoadingGuard<'_, T, S> {
        self.dispatch(AppAction::BeginLoading);
        LoadingGuard { app: self }
    }

    fn notify(&self, text: impl Into<String>, kind: NoticeKind) {
        self.dispatch(AppAction::Notify {
            text: text.into(),
            kind,
        });
    }

    fn sign_in(&self, notice: &str) {
        let display_name = self.client.session().display_name().map(str::to_string);
        self.dispatch(AppAction::SignedIn { display_name });
        self.notify(notice, NoticeKind::Success);
    }

    fn expire_session(&self) {
        self.dispatch(AppAction::SignedOut);
        self.notify(NOTICE_SESSION_EXPIRED, NoticeKind::Info);
    }

    /// Network failures get the generic notice, an expired session returns
    /// to login, anything else shows the handler's own message.
    fn report(&self, error: &ApiError, failure_notice: &str) {
        match error {
            ApiError::Network { .. } => self.notify(NOTICE_NETWORK, NoticeKind::Error),
            ApiError::AuthExpired => self.expire_session(),
            _ => self.notify(failure_notice, NoticeKind::Error),
        }
    }
}
