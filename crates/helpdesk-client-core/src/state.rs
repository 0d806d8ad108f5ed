use crate::models::{OrderSummary, Ticket, TicketDetail};

/// Top-level page. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Login,
    Register,
    Dashboard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NoticeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Transient alert. `seq` identifies it so a delayed dismissal never hides a
/// newer notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub page: Page,
    pub create_modal_open: bool,
    pub detail_open: bool,
    pub loading_depth: u32,
    pub notice: Option<Notice>,
    pub user_display_name: Option<String>,
    pub tickets: Vec<Ticket>,
    pub orders: Vec<OrderSummary>,
    pub detail: Option<TicketDetail>,
    /// Bumped whenever `tickets` is replaced.
    pub tickets_revision: u64,
    /// Bumped whenever `orders` is replaced.
    pub orders_revision: u64,
    /// Bumped whenever `detail` is replaced.
    pub detail_revision: u64,
    /// Bumped when the auth and create-ticket forms should be cleared.
    pub form_reset_revision: u64,
    next_notice_seq: u64,
}

impl AppState {
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading_depth > 0
    }

    #[must_use]
    pub fn detail_ticket_id(&self) -> Option<&str> {
        self.detail.as_ref().map(|detail| detail.ticket.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    ShowLogin,
    ShowRegister,
    SignedIn { display_name: Option<String> },
    SignedOut,
    BeginLoading,
    EndLoading,
    Notify { text: String, kind: NoticeKind },
    DismissNotice { seq: u64 },
    TicketsLoaded(Vec<Ticket>),
    OrdersLoaded(Vec<OrderSummary>),
    OpenCreateTicket,
    CloseCreateTicket,
    TicketCreated,
    DetailLoaded(TicketDetail),
    CloseDetail,
}

pub fn apply_action(state: &mut AppState, action: AppAction) {
    match action {
        AppAction::ShowLogin => state.page = Page::Login,
        AppAction::ShowRegister => state.page = Page::Register,
        AppAction::SignedIn { display_name } => {
            state.page = Page::Dashboard;
            state.user_display_name = display_name;
            state.form_reset_revision += 1;
        }
        AppAction::SignedOut => {
            state.page = Page::Login;
            state.user_display_name = None;
            state.create_modal_open = false;
            state.detail_open = false;
            state.tickets.clear();
            state.orders.clear();
            state.detail = None;
            state.tickets_revision += 1;
            state.orders_revision += 1;
            state.detail_revision += 1;
            state.form_reset_revision += 1;
        }
        AppAction::BeginLoading => state.loading_depth += 1,
        AppAction::EndLoading => state.loading_depth = state.loading_depth.saturating_sub(1),
        AppAction::Notify { text, kind } => {
            state.next_notice_seq += 1;
            state.notice = Some(Notice {
                seq: state.next_notice_seq,
                text,
                kind,
            });
        }
        AppAction::DismissNotice { seq } => {
            if state.notice.as_ref().is_some_and(|notice| notice.seq == seq) {
                state.notice = None;
            }
        }
        AppAction::TicketsLoaded(tickets) => {
            state.tickets = tickets;
            state.tickets_revision += 1;
        }
        AppAction::OrdersLoaded(orders) => {
            state.orders = orders;
            state.orders_revision += 1;
        }
        AppAction::OpenCreateTicket => state.create_modal_open = true,
        AppAction::CloseCreateTicket => {
            state.create_modal_open = false;
            state.form_reset_revision += 1;
        }
        AppAction::TicketCreated => {
            state.create_modal_open = false;
            state.form_reset_revision += 1;
        }
        AppAction::DetailLoaded(detail) => {
            state.detail = Some(detail);
            state.detail_open = true;
            state.detail_revision += 1;
        }
        AppAction::CloseDetail => state.detail_open = false,
    }
}
