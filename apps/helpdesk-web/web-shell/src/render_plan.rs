use helpdesk_client_core::{AppState, Notice, Page};
use helpdesk_ui::{
    OrderOptionView, TicketCardView, TicketDetailView, greeting, render_order_options,
    render_ticket_detail, render_ticket_list,
};

/// What the DOM last showed, so a state snapshot only rewrites the regions
/// whose data actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RenderMarks {
    tickets_revision: u64,
    orders_revision: u64,
    detail_revision: u64,
    form_reset_revision: u64,
    notice_seq: Option<u64>,
}

impl RenderMarks {
    pub(crate) fn of(state: &AppState) -> Self {
        Self {
            tickets_revision: state.tickets_revision,
            orders_revision: state.orders_revision,
            detail_revision: state.detail_revision,
            form_reset_revision: state.form_reset_revision,
            notice_seq: state.notice.as_ref().map(|notice| notice.seq),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NoticeChange {
    Unchanged,
    Show(Notice),
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderPlan {
    pub(crate) page: Page,
    pub(crate) create_modal_open: bool,
    pub(crate) detail_open: bool,
    pub(crate) loading: bool,
    pub(crate) user_name: String,
    pub(crate) tickets_html: Option<String>,
    pub(crate) order_options_html: Option<String>,
    /// `Some("")` empties the detail pane.
    pub(crate) detail_html: Option<String>,
    pub(crate) reset_forms: bool,
    pub(crate) notice: NoticeChange,
}

impl RenderPlan {
    /// Diffs `state` against the marks of the previous render. With no
    /// previous render every region is written.
    pub(crate) fn between(previous: Option<RenderMarks>, state: &AppState) -> Self {
        let tickets_html = previous
            .is_none_or(|marks| marks.tickets_revision != state.tickets_revision)
            .then(|| {
                let cards: Vec<TicketCardView> =
                    state.tickets.iter().map(TicketCardView::from).collect();
                render_ticket_list(&cards)
            });
        let order_options_html = previous
            .is_none_or(|marks| marks.orders_revision != state.orders_revision)
            .then(|| {
                let options: Vec<OrderOptionView> =
                    state.orders.iter().map(OrderOptionView::from).collect();
                render_order_options(&options)
            });
        let detail_html = previous
            .is_none_or(|marks| marks.detail_revision != state.detail_revision)
            .then(|| {
                state
                    .detail
                    .as_ref()
                    .map(|detail| render_ticket_detail(&TicketDetailView::from(detail)))
                    .unwrap_or_default()
            });
        let reset_forms = previous
            .is_some_and(|marks| marks.form_reset_revision != state.form_reset_revision);

        let notice_seq = state.notice.as_ref().map(|notice| notice.seq);
        let notice = match (&state.notice, previous.map(|marks| marks.notice_seq)) {
            (Some(_), Some(seen)) if seen == notice_seq => NoticeChange::Unchanged,
            (Some(notice), _) => NoticeChange::Show(notice.clone()),
            (None, Some(None)) => NoticeChange::Unchanged,
            (None, _) => NoticeChange::Hide,
        };

        Self {
            page: state.page,
            create_modal_open: state.create_modal_open,
            detail_open: state.detail_open,
            loading: state.loading(),
            user_name: greeting(state.user_display_name.as_deref()),
            tickets_html,
            order_options_html,
            detail_html,
            reset_forms,
            notice,
        }
    }
}
