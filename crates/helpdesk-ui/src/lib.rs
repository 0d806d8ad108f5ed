//! Markup for the helpdesk browser client.
//!
//! Records from `helpdesk-client-core` are turned into view-models (all
//! formatting happens there), then rendered with `maud`, which escapes every
//! interpolated value.

pub mod ids;
pub mod render;
pub mod view_model;

pub use render::{
    render_file_preview, render_order_options, render_shell, render_ticket_detail,
    render_ticket_list, styles,
};
pub use view_model::{
    ActivityView, AttachmentView, FilePreviewView, LinkedOrderView, MessageView, OrderOptionView,
    TicketCardView, TicketDetailView, greeting,
};
