use maud::{Markup, PreEscaped, html};

use crate::ids;
use crate::view_model::{
    ActivityView, AttachmentView, FilePreviewView, MessageView, OrderOptionView, TicketCardView,
    TicketDetailView,
};

/// Every page, both modals, the spinner and the alert slot. Pages and
/// overlays start hidden; the shell toggles them from app state.
pub fn render_shell() -> String {
    let markup = html! {
        div id=(ids::APP_ROOT_ID) class="app" {
            (login_page())
            (register_page())
            (dashboard_page())
            (create_ticket_modal())
            (detail_modal())
            div id=(ids::LOADING_SPINNER_ID) class="loading-spinner hidden" {
                div class="spinner" {}
            }
            div id=(ids::ALERT_ID) class="alert hidden" role="status" {}
        }
    };
    markup.into_string()
}

pub fn render_ticket_list(tickets: &[TicketCardView]) -> String {
    let markup = html! {
        @if tickets.is_empty() {
            div class="empty-state" {
                h3 { "No tickets found" }
                p { "Create your first support ticket to get started." }
            }
        } @else {
            @for ticket in tickets {
                (ticket_card(ticket))
            }
        }
    };
    markup.into_string()
}

pub fn render_ticket_detail(detail: &TicketDetailView) -> String {
    let markup = html! {
        div class="ticket-detail" {
            div class="ticket-detail-header" {
                h3 class="ticket-detail-title" { (detail.topic) }
                div class="ticket-detail-meta" {
                    (badges(&detail.status_class, &detail.status_label, &detail.priority_class, &detail.priority_label))
                }
                @if let Some(order) = &detail.order {
                    div class="related-order" {
                        strong { "Related Order:" }
                        span { " #" (order.order_number) " - " (order.status) }
                    }
                }
                div class="ticket-detail-description" {
                    strong { "Description:" }
                    br;
                    (detail.description)
                }
                div class="ticket-detail-times" {
                    "Created: " (detail.created) " | Updated: " (detail.updated)
                    @if let Some(resolved) = &detail.resolved {
                        " | Resolved: " (resolved)
                    }
                }
            }
            div class="ticket-detail-section" {
                h3 { "Messages" }
                div class="messages-list" {
                    @if detail.messages.is_empty() {
                        p class="muted" { "No messages yet." }
                    }
                    @for message in &detail.messages {
                        (message_item(message))
                    }
                }
                form id=(ids::ADD_MESSAGE_FORM_ID) class="add-message-form" data-ticket-id=(detail.id) {
                    label for=(ids::NEW_MESSAGE_ID) { "Add a Message" }
                    textarea id=(ids::NEW_MESSAGE_ID) placeholder="Type your message here..." required rows="5" {}
                    button type="submit" class="btn btn-primary" { "Send Message" }
                }
            }
            div class="ticket-detail-section" {
                h3 { "Attachments" }
                div class="attachments-list" {
                    @if detail.attachments.is_empty() {
                        p class="muted" { "No attachments yet." }
                    }
                    @for attachment in &detail.attachments {
                        (attachment_item(&detail.id, attachment))
                    }
                }
                div class="add-attachment-form" {
                    label for=(ids::NEW_ATTACHMENT_ID) { "Add Attachments" }
                    input type="file" id=(ids::NEW_ATTACHMENT_ID) multiple accept="*/*";
                    button type="button" id=(ids::UPLOAD_ATTACHMENTS_ID) class="btn btn-primary" data-ticket-id=(detail.id) {
                        "Upload Files"
                    }
                }
            }
            div class="ticket-detail-section" {
                h3 { "Activity Log" }
                div class="activities-list" {
                    @if detail.activities.is_empty() {
                        p class="muted" { "No activities yet." }
                    }
                    @for activity in &detail.activities {
                        (activity_item(activity))
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Options for the order picker, always led by the "no order" choice.
pub fn render_order_options(orders: &[OrderOptionView]) -> String {
    let markup = html! {
        option value="" { "No specific order" }
        @for order in orders {
            option value=(order.value) { (order.label) }
        }
        @if orders.is_empty() {
            option value="" disabled { "No orders available" }
        }
    };
    markup.into_string()
}

pub fn render_file_preview(files: &[FilePreviewView]) -> String {
    let markup = html! {
        @for file in files {
            div class="file-preview-item" {
                span class="file-preview-name" { (file.filename) }
                span class="file-preview-size" { "(" (file.size_label) ")" }
            }
        }
    };
    markup.into_string()
}

fn login_page() -> Markup {
    html! {
        section id=(ids::LOGIN_PAGE_ID) class="page hidden" {
            div class="auth-card" {
                h1 { "Support Center" }
                h2 { "Sign in" }
                form id=(ids::LOGIN_FORM_ID) class="form" {
                    label for=(ids::LOGIN_EMAIL_ID) { "Email" }
                    input id=(ids::LOGIN_EMAIL_ID) type="email" name="email" autocomplete="email" required;
                    label for=(ids::LOGIN_PASSWORD_ID) { "Password" }
                    input id=(ids::LOGIN_PASSWORD_ID) type="password" name="password" autocomplete="current-password" required;
                    button type="submit" class="btn btn-primary" { "Login" }
                }
                p class="auth-switch" {
                    "Don't have an account? "
                    a id=(ids::SHOW_REGISTER_ID) href="#" { "Register" }
                }
            }
        }
    }
}

fn register_page() -> Markup {
    html! {
        section id=(ids::REGISTER_PAGE_ID) class="page hidden" {
            div class="auth-card" {
                h1 { "Support Center" }
                h2 { "Create an account" }
                form id=(ids::REGISTER_FORM_ID) class="form" {
                    label for=(ids::REGISTER_EMAIL_ID) { "Email" }
                    input id=(ids::REGISTER_EMAIL_ID) type="email" name="email" autocomplete="email" required;
                    label for=(ids::REGISTER_USERNAME_ID) { "Username (optional)" }
                    input id=(ids::REGISTER_USERNAME_ID) type="text" name="username" autocomplete="username";
                    div class="form-row" {
                        div {
                            label for=(ids::REGISTER_FIRST_NAME_ID) { "First Name" }
                            input id=(ids::REGISTER_FIRST_NAME_ID) type="text" name="first_name" required;
                        }
                        div {
                            label for=(ids::REGISTER_LAST_NAME_ID) { "Last Name" }
                            input id=(ids::REGISTER_LAST_NAME_ID) type="text" name="last_name" required;
                        }
                    }
                    label for=(ids::REGISTER_PASSWORD_ID) { "Password" }
                    input id=(ids::REGISTER_PASSWORD_ID) type="password" name="password" autocomplete="new-password" required;
                    label for=(ids::REGISTER_PASSWORD2_ID) { "Confirm Password" }
                    input id=(ids::REGISTER_PASSWORD2_ID) type="password" name="password_confirmation" autocomplete="new-password" required;
                    button type="submit" class="btn btn-primary" { "Register" }
                }
                p class="auth-switch" {
                    "Already have an account? "
                    a id=(ids::SHOW_LOGIN_ID) href="#" { "Login" }
                }
            }
        }
    }
}

fn dashboard_page() -> Markup {
    html! {
        section id=(ids::DASHBOARD_PAGE_ID) class="page hidden" {
            header class="navbar" {
                div class="brand" { "Support Center" }
                div class="nav-user" {
                    span id=(ids::USER_NAME_ID) {}
                    button id=(ids::LOGOUT_BUTTON_ID) type="button" class="btn btn-secondary" { "Logout" }
                }
            }
            main class="dashboard" {
                div class="dashboard-header" {
                    h2 { "My Tickets" }
                    button id=(ids::CREATE_TICKET_BUTTON_ID) type="button" class="btn btn-primary" { "+ New Ticket" }
                }
                div id=(ids::TICKETS_LIST_ID) class="tickets-list" {}
            }
        }
    }
}

fn create_ticket_modal() -> Markup {
    html! {
        div id=(ids::CREATE_MODAL_ID) class="modal hidden" {
            div class="modal-content" {
                div class="modal-header" {
                    h2 { "Create New Ticket" }
                    button id=(ids::CLOSE_CREATE_MODAL_ID) type="button" class="close-btn" aria-label="Close" { "×" }
                }
                form id=(ids::CREATE_FORM_ID) class="form" {
                    label for=(ids::TICKET_TOPIC_ID) { "Topic" }
                    input id=(ids::TICKET_TOPIC_ID) type="text" name="topic" required;
                    label for=(ids::TICKET_DESCRIPTION_ID) { "Description" }
                    textarea id=(ids::TICKET_DESCRIPTION_ID) name="description" rows="6" required {}
                    label for=(ids::TICKET_ORDER_ID) { "Related Order (optional)" }
                    select id=(ids::TICKET_ORDER_ID) name="order" {
                        (PreEscaped(render_order_options(&[])))
                    }
                    label for=(ids::TICKET_FILES_ID) { "Attachments (optional)" }
                    input id=(ids::TICKET_FILES_ID) type="file" name="files" multiple accept="*/*";
                    div id=(ids::FILE_PREVIEW_LIST_ID) class="file-preview-list" {}
                    div class="form-actions" {
                        button id=(ids::CANCEL_CREATE_ID) type="button" class="btn btn-secondary" { "Cancel" }
                        button type="submit" class="btn btn-primary" { "Create Ticket" }
                    }
                }
            }
        }
    }
}

fn detail_modal() -> Markup {
    html! {
        div id=(ids::DETAIL_MODAL_ID) class="modal hidden" {
            div class="modal-content modal-large" {
                div class="modal-header" {
                    h2 { "Ticket Details" }
                    button id=(ids::CLOSE_DETAIL_MODAL_ID) type="button" class="close-btn" aria-label="Close" { "×" }
                }
                div id=(ids::DETAIL_CONTENT_ID) {}
            }
        }
    }
}

fn ticket_card(ticket: &TicketCardView) -> Markup {
    html! {
        div class=(ids::TICKET_CARD_CLASS) data-ticket-id=(ticket.id) role="button" tabindex="0" {
            div class="ticket-header" {
                div class="ticket-title" { (ticket.topic) }
                div class="ticket-badges" {
                    (badges(&ticket.status_class, &ticket.status_label, &ticket.priority_class, &ticket.priority_label))
                }
            }
            div class="ticket-description" { (ticket.description) }
            div class="ticket-footer" {
                span { "Created: " (ticket.created) }
                span { "Updated: " (ticket.updated) }
            }
        }
    }
}

fn badges(status_class: &str, status_label: &str, priority_class: &str, priority_label: &str) -> Markup {
    html! {
        span class={ "badge badge-status " (status_class) } { (status_label) }
        span class={ "badge badge-priority " (priority_class) } { (priority_label) }
    }
}

fn message_item(message: &MessageView) -> Markup {
    html! {
        div class={(if message.is_staff { "message staff-message" } else { "message" })} {
            div class="message-header" {
                span class="message-author" { (message.author) }
                span class="message-time" { (message.time) }
            }
            div class="message-content" { (message.body) }
        }
    }
}

fn attachment_item(ticket_id: &str, attachment: &AttachmentView) -> Markup {
    html! {
        div class="attachment-item" {
            div class="attachment-info" {
                span class="attachment-icon" { "📎" }
                a href=(attachment.href) target="_blank" rel="noopener noreferrer" class="attachment-name" {
                    (attachment.filename)
                }
                span class="attachment-size" { "(" (attachment.size_label) ")" }
            }
            button type="button"
                class=(ids::DELETE_ATTACHMENT_CLASS)
                data-ticket-id=(ticket_id)
                data-attachment-id=(attachment.id)
                title="Delete attachment" { "🗑️" }
        }
    }
}

fn activity_item(activity: &ActivityView) -> Markup {
    html! {
        div class="activity" {
            div { (activity.details) }
            div class="activity-time" { "by " (activity.performer) " - " (activity.time) }
        }
    }
}

pub fn styles() -> &'static str {
    r#"
:root {
  --primary-color: #4f46e5;
  --primary-hover: #4338ca;
  --danger: #dc2626;
  --success: #16a34a;
  --info: #2563eb;
  --background: #f3f4f6;
  --surface: #ffffff;
  --border: #e5e7eb;
  --text-primary: #111827;
  --text-secondary: #6b7280;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  background: var(--background);
  color: var(--text-primary);
}
.hidden { display: none !important; }
.muted { color: var(--text-secondary); }
.auth-card {
  max-width: 420px;
  margin: 8vh auto;
  padding: 32px;
  background: var(--surface);
  border-radius: 12px;
  box-shadow: 0 10px 30px rgba(17, 24, 39, 0.08);
}
.form { display: flex; flex-direction: column; gap: 10px; }
.form input, .form textarea, .form select, .add-message-form textarea {
  padding: 10px 12px;
  border: 1px solid var(--border);
  border-radius: 8px;
  font: inherit;
}
.form-row { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.form-row div { display: flex; flex-direction: column; gap: 6px; }
.form-actions { display: flex; justify-content: flex-end; gap: 10px; margin-top: 8px; }
.btn { border: 0; border-radius: 8px; padding: 10px 16px; font: inherit; cursor: pointer; }
.btn-primary { background: var(--primary-color); color: #fff; }
.btn-primary:hover { background: var(--primary-hover); }
.btn-secondary { background: var(--border); color: var(--text-primary); }
.navbar {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 14px 24px;
  background: var(--surface);
  border-bottom: 1px solid var(--border);
}
.brand { font-weight: 700; }
.nav-user { display: flex; gap: 12px; align-items: center; }
.dashboard { max-width: 1000px; margin: 0 auto; padding: 24px; }
.dashboard-header { display: flex; justify-content: space-between; align-items: center; }
.tickets-list { display: grid; gap: 14px; }
.ticket-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 10px;
  padding: 16px;
  cursor: pointer;
}
.ticket-card:hover { border-color: var(--primary-color); }
.ticket-header { display: flex; justify-content: space-between; gap: 12px; }
.ticket-title { font-weight: 600; }
.ticket-badges, .ticket-detail-meta { display: flex; gap: 6px; }
.ticket-description { color: var(--text-secondary); margin: 10px 0; white-space: pre-wrap; }
.ticket-footer { display: flex; gap: 16px; font-size: 13px; color: var(--text-secondary); }
.badge { border-radius: 999px; padding: 2px 10px; font-size: 12px; background: var(--border); text-transform: capitalize; }
.badge-status.open, .badge-status.new { background: #dbeafe; color: #1e40af; }
.badge-status.in_progress { background: #fef3c7; color: #92400e; }
.badge-status.resolved, .badge-status.closed { background: #dcfce7; color: #166534; }
.badge-priority.high, .badge-priority.urgent { background: #fee2e2; color: #991b1b; }
.empty-state { text-align: center; padding: 48px; color: var(--text-secondary); }
.modal {
  position: fixed;
  inset: 0;
  background: rgba(17, 24, 39, 0.45);
  display: flex;
  align-items: flex-start;
  justify-content: center;
  overflow-y: auto;
  padding: 5vh 16px;
}
.modal-content { background: var(--surface); border-radius: 12px; padding: 24px; width: 100%; max-width: 560px; }
.modal-large { max-width: 820px; }
.modal-header { display: flex; justify-content: space-between; align-items: center; }
.close-btn { border: 0; background: none; font-size: 24px; cursor: pointer; }
.related-order {
  margin: 15px 0;
  padding: 12px;
  background: var(--background);
  border-radius: 8px;
  border-left: 3px solid var(--primary-color);
}
.ticket-detail-description { margin: 12px 0; white-space: pre-wrap; }
.ticket-detail-times { font-size: 13px; color: var(--text-secondary); }
.ticket-detail-section { margin-top: 24px; }
.message { border: 1px solid var(--border); border-radius: 8px; padding: 10px 12px; margin-bottom: 10px; }
.staff-message { border-left: 3px solid var(--primary-color); background: #eef2ff; }
.message-header { display: flex; justify-content: space-between; font-size: 13px; color: var(--text-secondary); }
.message-author { font-weight: 600; color: var(--text-primary); }
.message-content { margin-top: 6px; white-space: pre-wrap; }
.add-message-form { display: flex; flex-direction: column; gap: 10px; margin-top: 12px; }
.attachment-item { display: flex; justify-content: space-between; align-items: center; padding: 8px 0; border-bottom: 1px solid var(--border); }
.attachment-info { display: flex; gap: 8px; align-items: center; }
.attachment-size { font-size: 12px; color: var(--text-secondary); }
.btn-delete-attachment { border: 0; background: none; cursor: pointer; }
.add-attachment-form { margin-top: 12px; display: flex; gap: 10px; align-items: center; flex-wrap: wrap; }
.activity { padding: 8px 0; border-bottom: 1px solid var(--border); }
.activity-time { font-size: 12px; color: var(--text-secondary); }
.file-preview-item { display: flex; gap: 8px; font-size: 13px; }
.loading-spinner {
  position: fixed;
  inset: 0;
  display: flex;
  align-items: center;
  justify-content: center;
  background: rgba(255, 255, 255, 0.5);
  z-index: 20;
}
.spinner {
  width: 40px;
  height: 40px;
  border: 4px solid var(--border);
  border-top-color: var(--primary-color);
  border-radius: 50%;
  animation: spin 0.8s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.alert {
  position: fixed;
  top: 20px;
  right: 20px;
  padding: 12px 18px;
  border-radius: 8px;
  color: #fff;
  z-index: 30;
  background: var(--info);
}
.alert.success { background: var(--success); }
.alert.error { background: var(--danger); }
.alert.info { background: var(--info); }
@media (max-width: 640px) {
  .form-row { grid-template-columns: 1fr; }
  .ticket-header { flex-direction: column; }
}
"#
}
