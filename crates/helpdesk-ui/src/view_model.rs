use helpdesk_client_core::format::{
    format_date, format_date_time, format_file_size, format_status, truncate_chars,
};
use helpdesk_client_core::models::{
    Activity, Attachment, Message, OrderSummary, Ticket, TicketDetail,
};

/// Longest description shown on a ticket card.
pub const CARD_DESCRIPTION_CHARS: usize = 200;

const MISSING_TIMESTAMP: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCardView {
    pub id: String,
    pub topic: String,
    pub description: String,
    pub status_class: String,
    pub status_label: String,
    pub priority_class: String,
    pub priority_label: String,
    pub created: String,
    pub updated: String,
}

impl From<&Ticket> for TicketCardView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.clone(),
            topic: ticket.topic.clone(),
            description: truncate_chars(&ticket.description, CARD_DESCRIPTION_CHARS),
            status_class: class_token(&ticket.status),
            status_label: format_status(&ticket.status),
            priority_class: class_token(&ticket.priority),
            priority_label: ticket.priority.clone(),
            created: date_or_missing(ticket.created_at.as_deref()),
            updated: date_or_missing(ticket.updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOptionView {
    pub value: String,
    pub label: String,
}

impl From<&OrderSummary> for OrderOptionView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            value: order.id.clone(),
            label: format!(
                "Order #{} - {} ({})",
                order.order_number,
                order.status,
                date_or_missing(order.created_at.as_deref())
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedOrderView {
    pub order_number: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub author: String,
    pub is_staff: bool,
    pub time: String,
    pub body: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        let author = if message.is_staff_message {
            format!("{} (Staff)", message.author_name())
        } else {
            message.author_name().to_string()
        };
        Self {
            author,
            is_staff: message.is_staff_message,
            time: date_time_or_missing(message.created_at.as_deref()),
            body: message.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentView {
    pub id: String,
    pub filename: String,
    pub size_label: String,
    pub href: String,
}

impl From<&Attachment> for AttachmentView {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.clone(),
            filename: attachment.filename.clone(),
            size_label: format_file_size(attachment.filesize),
            href: safe_href(attachment.file_url.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityView {
    pub details: String,
    pub performer: String,
    pub time: String,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            details: activity.summary().to_string(),
            performer: activity.performer_name().to_string(),
            time: date_time_or_missing(activity.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetailView {
    pub id: String,
    pub topic: String,
    pub description: String,
    pub status_class: String,
    pub status_label: String,
    pub priority_class: String,
    pub priority_label: String,
    pub order: Option<LinkedOrderView>,
    pub created: String,
    pub updated: String,
    pub resolved: Option<String>,
    pub messages: Vec<MessageView>,
    pub attachments: Vec<AttachmentView>,
    pub activities: Vec<ActivityView>,
}

impl From<&TicketDetail> for TicketDetailView {
    fn from(detail: &TicketDetail) -> Self {
        let ticket = &detail.ticket;
        Self {
            id: ticket.id.clone(),
            topic: ticket.topic.clone(),
            description: ticket.description.clone(),
            status_class: class_token(&ticket.status),
            status_label: format_status(&ticket.status),
            priority_class: class_token(&ticket.priority),
            priority_label: ticket.priority.clone(),
            order: ticket.order.as_ref().map(|order| LinkedOrderView {
                order_number: order.order_number.clone(),
                status: order.status.clone(),
            }),
            created: date_time_or_missing(ticket.created_at.as_deref()),
            updated: date_time_or_missing(ticket.updated_at.as_deref()),
            resolved: ticket.resolved_at.as_deref().map(format_date_time),
            messages: detail.messages.iter().map(MessageView::from).collect(),
            attachments: detail.attachments.iter().map(AttachmentView::from).collect(),
            activities: detail.activities.iter().map(ActivityView::from).collect(),
        }
    }
}

/// A file picked in the create form, before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreviewView {
    pub filename: String,
    pub size_label: String,
}

impl FilePreviewView {
    pub fn new(filename: impl Into<String>, size: i64) -> Self {
        Self {
            filename: filename.into(),
            size_label: format_file_size(Some(size)),
        }
    }
}

/// Navbar greeting for the signed-in user; empty when signed out.
pub fn greeting(display_name: Option<&str>) -> String {
    display_name.map_or_else(String::new, |name| format!("Hi, {name}"))
}

fn date_or_missing(raw: Option<&str>) -> String {
    raw.map_or_else(|| MISSING_TIMESTAMP.to_string(), format_date)
}

fn date_time_or_missing(raw: Option<&str>) -> String {
    raw.map_or_else(|| MISSING_TIMESTAMP.to_string(), format_date_time)
}

/// Lowercase `[a-z0-9_-]` token for use as a CSS class.
fn class_token(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect()
}

/// Only web links and same-origin paths become real hrefs.
fn safe_href(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(url)
            if url.starts_with("https://")
                || url.starts_with("http://")
                || (url.starts_with('/') && !url.starts_with("//")) =>
        {
            url.to_string()
        }
        _ => "#".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_prefixes_the_display_name() {
        assert_eq!(greeting(Some("ada")), "Hi, ada");
        assert_eq!(greeting(None), "");
    }

    #[test]
    fn card_formats_status_and_truncates_description() {
        let ticket = Ticket {
            id: "t-1".to_string(),
            topic: "Printer issue".to_string(),
            description: "x".repeat(250),
            status: "in_progress".to_string(),
            priority: "High".to_string(),
            created_at: Some("2025-01-05T14:30:00".to_string()),
            ..Ticket::default()
        };
        let card = TicketCardView::from(&ticket);
        assert_eq!(card.status_label, "In Progress");
        assert_eq!(card.status_class, "in_progress");
        assert_eq!(card.priority_class, "high");
        assert_eq!(card.created, "Jan 5, 2025");
        assert_eq!(card.updated, "-");
        assert_eq!(card.description.chars().count(), CARD_DESCRIPTION_CHARS + 3);
    }

    #[test]
    fn staff_messages_are_labelled() {
        let message = Message {
            user_name: Some("support".to_string()),
            is_staff_message: true,
            message: "On it".to_string(),
            ..Message::default()
        };
        assert_eq!(MessageView::from(&message).author, "support (Staff)");
    }

    #[test]
    fn order_option_label() {
        let order = OrderSummary {
            id: "o-1".to_string(),
            order_number: "1042".to_string(),
            status: "shipped".to_string(),
            created_at: Some("2025-03-02T08:00:00".to_string()),
        };
        assert_eq!(
            OrderOptionView::from(&order).label,
            "Order #1042 - shipped (Mar 2, 2025)"
        );
    }

    #[test]
    fn attachment_links_are_restricted_to_web_urls() {
        assert_eq!(safe_href(Some("https://cdn.example.com/a.png")), "https://cdn.example.com/a.png");
        assert_eq!(safe_href(Some("/media/a.png")), "/media/a.png");
        assert_eq!(safe_href(Some("javascript:alert(1)")), "#");
        assert_eq!(safe_href(Some("//evil.example.com/a")), "#");
        assert_eq!(safe_href(None), "#");
    }

    #[test]
    fn class_tokens_drop_unsafe_characters() {
        assert_eq!(class_token("in_progress\" onclick=\"x"), "in_progressonclickx");
    }
}
