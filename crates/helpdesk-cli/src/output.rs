//! Plain-text rendering of records for the terminal.

use std::fmt::Write as _;

use helpdesk_client_core::format::{
    format_date, format_date_time, format_file_size, format_status,
};
use helpdesk_client_core::models::{OrderSummary, Ticket, TicketDetail};
use helpdesk_client_core::tickets::UploadReport;

pub fn ticket_list(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "No tickets found\n".to_string();
    }
    let mut out = String::new();
    for ticket in tickets {
        let _ = writeln!(
            out,
            "{}  [{}] [{}]  {}  (created {}, updated {})",
            ticket.id,
            format_status(&ticket.status),
            ticket.priority,
            ticket.topic,
            date(ticket.created_at.as_deref()),
            date(ticket.updated_at.as_deref()),
        );
    }
    out
}

pub fn order_list(orders: &[OrderSummary]) -> String {
    if orders.is_empty() {
        return "No orders available\n".to_string();
    }
    let mut out = String::new();
    for order in orders {
        let _ = writeln!(
            out,
            "{}  Order #{} - {} ({})",
            order.id,
            order.order_number,
            order.status,
            date(order.created_at.as_deref()),
        );
    }
    out
}

pub fn ticket_detail(detail: &TicketDetail) -> String {
    let ticket = &detail.ticket;
    let mut out = String::new();
    let _ = writeln!(out, "{}", ticket.topic);
    let _ = writeln!(
        out,
        "Status: {}  Priority: {}",
        format_status(&ticket.status),
        ticket.priority
    );
    if let Some(order) = &ticket.order {
        let _ = writeln!(out, "Related Order: #{} - {}", order.order_number, order.status);
    }
    let _ = write!(
        out,
        "Created: {} | Updated: {}",
        date_time(ticket.created_at.as_deref()),
        date_time(ticket.updated_at.as_deref()),
    );
    if let Some(resolved) = ticket.resolved_at.as_deref() {
        let _ = write!(out, " | Resolved: {}", format_date_time(resolved));
    }
    let _ = writeln!(out, "\n\n{}\n", ticket.description);

    let _ = writeln!(out, "Messages:");
    if detail.messages.is_empty() {
        let _ = writeln!(out, "  No messages yet.");
    }
    for message in &detail.messages {
        let staff = if message.is_staff_message { " (Staff)" } else { "" };
        let _ = writeln!(
            out,
            "  {}{} - {}\n    {}",
            message.author_name(),
            staff,
            date_time(message.created_at.as_deref()),
            message.message
        );
    }

    let _ = writeln!(out, "\nAttachments:");
    if detail.attachments.is_empty() {
        let _ = writeln!(out, "  No attachments yet.");
    }
    for attachment in &detail.attachments {
        let _ = writeln!(
            out,
            "  [{}] {} ({}){}",
            attachment.id,
            attachment.filename,
            format_file_size(attachment.filesize),
            attachment
                .file_url
                .as_deref()
                .map(|url| format!(" {url}"))
                .unwrap_or_default()
        );
    }

    let _ = writeln!(out, "\nActivity Log:");
    if detail.activities.is_empty() {
        let _ = writeln!(out, "  No activities yet.");
    }
    for activity in &detail.activities {
        let _ = writeln!(
            out,
            "  {} (by {} - {})",
            activity.summary(),
            activity.performer_name(),
            date_time(activity.created_at.as_deref()),
        );
    }
    out
}

pub fn upload_report(report: &UploadReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => {
                let _ = writeln!(out, "uploaded {}", outcome.filename);
            }
            Err(error) => {
                let _ = writeln!(out, "failed {}: {error}", outcome.filename);
            }
        }
    }
    out
}

fn date(raw: Option<&str>) -> String {
    raw.map_or_else(|| "-".to_string(), format_date)
}

fn date_time(raw: Option<&str>) -> String {
    raw.map_or_else(|| "-".to_string(), format_date_time)
}
