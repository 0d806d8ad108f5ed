use crate::auth::AuthInputError;
use crate::config::{ClientConfig, normalize_base_url};

/// Optional `/my-tickets/` filters. The browser UI never sets them, so the
/// unfiltered ticket set is what it loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TicketFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_string().is_none()
    }

    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        let params = [("status", &self.status), ("priority", &self.priority)]
            .into_iter()
            .filter_map(|(name, value)| {
                let value = value.as_deref()?.trim();
                (!value.is_empty()).then(|| format!("{name}={}", urlencoding::encode(value)))
            })
            .collect::<Vec<_>>();
        if params.is_empty() {
            None
        } else {
            Some(params.join("&"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, AuthInputError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// The config's base URL is already normalized.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let trimmed = path.trim();
        if trimmed.starts_with('/') {
            format!("{}{}", self.base_url, trimmed)
        } else {
            format!("{}/{}", self.base_url, trimmed)
        }
    }

    #[must_use]
    pub fn login_path() -> &'static str {
        "/users/auth/login/"
    }

    #[must_use]
    pub fn register_path() -> &'static str {
        "/users/auth/register/"
    }

    #[must_use]
    pub fn refresh_path() -> &'static str {
        "/users/auth/refresh/"
    }

    #[must_use]
    pub fn logout_path() -> &'static str {
        "/users/auth/logout/"
    }

    #[must_use]
    pub fn my_tickets_path(filter: &TicketFilter) -> String {
        match filter.query_string() {
            Some(query) => format!("/my-tickets/?{query}"),
            None => "/my-tickets/".to_string(),
        }
    }

    #[must_use]
    pub fn my_orders_path() -> &'static str {
        "/my-orders/"
    }

    #[must_use]
    pub fn tickets_path() -> &'static str {
        "/tickets/"
    }

    #[must_use]
    pub fn ticket_path(ticket_id: &str) -> String {
        format!("/tickets/{}/", encode_segment(ticket_id))
    }

    #[must_use]
    pub fn ticket_messages_path(ticket_id: &str) -> String {
        format!("/tickets/{}/messages/", encode_segment(ticket_id))
    }

    #[must_use]
    pub fn ticket_activities_path(ticket_id: &str) -> String {
        format!("/tickets/{}/activities/", encode_segment(ticket_id))
    }

    #[must_use]
    pub fn ticket_attachments_path(ticket_id: &str) -> String {
        format!("/tickets/{}/attachments/", encode_segment(ticket_id))
    }

    #[must_use]
    pub fn ticket_attachment_path(ticket_id: &str, attachment_id: &str) -> String {
        format!(
            "/tickets/{}/attachments/{}/",
            encode_segment(ticket_id),
            encode_segment(attachment_id)
        )
    }
}

fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw.trim()).into_owned()
}
