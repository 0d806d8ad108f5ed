//! Records exchanged with the helpdesk REST API.
//!
//! The backend owns these shapes; decoding is lenient (missing or null
//! fields fall back to defaults) and unknown user fields are carried through.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    /// Username when present, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.email.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub order_number: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub topic: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub priority: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default, deserialize_with = "linked_order")]
    pub order: Option<OrderSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub is_staff_message: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub message: String,
}

impl Message {
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.user_name
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(UserRecord::display_name))
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub filename: String,
    #[serde(default)]
    pub filesize: Option<i64>,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub action_display: Option<String>,
    #[serde(default)]
    pub performed_by_name: Option<String>,
    #[serde(default)]
    pub performed_by: Option<UserRecord>,
    #[serde(default, alias = "timestamp")]
    pub created_at: Option<String>,
}

impl Activity {
    #[must_use]
    pub fn performer_name(&self) -> &str {
        self.performed_by_name
            .as_deref()
            .or_else(|| {
                self.performed_by
                    .as_ref()
                    .and_then(UserRecord::display_name)
            })
            .unwrap_or("Unknown")
    }

    /// Free-text details, or the action label when the backend left details empty.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.details
            .as_deref()
            .filter(|details| !details.is_empty())
            .or(self.action_display.as_deref())
            .unwrap_or_default()
    }
}

/// Everything the ticket detail view shows, fetched together and replaced as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub messages: Vec<Message>,
    pub activities: Vec<Activity>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTicketRequest {
    pub topic: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkedOrder {
    Summary(OrderSummary),
    Reference(serde_json::Value),
}

/// The detail endpoint nests the order; other endpoints may send only its id.
fn linked_order<'de, D>(deserializer: D) -> Result<Option<OrderSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    let linked = Option::<LinkedOrder>::deserialize(deserializer)?;
    Ok(match linked {
        Some(LinkedOrder::Summary(order)) => Some(order),
        Some(LinkedOrder::Reference(serde_json::Value::String(id))) => Some(OrderSummary {
            id,
            ..OrderSummary::default()
        }),
        Some(LinkedOrder::Reference(serde_json::Value::Number(id))) => Some(OrderSummary {
            id: id.to_string(),
            ..OrderSummary::default()
        }),
        Some(LinkedOrder::Reference(_)) | None => None,
    })
}
