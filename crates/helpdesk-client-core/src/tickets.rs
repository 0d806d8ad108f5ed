use futures::future::join_all;

use crate::client::ApiClient;
use crate::endpoints::{Endpoints, TicketFilter};
use crate::error::{ApiError, UploadError};
use crate::models::{
    Activity, Attachment, CreateTicketRequest, Message, NewMessageRequest, OrderSummary, Ticket,
    TicketDetail,
};
use crate::session::SessionStore;
use crate::transport::{FilePart, HttpTransport};

/// Result of one file in a batch upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub filename: String,
    pub result: Result<(), UploadError>,
}

/// Files picked for upload. Files the platform refused to read are kept by
/// name so they are reported as failed instead of silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedFiles {
    pub parts: Vec<FilePart>,
    pub unreadable: Vec<String>,
}

impl SelectedFiles {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.unreadable.is_empty()
    }
}

impl From<Vec<FilePart>> for SelectedFiles {
    fn from(parts: Vec<FilePart>) -> Self {
        Self {
            parts,
            unreadable: Vec::new(),
        }
    }
}

/// Per-file outcomes of a batch upload, in the order the files were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    /// True when any upload ended because the session could not be refreshed.
    #[must_use]
    pub fn auth_expired(&self) -> bool {
        self.failures().any(|outcome| {
            matches!(
                outcome.result,
                Err(UploadError::Api(ApiError::AuthExpired))
            )
        })
    }

    pub fn record_unreadable(&mut self, filename: impl Into<String>) {
        let filename = filename.into();
        self.outcomes.push(UploadOutcome {
            result: Err(UploadError::Unreadable {
                filename: filename.clone(),
            }),
            filename,
        });
    }
}

impl<T: HttpTransport, S: SessionStore> ApiClient<T, S> {
    pub async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, ApiError> {
        self.get_json(&Endpoints::my_tickets_path(filter))
            .await
            .inspect_err(|error| tracing::warn!(error = %error, "failed to load tickets"))
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        self.get_json(Endpoints::my_orders_path())
            .await
            .inspect_err(|error| tracing::debug!(error = %error, "failed to load orders"))
    }

    pub async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket, ApiError> {
        self.post_json(Endpoints::tickets_path(), request)
            .await
            .inspect_err(|error| tracing::warn!(error = %error, "failed to create ticket"))
    }

    /// Fetches the four parts of the detail view concurrently; any failure
    /// fails the whole bundle.
    pub async fn fetch_ticket_detail(&self, ticket_id: &str) -> Result<TicketDetail, ApiError> {
        let ticket_path = Endpoints::ticket_path(ticket_id);
        let messages_path = Endpoints::ticket_messages_path(ticket_id);
        let activities_path = Endpoints::ticket_activities_path(ticket_id);
        let attachments_path = Endpoints::ticket_attachments_path(ticket_id);

        let (ticket, messages, activities, attachments) = futures::try_join!(
            self.get_json::<Ticket>(&ticket_path),
            self.get_json::<Vec<Message>>(&messages_path),
            self.get_json::<Vec<Activity>>(&activities_path),
            self.get_json::<Vec<Attachment>>(&attachments_path),
        )
        .inspect_err(|error| {
            tracing::warn!(ticket_id, error = %error, "failed to load ticket detail");
        })?;

        Ok(TicketDetail {
            ticket,
            messages,
            activities,
            attachments,
        })
    }

    /// Posts a message. Blank text is skipped and reported as `Ok(false)`.
    pub async fn add_message(&self, ticket_id: &str, message: &str) -> Result<bool, ApiError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(false);
        }
        let request = NewMessageRequest {
            message: message.to_string(),
        };
        self.post_json::<_, serde_json::Value>(&Endpoints::ticket_messages_path(ticket_id), &request)
            .await
            .inspect_err(|error| tracing::warn!(ticket_id, error = %error, "failed to send message"))?;
        Ok(true)
    }

    /// Uploads every file as its own request, all in flight at once.
    pub async fn upload_attachments(&self, ticket_id: &str, files: Vec<FilePart>) -> UploadReport {
        let path = Endpoints::ticket_attachments_path(ticket_id);
        let uploads = files.into_iter().map(|file| {
            let path = path.as_str();
            async move {
                let filename = file.filename.clone();
                let result = self
                    .upload(path, file)
                    .await
                    .map(|_| ())
                    .map_err(UploadError::from);
                if let Err(error) = &result {
                    tracing::warn!(ticket_id, filename = %filename, error = %error, "attachment upload failed");
                }
                UploadOutcome { filename, result }
            }
        });
        UploadReport {
            outcomes: join_all(uploads).await,
        }
    }

    /// Uploads the readable files, then appends a failed outcome for each
    /// file that could not be read.
    pub async fn upload_selection(&self, ticket_id: &str, files: SelectedFiles) -> UploadReport {
        let mut report = if files.parts.is_empty() {
            UploadReport::default()
        } else {
            self.upload_attachments(ticket_id, files.parts).await
        };
        for filename in files.unreadable {
            tracing::warn!(ticket_id, filename = %filename, "selected file could not be read");
            report.record_unreadable(filename);
        }
        report
    }

    pub async fn delete_attachment(
        &self,
        ticket_id: &str,
        attachment_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(&Endpoints::ticket_attachment_path(ticket_id, attachment_id))
            .await
            .inspect_err(|error| {
                tracing::warn!(ticket_id, attachment_id, error = %error, "failed to delete attachment");
            })
    }
}
