/// Optional `<meta>` tag naming the API base URL when it is not same-origin.
pub(crate) const API_BASE_URL_META_NAME: &str = "helpdesk-api-base-url";
pub(crate) const STYLE_ELEMENT_ID: &str = "helpdesk-styles";
pub(crate) const ALERT_BASE_CLASS: &str = "alert";
pub(crate) const TICKET_CARD_SELECTOR: &str = ".ticket-card";
pub(crate) const DELETE_ATTACHMENT_SELECTOR: &str = ".btn-delete-attachment";
