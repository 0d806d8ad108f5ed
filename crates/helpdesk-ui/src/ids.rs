pub const APP_ROOT_ID: &str = "helpdesk-app";

pub const LOGIN_PAGE_ID: &str = "login-page";
pub const LOGIN_FORM_ID: &str = "login-form";
pub const LOGIN_EMAIL_ID: &str = "login-email";
pub const LOGIN_PASSWORD_ID: &str = "login-password";
pub const SHOW_REGISTER_ID: &str = "show-register";

pub const REGISTER_PAGE_ID: &str = "register-page";
pub const REGISTER_FORM_ID: &str = "register-form";
pub const REGISTER_EMAIL_ID: &str = "register-email";
pub const REGISTER_USERNAME_ID: &str = "register-username";
pub const REGISTER_FIRST_NAME_ID: &str = "register-first-name";
pub const REGISTER_LAST_NAME_ID: &str = "register-last-name";
pub const REGISTER_PASSWORD_ID: &str = "register-password";
pub const REGISTER_PASSWORD2_ID: &str = "register-password2";
pub const SHOW_LOGIN_ID: &str = "show-login";

pub const DASHBOARD_PAGE_ID: &str = "dashboard-page";
pub const USER_NAME_ID: &str = "user-name";
pub const LOGOUT_BUTTON_ID: &str = "logout-btn";
pub const CREATE_TICKET_BUTTON_ID: &str = "create-ticket-btn";
pub const TICKETS_LIST_ID: &str = "tickets-list";

pub const CREATE_MODAL_ID: &str = "create-ticket-modal";
pub const CLOSE_CREATE_MODAL_ID: &str = "close-create-modal";
pub const CANCEL_CREATE_ID: &str = "cancel-create";
pub const CREATE_FORM_ID: &str = "create-ticket-form";
pub const TICKET_TOPIC_ID: &str = "ticket-topic";
pub const TICKET_DESCRIPTION_ID: &str = "ticket-description";
pub const TICKET_ORDER_ID: &str = "ticket-order";
pub const TICKET_FILES_ID: &str = "ticket-files";
pub const FILE_PREVIEW_LIST_ID: &str = "file-preview-list";

pub const DETAIL_MODAL_ID: &str = "ticket-detail-modal";
pub const CLOSE_DETAIL_MODAL_ID: &str = "close-detail-modal";
pub const DETAIL_CONTENT_ID: &str = "ticket-detail-content";
pub const ADD_MESSAGE_FORM_ID: &str = "add-message-form";
pub const NEW_MESSAGE_ID: &str = "new-message";
pub const NEW_ATTACHMENT_ID: &str = "new-attachment";
pub const UPLOAD_ATTACHMENTS_ID: &str = "upload-attachments";

pub const LOADING_SPINNER_ID: &str = "loading-spinner";
pub const ALERT_ID: &str = "alert-message";

pub const MODAL_CLASS: &str = "modal";
pub const HIDDEN_CLASS: &str = "hidden";
pub const TICKET_CARD_CLASS: &str = "ticket-card";
pub const DELETE_ATTACHMENT_CLASS: &str = "btn-delete-attachment";

/// Carries the ticket id on cards and on the detail forms.
pub const DATA_TICKET_ID: &str = "data-ticket-id";
/// Carries the attachment id on delete buttons.
pub const DATA_ATTACHMENT_ID: &str = "data-attachment-id";
