use helpdesk_client_core::app::{
    NOTICE_ATTACHMENT_DELETED, NOTICE_LOGIN_OK, NOTICE_SESSION_EXPIRED, NOTICE_TICKET_CREATED,
};
use helpdesk_client_core::auth::RegisterForm;
use helpdesk_client_core::format::format_status;
use helpdesk_client_core::models::{CreateTicketRequest, UserRecord};
use helpdesk_client_core::testing::MockTransport;
use helpdesk_client_core::{
    ApiClient, ClientConfig, FilePart, HelpdeskApp, HttpMethod, MemorySessionStore, NoticeKind,
    Page, SelectedFiles, Session, SessionStore,
};
use serde_json::json;

type TestApp = HelpdeskApp<MockTransport, MemorySessionStore>;

fn app_with(store: MemorySessionStore) -> anyhow::Result<TestApp> {
    let config = ClientConfig::new("http://localhost:8000/api/v1")?;
    Ok(HelpdeskApp::new(ApiClient::new(
        &config,
        MockTransport::new(),
        store,
    )))
}

fn signed_in_app() -> anyhow::Result<TestApp> {
    app_with(MemorySessionStore::with_session(
        "tok",
        UserRecord {
            username: Some("ada".to_string()),
            ..UserRecord::default()
        },
    ))
}

fn transport(app: &TestApp) -> &MockTransport {
    app.client().transport()
}

fn script_detail(transport: &MockTransport, attachments: &serde_json::Value) {
    transport
        .respond_json(
            HttpMethod::Get,
            "/tickets/t-1/",
            200,
            &json!({
                "id": "t-1",
                "topic": "Printer issue",
                "description": "Won't power on",
                "status": "in_progress",
                "priority": "medium",
                "created_at": "2025-01-05T14:30:00Z",
                "updated_at": "2025-01-05T15:00:00Z",
                "order": {"id": "o-1", "order_number": "1042", "status": "delivered"}
            }),
        )
        .respond_json(
            HttpMethod::Get,
            "/tickets/t-1/messages/",
            200,
            &json!([{"user_name": "ada", "message": "It just blinks", "created_at": "2025-01-05T14:31:00Z"}]),
        )
        .respond_json(
            HttpMethod::Get,
            "/tickets/t-1/activities/",
            200,
            &json!([{"details": "Ticket created", "performed_by_name": "ada", "timestamp": "2025-01-05T14:30:00Z"}]),
        )
        .respond_json(HttpMethod::Get, "/tickets/t-1/attachments/", 200, attachments);
}

#[tokio::test]
async fn login_persists_session_shows_dashboard_and_loads_tickets_once() -> anyhow::Result<()> {
    let app = app_with(MemorySessionStore::new())?;
    let transport = transport(&app);
    transport.respond_json(
        HttpMethod::Post,
        "/users/auth/login/",
        200,
        &json!({"access": "tok", "user": {"id": 7, "username": "ada", "email": "ada@example.com"}}),
    );
    transport.respond_json(HttpMethod::Get, "/my-tickets/", 200, &json!([]));

    app.submit_login("ada@example.com", "pw").await;

    let state = app.state();
    assert_eq!(state.page, Page::Dashboard);
    assert_eq!(state.user_display_name.as_deref(), Some("ada"));
    assert!(!state.loading());
    assert!(app.client().session().is_authenticated());
    assert_eq!(transport.count(HttpMethod::Get, "/my-tickets/"), 1);
    let notice = state.notice.ok_or_else(|| anyhow::anyhow!("expected notice"))?;
    assert_eq!(notice.text, NOTICE_LOGIN_OK);
    assert_eq!(notice.kind, NoticeKind::Success);
    Ok(())
}

#[tokio::test]
async fn boot_with_persisted_session_restores_dashboard() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    transport(&app).respond_json(
        HttpMethod::Get,
        "/my-tickets/",
        200,
        &json!([{"id": "t-1", "topic": "Printer issue", "status": "open"}]),
    );
    app.boot().await;
    let state = app.state();
    assert_eq!(state.page, Page::Dashboard);
    assert_eq!(state.tickets.len(), 1);
    Ok(())
}

#[tokio::test]
async fn password_mismatch_issues_no_request() -> anyhow::Result<()> {
    let app = app_with(MemorySessionStore::new())?;
    app.show_register();
    app.submit_register(RegisterForm {
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "one".to_string(),
        password_confirmation: "two".to_string(),
        ..RegisterForm::default()
    })
    .await;

    assert!(transport(&app).requests().is_empty());
    let state = app.state();
    assert_eq!(state.page, Page::Register);
    let notice = state.notice.ok_or_else(|| anyhow::anyhow!("expected notice"))?;
    assert_eq!(notice.text, "Passwords do not match");
    assert_eq!(notice.kind, NoticeKind::Error);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    transport
        .respond_json(HttpMethod::Get, "/my-tickets/", 401, &json!({"detail": "expired"}))
        .respond_json(
            HttpMethod::Get,
            "/my-tickets/",
            200,
            &json!([{"id": "t-1", "topic": "Printer issue"}]),
        );
    transport.respond_json(
        HttpMethod::Post,
        "/users/auth/refresh/",
        200,
        &json!({"access": "fresh"}),
    );

    app.load_tickets().await;

    let attempts = transport.requests_to(HttpMethod::Get, "/my-tickets/");
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[1].header("Authorization"), Some("Bearer fresh"));
    assert_eq!(app.state().tickets.len(), 1);
    assert_eq!(app.client().session().access_token.as_deref(), Some("fresh"));
    Ok(())
}

#[tokio::test]
async fn failed_refresh_clears_session_and_shows_login() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    app.dispatch(helpdesk_client_core::AppAction::SignedIn {
        display_name: Some("ada".to_string()),
    });
    let transport = transport(&app);
    transport.respond_json(HttpMethod::Get, "/my-tickets/", 401, &json!({"detail": "expired"}));
    transport.respond_json(HttpMethod::Post, "/users/auth/refresh/", 401, &json!({}));

    app.load_tickets().await;

    assert_eq!(app.client().store().get(), Session::default());
    let state = app.state();
    assert_eq!(state.page, Page::Login);
    assert!(!state.loading());
    assert_eq!(
        state.notice.map(|notice| notice.text).as_deref(),
        Some(NOTICE_SESSION_EXPIRED)
    );
    assert_eq!(transport.count(HttpMethod::Get, "/my-tickets/"), 1);
    Ok(())
}

#[tokio::test]
async fn created_ticket_appears_in_reloaded_list() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    app.open_create_ticket().await;
    transport.respond_json(
        HttpMethod::Post,
        "/tickets/",
        201,
        &json!({"id": "t-1", "topic": "Printer issue", "description": "Won't power on", "status": "in_progress"}),
    );
    transport.respond_json(
        HttpMethod::Get,
        "/my-tickets/",
        200,
        &json!([{
            "id": "t-1",
            "topic": "Printer issue",
            "description": "Won't power on",
            "status": "in_progress",
            "priority": "medium"
        }]),
    );

    app.submit_create_ticket(
        CreateTicketRequest {
            topic: "Printer issue".to_string(),
            description: "Won't power on".to_string(),
            order: None,
        },
        SelectedFiles::default(),
    )
    .await;

    let created = transport.requests_to(HttpMethod::Post, "/tickets/");
    assert_eq!(created.len(), 1);
    assert_eq!(transport.count(HttpMethod::Post, "/tickets/t-1/attachments/"), 0);

    let state = app.state();
    assert!(!state.create_modal_open);
    assert_eq!(
        state.notice.map(|notice| notice.text).as_deref(),
        Some(NOTICE_TICKET_CREATED)
    );
    let ticket = state
        .tickets
        .first()
        .ok_or_else(|| anyhow::anyhow!("expected reloaded ticket"))?;
    assert_eq!(ticket.topic, "Printer issue");
    assert_eq!(ticket.description, "Won't power on");
    assert_eq!(format_status(&ticket.status), "In Progress");
    Ok(())
}

#[tokio::test]
async fn ticket_survives_failed_attachment_uploads() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    transport.respond_json(HttpMethod::Post, "/tickets/", 201, &json!({"id": "t-9"}));
    transport.fail(HttpMethod::Post, "/tickets/t-9/attachments/", "connection reset");
    transport.respond_json(HttpMethod::Get, "/my-tickets/", 200, &json!([{"id": "t-9"}]));

    app.submit_create_ticket(
        CreateTicketRequest {
            topic: "Broken".to_string(),
            description: "Details".to_string(),
            order: Some("o-1".to_string()),
        },
        vec![
            FilePart::attachment("a.txt", None, b"a".to_vec()),
            FilePart::attachment("b.txt", None, b"b".to_vec()),
        ],
    )
    .await;

    assert_eq!(transport.count(HttpMethod::Post, "/tickets/t-9/attachments/"), 2);
    let state = app.state();
    assert_eq!(state.tickets.len(), 1);
    assert_eq!(
        state.notice.map(|notice| notice.text).as_deref(),
        Some("Some files failed to upload")
    );
    Ok(())
}

#[tokio::test]
async fn unreadable_selected_file_counts_as_failed_upload() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    transport.respond_json(HttpMethod::Post, "/tickets/", 201, &json!({"id": "t-4"}));
    transport.respond_json(
        HttpMethod::Post,
        "/tickets/t-4/attachments/",
        201,
        &json!({"id": 1}),
    );
    transport.respond_json(HttpMethod::Get, "/my-tickets/", 200, &json!([{"id": "t-4"}]));

    app.submit_create_ticket(
        CreateTicketRequest {
            topic: "Scanner".to_string(),
            description: "Jams".to_string(),
            order: None,
        },
        SelectedFiles {
            parts: vec![FilePart::attachment("scan.png", None, b"png".to_vec())],
            unreadable: vec!["locked.pdf".to_string()],
        },
    )
    .await;

    assert_eq!(transport.count(HttpMethod::Post, "/tickets/t-4/attachments/"), 1);
    let state = app.state();
    assert_eq!(state.tickets.len(), 1);
    assert_eq!(
        state.notice.map(|notice| notice.text).as_deref(),
        Some("Some files failed to upload")
    );
    Ok(())
}

#[tokio::test]
async fn only_unreadable_files_report_every_upload_failed() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    script_detail(transport(&app), &json!([]));

    app.add_attachments(
        "t-1",
        SelectedFiles {
            parts: Vec::new(),
            unreadable: vec!["locked.pdf".to_string()],
        },
    )
    .await;

    assert_eq!(transport(&app).count(HttpMethod::Post, "/tickets/t-1/attachments/"), 0);
    assert_eq!(
        app.state().notice.map(|notice| notice.text).as_deref(),
        Some("Failed to upload files")
    );
    Ok(())
}

#[tokio::test]
async fn viewing_the_same_ticket_twice_yields_identical_state() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    script_detail(
        transport(&app),
        &json!([{"id": 3, "filename": "log.txt", "filesize": 1536, "file_url": "/media/log.txt"}]),
    );

    app.view_ticket("t-1").await;
    let first = app.state().detail;
    app.view_ticket("t-1").await;
    let second = app.state().detail;

    assert!(first.is_some());
    assert_eq!(first, second);
    assert!(app.state().detail_open);
    Ok(())
}

#[tokio::test]
async fn detail_failure_renders_nothing() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    script_detail(transport, &json!([]));
    transport.reset_route(HttpMethod::Get, "/tickets/t-1/messages/");
    transport.fail(HttpMethod::Get, "/tickets/t-1/messages/", "offline");

    app.view_ticket("t-1").await;

    let state = app.state();
    assert!(!state.detail_open);
    assert_eq!(state.detail, None);
    assert_eq!(
        state.notice.map(|notice| notice.text).as_deref(),
        Some("Network error. Please try again.")
    );
    Ok(())
}

#[tokio::test]
async fn confirmed_delete_removes_attachment_from_next_render() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    script_detail(
        transport,
        &json!([{"id": 3, "filename": "log.txt", "filesize": 10}]),
    );
    app.view_ticket("t-1").await;
    assert_eq!(
        app.state().detail.map(|detail| detail.attachments.len()),
        Some(1)
    );

    transport.reset_route(HttpMethod::Get, "/tickets/t-1/attachments/");
    transport.respond_json(HttpMethod::Get, "/tickets/t-1/attachments/", 200, &json!([]));
    transport.respond(
        HttpMethod::Delete,
        "/tickets/t-1/attachments/3/",
        helpdesk_client_core::HttpResponse::text(204, ""),
    );

    app.delete_attachment("t-1", "3", true).await;

    assert_eq!(transport.count(HttpMethod::Delete, "/tickets/t-1/attachments/3/"), 1);
    let state = app.state();
    assert_eq!(state.detail.map(|detail| detail.attachments.len()), Some(0));
    assert_eq!(
        state.notice.map(|notice| notice.text).as_deref(),
        Some(NOTICE_ATTACHMENT_DELETED)
    );
    Ok(())
}

#[tokio::test]
async fn declined_delete_sends_nothing_and_keeps_attachments() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    script_detail(
        transport(&app),
        &json!([{"id": 3, "filename": "log.txt", "filesize": 10}]),
    );
    app.view_ticket("t-1").await;
    let before = app.state();
    transport(&app).clear_requests();

    app.delete_attachment("t-1", "3", false).await;

    assert!(transport(&app).requests().is_empty());
    assert_eq!(app.state().detail, before.detail);
    assert_eq!(app.state().detail_revision, before.detail_revision);
    Ok(())
}

#[tokio::test]
async fn sent_message_reloads_detail() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    let transport = transport(&app);
    script_detail(transport, &json!([]));
    transport.respond_json(
        HttpMethod::Post,
        "/tickets/t-1/messages/",
        201,
        &json!({"id": 2, "message": "Any update?"}),
    );

    app.submit_message("t-1", "Any update?").await;

    assert_eq!(transport.count(HttpMethod::Get, "/tickets/t-1/"), 1);
    assert_eq!(transport.count(HttpMethod::Get, "/tickets/t-1/messages/"), 1);
    assert!(app.state().detail_open);
    Ok(())
}

#[tokio::test]
async fn logout_always_returns_to_login() -> anyhow::Result<()> {
    let app = signed_in_app()?;
    transport(&app).respond_json(HttpMethod::Post, "/users/auth/logout/", 500, &json!({}));
    app.logout().await;
    let state = app.state();
    assert_eq!(state.page, Page::Login);
    assert_eq!(app.client().session(), Session::default());
    assert_eq!(
        state.notice.map(|notice| (notice.text, notice.kind)),
        Some(("Logged out successfully".to_string(), NoticeKind::Info))
    );
    Ok(())
}
