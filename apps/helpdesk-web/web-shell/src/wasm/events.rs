use helpdesk_client_core::{FilePart, SelectedFiles};
use helpdesk_client_core::app::CONFIRM_DELETE_ATTACHMENT;
use helpdesk_client_core::auth::RegisterForm;
use helpdesk_client_core::models::CreateTicketRequest;
use helpdesk_ui::{FilePreviewView, ids, render_file_preview};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, EventTarget, File};

use super::*;

fn listen(
    target: &EventTarget,
    event_name: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), String> {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
    target
        .add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
        .map_err(|_| format!("failed to listen for {event_name}"))?;
    EVENT_HANDLERS.with(|slot| slot.borrow_mut().push(callback));
    Ok(())
}

fn listen_by_id(
    id: &str,
    event_name: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), String> {
    listen(&element(id)?, event_name, handler)
}

/// Runs a synchronous app action from a click.
fn on_click(id: &str, action: fn(&WebApp)) -> Result<(), String> {
    listen_by_id(id, "click", move |event| {
        event.prevent_default();
        if let Some(app) = current_app() {
            action(&app);
        }
    })
}

fn read_or_warn<T>(result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(%error, "failed to read form input");
            None
        }
    }
}

pub(super) fn install_event_handlers() -> Result<(), String> {
    if EVENT_HANDLERS.with(|slot| !slot.borrow().is_empty()) {
        return Ok(());
    }

    install_auth_handlers()?;
    install_dashboard_handlers()?;
    install_create_ticket_handlers()?;
    install_detail_handlers()?;

    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    listen(&window, "click", close_modal_on_backdrop_click)
}

fn install_auth_handlers() -> Result<(), String> {
    listen_by_id(ids::LOGIN_FORM_ID, "submit", |event| {
        event.prevent_default();
        let Some((email, password)) = read_or_warn(
            input_value(ids::LOGIN_EMAIL_ID)
                .and_then(|email| Ok((email, input_value(ids::LOGIN_PASSWORD_ID)?))),
        ) else {
            return;
        };
        spawn_with_app(move |app| async move {
            app.submit_login(&email, &password).await;
        });
    })?;

    listen_by_id(ids::REGISTER_FORM_ID, "submit", |event| {
        event.prevent_default();
        let Some(form) = read_or_warn(read_register_form()) else {
            return;
        };
        spawn_with_app(move |app| async move {
            app.submit_register(form).await;
        });
    })?;

    on_click(ids::SHOW_REGISTER_ID, |app| app.show_register())?;
    on_click(ids::SHOW_LOGIN_ID, |app| app.show_login())
}

fn read_register_form() -> Result<RegisterForm, String> {
    Ok(RegisterForm {
        email: input_value(ids::REGISTER_EMAIL_ID)?,
        username: input_value(ids::REGISTER_USERNAME_ID)?,
        first_name: input_value(ids::REGISTER_FIRST_NAME_ID)?,
        last_name: input_value(ids::REGISTER_LAST_NAME_ID)?,
        password: input_value(ids::REGISTER_PASSWORD_ID)?,
        password_confirmation: input_value(ids::REGISTER_PASSWORD2_ID)?,
    })
}

fn install_dashboard_handlers() -> Result<(), String> {
    listen_by_id(ids::LOGOUT_BUTTON_ID, "click", |_event| {
        spawn_with_app(|app| async move {
            app.logout().await;
        });
    })?;

    listen_by_id(ids::CREATE_TICKET_BUTTON_ID, "click", |_event| {
        spawn_with_app(|app| async move {
            app.open_create_ticket().await;
        });
    })?;

    // Cards are re-rendered on every reload, so clicks are delegated.
    listen_by_id(ids::TICKETS_LIST_ID, "click", |event| {
        let Some(ticket_id) = closest_from_event(&event, TICKET_CARD_SELECTOR)
            .and_then(|card| card.get_attribute(ids::DATA_TICKET_ID))
        else {
            return;
        };
        spawn_with_app(move |app| async move {
            app.view_ticket(&ticket_id).await;
        });
    })
}

fn install_create_ticket_handlers() -> Result<(), String> {
    on_click(ids::CLOSE_CREATE_MODAL_ID, |app| app.close_create_ticket())?;
    on_click(ids::CANCEL_CREATE_ID, |app| app.close_create_ticket())?;

    listen_by_id(ids::TICKET_FILES_ID, "change", |_event| {
        let previews: Vec<FilePreviewView> = selected_files(ids::TICKET_FILES_ID)
            .iter()
            .map(|file| FilePreviewView::new(file.name(), file.size() as i64))
            .collect();
        if let Err(error) = set_html(ids::FILE_PREVIEW_LIST_ID, &render_file_preview(&previews)) {
            tracing::warn!(%error, "failed to render file preview");
        }
    })?;

    listen_by_id(ids::CREATE_FORM_ID, "submit", |event| {
        event.prevent_default();
        let Some(request) = read_or_warn(read_create_ticket_form()) else {
            return;
        };
        let files = selected_files(ids::TICKET_FILES_ID);
        spawn_with_app(move |app| async move {
            let files = read_files(files).await;
            app.submit_create_ticket(request, files).await;
        });
    })
}

fn read_create_ticket_form() -> Result<CreateTicketRequest, String> {
    let order = select_value(ids::TICKET_ORDER_ID)?;
    Ok(CreateTicketRequest {
        topic: input_value(ids::TICKET_TOPIC_ID)?,
        description: textarea_value(ids::TICKET_DESCRIPTION_ID)?,
        order: Some(order).filter(|order| !order.is_empty()),
    })
}

fn install_detail_handlers() -> Result<(), String> {
    on_click(ids::CLOSE_DETAIL_MODAL_ID, |app| app.close_detail())?;

    // The message form and attachment controls live inside re-rendered
    // detail markup; both submits and clicks are delegated to the container.
    listen_by_id(ids::DETAIL_CONTENT_ID, "submit", |event| {
        let Some(form) = closest_from_event(&event, &format!("#{}", ids::ADD_MESSAGE_FORM_ID))
        else {
            return;
        };
        event.prevent_default();
        let Some(ticket_id) = form.get_attribute(ids::DATA_TICKET_ID) else {
            return;
        };
        let Some(text) = read_or_warn(textarea_value(ids::NEW_MESSAGE_ID)) else {
            return;
        };
        spawn_with_app(move |app| async move {
            app.submit_message(&ticket_id, &text).await;
        });
    })?;

    listen_by_id(ids::DETAIL_CONTENT_ID, "click", |event| {
        if let Some(button) = closest_from_event(&event, DELETE_ATTACHMENT_SELECTOR) {
            delete_attachment_clicked(&button);
        } else if let Some(button) =
            closest_from_event(&event, &format!("#{}", ids::UPLOAD_ATTACHMENTS_ID))
        {
            upload_clicked(&button);
        }
    })
}

fn delete_attachment_clicked(button: &Element) {
    let (Some(ticket_id), Some(attachment_id)) = (
        button.get_attribute(ids::DATA_TICKET_ID),
        button.get_attribute(ids::DATA_ATTACHMENT_ID),
    ) else {
        return;
    };
    let confirmed = web_sys::window()
        .and_then(|window| window.confirm_with_message(CONFIRM_DELETE_ATTACHMENT).ok())
        .unwrap_or(false);
    spawn_with_app(move |app| async move {
        app.delete_attachment(&ticket_id, &attachment_id, confirmed).await;
    });
}

fn upload_clicked(button: &Element) {
    let Some(ticket_id) = button.get_attribute(ids::DATA_TICKET_ID) else {
        return;
    };
    let files = selected_files(ids::NEW_ATTACHMENT_ID);
    spawn_with_app(move |app| async move {
        let files = read_files(files).await;
        app.add_attachments(&ticket_id, files).await;
    });
}

/// Clicking the dimmed backdrop (the modal element itself) closes it.
fn close_modal_on_backdrop_click(event: web_sys::Event) {
    let Some(target) = event_target_element(&event) else {
        return;
    };
    if !target.class_list().contains(ids::MODAL_CLASS) {
        return;
    }
    let Some(app) = current_app() else {
        return;
    };
    match target.id().as_str() {
        ids::CREATE_MODAL_ID => app.close_create_ticket(),
        ids::DETAIL_MODAL_ID => app.close_detail(),
        _ => {}
    }
}

fn selected_files(input_id: &str) -> Vec<File> {
    let Some(list) = input(input_id).ok().and_then(|input| input.files()) else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|index| list.get(index)).collect()
}

/// Reads every file into memory; a file the browser refuses to read is kept
/// by name so the upload reports it as failed.
async fn read_files(files: Vec<File>) -> SelectedFiles {
    let mut selected = SelectedFiles::default();
    for file in files {
        let name = file.name();
        match JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => {
                let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                let content_type = Some(file.type_()).filter(|value| !value.is_empty());
                selected
                    .parts
                    .push(FilePart::attachment(name, content_type, bytes));
            }
            Err(_) => {
                tracing::warn!(file = %name, "failed to read selected file");
                selected.unreadable.push(name);
            }
        }
    }
    selected
}
