use helpdesk_client_core::Page;
use helpdesk_client_core::app::NOTICE_DISMISS_AFTER_MS;
use helpdesk_ui::ids;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::render_plan::NoticeChange;

use super::*;

pub(super) fn document() -> Result<Document, String> {
    web_sys::window()
        .ok_or_else(|| "window is unavailable".to_string())?
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

pub(super) fn element(id: &str) -> Result<Element, String> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| format!("missing #{id}"))
}

fn typed<T: JsCast>(id: &str) -> Result<T, String> {
    element(id)?
        .dyn_into::<T>()
        .map_err(|_| format!("#{id} has an unexpected element type"))
}

pub(super) fn input(id: &str) -> Result<HtmlInputElement, String> {
    typed(id)
}

pub(super) fn input_value(id: &str) -> Result<String, String> {
    Ok(input(id)?.value())
}

pub(super) fn textarea_value(id: &str) -> Result<String, String> {
    Ok(typed::<HtmlTextAreaElement>(id)?.value())
}

pub(super) fn select_value(id: &str) -> Result<String, String> {
    Ok(typed::<HtmlSelectElement>(id)?.value())
}

pub(super) fn set_html(id: &str, html: &str) -> Result<(), String> {
    element(id)?.set_inner_html(html);
    Ok(())
}

fn set_hidden(id: &str, hidden: bool) -> Result<(), String> {
    element(id)?
        .class_list()
        .toggle_with_force(ids::HIDDEN_CLASS, hidden)
        .map(|_| ())
        .map_err(|_| format!("failed to toggle #{id}"))
}

/// Injects the stylesheet and the static page skeleton into `<body>`.
pub(super) fn mount_shell_markup() -> Result<(), String> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    if document.get_element_by_id(STYLE_ELEMENT_ID).is_none() {
        let style = document
            .create_element("style")
            .map_err(|_| "failed to create style element".to_string())?;
        style.set_id(STYLE_ELEMENT_ID);
        style.set_text_content(Some(helpdesk_ui::styles()));
        let head = document
            .head()
            .ok_or_else(|| "document head is unavailable".to_string())?;
        head.append_child(&style)
            .map_err(|_| "failed to append style element".to_string())?;
    }

    if document.get_element_by_id(ids::APP_ROOT_ID).is_none() {
        body.insert_adjacent_html("beforeend", &helpdesk_ui::render_shell())
            .map_err(|_| "failed to mount shell markup".to_string())?;
    }
    Ok(())
}

pub(super) fn apply_render_plan(plan: RenderPlan) -> Result<(), String> {
    set_hidden(ids::LOGIN_PAGE_ID, plan.page != Page::Login)?;
    set_hidden(ids::REGISTER_PAGE_ID, plan.page != Page::Register)?;
    set_hidden(ids::DASHBOARD_PAGE_ID, plan.page != Page::Dashboard)?;
    set_hidden(ids::CREATE_MODAL_ID, !plan.create_modal_open)?;
    set_hidden(ids::DETAIL_MODAL_ID, !plan.detail_open)?;
    set_hidden(ids::LOADING_SPINNER_ID, !plan.loading)?;
    element(ids::USER_NAME_ID)?.set_text_content(Some(&plan.user_name));

    if let Some(html) = &plan.tickets_html {
        set_html(ids::TICKETS_LIST_ID, html)?;
    }
    if let Some(html) = &plan.order_options_html {
        set_html(ids::TICKET_ORDER_ID, html)?;
    }
    if let Some(html) = &plan.detail_html {
        set_html(ids::DETAIL_CONTENT_ID, html)?;
    }
    if plan.reset_forms {
        reset_forms()?;
    }

    match plan.notice {
        NoticeChange::Unchanged => {}
        NoticeChange::Hide => {
            let alert = element(ids::ALERT_ID)?;
            alert.set_class_name(&format!("{ALERT_BASE_CLASS} {}", ids::HIDDEN_CLASS));
            alert.set_text_content(None);
        }
        NoticeChange::Show(notice) => {
            let alert = element(ids::ALERT_ID)?;
            alert.set_class_name(&format!("{ALERT_BASE_CLASS} {}", notice.kind.as_str()));
            alert.set_text_content(Some(&notice.text));
            let seq = notice.seq;
            gloo_timers::callback::Timeout::new(NOTICE_DISMISS_AFTER_MS, move || {
                if let Some(app) = current_app() {
                    app.dismiss_notice(seq);
                }
            })
            .forget();
        }
    }
    Ok(())
}

/// Clears the auth and create-ticket forms after a session change or a
/// successful ticket creation.
pub(super) fn reset_forms() -> Result<(), String> {
    for id in [ids::LOGIN_FORM_ID, ids::REGISTER_FORM_ID, ids::CREATE_FORM_ID] {
        typed::<HtmlFormElement>(id)?.reset();
    }
    set_html(ids::FILE_PREVIEW_LIST_ID, "")
}

/// Nearest ancestor (or self) of the event target matching `selector`.
pub(super) fn closest_from_event(event: &web_sys::Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

pub(super) fn event_target_element(event: &web_sys::Event) -> Option<HtmlElement> {
    event.target()?.dyn_into::<HtmlElement>().ok()
}
