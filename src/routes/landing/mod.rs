mod shell_page;
mod waitlist_page;

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;

use crate::current_tab::CurrentTab;

/// `GET /`
///
/// The waitlist screen while the tab's shell says so, otherwise the shell with
/// its active view. Without `?tab=` this is a new tab, so a visit to the bare
/// `/` always starts from the initial state. Flash messages (e.g. a blocked
/// invalid email) are shown once, on whichever page comes next.
#[tracing::instrument(name = "Rendering landing page", skip_all, fields(tab_id = %tab.0.id))]
pub async fn landing(
    tab: CurrentTab,
    flash_messages: IncomingFlashMessages,
) -> HttpResponse {
    let tab = tab.0;

    let mut notices = String::new();
    for msg in flash_messages.iter() {
        notices.push_str(&format!(
            "<p class=\"notice\"><i>{}</i></p>\n",
            htmlescape::encode_minimal(msg.content())
        ));
    }

    let body = match tab.shell.state().show_waitlist {
        true => waitlist_page::render(&tab, &notices),
        false => shell_page::render(&tab, &notices),
    };

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
