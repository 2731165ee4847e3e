use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use serde::Deserialize;

use crate::current_tab::CurrentTab;
use crate::utils::error_chain_fmt;
use crate::utils::redirect;

#[derive(thiserror::Error)]
pub enum NavigationError {
    #[error("Skipping the waitlist is disabled.")]
    SkipDisabled,
}

impl Debug for NavigationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for NavigationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SkipDisabled => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Deserialize)]
pub struct NavigateFormData {
    view: String,
}

/// `POST /navigate`
///
/// The navigation signal: any page may post a view id here. Goes through the
/// tab's `Navigator`, exactly like an in-process emitter would, so it also
/// dismisses the waitlist screen when that is configured.
#[tracing::instrument(name = "Navigating", skip(form, tab), fields(tab_id = %tab.0.id, view = %form.view))]
pub async fn navigate(
    form: web::Form<NavigateFormData>,
    tab: CurrentTab,
) -> HttpResponse {
    // the tab (and so its shell) is alive for the whole request
    tab.0.shell.navigator().navigate(&form.view);
    redirect(&tab.0.home())
}

/// `POST /views/{view}`
///
/// A sidebar menu click. Unknown views select the dashboard.
pub async fn select_view(
    path: web::Path<String>,
    tab: CurrentTab,
) -> HttpResponse {
    let view = tab.0.shell.select(&path.into_inner());
    tracing::debug!(%view, "view selected");
    redirect(&tab.0.home())
}

/// `POST /sidebar`
pub async fn toggle_sidebar(tab: CurrentTab) -> HttpResponse {
    tab.0.shell.toggle_sidebar();
    redirect(&tab.0.home())
}

/// `POST /skip`
///
/// "Skip to product preview" on the waitlist screen.
pub async fn skip_waitlist(tab: CurrentTab) -> Result<HttpResponse, NavigationError> {
    match tab.0.shell.skip_waitlist() {
        true => Ok(redirect(&tab.0.home())),
        false => Err(NavigationError::SkipDisabled),
    }
}
