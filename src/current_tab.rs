use std::future::ready;
use std::future::Ready;
use std::sync::Arc;

use actix_web::web;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use serde::Deserialize;
use uuid::Uuid;

use crate::tabs::Tab;
use crate::tabs::TabRegistry;
use crate::utils::error_500;

/// `?tab=<uuid>`, carried by every link, form action and redirect of a page
#[derive(Deserialize)]
struct TabQuery {
    tab: Option<Uuid>,
}

/// The tab a request belongs to, named by its `tab` query parameter.
///
/// A request without one (a fresh visit, or a reload of the bare `/`) opens a
/// new tab in the initial state. An unknown id, e.g. of an expired tab, is
/// reopened in the initial state. A malformed id is a 400.
pub struct CurrentTab(pub Arc<Tab>);

impl FromRequest for CurrentTab {
    type Error = actix_web::Error;

    // no I/O involved, so the future is ready immediately
    type Future = Ready<Result<CurrentTab, Self::Error>>;

    fn from_request(
        req: &HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(current_tab(req))
    }
}

fn current_tab(req: &HttpRequest) -> Result<CurrentTab, actix_web::Error> {
    let registry = req
        .app_data::<web::Data<TabRegistry>>()
        .ok_or_else(|| error_500("tab registry missing from app data"))?;
    let query = web::Query::<TabQuery>::from_query(req.query_string())?;
    Ok(CurrentTab(registry.get_or_create(query.tab)))
}
