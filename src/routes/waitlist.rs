use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use serde::Deserialize;

use crate::current_tab::CurrentTab;
use crate::submission::SubmitOutcome;
use crate::utils::error_500;
use crate::utils::redirect;

const INVALID_EMAIL: &str = "Please enter a valid email address.";
const ALREADY_SUBMITTING: &str = "A submission is already in progress.";

#[derive(Deserialize)]
pub struct WaitlistFormData {
    email: String,
    /// Absent when the form does not render the field
    stage: Option<String>,
}

/// `POST /waitlist`
///
/// Runs the tab's form through one submission, then redirects back to the
/// tab's `/`, where the outcome is rendered from the form's state.
///
/// # Request example
///
/// ```sh
///     curl -v --data 'email=student%40example.edu&stage=HS+junior' 'http://127.0.0.1:8000/waitlist?tab=67e55044-10b1-426f-9247-bb680e5fe0c8'
/// ```
#[tracing::instrument(
    name = "Joining waitlist",
    skip(form, tab),
    fields(
        tab_id = %tab.0.id,
        waitlist_email = %form.email,
    )
)]
pub async fn join_waitlist(
    form: web::Form<WaitlistFormData>,
    tab: CurrentTab,
) -> Result<HttpResponse, actix_web::Error> {
    let tab = tab.0;
    let home = tab.home();
    let WaitlistFormData { email, stage } = form.0;

    // once sent, a signup is never cancelled: run it on its own task so that a
    // client hanging up does not drop the request half way
    let outcome = tokio::spawn(async move { tab.form.submit(email, stage).await })
        .await
        .map_err(error_500)?;

    match outcome {
        SubmitOutcome::Invalid(_) => FlashMessage::error(INVALID_EMAIL).send(),
        SubmitOutcome::AlreadySubmitting => FlashMessage::info(ALREADY_SUBMITTING).send(),
        // both are rendered from the form itself
        SubmitOutcome::Succeeded | SubmitOutcome::Failed(_) => {}
    }

    Ok(redirect(&home))
}

/// `GET /waitlist/status`
///
/// The tab's form as JSON, e.g.
/// `{"status":"failed","email":"a@b.com","stage":"","error_message":"Email already on list"}`
pub async fn waitlist_status(tab: CurrentTab) -> HttpResponse { HttpResponse::Ok().json(tab.0.form.snapshot()) }

/// `POST /waitlist/dismiss`
///
/// Hide the error message of a failed attempt.
pub async fn dismiss_waitlist_error(tab: CurrentTab) -> HttpResponse {
    tab.0.form.dismiss_error();
    redirect(&tab.0.home())
}
