use std::fmt::Debug;
use std::time::Duration;

use anyhow::Context;
use reqwest::header::ACCEPT;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::NewSignup;
use crate::utils::error_chain_fmt;

/// Shown when the service rejects a signup without saying why
pub const REJECTED_FALLBACK: &str = "Something went wrong. Please try again.";

/// Shown when no response could be obtained at all
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";

/// How the signup is encoded in the request body
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    Json,
    Form,
}

/// The `Display` impl of each variant is the message shown to the user.
#[derive(thiserror::Error)]
pub enum SubmitError {
    /// The request reached the service, and the service said no
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Network error. Please check your connection and try again.")]
    Transport(#[source] reqwest::Error),
}

impl Debug for SubmitError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Only the `error` field of a rejection body is of interest
#[derive(Deserialize)]
struct RejectionBody {
    error: Option<String>,
}

/// Client for the third-party waitlist collection endpoint. Holds a single
/// `reqwest::Client` so that connections are reused across submissions; share
/// it (via `Arc` or `web::Data`) rather than building one per form.
#[derive(Debug)]
pub struct WaitlistClient {
    http_client: Client,
    endpoint: Url,
    payload_format: PayloadFormat,
}

impl WaitlistClient {
    pub fn new(
        endpoint: &str,
        payload_format: PayloadFormat,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid waitlist endpoint: {endpoint:?}"))?;
        // without a timeout, a hanging service would leave the form submitting forever
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build http client")?;
        Ok(Self {
            http_client,
            endpoint,
            payload_format,
        })
    }

    /// Issue exactly one request. Any 2xx is success; nothing is retried.
    #[tracing::instrument(
        name = "Sending signup to waitlist service",
        skip(self, signup),
        fields(
            waitlist_email = %signup.email,
            http.status = tracing::field::Empty,
        )
    )]
    pub async fn submit(
        &self,
        signup: &NewSignup,
    ) -> Result<(), SubmitError> {
        let request = self
            .http_client
            .post(self.endpoint.clone())
            // otherwise some services answer with an html page instead of `{"error": ...}`
            .header(ACCEPT, "application/json");
        let request = match self.payload_format {
            PayloadFormat::Json => request.json(signup),
            PayloadFormat::Form => request.form(signup),
        };

        let response = request.send().await.map_err(SubmitError::Transport)?;
        let status = response.status();
        tracing::Span::current().record("http.status", status.as_u16());

        if status.is_success() {
            return Ok(());
        }

        // a missing, non-json or error-less body all end up as the fallback
        let message = response
            .json::<RejectionBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| REJECTED_FALLBACK.to_owned());

        Err(SubmitError::Rejected { status, message })
    }
}
