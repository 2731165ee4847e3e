use std::fmt::Debug;
use std::fmt::Display;

use outcome_os::configuration::get_configuration;
use outcome_os::startup::Application;
use outcome_os::tabs::init_expiry_worker;
use outcome_os::telemetry::get_subscriber;
use outcome_os::telemetry::init_subscriber;
use tokio::task::JoinError;

fn report_exit(
    name: &str,
    outcome: Result<Result<(), impl Debug + Display>, JoinError>,
) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{name} exited gracefully")
        }

        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain=?e,
                error.message=%e,
                "{name} failed (inner)"
            )
        }

        Err(e) => {
            tracing::error!(
                error.cause_chain=?e,
                error.message=%e,
                "{name} failed (outer)"
            )
        }
    }
}

/// Initialise telemetry, load config, and start the server and the tab expiry
/// worker. Whichever stops first takes the other down with it.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("outcome-os", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;

    let app = Application::build(cfg.clone()).await?;
    tracing::info!(port = app.get_port(), "listening");
    let expiry_worker = init_expiry_worker(app.tabs(), cfg.tabs.clone());

    let server_thread = tokio::spawn(app.run_until_stopped());
    let expiry_worker_thread = tokio::spawn(expiry_worker);

    tokio::select! {
        o = server_thread => { report_exit("API", o) },
        o = expiry_worker_thread => { report_exit("Background tab expiry worker", o) },
    }

    Ok(())
}
