use std::net::TcpListener;
use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use actix_web_flash_messages::storage::SessionMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use secrecy::ExposeSecret;
use secrecy::Secret;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::routes::dismiss_waitlist_error;
use crate::routes::health_check;
use crate::routes::join_waitlist;
use crate::routes::landing;
use crate::routes::navigate;
use crate::routes::select_view;
use crate::routes::skip_waitlist;
use crate::routes::toggle_sidebar;
use crate::routes::waitlist_status;
use crate::tabs::TabRegistry;

/// Wrapper for actix's `Server` with access to the bound port and the tab
/// registry (which the expiry worker also needs)
pub struct Application {
    port: u16,
    server: Server,
    tabs: Arc<TabRegistry>,
}

impl Application {
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;
        // port 0 lets the OS pick one; this is the one it picked
        let port = listener.local_addr()?.port();

        let tabs = Arc::new(TabRegistry::new(
            cfg.waitlist.client()?,
            cfg.waitlist.form_options(),
            cfg.shell.options(),
        ));

        let server = run(listener, tabs.clone(), &cfg)?;

        Ok(Self { port, server, tabs })
    }

    pub fn get_port(&self) -> u16 { self.port }

    pub fn tabs(&self) -> Arc<TabRegistry> { self.tabs.clone() }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all endpoints.
pub fn run(
    listener: TcpListener,
    tabs: Arc<TabRegistry>,
    cfg: &Settings,
) -> Result<Server, anyhow::Error> {
    let secret_key = signing_key(&cfg.application.hmac_secret)?;
    let secure_cookies = cfg.application.secure_cookies;

    // notices live in the (browser-wide) session; tab state does not
    let msg_framework = FlashMessagesFramework::builder(SessionMessageStore::default()).build();

    // `Data` is an `Arc` internally; `from` reuses ours instead of wrapping again
    let tabs = web::Data::from(tabs);

    // one `App` per worker thread, hence everything captured must be `Clone`
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(msg_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .route("/", web::get().to(landing))
            .route("/health_check", web::get().to(health_check))
            .route("/waitlist", web::post().to(join_waitlist))
            .route("/waitlist/status", web::get().to(waitlist_status))
            .route("/waitlist/dismiss", web::post().to(dismiss_waitlist_error))
            .route("/navigate", web::post().to(navigate))
            .route("/views/{view}", web::post().to(select_view))
            .route("/sidebar", web::post().to(toggle_sidebar))
            .route("/skip", web::post().to(skip_waitlist))
            .app_data(tabs.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// `Key::from` panics below 64 bytes, so check first
fn signing_key(secret: &Secret<String>) -> Result<Key, anyhow::Error> {
    let secret = secret.expose_secret().as_bytes();
    if secret.len() < 64 {
        anyhow::bail!(
            "hmac_secret must be at least 64 bytes long, got {}",
            secret.len()
        );
    }
    Ok(Key::from(secret))
}
