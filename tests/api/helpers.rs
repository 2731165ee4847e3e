use once_cell::sync::Lazy;
use outcome_os::configuration::get_configuration;
use outcome_os::configuration::Settings;
use outcome_os::startup::Application;
use outcome_os::telemetry::get_subscriber;
use outcome_os::telemetry::init_subscriber;
use uuid::Uuid;
use wiremock::MockServer;

/// Initialise the tracing subscriber once per test binary.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the two sinks are different closure types, hence two arms
    match std::env::var("TEST_LOG") {
        Ok(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::stdout);
            init_subscriber(subscriber).expect("init test subscriber");
        }
        Err(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::sink);
            init_subscriber(subscriber).expect("init test subscriber");
        }
    };
});

pub struct TestApp {
    pub addr: String,
    /// Stands in for the third-party waitlist service
    pub waitlist_server: MockServer,
    /// Keeps cookies (and with them flash messages), like a browser
    pub api_client: reqwest::Client,
    /// The tab every request below belongs to
    pub tab: Uuid,
}

impl TestApp {
    /// Absolute url of `path` in this app's tab
    pub fn tab_url(
        &self,
        path: &str,
    ) -> String {
        format!("{}{path}?tab={}", self.addr, self.tab)
    }

    /// Where the tab's actions redirect to
    pub fn home(&self) -> String { format!("/?tab={}", self.tab) }

    /// A second browser, with its own cookie jar
    pub fn other_browser(&self) -> reqwest::Client { client() }

    pub async fn post_waitlist(
        &self,
        body: &[(&str, &str)],
    ) -> reqwest::Response {
        self.api_client
            .post(self.tab_url("/waitlist"))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    /// The form state of `tab`, as JSON
    pub async fn get_waitlist_status_of(
        &self,
        tab: Uuid,
    ) -> serde_json::Value {
        self.api_client
            .get(format!("{}/waitlist/status?tab={tab}", self.addr))
            .send()
            .await
            .expect("execute request")
            .json()
            .await
            .expect("status is json")
    }

    pub async fn get_waitlist_status(&self) -> serde_json::Value {
        self.get_waitlist_status_of(self.tab).await
    }

    pub async fn get_landing(&self) -> reqwest::Response {
        self.api_client
            .get(self.tab_url("/"))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_landing_html(&self) -> String {
        self.get_landing().await.text().await.unwrap()
    }

    /// `GET /` without a tab id, i.e. a fresh visit or a reload of the bare url
    pub async fn get_fresh_landing_html(&self) -> String {
        self.api_client
            .get(format!("{}/", self.addr))
            .send()
            .await
            .expect("execute request")
            .text()
            .await
            .unwrap()
    }

    /// `POST` without a body, e.g. `/sidebar`
    pub async fn post_empty(
        &self,
        path: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(self.tab_url(path))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn post_navigate(
        &self,
        view: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(self.tab_url("/navigate"))
            .form(&[("view", view)])
            .send()
            .await
            .expect("execute request")
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        // we want to see the 303s, not follow them
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap()
}

pub fn check_redirect(
    resp: &reqwest::Response,
    location: &str,
) {
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), location);
}

/// Spawn the app with the default (local) configuration, pointed at a fresh
/// mock waitlist service
pub async fn spawn_app() -> TestApp { spawn_app_with(|_| {}).await }

/// Like `spawn_app`, but `customise` may change the configuration first
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let waitlist_server = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().expect("read configuration");
        // port 0: the OS picks a free one
        cfg.application.port = 0;
        cfg.application.secure_cookies = false;
        cfg.waitlist.endpoint = format!("{}/f/waitlist", waitlist_server.uri());
        cfg.waitlist.timeout_milliseconds = 1000;
        customise(&mut cfg);
        cfg
    };

    let app = Application::build(cfg).await.expect("build app");
    let addr = format!("http://127.0.0.1:{}", app.get_port());
    tokio::spawn(app.run_until_stopped());

    TestApp {
        addr,
        waitlist_server,
        api_client: client(),
        tab: Uuid::new_v4(),
    }
}
