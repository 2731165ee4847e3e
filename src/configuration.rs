use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::navigation::ShellOptions;
use crate::submission::FormOptions;
use crate::waitlist_client::PayloadFormat;
use crate::waitlist_client::WaitlistClient;

/// Global configuration, loaded from `configuration/*.yaml`. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub waitlist: WaitlistSettings,
    pub shell: ShellSettings,
    pub tabs: TabSettings,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Signs the session cookie that carries flash messages. At least 64
    /// bytes; there is no default, every environment must set one.
    pub hmac_secret: Secret<String>,

    /// Whether cookies carry the `Secure` attribute. Must be `true` behind
    /// https; plain http (local dev, tests) needs `false` or cookies are never
    /// sent back.
    pub secure_cookies: bool,
}

/// The third-party service that collects waitlist emails
#[derive(Deserialize, Clone)]
pub struct WaitlistSettings {
    pub endpoint: String,

    pub payload_format: PayloadFormat,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,

    /// Seconds after a successful signup before the form returns to idle.
    /// Absent means the success state stays until the next submission.
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub auto_revert_seconds: Option<u64>,

    /// Render and send the optional "stage" field
    pub collect_stage: bool,
}

impl WaitlistSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    pub fn client(&self) -> Result<WaitlistClient, anyhow::Error> {
        WaitlistClient::new(&self.endpoint, self.payload_format, self.timeout())
    }

    pub fn form_options(&self) -> FormOptions {
        FormOptions {
            auto_revert: self.auto_revert_seconds.map(Duration::from_secs),
            collect_stage: self.collect_stage,
        }
    }
}

/// Which of the landing-page behaviours are switched on
#[derive(Deserialize, Clone)]
pub struct ShellSettings {
    /// `false` bypasses the waitlist screen entirely
    pub start_on_waitlist: bool,

    /// A navigation request also dismisses the waitlist screen
    pub dismiss_on_navigate: bool,

    /// Offer "skip to product preview" on the waitlist screen
    pub allow_skip: bool,
}

impl ShellSettings {
    pub fn options(&self) -> ShellOptions {
        ShellOptions {
            start_on_waitlist: self.start_on_waitlist,
            dismiss_on_navigate: self.dismiss_on_navigate,
            allow_skip: self.allow_skip,
        }
    }
}

/// In-memory tab sessions
#[derive(Deserialize, Clone)]
pub struct TabSettings {
    /// Tabs not seen for this long are dropped by the expiry worker
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub idle_timeout_seconds: u64,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub sweep_interval_seconds: u64,
}

impl TabSettings {
    pub fn idle_timeout(&self) -> Duration { Duration::from_secs(self.idle_timeout_seconds) }

    pub fn sweep_interval(&self) -> Duration { Duration::from_secs(self.sweep_interval_seconds) }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}. Use `local` or `production`.")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`.
///
/// `base.yaml` is read first, then the file for `APP_ENVIRONMENT` (default
/// `local`), then `APP_`-prefixed env vars, e.g. `APP_APPLICATION__PORT=5001`
/// -> `Settings.application.port`. All fields must be present after merging,
/// otherwise the server does not start.
pub fn get_configuration() -> Result<Settings, anyhow::Error> {
    let cfg_dir = current_dir()?.join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, hence `serde-aux` on numeric fields
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
