use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use uuid::Uuid;

use crate::configuration::TabSettings;
use crate::navigation::NavigationShell;
use crate::navigation::ShellOptions;
use crate::submission::FormOptions;
use crate::submission::WaitlistForm;
use crate::waitlist_client::WaitlistClient;

/// Everything one browser tab session owns: its waitlist form and its shell.
/// Nothing here outlives the process.
pub struct Tab {
    pub id: Uuid,
    pub form: WaitlistForm,
    pub shell: NavigationShell,
    last_seen: Mutex<DateTime<Utc>>,
}

impl Tab {
    fn last_seen_guard(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.last_seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_seen(&self) -> DateTime<Utc> { *self.last_seen_guard() }

    /// `path` within this tab, e.g. `/waitlist?tab=<id>`
    pub fn url(
        &self,
        path: &str,
    ) -> String {
        format!("{path}?tab={}", self.id)
    }

    /// Where every action of this tab redirects to
    pub fn home(&self) -> String { self.url("/") }

    fn touch(&self) { *self.last_seen_guard() = Utc::now(); }
}

/// In-memory tab sessions, keyed by the id each page carries in its URLs. All
/// forms share one `WaitlistClient` (and thus one connection pool).
pub struct TabRegistry {
    tabs: Mutex<HashMap<Uuid, Arc<Tab>>>,
    client: Arc<WaitlistClient>,
    form_options: FormOptions,
    shell_options: ShellOptions,
}

impl TabRegistry {
    pub fn new(
        client: WaitlistClient,
        form_options: FormOptions,
        shell_options: ShellOptions,
    ) -> Self {
        Self {
            tabs: Mutex::new(HashMap::new()),
            client: Arc::new(client),
            form_options,
            shell_options,
        }
    }

    fn tabs(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<Tab>>> {
        self.tabs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize { self.tabs().len() }

    pub fn is_empty(&self) -> bool { self.tabs().is_empty() }

    /// Return the tab for `id`, creating it (under that id, or a new one) if
    /// it is unknown, e.g. after it was expired. Marks the tab as seen.
    pub fn get_or_create(
        &self,
        id: Option<Uuid>,
    ) -> Arc<Tab> {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let tab = self
            .tabs()
            .entry(id)
            .or_insert_with(|| {
                tracing::info!(tab_id = %id, "opening tab session");
                Arc::new(Tab {
                    id,
                    form: WaitlistForm::new(self.client.clone(), self.form_options),
                    shell: NavigationShell::new(self.shell_options),
                    last_seen: Mutex::new(Utc::now()),
                })
            })
            .clone();
        tab.touch();
        tab
    }

    /// Drop every tab not seen for at least `idle_for`. Dropping a tab tears
    /// down its form, which cancels any pending revert timer. Returns the
    /// number of tabs dropped.
    pub fn expire_idle(
        &self,
        idle_for: TimeDelta,
    ) -> usize {
        let now = Utc::now();
        let mut tabs = self.tabs();
        let before = tabs.len();
        tabs.retain(|_, tab| now - tab.last_seen() < idle_for);
        before - tabs.len()
    }
}

// same shape as a queue worker: do one pass, sleep, repeat

async fn expire_tabs_loop(
    registry: &TabRegistry,
    idle_for: TimeDelta,
    settings: &TabSettings,
) -> Result<(), anyhow::Error> {
    loop {
        let expired = registry.expire_idle(idle_for);
        if expired > 0 {
            tracing::info!(expired, remaining = registry.len(), "expired idle tabs");
        }
        tokio::time::sleep(settings.sweep_interval()).await;
    }
}

/// To be run as a separate worker, alongside the API
pub async fn init_expiry_worker(
    registry: Arc<TabRegistry>,
    settings: TabSettings,
) -> Result<(), anyhow::Error> {
    let idle_for = TimeDelta::from_std(settings.idle_timeout())?;
    expire_tabs_loop(&registry, idle_for, &settings).await
}
