use std::fmt::Display;
use std::sync::Arc;
use std::sync::Weak;

use serde::Serialize;
use tokio::sync::watch;

/// The placeholder views reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Dashboard,
    Agent,
    Upload,
    Analytics,
    JobMarket,
    Profiles,
    Paths,
    Timeline,
}

impl View {
    /// In sidebar order
    pub const ALL: [View; 8] = [
        View::Dashboard,
        View::Agent,
        View::Upload,
        View::Analytics,
        View::JobMarket,
        View::Profiles,
        View::Paths,
        View::Timeline,
    ];

    /// Rendered whenever a lookup fails
    pub const DEFAULT: View = View::Dashboard;

    pub fn id(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Agent => "agent",
            View::Upload => "upload",
            View::Analytics => "analytics",
            View::JobMarket => "job-market",
            View::Profiles => "profiles",
            View::Paths => "paths",
            View::Timeline => "timeline",
        }
    }

    /// Sidebar label
    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Agent => "AI Agent",
            View::Upload => "Upload Profile",
            View::Analytics => "Analytics",
            View::JobMarket => "Job Market",
            View::Profiles => "Similar Profiles",
            View::Paths => "Path Planner",
            View::Timeline => "Timeline",
        }
    }

    pub fn parse(id: &str) -> Result<Self, String> {
        View::ALL
            .into_iter()
            .find(|view| view.id() == id)
            .ok_or(format!("Unknown view: {id:?}"))
    }

    /// Like `parse`, but never fails: unknown ids resolve to `View::DEFAULT`
    pub fn lookup(id: &str) -> Self {
        View::parse(id).unwrap_or_else(|e| {
            tracing::debug!(error.message = %e, "falling back to {}", View::DEFAULT);
            View::DEFAULT
        })
    }
}

impl Display for View {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShellState {
    pub active_view: View,
    /// Presentation only; never affects `active_view`
    pub sidebar_open: bool,
    /// Whether the landing waitlist screen covers the shell
    pub show_waitlist: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    /// `false` bypasses the waitlist screen from the start
    pub start_on_waitlist: bool,
    /// A navigation request also dismisses the waitlist screen
    pub dismiss_on_navigate: bool,
    /// The waitlist screen offers its own "skip to preview"
    pub allow_skip: bool,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            start_on_waitlist: true,
            dismiss_on_navigate: true,
            allow_skip: true,
        }
    }
}

/// Owner of `ShellState`. Other components never touch the shell directly:
/// they hold a `Navigator` and ask for a view change, while anything that
/// renders the shell either reads `state` or holds a `subscribe` receiver.
///
/// Updates go through a `watch` channel, so every receiver sees a change as
/// soon as `navigate`/`select` returns.
pub struct NavigationShell {
    state: Arc<watch::Sender<ShellState>>,
    options: ShellOptions,
}

impl NavigationShell {
    pub fn new(options: ShellOptions) -> Self {
        let (state, _) = watch::channel(ShellState {
            active_view: View::DEFAULT,
            sidebar_open: true,
            show_waitlist: options.start_on_waitlist,
        });
        Self {
            state: Arc::new(state),
            options,
        }
    }

    pub fn options(&self) -> ShellOptions { self.options }

    pub fn state(&self) -> ShellState { *self.state.borrow() }

    pub fn subscribe(&self) -> watch::Receiver<ShellState> { self.state.subscribe() }

    /// A handle for requesting view changes from elsewhere. Handles do not keep
    /// the shell alive; once it is gone their requests are dropped.
    pub fn navigator(&self) -> Navigator {
        Navigator {
            state: Arc::downgrade(&self.state),
            dismiss_on_navigate: self.options.dismiss_on_navigate,
        }
    }

    /// A sidebar menu click. Does not touch the waitlist screen.
    pub fn select(
        &self,
        id: &str,
    ) -> View {
        let view = View::lookup(id);
        self.state.send_modify(|s| s.active_view = view);
        view
    }

    /// Returns whether the sidebar is now open
    pub fn toggle_sidebar(&self) -> bool {
        self.state.send_modify(|s| s.sidebar_open = !s.sidebar_open);
        self.state.borrow().sidebar_open
    }

    /// The "skip to product preview" affordance. Returns `false` (and changes
    /// nothing) when skipping is switched off.
    pub fn skip_waitlist(&self) -> bool {
        if !self.options.allow_skip {
            return false;
        }
        self.state.send_modify(|s| s.show_waitlist = false);
        true
    }
}

/// Emitter side of the navigation signal. Cheap to clone; any number of
/// components may hold one.
#[derive(Clone)]
pub struct Navigator {
    state: Weak<watch::Sender<ShellState>>,
    dismiss_on_navigate: bool,
}

impl Navigator {
    /// Fire-and-forget request to show `id`. Returns the view that is now
    /// active, or `None` if the shell no longer exists.
    #[tracing::instrument(name = "Navigation requested", skip(self))]
    pub fn navigate(
        &self,
        id: &str,
    ) -> Option<View> {
        let state = self.state.upgrade()?;
        let view = View::lookup(id);
        let dismiss = self.dismiss_on_navigate;
        state.send_modify(|s| {
            s.active_view = view;
            if dismiss {
                s.show_waitlist = false;
            }
        });
        Some(view)
    }
}
