use htmlescape::encode_minimal;

use crate::navigation::View;
use crate::tabs::Tab;

/// One line of placeholder copy per view; none of them are built yet
fn blurb(view: View) -> &'static str {
    match view {
        View::Dashboard => "Welcome. Get started by uploading your profile.",
        View::Agent => "Ask anything and get data-backed answers.",
        View::Upload => "Upload a transcript or resume to build your profile.",
        View::Analytics => "How your profile compares with real outcomes.",
        View::JobMarket => "Demand and salary trends for the roles you are aiming at.",
        View::Profiles => "People with similar backgrounds, and where they ended up.",
        View::Paths => "Candidate paths towards your goal, ranked by likelihood.",
        View::Timeline => "Deadlines and milestones for your chosen path.",
    }
}

pub(super) fn render(
    tab: &Tab,
    notices: &str,
) -> String {
    let shell = tab.shell.state();
    let mut menu = String::new();
    for view in View::ALL {
        let current = match view == shell.active_view {
            true => r#" aria-current="page""#,
            false => "",
        };
        // a collapsed sidebar keeps the buttons, just not the labels
        let label = match shell.sidebar_open {
            true => view.label(),
            false => "",
        };
        menu.push_str(&format!(
            r#"
        <li>
          <form action="{action}" method="post">
            <button type="submit" title="{title}"{current}>{label}</button>
          </form>
        </li>"#,
            action = tab.url(&format!("/views/{}", view.id())),
            title = view.label(),
        ));
    }

    let toggle = match shell.sidebar_open {
        true => "&lt;",
        false => "&gt;",
    };

    // the dashboard points onwards to the upload view via the navigation signal
    let next_step = match shell.active_view {
        View::Dashboard => format!(
            r#"
      <form action="{}" method="post">
        <input type="hidden" name="view" value="{}" />
        <button type="submit">{}</button>
      </form>"#,
            tab.url("/navigate"),
            View::Upload.id(),
            View::Upload.label()
        ),
        _ => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>OutcomeOS - {title}</title>
  </head>
  <body>
    <nav data-open="{open}">
      <span>OutcomeOS</span>
      <form action="{sidebar}" method="post">
        <button type="submit">{toggle}</button>
      </form>
      <ol>{menu}
      </ol>
    </nav>
    <main id="{id}">
      {notices}
      <h2>{title}</h2>
      <p>{blurb}</p>{next_step}
    </main>
  </body>
</html>"#,
        sidebar = tab.url("/sidebar"),
        open = shell.sidebar_open,
        id = shell.active_view.id(),
        title = shell.active_view.label(),
        blurb = encode_minimal(blurb(shell.active_view)),
    )
}
