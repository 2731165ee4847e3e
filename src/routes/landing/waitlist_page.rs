use htmlescape::encode_attribute;
use htmlescape::encode_minimal;

use crate::submission::Status;
use crate::tabs::Tab;

const SUCCESS: &str = "Successfully joined! Check your email for confirmation.";
const IDLE_HINT: &str = "We'll never spam you. Unsubscribe anytime.";

pub(super) fn render(
    tab: &Tab,
    notices: &str,
) -> String {
    let form = &tab.form;
    let snapshot = form.snapshot();
    let options = form.options();
    let home = tab.home();
    let disabled = match form.controls_disabled() {
        true => " disabled",
        false => "",
    };

    // the page has no script, so it polls by reloading until the form settles
    let refresh = match (snapshot.status, options.auto_revert) {
        (Status::Submitting, _) => format!(r#"<meta http-equiv="refresh" content="1; url={home}" />"#),
        (Status::Succeeded, Some(after)) => format!(
            r#"<meta http-equiv="refresh" content="{}; url={home}" />"#,
            after.as_secs().max(1)
        ),
        _ => String::new(),
    };

    let button = match snapshot.status {
        Status::Submitting => "Joining...",
        Status::Succeeded => "Joined",
        Status::Idle | Status::Failed => "Join Waitlist",
    };

    let stage_input = match options.collect_stage {
        true => format!(
            r#"
      <label>
        Where are you in the journey? (optional)
        <input type="text" name="stage" placeholder="HS junior, aiming for Berkeley CS" value="{}"{disabled} />
      </label>"#,
            encode_attribute(&snapshot.stage)
        ),
        false => String::new(),
    };

    let message = match (&snapshot.status, &snapshot.error_message) {
        (Status::Failed, Some(error)) => format!(
            r#"<p class="error">{}</p>
    <form action="{}" method="post">
      <button type="submit">Dismiss</button>
    </form>"#,
            encode_minimal(error),
            tab.url("/waitlist/dismiss")
        ),
        (Status::Succeeded, _) => format!(r#"<p class="success">{SUCCESS}</p>"#),
        _ => format!(r#"<p class="hint">{IDLE_HINT}</p>"#),
    };

    let skip = match tab.shell.options().allow_skip {
        true => format!(
            r#"<form action="{}" method="post">
      <button type="submit">Skip to product preview</button>
    </form>"#,
            tab.url("/skip")
        ),
        false => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    {refresh}
    <title>OutcomeOS waitlist</title>
  </head>
  <body>
    <h1>OutcomeOS is your career operating system.</h1>
    <p>For ambitious students and families making high-stakes decisions.</p>
    {notices}
    <!-- `required` and `type="email"` let the browser block bad input before it is posted -->
    <form action="{join}" method="post">
      <label>
        Email
        <input type="email" name="email" required placeholder="you@school.edu" value="{email}"{disabled} />
      </label>{stage_input}
      <button type="submit"{disabled}>{button}</button>
    </form>
    {message}
    {skip}
  </body>
</html>"#,
        join = tab.url("/waitlist"),
        email = encode_attribute(&snapshot.email),
    )
}
