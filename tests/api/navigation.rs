use crate::helpers::check_redirect;
use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;

#[tokio::test]
async fn landing_starts_on_waitlist() {
    let app = spawn_app().await;
    let html = app.get_landing_html().await;
    assert!(html.contains("OutcomeOS is your career operating system."));
    assert!(html.contains("Skip to product preview"));
    assert!(!html.contains("<nav"));
}

#[tokio::test]
async fn navigate_dismisses_waitlist() {
    let app = spawn_app().await;

    let resp = app.post_navigate("analytics").await;
    check_redirect(&resp, &app.home());

    let html = app.get_landing_html().await;
    assert!(html.contains("<nav"));
    assert!(html.contains(r#"<main id="analytics">"#));
    assert!(html.contains("<h2>Analytics</h2>"));
}

#[tokio::test]
async fn reload_starts_over() {
    let app = spawn_app().await;
    app.post_navigate("analytics").await;
    app.post_empty("/sidebar").await;

    // the bare `/` opens a new tab: waitlist shown, nothing else carried over
    for _ in 0..2 {
        let html = app.get_fresh_landing_html().await;
        assert!(!html.contains("<nav"));
        assert!(html.contains("Join Waitlist"));
    }

    // the original tab is untouched
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="analytics">"#));
    assert!(html.contains(r#"<nav data-open="false">"#));
}

#[tokio::test]
async fn fresh_tab_starts_on_dashboard() {
    let app = spawn_app().await;
    app.post_navigate("timeline").await;

    let html = app.get_fresh_landing_html().await;
    let skip_action = html
        .split("action=\"")
        .find(|part| part.starts_with("/skip?tab="))
        .and_then(|part| part.split('"').next())
        .expect("skip form")
        .to_string();
    assert!(!skip_action.contains(&app.tab.to_string()));

    app.api_client
        .post(format!("{}{skip_action}", app.addr))
        .send()
        .await
        .unwrap();
    let html = app
        .api_client
        .get(format!("{}{}", app.addr, skip_action.replace("/skip", "/")))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<main id="dashboard">"#));
}

#[tokio::test]
async fn navigate_without_dismissal_keeps_waitlist() {
    let app = spawn_app_with(|cfg| cfg.shell.dismiss_on_navigate = false).await;

    app.post_navigate("analytics").await;
    let html = app.get_landing_html().await;
    assert!(!html.contains("<nav"));

    // the view change still happened underneath
    app.post_empty("/skip").await;
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="analytics">"#));
}

#[tokio::test]
async fn skip_to_preview_shows_dashboard() {
    let app = spawn_app().await;

    let resp = app.post_empty("/skip").await;
    check_redirect(&resp, &app.home());

    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="dashboard">"#));
}

#[tokio::test]
async fn skip_can_be_disabled() {
    let app = spawn_app_with(|cfg| cfg.shell.allow_skip = false).await;

    let html = app.get_landing_html().await;
    assert!(!html.contains("Skip to product preview"));

    let resp = app.post_empty("/skip").await;
    assert_eq!(resp.status().as_u16(), 404);

    let html = app.get_landing_html().await;
    assert!(!html.contains("<nav"));
}

#[tokio::test]
async fn waitlist_can_be_bypassed() {
    let app = spawn_app_with(|cfg| cfg.shell.start_on_waitlist = false).await;
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="dashboard">"#));
}

#[tokio::test]
async fn menu_selection() {
    let app = spawn_app().await;
    app.post_empty("/skip").await;

    let resp = app.post_empty("/views/timeline").await;
    check_redirect(&resp, &app.home());
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="timeline">"#));
    assert!(html.contains(r#"title="Timeline" aria-current="page""#));

    app.post_empty("/views/job-market").await;
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="job-market">"#));
}

#[tokio::test]
async fn unknown_view_falls_back_to_dashboard() {
    let app = spawn_app().await;
    app.post_empty("/skip").await;
    app.post_empty("/views/analytics").await;

    app.post_empty("/views/settings").await;
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="dashboard">"#));

    app.post_navigate("nonsense").await;
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<main id="dashboard">"#));
}

#[tokio::test]
async fn sidebar_toggle_keeps_view() {
    let app = spawn_app().await;
    app.post_navigate("paths").await;

    let resp = app.post_empty("/sidebar").await;
    check_redirect(&resp, &app.home());
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<nav data-open="false">"#));
    assert!(html.contains(r#"<main id="paths">"#));
    // labels hidden, buttons kept
    assert!(!html.contains(">Path Planner</button>"));

    app.post_empty("/sidebar").await;
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"<nav data-open="true">"#));
    assert!(html.contains(">Path Planner</button>"));
}

#[tokio::test]
async fn dashboard_links_onwards_through_navigation() {
    let app = spawn_app().await;
    app.post_empty("/skip").await;

    let html = app.get_landing_html().await;
    assert!(html.contains(&format!(r#"action="/navigate?tab={}""#, app.tab)));
    assert!(html.contains(r#"name="view" value="upload""#));
}

#[tokio::test]
async fn waitlist_outcome_does_not_navigate() {
    use wiremock::matchers::any;
    use wiremock::Mock;
    use wiremock::ResponseTemplate;

    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.waitlist_server)
        .await;

    app.post_waitlist(&[("email", "a@b.com")]).await;

    let html = app.get_landing_html().await;
    assert!(!html.contains("<nav"));
    assert!(html.contains("Successfully joined!"));
}
