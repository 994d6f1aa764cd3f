//! Integration tests against third-party chat-widget markup.
//!
//! Fixtures mirror the HTML the widgets inject at runtime; on a static
//! export that markup is baked into the page.

use a11y_patcher::Patcher;

const JOINCHAT_WIDGET: &str = r#"<!DOCTYPE html>
<html>
<body>
<p>Página de contacto.</p>
<div class="joinchat joinchat--show" data-settings='{"telephone":"34600000000"}'>
    <div class="joinchat__button" role="button" tabindex="0">
        <div class="joinchat__button__open"></div>
        <div class="joinchat__button__send">
            <svg viewBox="0 0 32 32"><path d="M16 0"></path></svg>
        </div>
    </div>
</div>
</body>
</html>
"#;

const WA_POPUP_WIDGET: &str = r##"<!DOCTYPE html>
<html>
<body>
<a class="wa__btn_popup" href="#">
    <span class="wa__btn_popup_icon"></span>
</a>
</body>
</html>
"##;

#[test]
fn test_joinchat_button_gets_contact_label() {
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(JOINCHAT_WIDGET).unwrap();

    assert!(outcome.html.contains(
        r#"<div class="joinchat__button" role="button" tabindex="0" aria-label="Contactar por WhatsApp">"#
    ));
}

#[test]
fn test_wa_popup_button_gets_contact_label() {
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(WA_POPUP_WIDGET).unwrap();

    assert!(outcome
        .html
        .contains(r#"aria-label="Contactar por WhatsApp""#));
}

#[test]
fn test_prelabeled_widget_untouched() {
    // A server-side filter may have labeled the button already
    let html = r#"<div class="joinchat__button" role="button" tabindex="0" aria-label="Contactar por WhatsApp"></div>"#;
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(html).unwrap();

    assert_eq!(outcome.html, html);
    assert!(!outcome.changed());
}

#[test]
fn test_widget_selector_matches_first_only() {
    // querySelector semantics: one presence check per widget selector
    let html = r#"<div class="joinchat__button"></div><div class="joinchat__button"></div>"#;
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(html).unwrap();

    assert_eq!(outcome.html.matches("aria-label").count(), 1);
}

#[test]
fn test_widget_pass_is_idempotent() {
    let patcher = Patcher::new();
    let first = patcher.run_pass(JOINCHAT_WIDGET).unwrap();
    let second = patcher.run_pass(&first.html).unwrap();
    assert_eq!(second.html, first.html);
    assert!(!second.changed());
}
