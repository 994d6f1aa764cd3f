//! Integration tests against a realistic Elementor-style page.
//!
//! The markup mirrors what the page builder actually emits: deeply nested
//! wrapper divs, icon widgets, and a theme skip link shipped empty.

use a11y_patcher::{DocumentIndex, Patcher};

const ELEMENTOR_PAGE: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="utf-8">
    <title>Singularity Edge</title>
</head>
<body class="elementor-default elementor-kit-5">
<a class="skip-link screen-reader-text" href="#content"></a>
<div data-elementor-type="wp-page" data-elementor-id="42" class="elementor elementor-42">
    <section class="elementor-section elementor-top-section">
        <div class="elementor-container">
            <div class="elementor-column elementor-col-50">
                <div class="elementor-widget-wrap">
                    <div class="elementor-widget elementor-widget-image">
                        <div class="elementor-widget-container">
                            <a href="/"><img src="wp-content/uploads/logo.png" title="Singularity Edge"></a>
                        </div>
                    </div>
                </div>
            </div>
            <div class="elementor-column elementor-col-50">
                <div class="elementor-widget elementor-widget-icon">
                    <div class="elementor-widget-container">
                        <div class="elementor-icon-wrapper">
                            <a class="elementor-icon" href="/mi-cuenta/">
                                <i aria-hidden="true" class="eicon-user-circle-o"></i>
                            </a>
                        </div>
                    </div>
                </div>
                <div class="elementor-widget elementor-widget-icon">
                    <div class="elementor-widget-container">
                        <div class="elementor-icon-wrapper">
                            <a class="elementor-icon" href="/carrito/">
                                <i aria-hidden="true" class="eicon-cart-medium"></i>
                            </a>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    </section>
    <section class="elementor-section">
        <img class="elementor-animation-grow" src="wp-content/uploads/hero.jpg">
        <div role="menuitem" class="elementor-item"></div>
        <a class="elementor-button" href="/contacto/" title="Contacto"></a>
    </section>
</div>
</body>
</html>
"##;

#[test]
fn test_full_page_pass() {
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(ELEMENTOR_PAGE).unwrap();
    assert!(outcome.changed());

    let html = &outcome.html;

    // Skip link: text, label, and repaired target on the page root
    assert!(html.contains(">Saltar al contenido</a>"));
    assert!(html.contains(r#"aria-label="Saltar al contenido""#));
    assert!(html.contains(r#"data-elementor-type="wp-page" data-elementor-id="42" class="elementor elementor-42" id="content""#));

    // Images
    assert!(html.contains(r#"alt="Singularity Edge""#));
    assert!(html.contains(r#"alt="Imagen descriptiva""#));

    // Icon widgets labeled from the href table
    assert!(html.contains(r#"aria-label="Mi Cuenta""#));
    assert!(html.contains(r#"aria-label="Carrito""#));

    // Menu item and text-less button anchor fall through to the generic rule
    assert!(html.contains(r#"aria-label="Botón interactivo""#));
    assert!(html.contains(r#"aria-label="Contacto""#));
}

#[test]
fn test_full_page_pass_is_idempotent() {
    let patcher = Patcher::new();
    let first = patcher.run_pass(ELEMENTOR_PAGE).unwrap();
    let second = patcher.run_pass(&first.html).unwrap();

    assert!(!second.changed());
    assert_eq!(second.html, first.html);

    for rule in &second.rules {
        assert_eq!(rule.patched, 0, "rule {} ran again", rule.rule);
    }
}

#[test]
fn test_pass_preserves_document_structure() {
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(ELEMENTOR_PAGE).unwrap();

    let before = DocumentIndex::scan(ELEMENTOR_PAGE).unwrap().elements().len();
    let after = DocumentIndex::scan(&outcome.html).unwrap().elements().len();
    assert_eq!(before, after);
}

#[test]
fn test_logo_anchor_not_double_labeled() {
    let patcher = Patcher::new();
    let outcome = patcher.run_pass(ELEMENTOR_PAGE).unwrap();

    // The home anchor's accessible name comes from the logo's (new) alt;
    // the generic rule must not add a redundant label on top
    let logo_anchor_start = outcome.html.find(r#"<a href="/">"#).unwrap();
    let logo_anchor_end = outcome.html[logo_anchor_start..].find("</a>").unwrap();
    let anchor = &outcome.html[logo_anchor_start..logo_anchor_start + logo_anchor_end];
    assert!(!anchor.contains("aria-label"));
}
