use serde_json::json;

use super::*;

fn detector() -> FrameworkDetector {
    FrameworkDetector::new()
}

#[test]
fn test_no_evidence() {
    let evidence = PageEvidence {
        markup: "<html><body><h1>Plain site</h1></body></html>".to_string(),
        ..Default::default()
    };
    assert_eq!(detector().detect_next_js(&evidence), None);
    assert_eq!(detector().detect_rsc(&evidence), None);
}

#[test]
fn test_next_static_script() {
    let evidence = PageEvidence {
        script_urls: vec!["https://x/_next/static/chunks/main-abc.js".to_string()],
        ..Default::default()
    };
    assert_eq!(detector().detect_next_js(&evidence), Some("next-static-script"));
}

#[test]
fn test_next_image_route_is_not_static_script() {
    let evidence = PageEvidence {
        script_urls: vec!["https://x/_next/image?url=%2Flogo.png".to_string()],
        ..Default::default()
    };
    assert_eq!(detector().detect_next_js(&evidence), None);
}

#[test]
fn test_next_marker_element() {
    let evidence = PageEvidence {
        globals: PageGlobals {
            marker_element: true,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(detector().detect_next_js(&evidence), Some("next-marker-element"));
}

#[test]
fn test_next_markup_markers() {
    for marker in [
        r#"<script id="__NEXT_DATA__" type="application/json">{}</script>"#,
        "<script>(self.__next_f=self.__next_f||[]).push([0])</script>",
        "<next-route-announcer></next-route-announcer>",
    ] {
        let evidence = PageEvidence {
            markup: marker.to_string(),
            ..Default::default()
        };
        assert_eq!(
            detector().detect_next_js(&evidence),
            Some("next-markup-marker"),
            "marker {}",
            marker
        );
    }
}

#[test]
fn test_next_data_global() {
    let evidence = PageEvidence {
        globals: PageGlobals {
            next_data: true,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(detector().detect_next_js(&evidence), Some("next-data-global"));
}

#[test]
fn test_first_signal_wins() {
    let evidence = PageEvidence {
        script_urls: vec!["https://x/_next/static/chunks/a.js".to_string()],
        markup: "__NEXT_DATA__".to_string(),
        globals: PageGlobals {
            marker_element: true,
            next_data: true,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(detector().detect_next_js(&evidence), Some("next-static-script"));
}

#[test]
fn test_rsc_signals() {
    let hits = PageEvidence {
        rsc_url_hits: vec!["https://x/?_rsc=abc".to_string()],
        ..Default::default()
    };
    assert_eq!(detector().detect_rsc(&hits), Some("rsc-request"));

    let timeline = PageEvidence {
        rsc_in_timeline: true,
        ..Default::default()
    };
    assert_eq!(detector().detect_rsc(&timeline), Some("rsc-timeline-payload"));

    let window = PageEvidence {
        globals: PageGlobals {
            rsc_manifest: true,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(detector().detect_rsc(&window), Some("rsc-window-global"));
}

#[test]
fn test_rsc_markup_shapes() {
    for markup in [
        r#"self.__next_f.push([1,"0:[\"$\",\"html\"]"])"#,
        r#"{"$L1":{"children":[]}}"#,
        r#"{"id":"4213","chunks":["app/page"]}"#,
        r#"<meta content="text/x-component">"#,
    ] {
        let evidence = PageEvidence {
            markup: markup.to_string(),
            ..Default::default()
        };
        assert_eq!(
            detector().detect_rsc(&evidence),
            Some("rsc-markup-payload"),
            "markup {}",
            markup
        );
    }
}

#[test]
fn test_lazy_reference_requires_digits() {
    let evidence = PageEvidence {
        markup: r#"{"$Lx":1}"#.to_string(),
        ..Default::default()
    };
    assert_eq!(detector().detect_rsc(&evidence), None);
}

#[test]
fn test_globals_from_probe() {
    let globals = PageGlobals::from_probe(&json!({
        "markerElement": true,
        "nextData": false,
        "nextF": true
    }));
    assert!(globals.marker_element);
    assert!(globals.next_f);
    assert!(!globals.rsc_manifest);

    assert_eq!(PageGlobals::from_probe(&json!(null)), PageGlobals::default());
    assert_eq!(PageGlobals::from_probe(&json!("oops")), PageGlobals::default());
}
