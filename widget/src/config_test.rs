use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = WidgetConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, WidgetConfig::default());
    assert_eq!(cfg.endpoint.url(), "http://127.0.0.1:8000/submit-feedback/");
    assert_eq!(cfg.panel.document_segment, 2);
    assert_eq!(cfg.panel.jpeg_quality, 70);
    assert_eq!(cfg.panel.after_submit, AfterSubmit::Lock);
    assert_eq!(cfg.endpoint.timeouts, Timeouts { request_secs: 30, connect_secs: 10 });
}

#[test]
fn for_origin_defaults_base_url_to_serving_site() {
    let cfg = WidgetConfig::for_origin("https://vanity.example", lookup(&[])).unwrap();
    assert_eq!(cfg.endpoint.url(), "https://vanity.example/submit-feedback/");
}

#[test]
fn for_origin_keeps_explicit_base_url() {
    let cfg = WidgetConfig::for_origin(
        "https://vanity.example",
        lookup(&[("FEEDBACK_BASE_URL", "https://reports.example"), ("FEEDBACK_JPEG_QUALITY", "90")]),
    )
    .unwrap();
    assert_eq!(cfg.endpoint.base_url, "https://reports.example");
    assert_eq!(cfg.panel.jpeg_quality, 90);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = WidgetConfig::from_lookup(lookup(&[
        ("FEEDBACK_BASE_URL", "https://vanity.example/"),
        ("FEEDBACK_ENDPOINT_PATH", "/api/report"),
        ("FEEDBACK_DOCUMENT_SEGMENT", "3"),
        ("FEEDBACK_JPEG_QUALITY", "85"),
        ("FEEDBACK_AFTER_SUBMIT", "close"),
        ("FEEDBACK_REQUEST_TIMEOUT_SECS", "5"),
        ("FEEDBACK_CONNECT_TIMEOUT_SECS", "2"),
    ]))
    .unwrap();
    assert_eq!(cfg.endpoint.base_url, "https://vanity.example");
    assert_eq!(cfg.endpoint.url(), "https://vanity.example/api/report");
    assert_eq!(cfg.panel.document_segment, 3);
    assert_eq!(cfg.panel.jpeg_quality, 85);
    assert_eq!(cfg.panel.after_submit, AfterSubmit::Close);
    assert_eq!(cfg.endpoint.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });
}

#[test]
fn unparseable_numbers_fall_back_to_defaults() {
    let cfg = WidgetConfig::from_lookup(lookup(&[
        ("FEEDBACK_DOCUMENT_SEGMENT", "two"),
        ("FEEDBACK_REQUEST_TIMEOUT_SECS", "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.panel.document_segment, DEFAULT_DOCUMENT_SEGMENT);
    assert_eq!(cfg.endpoint.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

#[test]
fn jpeg_quality_out_of_range_errors() {
    for bad in ["0", "101", "high"] {
        let err = WidgetConfig::from_lookup(lookup(&[("FEEDBACK_JPEG_QUALITY", bad)])).unwrap_err();
        assert_eq!(err.error_code(), "E_CONFIG_PARSE");
        assert!(err.to_string().contains("FEEDBACK_JPEG_QUALITY"));
    }
}

#[test]
fn unknown_after_submit_errors() {
    let err = WidgetConfig::from_lookup(lookup(&[("FEEDBACK_AFTER_SUBMIT", "explode")])).unwrap_err();
    assert!(err.to_string().contains("unknown FEEDBACK_AFTER_SUBMIT"));
}

#[test]
fn endpoint_url_joins_without_double_slash() {
    let endpoint = EndpointConfig {
        base_url: "http://localhost:9000/".into(),
        path: "submit-feedback/".into(),
        timeouts: Timeouts::default(),
    };
    assert_eq!(endpoint.url(), "http://localhost:9000/submit-feedback/");
}

#[test]
fn from_env_reads_process_environment() {
    // Only this test touches the process environment.
    unsafe {
        std::env::set_var("FEEDBACK_AFTER_SUBMIT", "close");
        std::env::remove_var("FEEDBACK_JPEG_QUALITY");
    }
    let cfg = WidgetConfig::from_env().unwrap();
    assert_eq!(cfg.panel.after_submit, AfterSubmit::Close);
    unsafe { std::env::remove_var("FEEDBACK_AFTER_SUBMIT") };
}
