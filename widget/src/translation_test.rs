use super::*;

#[test]
fn untranslated_root_reports_nothing() {
    let mut watcher = TranslationWatcher::new();
    assert!(watcher.observe(&RootSnapshot::new("js no-touch", Some("en"))).is_none());
}

#[test]
fn translated_root_reports_language() {
    let mut watcher = TranslationWatcher::new();
    let event = watcher.observe(&RootSnapshot::new("translated-ltr", Some("fr")));
    assert_eq!(event, Some(Translated { language: Some("fr".into()) }));
}

#[test]
fn repeated_mutations_report_once_per_language() {
    let mut watcher = TranslationWatcher::new();
    let root = RootSnapshot::new("js translated-ltr", Some("de"));
    assert!(watcher.observe(&root).is_some());
    assert!(watcher.observe(&root).is_none());
    assert!(watcher.observe(&root).is_none());
}

#[test]
fn switching_language_reports_again() {
    let mut watcher = TranslationWatcher::new();
    assert!(watcher.observe(&RootSnapshot::new("translated-ltr", Some("de"))).is_some());
    let event = watcher.observe(&RootSnapshot::new("translated-rtl", Some("ar"))).unwrap();
    assert_eq!(event.language.as_deref(), Some("ar"));
}

#[test]
fn reverting_then_retranslating_reports_again() {
    let mut watcher = TranslationWatcher::new();
    let translated = RootSnapshot::new("translated-ltr", Some("es"));
    assert!(watcher.observe(&translated).is_some());
    assert!(watcher.observe(&RootSnapshot::new("", Some("en"))).is_none());
    assert!(watcher.observe(&translated).is_some());
}

#[test]
fn missing_lang_is_reported_as_unknown_language() {
    let mut watcher = TranslationWatcher::new();
    let event = watcher.observe(&RootSnapshot::new("translated-ltr", None)).unwrap();
    assert!(event.language.is_none());
}
