//! Machine-translation detection.
//!
//! Browser translators mark the document root with a class containing
//! `translated` (e.g. `translated-ltr`) and set its `lang` attribute to the
//! target language. [`TranslationWatcher`] looks at successive snapshots of
//! the root and reports each switch into a translated language once.

#[cfg(test)]
#[path = "translation_test.rs"]
mod translation_test;

use tracing::info;

const TRANSLATED_CLASS_MARKER: &str = "translated";

/// The root element's class list and `lang` attribute at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSnapshot {
    pub class_name: String,
    pub lang: Option<String>,
}

impl RootSnapshot {
    #[must_use]
    pub fn new(class_name: impl Into<String>, lang: Option<&str>) -> Self {
        Self { class_name: class_name.into(), lang: lang.map(str::to_owned) }
    }

    #[must_use]
    pub fn is_translated(&self) -> bool {
        self.class_name.contains(TRANSLATED_CLASS_MARKER)
    }
}

/// Emitted when the page is translated into a new language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    /// Target language, when the translator set one.
    pub language: Option<String>,
}

#[derive(Debug, Default)]
pub struct TranslationWatcher {
    translated: bool,
    language: Option<String>,
}

impl TranslationWatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the root after a mutation.
    ///
    /// Returns an event the first time the page shows up translated into a
    /// given language. Reverting to the untranslated page clears the memory,
    /// so a later translation is reported again.
    pub fn observe(&mut self, root: &RootSnapshot) -> Option<Translated> {
        if !root.is_translated() {
            self.translated = false;
            self.language = None;
            return None;
        }
        if self.translated && self.language == root.lang {
            return None;
        }
        self.translated = true;
        self.language.clone_from(&root.lang);
        info!(language = root.lang.as_deref().unwrap_or("unknown"), "page translated");
        Some(Translated { language: root.lang.clone() })
    }
}
