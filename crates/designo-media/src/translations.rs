//! Translation bundles.
//!
//! One JSON document per locale at `<dir>/<locale>/common.json`. Loading
//! never fails: an unknown locale or a missing/broken file is logged and the
//! minimal fallback bundle is served instead.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use designo_core::Locale;

/// Parsed translation document.
#[derive(Debug, Clone, PartialEq)]
pub struct Translations(Value);

impl Translations {
    /// Bundle served when the real one cannot be loaded.
    pub fn fallback() -> Self {
        Translations(json!({ "home": { "title": "Welcome" } }))
    }

    pub fn from_value(value: Value) -> Self {
        Translations(value)
    }

    /// Node at a dotted path, e.g. `gallery.viewMore`.
    pub fn section(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.0, |node, segment| node.get(segment))
    }

    /// String at a dotted path. Missing keys render as blank text.
    pub fn get(&self, path: &str) -> &str {
        self.section(path).and_then(Value::as_str).unwrap_or("")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Reads translation bundles from disk.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    dir: PathBuf,
}

impl TranslationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TranslationStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bundle_path(&self, locale: Locale) -> PathBuf {
        self.dir.join(locale.code()).join("common.json")
    }

    /// Bundle for a locale code as it appears in a URL.
    pub async fn load(&self, code: &str) -> Translations {
        match code.parse::<Locale>() {
            Ok(locale) => self.load_locale(locale).await,
            Err(e) => {
                error!("Translations requested for {}", e);
                Translations::fallback()
            }
        }
    }

    /// Bundle for a supported locale.
    pub async fn load_locale(&self, locale: Locale) -> Translations {
        let path = self.bundle_path(locale);
        debug!(?path, "Loading translations");

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                error!(?path, "Failed to read translations: {}", e);
                return Translations::fallback();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(value) => Translations(value),
            Err(e) => {
                error!(?path, "Failed to parse translations: {}", e);
                Translations::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(locale: &str, contents: &str) -> (tempfile::TempDir, TranslationStore) {
        let dir = tempfile::tempdir().unwrap();
        let locale_dir = dir.path().join(locale);
        tokio::fs::create_dir_all(&locale_dir).await.unwrap();
        tokio::fs::write(locale_dir.join("common.json"), contents)
            .await
            .unwrap();
        let store = TranslationStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_load_bundle() {
        let (_dir, store) = store_with(
            "hr",
            r#"{"home": {"title": "Dobrodošli"}, "gallery": {"viewMore": "Prikaži više"}}"#,
        )
        .await;

        let t = store.load("hr").await;
        assert_eq!(t.get("home.title"), "Dobrodošli");
        assert_eq!(t.get("gallery.viewMore"), "Prikaži više");
        assert_eq!(t.get("gallery.missing"), "");
        assert_eq!(t.get("home.title.deeper"), "");
        assert!(t.section("gallery").is_some_and(Value::is_object));
    }

    #[tokio::test]
    async fn test_unknown_locale_falls_back() {
        let (_dir, store) = store_with("hr", r#"{"home": {"title": "Dobrodošli"}}"#).await;
        assert_eq!(store.load("de").await, Translations::fallback());
    }

    #[tokio::test]
    async fn test_missing_or_broken_file_falls_back() {
        let (_dir, store) = store_with("en", "{ not json").await;
        assert_eq!(store.load("en").await.get("home.title"), "Welcome");
        // No hr directory at all
        assert_eq!(store.load_locale(Locale::Hr).await, Translations::fallback());
    }
}
