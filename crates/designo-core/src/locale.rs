//! # Locale Handling
//!
//! The site speaks Croatian (`hr`, default) and English (`en`). Every page
//! lives under a locale prefix; requests without one are redirected to the
//! best match from `Accept-Language`.
//!
//! ```text
//!   GET /            Accept-Language: en-US,en;q=0.9   ──► 307 /en/
//!   GET /gallery     (no header)                       ──► 307 /hr/gallery
//!   GET /hr/gallery                                    ──► served
//!   GET /favicon.ico, /api/...                         ──► never redirected
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreError;

/// Supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Hr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Hr, Locale::En];

    /// Two-letter code used in paths and translation directories.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Hr => "hr",
            Locale::En => "en",
        }
    }

    /// Picks the best supported locale from an `Accept-Language` header.
    ///
    /// Entries are ranked by quality (`q=`), ties keep header order. A tag
    /// matches on its primary subtag, so `en-GB` selects `en`. Falls back to
    /// the default when nothing matches.
    pub fn negotiate(accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return Locale::default();
        };

        let mut ranked: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let quality = parts
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((tag, quality))
            })
            .collect();
        // sort_by is stable: equal weights keep header order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .find_map(|(tag, _)| {
                let primary = tag.split(['-', '_']).next().unwrap_or(tag);
                primary.parse::<Locale>().ok()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Locale::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CoreError::UnsupportedLocale(s.to_string()))
    }
}

/// Locale carried by the first path segment, if any.
///
/// Only an exact segment counts: `/hr` and `/hr/...` match, `/hrvatska` does not.
pub fn locale_from_path(path: &str) -> Option<Locale> {
    Locale::ALL.into_iter().find(|locale| {
        let prefix = format!("/{}", locale.code());
        path == prefix || path.starts_with(&format!("{prefix}/"))
    })
}

fn is_exempt(path: &str) -> bool {
    path == "/favicon.ico"
        || path == "/api"
        || path.starts_with("/api/")
        || path.starts_with("/_next/")
}

/// Target of the locale redirect for `path`, or `None` if the request should
/// be served as is.
pub fn localized_redirect(path: &str, accept_language: Option<&str>) -> Option<String> {
    if is_exempt(path) || locale_from_path(path).is_some() {
        return None;
    }
    let locale = Locale::negotiate(accept_language);
    Some(format!("/{}{}", locale.code(), path))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate() {
        assert_eq!(Locale::negotiate(None), Locale::Hr);
        assert_eq!(Locale::negotiate(Some("en-US,en;q=0.9")), Locale::En);
        assert_eq!(Locale::negotiate(Some("de-DE,de;q=0.9,en;q=0.5")), Locale::En);
        assert_eq!(Locale::negotiate(Some("en;q=0.3,hr;q=0.8")), Locale::Hr);
        assert_eq!(Locale::negotiate(Some("fr,de")), Locale::Hr);
        assert_eq!(Locale::negotiate(Some("en;q=0")), Locale::Hr);
        assert_eq!(Locale::negotiate(Some("*")), Locale::Hr);
        assert_eq!(Locale::negotiate(Some("")), Locale::Hr);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(Locale::Hr.to_string(), "hr");
        assert!(matches!(
            "de".parse::<Locale>(),
            Err(CoreError::UnsupportedLocale(_))
        ));
    }

    #[test]
    fn test_locale_from_path() {
        assert_eq!(locale_from_path("/hr"), Some(Locale::Hr));
        assert_eq!(locale_from_path("/en/dashboard"), Some(Locale::En));
        assert_eq!(locale_from_path("/hrvatska"), None);
        assert_eq!(locale_from_path("/"), None);
    }

    #[test]
    fn test_localized_redirect() {
        assert_eq!(localized_redirect("/", Some("en-GB")), Some("/en/".to_string()));
        assert_eq!(localized_redirect("/gallery", None), Some("/hr/gallery".to_string()));
        assert_eq!(localized_redirect("/en/gallery", None), None);
        assert_eq!(localized_redirect("/favicon.ico", None), None);
        assert_eq!(localized_redirect("/api/gallery", None), None);
    }
}
