//! Language tags and display-name lookup.
//!
//! Voices carry BCP-47 style tags ("en-US", "zh-Hant-TW"). The catalog needs
//! human-readable language and region names for grouping, and the editor needs
//! the writing direction of the selected voice's language.

mod names;

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use unic_langid::LanguageIdentifier;

pub use names::{is_rtl_language, language_name, region_name};

/// Tag used when the system locale cannot be determined.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

/// A parsed language tag.
///
/// Accepts both BCP-47 (`en-US`) and POSIX (`en_US.UTF-8`, `sr_RS@latin`)
/// spellings. Casing is canonicalized so tags from different sources compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LanguageTag {
    id: LanguageIdentifier,
}

impl LanguageTag {
    /// Parse a tag, returning `None` for C/POSIX locales and anything without
    /// a usable language subtag.
    ///
    /// Subtags the identifier grammar does not cover (extensions, private
    /// use) are dropped from the end until the rest parses.
    pub fn parse(tag: &str) -> Option<Self> {
        let normalized = normalize_posix(tag)?;
        let subtags: Vec<&str> = normalized.split('-').filter(|s| !s.is_empty()).collect();

        (1..=subtags.len())
            .rev()
            .find_map(|n| LanguageIdentifier::from_str(&subtags[..n].join("-")).ok())
            .filter(|id| id.language.as_str() != "und")
            .map(|id| Self { id })
    }

    /// Lower-case language subtag, e.g. "en".
    pub fn language(&self) -> &str {
        self.id.language.as_str()
    }

    /// Title-case script subtag, e.g. "Hant".
    pub fn script(&self) -> Option<&str> {
        self.id.script.as_ref().map(|s| s.as_str())
    }

    /// Upper-case region subtag, e.g. "US" or "419".
    pub fn region(&self) -> Option<&str> {
        self.id.region.as_ref().map(|r| r.as_str())
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

/// libc locale string ("en_US.UTF-8", "sr_RS@latin") to a hyphenated tag.
///
/// The codeset is dropped. The `latin`/`cyrillic` modifiers become a script
/// subtag right after the language; other modifiers (`euro`) are ignored.
fn normalize_posix(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let upper = raw.to_ascii_uppercase();
    if raw.is_empty() || upper == "C" || upper == "POSIX" || upper.starts_with("C.") {
        return None;
    }

    let (before_at, modifier) = raw
        .split_once('@')
        .map_or((raw, None), |(base, m)| (base, Some(m)));
    let base = before_at.split_once('.').map_or(before_at, |(b, _codeset)| b);
    let tag = base.replace('_', "-");

    let script = match modifier.map(str::to_ascii_lowercase).as_deref() {
        Some("latin") => Some("Latn"),
        Some("cyrillic") => Some("Cyrl"),
        _ => None,
    };

    Some(match (script, tag.split_once('-')) {
        (Some(script), Some((language, rest))) => format!("{language}-{script}-{rest}"),
        (Some(script), None) => format!("{tag}-{script}"),
        (None, _) => tag,
    })
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

/// Display-name and direction lookup for language tags.
///
/// The catalog consumes this as a black box so a platform implementation
/// (localized names) can replace the built-in English tables.
pub trait LocaleResolver {
    /// Name of the tag's language, e.g. "English" for "en-GB".
    fn language_name(&self, tag: &str) -> String;

    /// Name of the tag's region, or `None` if the tag has no region.
    fn region_name(&self, tag: &str) -> Option<String>;

    /// Writing direction for the tag's language.
    fn text_direction(&self, tag: &str) -> TextDirection;
}

/// English display names from static tables.
///
/// Unknown codes resolve to the code itself so no voice ever ends up under
/// an empty label.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLocaleResolver;

impl LocaleResolver for BuiltinLocaleResolver {
    fn language_name(&self, tag: &str) -> String {
        match LanguageTag::parse(tag) {
            Some(parsed) => language_name(parsed.language())
                .map(str::to_string)
                .unwrap_or_else(|| parsed.language().to_string()),
            None => tag.to_string(),
        }
    }

    fn region_name(&self, tag: &str) -> Option<String> {
        let parsed = LanguageTag::parse(tag)?;
        let region = parsed.region()?;
        Some(
            region_name(region)
                .map(str::to_string)
                .unwrap_or_else(|| region.to_string()),
        )
    }

    fn text_direction(&self, tag: &str) -> TextDirection {
        let Some(parsed) = LanguageTag::parse(tag) else {
            return TextDirection::LeftToRight;
        };
        let rtl = match parsed.script() {
            Some("Arab" | "Hebr" | "Thaa" | "Syrc" | "Nkoo" | "Adlm") => true,
            Some(_) => false,
            None => is_rtl_language(parsed.language()),
        };
        if rtl {
            TextDirection::RightToLeft
        } else {
            TextDirection::LeftToRight
        }
    }
}

/// Determine the system locale.
///
/// Priority:
/// 1. Explicit override (from the config file)
/// 2. The first set of LC_ALL, LC_MESSAGES, LANG
/// 3. Falls back to en-US
pub fn system_locale(override_tag: Option<&str>) -> LanguageTag {
    if let Some(tag) = override_tag.and_then(LanguageTag::parse) {
        return tag;
    }

    let raw = env_nonempty("LC_ALL")
        .or_else(|| env_nonempty("LC_MESSAGES"))
        .or_else(|| env_nonempty("LANG"));
    if let Some(tag) = raw.as_deref().and_then(LanguageTag::parse) {
        debug!(%tag, "System locale from environment");
        return tag;
    }

    debug!(?raw, fallback = FALLBACK_LOCALE, "System locale not usable, using fallback");
    LanguageTag::parse(FALLBACK_LOCALE).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bcp47_and_posix_forms() {
        let tag = LanguageTag::parse("en-US").unwrap();
        assert_eq!(tag.language(), "en");
        assert_eq!(tag.region(), Some("US"));

        let tag = LanguageTag::parse("pt_br.UTF-8@euro").unwrap();
        assert_eq!(tag.language(), "pt");
        assert_eq!(tag.region(), Some("BR"));
        assert_eq!(tag.to_string(), "pt-BR");
    }

    #[test]
    fn parses_script_and_numeric_region() {
        let tag = LanguageTag::parse("zh-hant-tw").unwrap();
        assert_eq!(tag.script(), Some("Hant"));
        assert_eq!(tag.region(), Some("TW"));
        assert_eq!(tag.to_string(), "zh-Hant-TW");

        let tag = LanguageTag::parse("es-419").unwrap();
        assert_eq!(tag.region(), Some("419"));
    }

    #[test]
    fn rejects_posix_c_locale() {
        assert!(LanguageTag::parse("C").is_none());
        assert!(LanguageTag::parse("POSIX").is_none());
        assert!(LanguageTag::parse("").is_none());
    }

    #[test]
    fn builtin_names() {
        let resolver = BuiltinLocaleResolver;
        assert_eq!(resolver.language_name("en-GB"), "English");
        assert_eq!(resolver.region_name("en-GB").as_deref(), Some("United Kingdom"));
        assert_eq!(resolver.region_name("en"), None);
    }

    #[test]
    fn builtin_names_fall_back_to_codes() {
        let resolver = BuiltinLocaleResolver;
        assert_eq!(resolver.language_name("xq-QQ"), "xq");
        assert_eq!(resolver.region_name("xq-QQ").as_deref(), Some("QQ"));
    }

    #[test]
    fn builtin_text_direction() {
        let resolver = BuiltinLocaleResolver;
        assert_eq!(resolver.text_direction("he-IL"), TextDirection::RightToLeft);
        assert_eq!(resolver.text_direction("ar-SA"), TextDirection::RightToLeft);
        assert_eq!(resolver.text_direction("en-US"), TextDirection::LeftToRight);
        assert_eq!(resolver.text_direction("pa-Arab-PK"), TextDirection::RightToLeft);
        assert_eq!(resolver.text_direction("ku-Latn"), TextDirection::LeftToRight);
    }

    #[test]
    fn posix_modifier_becomes_script() {
        let tag = LanguageTag::parse("sr_RS@latin").unwrap();
        assert_eq!(tag.script(), Some("Latn"));
        assert_eq!(tag.region(), Some("RS"));
        assert_eq!(tag.to_string(), "sr-Latn-RS");

        let tag = LanguageTag::parse("uz_UZ.UTF-8@cyrillic").unwrap();
        assert_eq!(tag.to_string(), "uz-Cyrl-UZ");

        assert_eq!(system_locale(Some("sr_RS@latin")).script(), Some("Latn"));
    }

    #[test]
    fn unsupported_trailing_subtags_are_dropped() {
        let tag = LanguageTag::parse("en-US-u-ca-gregory").unwrap();
        assert_eq!(tag.to_string(), "en-US");
        assert!(LanguageTag::parse("und").is_none());
        assert!(LanguageTag::parse("C.UTF-8").is_none());
    }

    #[test]
    fn system_locale_override_wins() {
        let tag = system_locale(Some("fr_CA"));
        assert_eq!(tag.to_string(), "fr-CA");
    }
}
