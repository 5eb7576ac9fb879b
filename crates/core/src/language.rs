//! Language normalization
//!
//! Catalog feeds and user settings spell languages inconsistently ("en",
//! "English", "eng", "Hindi", "हिन्दी"). Every language comparison in the
//! engine goes through [`normalize_language`] so that synonyms compare equal.

use crate::error::GoodWatchError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical codes and the synonyms that resolve to them
static LANGUAGE_SYNONYMS: &[(&str, &[&str])] = &[
    ("en", &["en", "eng", "english"]),
    ("hi", &["hi", "hin", "hindi", "हिन्दी", "हिंदी"]),
    ("fr", &["fr", "fra", "fre", "french", "français", "francais"]),
    ("es", &["es", "spa", "spanish", "español", "espanol"]),
    ("de", &["de", "deu", "ger", "german", "deutsch"]),
    ("it", &["it", "ita", "italian", "italiano"]),
    ("ja", &["ja", "jpn", "japanese", "日本語"]),
    ("ko", &["ko", "kor", "korean", "한국어"]),
    ("zh", &["zh", "zho", "chi", "chinese", "mandarin", "中文"]),
    ("pt", &["pt", "por", "portuguese", "português", "portugues"]),
    ("ta", &["ta", "tam", "tamil"]),
    ("te", &["te", "tel", "telugu"]),
    ("ml", &["ml", "mal", "malayalam"]),
    ("bn", &["bn", "ben", "bengali", "bangla"]),
    ("mr", &["mr", "mar", "marathi"]),
    ("kn", &["kn", "kan", "kannada"]),
    ("pa", &["pa", "pan", "punjabi"]),
    ("gu", &["gu", "guj", "gujarati"]),
    ("ru", &["ru", "rus", "russian"]),
    ("ar", &["ar", "ara", "arabic"]),
    ("tr", &["tr", "tur", "turkish"]),
];

/// Synonym → canonical code lookup table
static SYNONYM_INDEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    LANGUAGE_SYNONYMS
        .iter()
        .flat_map(|(canonical, synonyms)| synonyms.iter().map(move |s| (*s, *canonical)))
        .collect()
});

/// Normalize a language value to its canonical code
///
/// Unknown values are trimmed and lowercased so that two spellings of an
/// unknown language still compare equal when they only differ in case.
///
/// # Examples
///
/// ```
/// use goodwatch_core::language::normalize_language;
///
/// assert_eq!(normalize_language("English"), "en");
/// assert_eq!(normalize_language(" hindi "), "hi");
/// assert_eq!(normalize_language("xx"), "xx");
/// ```
pub fn normalize_language(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    match SYNONYM_INDEX.get(lowered.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => lowered,
    }
}

/// Whether two language values name the same language
pub fn same_language(a: &str, b: &str) -> bool {
    normalize_language(a) == normalize_language(b)
}

/// Whether the value is a language the synonym table knows
pub fn is_known_language(value: &str) -> bool {
    SYNONYM_INDEX.contains_key(value.trim().to_lowercase().as_str())
}

/// Reject empty language values
pub fn validate_language(value: &str) -> Result<(), GoodWatchError> {
    if value.trim().is_empty() {
        return Err(GoodWatchError::validation_field(
            "Language must not be empty",
            "language",
        ));
    }
    Ok(())
}
