//! Language names and ISO-639-1 codes
//!
//! LLM prompts read best with English language names ("Dutch"), while the
//! translation services want codes ("nl"). Users may pass either.

/// A known language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

const LANGUAGES: &[Language] = &[
    Language { code: "ar", name: "Arabic" },
    Language { code: "bg", name: "Bulgarian" },
    Language { code: "cs", name: "Czech" },
    Language { code: "da", name: "Danish" },
    Language { code: "de", name: "German" },
    Language { code: "el", name: "Greek" },
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "et", name: "Estonian" },
    Language { code: "fi", name: "Finnish" },
    Language { code: "fr", name: "French" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "hu", name: "Hungarian" },
    Language { code: "id", name: "Indonesian" },
    Language { code: "it", name: "Italian" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "lt", name: "Lithuanian" },
    Language { code: "lv", name: "Latvian" },
    Language { code: "nb", name: "Norwegian" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "pl", name: "Polish" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ro", name: "Romanian" },
    Language { code: "ru", name: "Russian" },
    Language { code: "sk", name: "Slovak" },
    Language { code: "sl", name: "Slovenian" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "th", name: "Thai" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "uk", name: "Ukrainian" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "zh", name: "Chinese" },
];

impl Language {
    /// All known languages, sorted by code
    pub fn all() -> &'static [Language] {
        LANGUAGES
    }

    /// Look up a language by code or English name (case-insensitive)
    pub fn resolve(input: &str) -> Option<Language> {
        let input = input.trim();
        LANGUAGES
            .iter()
            .find(|lang| {
                lang.code.eq_ignore_ascii_case(input) || lang.name.eq_ignore_ascii_case(input)
            })
            .copied()
    }

    /// ISO code for the input.
    ///
    /// Unknown inputs shaped like a code (`pt`, `pt-BR`, `fil`) are passed
    /// through lowercased; anything else yields `None`.
    pub fn to_code(input: &str) -> Option<String> {
        if let Some(lang) = Self::resolve(input) {
            return Some(lang.code.to_string());
        }
        let input = input.trim();
        let mut parts = input.splitn(2, '-');
        let primary = parts.next().unwrap_or_default();
        let region_ok = parts.next().map_or(true, |r| {
            (2..=4).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric())
        });
        let primary_ok =
            (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
        if primary_ok && region_ok {
            Some(input.to_ascii_lowercase())
        } else {
            None
        }
    }

    /// English name for the input, or the input itself when unknown
    pub fn to_name(input: &str) -> String {
        Self::resolve(input)
            .map(|lang| lang.name.to_string())
            .unwrap_or_else(|| input.trim().to_string())
    }

    /// Suffix for a translated column: the code when known, otherwise a
    /// lowercased, underscore-joined form of the input
    pub fn column_suffix(input: &str) -> String {
        match Self::resolve(input) {
            Some(lang) => lang.code.to_string(),
            None => input
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .to_lowercase(),
        }
    }
}
