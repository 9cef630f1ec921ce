use crate::error::{Result, SubtransError};

/// Built-in code → display name table, in listing order.
const LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("as", "Assamese"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("ky", "Kyrgyz"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Burmese"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("or", "Odia"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("tg", "Tajik"),
    ("th", "Thai"),
    ("tl", "Filipino"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
    ("zh-Hans", "Chinese (Simplified)"),
    ("zh-Hant", "Chinese (Traditional)"),
];

/// Supported-language registry consulted before any work begins
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<(String, String)>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new(LANGUAGES.iter().map(|(code, name)| (code.to_string(), name.to_string())))
    }
}

impl LanguageRegistry {
    pub fn new<I>(languages: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            languages: languages.into_iter().collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.languages.iter().any(|(c, _)| c == code)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|(c, _)| c.as_str())
    }

    pub fn ensure_supported(&self, code: &str) -> Result<()> {
        if self.contains(code) {
            Ok(())
        } else {
            Err(SubtransError::UnsupportedLanguage(code.to_string()))
        }
    }

    /// Validate several codes at once, naming every unsupported one
    pub fn ensure_all_supported(&self, codes: &[&str]) -> Result<()> {
        let unsupported: Vec<&str> = codes
            .iter()
            .copied()
            .filter(|code| !self.contains(code))
            .collect();

        if unsupported.is_empty() {
            Ok(())
        } else {
            Err(SubtransError::UnsupportedLanguage(unsupported.join("' or '")))
        }
    }

    /// Remedy listing printed after an unsupported-language error
    pub fn listing(&self) -> String {
        self.languages
            .iter()
            .map(|(code, name)| format!("  - {}: {}", code, name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True for names shaped like `<base>_<src>-<dest>.srt`, i.e. bilingual output
    /// left behind by an earlier run.
    pub fn is_bilingual_output(&self, file_name: &str) -> bool {
        let Some(stem) = file_name.strip_suffix(".srt") else {
            return false;
        };

        self.codes().any(|dest| {
            stem.strip_suffix(dest)
                .and_then(|rest| rest.strip_suffix('-'))
                .is_some_and(|rest| {
                    self.codes().any(|src| {
                        rest.strip_suffix(src)
                            .is_some_and(|base| base.ends_with('_'))
                    })
                })
        })
    }
}
