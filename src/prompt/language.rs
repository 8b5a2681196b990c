//! Output language selection.

/// Language the compliment is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Czech,
    #[default]
    English,
}

impl Language {
    /// Resolve a BCP 47-ish tag such as `cs-CZ` or `en`.
    ///
    /// Any tag starting with `cs` (case-insensitive) is Czech; everything
    /// else, including a missing tag, falls back to English.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) if tag.to_lowercase().starts_with("cs") => Language::Czech,
            _ => Language::English,
        }
    }

    /// Human-readable name used inside the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Language::Czech => "Czech",
            Language::English => "English",
        }
    }
}
