//! Output languages understood by `protoc` and their generator flags.

use std::fmt;
use std::str::FromStr;

/// Target language for generated bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Cpp,
    CSharp,
    Java,
    JavaScript,
    ObjectiveC,
    Php,
    Python,
    Ruby,
    Go,
}

impl Language {
    /// Every supported language in display order.
    pub const ALL: [Language; 9] = [
        Language::Cpp,
        Language::CSharp,
        Language::Java,
        Language::JavaScript,
        Language::ObjectiveC,
        Language::Php,
        Language::Python,
        Language::Ruby,
        Language::Go,
    ];

    /// Human-readable label shown in the language picker.
    pub fn label(self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::ObjectiveC => "Objective C",
            Language::Php => "PHP",
            Language::Python => "Python",
            Language::Ruby => "Ruby",
            Language::Go => "Golang",
        }
    }

    /// The `protoc` output flag selecting this language's generator.
    pub fn flag(self) -> &'static str {
        match self {
            Language::Cpp => "--cpp_out",
            Language::CSharp => "--csharp_out",
            Language::Java => "--java_out",
            Language::JavaScript => "--js_out",
            Language::ObjectiveC => "--objc_out",
            Language::Php => "--php_out",
            Language::Python => "--python_out",
            Language::Ruby => "--ruby_out",
            Language::Go => "--go_out",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Language::Cpp => &["cpp", "c++", "cxx"],
            Language::CSharp => &["csharp", "c#", "cs"],
            Language::Java => &["java"],
            Language::JavaScript => &["javascript", "js"],
            Language::ObjectiveC => &["objective c", "objective-c", "objc"],
            Language::Php => &["php"],
            Language::Python => &["python", "py"],
            Language::Ruby => &["ruby", "rb"],
            Language::Go => &["golang", "go"],
        }
    }

    /// Exact lookup by picker label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.label() == label)
    }

    /// The language after this one in picker order, wrapping around.
    pub fn next(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// The language before this one in picker order, wrapping around.
    pub fn previous(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|lang| *lang == self)
            .unwrap_or_default()
    }
}

/// Map a picker label to its compiler flag.
///
/// Unknown labels, including the empty string, map to an empty flag which callers treat as
/// "no language selected".
pub fn flag_for_label(label: &str) -> &'static str {
    Language::from_label(label).map_or("", Language::flag)
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(lang) = Self::from_label(trimmed) {
            return Ok(lang);
        }
        let lower = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.aliases().contains(&lower.as_str()))
            .ok_or_else(|| LanguageParseError::UnknownLanguage(trimmed.to_string()))
    }
}

/// Error returned when parsing a [`Language`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LanguageParseError {
    #[error("unknown output language '{0}'")]
    UnknownLanguage(String),
}
