//! Language identification and detection
//!
//! Maps file extensions to language IDs and provides language metadata.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Rust,
    Python,
    Go,
    Php,
    C,
    Cpp,
    Java,
    Bash,
    Scheme,
    Ini,
    Xml,
}

/// Every language that ships a grammar and highlight query
pub const HIGHLIGHTED_LANGUAGES: &[LanguageId] = &[
    LanguageId::Rust,
    LanguageId::Python,
    LanguageId::Go,
    LanguageId::Php,
    LanguageId::C,
    LanguageId::Cpp,
    LanguageId::Java,
    LanguageId::Bash,
    LanguageId::Scheme,
    LanguageId::Ini,
    LanguageId::Xml,
];

impl LanguageId {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => LanguageId::Rust,
            "py" | "pyi" => LanguageId::Python,
            "go" => LanguageId::Go,
            "php" => LanguageId::Php,
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
            "java" => LanguageId::Java,
            "sh" | "bash" | "zsh" => LanguageId::Bash,
            "scm" | "ss" | "rkt" => LanguageId::Scheme,
            "ini" | "cfg" => LanguageId::Ini,
            "xml" | "svg" | "plist" => LanguageId::Xml,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Look up a language by its short name ("rust", "cpp", ...), as used on the
    /// command line and for query override directories
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        HIGHLIGHTED_LANGUAGES
            .iter()
            .copied()
            .chain(std::iter::once(LanguageId::PlainText))
            .find(|lang| lang.short_name() == name)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Rust => "Rust",
            LanguageId::Python => "Python",
            LanguageId::Go => "Go",
            LanguageId::Php => "PHP",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
            LanguageId::Scheme => "Scheme",
            LanguageId::Ini => "INI",
            LanguageId::Xml => "XML",
        }
    }

    /// Lowercase identifier, also the directory name under `queries/`
    pub fn short_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "text",
            LanguageId::Rust => "rust",
            LanguageId::Python => "python",
            LanguageId::Go => "go",
            LanguageId::Php => "php",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::Java => "java",
            LanguageId::Bash => "bash",
            LanguageId::Scheme => "scheme",
            LanguageId::Ini => "ini",
            LanguageId::Xml => "xml",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(LanguageId::from_extension("rs"), LanguageId::Rust);
        assert_eq!(LanguageId::from_extension("RS"), LanguageId::Rust);
        assert_eq!(LanguageId::from_extension("py"), LanguageId::Python);
        assert_eq!(LanguageId::from_extension("hpp"), LanguageId::Cpp);
        assert_eq!(LanguageId::from_extension("rkt"), LanguageId::Scheme);
        assert_eq!(LanguageId::from_extension("txt"), LanguageId::PlainText);
        assert_eq!(LanguageId::from_extension("unknown"), LanguageId::PlainText);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            LanguageId::from_path(Path::new("/path/to/main.rs")),
            LanguageId::Rust
        );
        assert_eq!(
            LanguageId::from_path(Path::new("Info.plist")),
            LanguageId::Xml
        );
        assert_eq!(
            LanguageId::from_path(Path::new("no_extension")),
            LanguageId::PlainText
        );
    }

    #[test]
    fn test_from_name_round_trips_short_name() {
        for &lang in HIGHLIGHTED_LANGUAGES {
            assert_eq!(LanguageId::from_name(lang.short_name()), Some(lang));
        }
        assert_eq!(LanguageId::from_name("CPP"), Some(LanguageId::Cpp));
        assert_eq!(LanguageId::from_name("cobol"), None);
    }

    #[test]
    fn test_plain_text_has_no_highlighting() {
        assert!(!LanguageId::PlainText.has_highlighting());
        assert!(HIGHLIGHTED_LANGUAGES.iter().all(|l| l.has_highlighting()));
    }
}
