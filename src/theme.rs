//! Theme system for syntax highlighting
//!
//! Provides YAML-based theming with compile-time embedded themes and
//! user-defined themes from config directories. A theme maps capture tags
//! to a color and font style; the highlighter only sees it through
//! [`ThemePolicy`].
//!
//! Theme loading priority:
//! 1. User config: `~/.config/token-editor/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/default-dark.yaml");
pub const GITHUB_LIGHT_YAML: &str = include_str!("../themes/github-light.yaml");

const THEME_VERSION: u32 = 1;

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "github-light",
        yaml: GITHUB_LIGHT_YAML,
    },
];

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/token-editor/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    /// Stable identifier (e.g., "default-dark", "my-custom-theme")
    pub id: String,
    /// Display name from YAML (e.g., "Default Dark")
    pub name: String,
    /// Where this theme is loaded from
    pub source: ThemeSource,
}

/// How capture tags are styled. Implemented by [`Theme`]; tests and embedders
/// can supply their own.
pub trait ThemePolicy {
    /// Foreground color for a tag, `None` to leave the text's default color
    fn color_for(&self, tag: &str) -> Option<Color>;

    /// Font variant for a tag
    fn font_for(&self, tag: &str) -> FontStyle;
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes from all sources
///
/// User themes override builtins with the same id.
pub fn list_available_themes() -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = crate::config_paths::themes_dir() {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                        if seen_ids.insert(id.to_string()) {
                            let name = from_file(&path)
                                .map(|t| t.name)
                                .unwrap_or_else(|_| id.to_string());
                            themes.push(ThemeInfo {
                                id: id.to_string(),
                                name,
                                source: ThemeSource::User,
                            });
                        }
                    }
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        match s.len() {
            6 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: 255,
            }),
            8 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: u8::from_str_radix(&s[6..8], 16).map_err(|e| e.to_string())?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBB", or "#RRGGBBAA" when not opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Font variant applied to a token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    /// True when this is the regular font (no visible difference)
    pub const fn is_plain(&self) -> bool {
        !self.bold && !self.italic
    }
}

/// Resolved style for one capture tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntaxStyle {
    pub color: Option<Color>,
    pub font: FontStyle,
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    /// Format version, currently always 1
    pub version: u32,
    pub name: String,
    /// Capture tag → style
    #[serde(default)]
    pub syntax: HashMap<String, SyntaxStyleData>,
}

/// A syntax entry: either just a hex color or a table
///
/// ```yaml
/// syntax:
///   keyword: "#CC7832"
///   comment: { color: "#808080", italic: true }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SyntaxStyleData {
    Color(String),
    Style {
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
    },
}

impl SyntaxStyleData {
    fn resolve(&self) -> Result<SyntaxStyle, String> {
        match self {
            SyntaxStyleData::Color(hex) => Ok(SyntaxStyle {
                color: Some(Color::from_hex(hex)?),
                font: FontStyle::default(),
            }),
            SyntaxStyleData::Style {
                color,
                bold,
                italic,
            } => Ok(SyntaxStyle {
                color: color.as_deref().map(Color::from_hex).transpose()?,
                font: FontStyle {
                    bold: *bold,
                    italic: *italic,
                },
            }),
        }
    }
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub syntax: SyntaxTheme,
}

/// Capture tag styles (resolved)
#[derive(Debug, Clone, Default)]
pub struct SyntaxTheme {
    styles: HashMap<String, SyntaxStyle>,
}

impl SyntaxTheme {
    pub fn new(styles: HashMap<String, SyntaxStyle>) -> Self {
        Self { styles }
    }

    /// Style for a capture tag
    ///
    /// Handles hierarchical names: tries the exact tag first, then
    /// progressively shorter parents ("keyword.control.import" →
    /// "keyword.control" → "keyword").
    pub fn style_for(&self, tag: &str) -> Option<&SyntaxStyle> {
        let mut current = tag;
        loop {
            if let Some(style) = self.styles.get(current) {
                return Some(style);
            }
            let dot_pos = current.rfind('.')?;
            current = &current[..dot_pos];
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        if data.version != THEME_VERSION {
            return Err(format!(
                "Unsupported theme version {} (expected {})",
                data.version, THEME_VERSION
            ));
        }

        let styles = data
            .syntax
            .iter()
            .map(|(tag, style)| {
                style
                    .resolve()
                    .map(|resolved| (tag.clone(), resolved))
                    .map_err(|e| format!("Invalid style for '{}': {}", tag, e))
            })
            .collect::<Result<HashMap<_, _>, String>>()?;

        Ok(Theme {
            name: data.name,
            syntax: SyntaxTheme::new(styles),
        })
    }

    /// Default dark theme (YAML-backed with Rust fallback)
    pub fn default_dark() -> Self {
        match Theme::from_yaml(DEFAULT_DARK_YAML) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::error!("Built-in default theme failed to parse: {}", e);
                Theme {
                    name: "Default Dark".to_string(),
                    syntax: SyntaxTheme::default(),
                }
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

impl ThemePolicy for Theme {
    fn color_for(&self, tag: &str) -> Option<Color> {
        self.syntax.style_for(tag).and_then(|style| style.color)
    }

    fn font_for(&self, tag: &str) -> FontStyle {
        self.syntax
            .style_for(tag)
            .map(|style| style.font)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_for_falls_back_to_parent() {
        let mut styles = HashMap::new();
        styles.insert(
            "keyword".to_string(),
            SyntaxStyle {
                color: Some(Color::rgb(0xCC, 0x78, 0x32)),
                font: FontStyle::default(),
            },
        );
        let syntax = SyntaxTheme::new(styles);

        assert!(syntax.style_for("keyword").is_some());
        assert!(syntax.style_for("keyword.control.import").is_some());
        assert!(syntax.style_for("keywords").is_none());
        assert!(syntax.style_for("string").is_none());
    }

    #[test]
    fn test_exact_tag_wins_over_parent() {
        let theme = Theme::from_yaml(
            r##"
version: 1
name: Test
syntax:
  function: "#FFC66D"
  function.builtin: { color: "#8888C6", italic: true }
"##,
        )
        .unwrap();

        assert_eq!(theme.color_for("function.method"), Some(Color::rgb(0xFF, 0xC6, 0x6D)));
        assert_eq!(theme.color_for("function.builtin"), Some(Color::rgb(0x88, 0x88, 0xC6)));
        assert!(theme.font_for("function.builtin").italic);
        assert!(theme.font_for("function").is_plain());
    }

    #[test]
    fn test_invalid_syntax_color_rejected() {
        let result = Theme::from_yaml(
            r##"
version: 1
name: Broken
syntax:
  keyword: "not-a-color"
"##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_color_hex_round_trip() {
        assert_eq!(Color::rgb(0x1E, 0x2F, 0xA0).to_hex(), "#1E2FA0");
        assert_eq!(Color::rgba(0x1E, 0x2F, 0xA0, 0x80).to_hex(), "#1E2FA080");
        assert_eq!(Color::from_hex("#1E2FA0").unwrap(), Color::rgb(0x1E, 0x2F, 0xA0));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = Theme::from_yaml("version: 2\nname: Future\n");
        assert!(result.unwrap_err().contains("version 2"));
    }
}
