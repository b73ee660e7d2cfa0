//! Site configuration module.
//!
//! Handles loading and validating the `config.toml` at the content root.
//! Configuration is sparse: stock defaults are overridden by whatever keys
//! the user's file provides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Goalie Drills"
//! tagline = "Hockey drills that incorporate the entire team while emphasizing goaltender development."
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! primary = "#0a3161"       # Header, links, card titles
//! accent = "#b31942"        # Call-to-action buttons
//!
//! [colors.dark]
//! background = "#111827"
//! text = "#e5e7eb"
//! primary = "#1d4ed8"
//! accent = "#991b1b"
//! ```
//!
//! ## Partial Configuration
//!
//! Override just the values you want:
//!
//! ```toml
//! # Only override the accent color
//! [colors.light]
//! accent = "#cc0000"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity (title, tagline).
    pub site: SiteIdentity,
    /// Color palettes for light and dark modes.
    pub colors: ColorConfig,
}

/// Site title and tagline shown on the listing page header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteIdentity {
    pub title: String,
    pub tagline: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            title: "Goalie Drills".to_string(),
            tagline: "Hockey drills that incorporate the entire team while \
                      emphasizing goaltender development."
                .to_string(),
        }
    }
}

/// Light and dark palettes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: Palette,
    pub dark: DarkPalette,
}

/// A single color palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub accent: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            primary: "#0a3161".to_string(),
            accent: "#b31942".to_string(),
        }
    }
}

/// Dark palette with its own defaults; same shape as [`Palette`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DarkPalette {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub accent: String,
}

impl Default for DarkPalette {
    fn default() -> Self {
        Self {
            background: "#111827".to_string(),
            text: "#e5e7eb".to_string(),
            primary: "#1d4ed8".to_string(),
            accent: "#991b1b".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        let palette_colors = [
            ("colors.light.background", &self.colors.light.background),
            ("colors.light.text", &self.colors.light.text),
            ("colors.light.primary", &self.colors.light.primary),
            ("colors.light.accent", &self.colors.light.accent),
            ("colors.dark.background", &self.colors.dark.background),
            ("colors.dark.text", &self.colors.dark.text),
            ("colors.dark.primary", &self.colors.dark.primary),
            ("colors.dark.accent", &self.colors.dark.accent),
        ];
        for (key, value) in palette_colors {
            if !is_hex_color(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a #rrggbb color, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Load `config.toml` from the content root, falling back to defaults when
/// the file does not exist. Parse and validation errors are never silently
/// defaulted away.
pub fn load_config(content_root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = content_root.join("config.toml");
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Generate CSS custom properties from the configured palettes.
///
/// The static stylesheet references these variables; dark mode is applied
/// via `prefers-color-scheme`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n  \
           --color-background: {};\n  \
           --color-text: {};\n  \
           --color-primary: {};\n  \
           --color-accent: {};\n\
         }}\n\n\
         @media (prefers-color-scheme: dark) {{\n  \
           :root {{\n    \
             --color-background: {};\n    \
             --color-text: {};\n    \
             --color-primary: {};\n    \
             --color-accent: {};\n  \
           }}\n\
         }}",
        colors.light.background,
        colors.light.text,
        colors.light.primary,
        colors.light.accent,
        colors.dark.background,
        colors.dark.text,
        colors.dark.primary,
        colors.dark.accent,
    )
}

/// A fully documented stock `config.toml`, printed by `drillbook gen-config`.
pub fn stock_config_toml() -> String {
    r##"# drillbook site configuration
# All options are optional - defaults shown below.

[site]
title = "Goalie Drills"
tagline = "Hockey drills that incorporate the entire team while emphasizing goaltender development."

# Palettes become CSS custom properties; dark applies via prefers-color-scheme.
[colors.light]
background = "#ffffff"
text = "#111111"
primary = "#0a3161"   # Header, links, card titles
accent = "#b31942"    # Call-to-action buttons

[colors.dark]
background = "#111827"
text = "#e5e7eb"
primary = "#1d4ed8"
accent = "#991b1b"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Goalie Drills");
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.colors.dark.background, "#111827");
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[colors.light]\naccent = \"#cc0000\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.colors.light.accent, "#cc0000");
        // Everything else stays at defaults
        assert_eq!(config.colors.light.primary, "#0a3161");
        assert_eq!(config.site.title, "Goalie Drills");
    }

    #[test]
    fn unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "colour = \"blue\"\n").unwrap();

        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_color_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[colors.light]\naccent = \"red\"\n",
        )
        .unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("colors.light.accent"));
    }

    #[test]
    fn empty_title_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "[site]\ntitle = \"  \"\n").unwrap();

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses_and_validates() {
        let config: SiteConfig = toml::from_str(&stock_config_toml()).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn color_css_contains_both_palettes() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("--color-primary: #0a3161"));
        assert!(css.contains("prefers-color-scheme: dark"));
        assert!(css.contains("--color-primary: #1d4ed8"));
    }
}
