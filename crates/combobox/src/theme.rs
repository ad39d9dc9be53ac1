//! Colors and text attributes.
//!
//! The theme is an explicit value handed to the widget; nothing is inferred
//! from the terminal. [`Theme::plain`] carries no styling at all, which keeps
//! rendered output free of escape codes (useful in tests and when output is
//! not a terminal).

use std::str::FromStr;

use crossterm::style::{Attribute, Color, ContentStyle};
use serde::{Deserialize, Serialize};

/// Named theme choice used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
    /// No colors or attributes.
    Plain,
}

impl FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "plain" | "none" => Ok(Self::Plain),
            other => Err(format!("unknown theme {other:?} (expected light, dark or plain)")),
        }
    }
}

/// Styles for every part of the combobox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub label: ContentStyle,
    pub required_mark: ContentStyle,
    pub text: ContentStyle,
    pub placeholder: ContentStyle,
    pub ghost: ContentStyle,
    pub cursor: ContentStyle,
    pub icon: ContentStyle,
    pub border: ContentStyle,
    pub border_focused: ContentStyle,
    pub border_error: ContentStyle,
    pub chip: ContentStyle,
    pub item: ContentStyle,
    pub highlighted: ContentStyle,
    pub selected: ContentStyle,
    pub badge: ContentStyle,
    pub muted: ContentStyle,
    pub error: ContentStyle,
    pub footer: ContentStyle,
    pub disabled: ContentStyle,
}

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::default()
    }
}

fn fg_on(color: Color, background: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        background_color: Some(background),
        ..ContentStyle::default()
    }
}

fn with(mut style: ContentStyle, attribute: Attribute) -> ContentStyle {
    style.attributes.set(attribute);
    style
}

fn attr(attribute: Attribute) -> ContentStyle {
    with(ContentStyle::default(), attribute)
}

impl Theme {
    pub fn light() -> Self {
        let blue = Color::Rgb { r: 59, g: 130, b: 246 };
        let gray = Color::Rgb { r: 107, g: 114, b: 128 };
        let red = Color::Rgb { r: 239, g: 68, b: 68 };
        Self {
            label: with(fg(Color::Rgb { r: 55, g: 65, b: 81 }), Attribute::Bold),
            required_mark: fg(red),
            text: fg(Color::Rgb { r: 17, g: 24, b: 39 }),
            placeholder: fg(Color::Rgb { r: 156, g: 163, b: 175 }),
            ghost: fg(Color::Rgb { r: 191, g: 191, b: 191 }),
            cursor: attr(Attribute::Reverse),
            icon: fg(gray),
            border: fg(Color::Rgb { r: 209, g: 213, b: 219 }),
            border_focused: fg(blue),
            border_error: fg(red),
            chip: fg_on(Color::Rgb { r: 30, g: 64, b: 175 }, Color::Rgb { r: 219, g: 234, b: 254 }),
            item: fg(Color::Rgb { r: 17, g: 24, b: 39 }),
            highlighted: fg_on(Color::Rgb { r: 17, g: 24, b: 39 }, Color::Rgb { r: 243, g: 244, b: 246 }),
            selected: fg_on(Color::White, blue),
            badge: fg_on(Color::Rgb { r: 30, g: 64, b: 175 }, Color::Rgb { r: 219, g: 234, b: 254 }),
            muted: fg(gray),
            error: fg(red),
            footer: fg(blue),
            disabled: attr(Attribute::Dim),
        }
    }

    pub fn dark() -> Self {
        let blue = Color::Rgb { r: 96, g: 165, b: 250 };
        let gray = Color::Rgb { r: 156, g: 163, b: 175 };
        let red = Color::Rgb { r: 248, g: 113, b: 113 };
        let white = Color::Rgb { r: 249, g: 250, b: 251 };
        Self {
            label: with(fg(Color::Rgb { r: 209, g: 213, b: 219 }), Attribute::Bold),
            required_mark: fg(red),
            text: fg(white),
            placeholder: fg(Color::Rgb { r: 107, g: 114, b: 128 }),
            ghost: fg(Color::Rgb { r: 90, g: 90, b: 90 }),
            cursor: attr(Attribute::Reverse),
            icon: fg(gray),
            border: fg(Color::Rgb { r: 75, g: 85, b: 99 }),
            border_focused: fg(blue),
            border_error: fg(red),
            chip: fg_on(Color::Rgb { r: 191, g: 219, b: 254 }, Color::Rgb { r: 30, g: 58, b: 138 }),
            item: fg(white),
            highlighted: fg_on(white, Color::Rgb { r: 55, g: 65, b: 81 }),
            selected: fg_on(Color::White, Color::Rgb { r: 37, g: 99, b: 235 }),
            badge: fg_on(Color::Rgb { r: 147, g: 197, b: 253 }, Color::Rgb { r: 30, g: 58, b: 138 }),
            muted: fg(gray),
            error: fg(red),
            footer: fg(blue),
            disabled: attr(Attribute::Dim),
        }
    }

    /// No styling; output is plain text.
    pub fn plain() -> Self {
        let none = ContentStyle::default();
        Self {
            label: none,
            required_mark: none,
            text: none,
            placeholder: none,
            ghost: none,
            cursor: none,
            icon: none,
            border: none,
            border_focused: none,
            border_error: none,
            chip: none,
            item: none,
            highlighted: none,
            selected: none,
            badge: none,
            muted: none,
            error: none,
            footer: none,
            disabled: none,
        }
    }

    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Light => Self::light(),
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Plain => Self::plain(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Applies `style` to `text`. Unstyled text is returned as-is.
pub fn paint(style: ContentStyle, text: &str) -> String {
    if style == ContentStyle::default() || text.is_empty() {
        text.to_string()
    } else {
        style.apply(text).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paint_is_identity() {
        let theme = Theme::plain();
        assert_eq!(paint(theme.highlighted, "Apple"), "Apple");
    }

    #[test]
    fn test_styled_paint_adds_escapes() {
        let theme = Theme::dark();
        let out = paint(theme.error, "boom");
        assert!(out.contains("boom"));
        assert!(out.starts_with('\u{1b}'));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Dark".parse::<ThemeVariant>(), Ok(ThemeVariant::Dark));
        assert_eq!("none".parse::<ThemeVariant>(), Ok(ThemeVariant::Plain));
        assert!("sepia".parse::<ThemeVariant>().is_err());
        assert_eq!(Theme::from_variant(ThemeVariant::Plain), Theme::plain());
    }
}
