//! Theme system for dark/light modes

use qamd_core::config::ThemeVariant;
use qamd_core::highlight::TokenClass;
use ratatui::style::{Color, Modifier, Style};

/// Theme definition
#[derive(Clone, Debug)]
pub struct Theme {
    pub base: Style,
    pub heading: [Style; 3],
    pub code: Style,
    pub code_header: Style,
    pub copy_idle: Style,
    pub copy_done: Style,
    pub keyword: Style,
    pub function: Style,
    pub comment: Style,
    pub string: Style,
    pub number: Style,
    pub tag: Style,
    pub attribute: Style,
    pub selector: Style,
    pub property: Style,
    pub border: Color,
    pub cursor_line_bg: Color,
    pub status_bar_fg: Color,
    pub status_bar_bg: Color,
}

impl Theme {
    /// Create a theme for the given variant
    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Style for a highlighted token
    pub fn token(&self, class: Option<TokenClass>) -> Style {
        match class {
            None => self.code,
            Some(TokenClass::Keyword) => self.keyword,
            Some(TokenClass::Function) => self.function,
            Some(TokenClass::Comment) | Some(TokenClass::Docstring) => self.comment,
            Some(TokenClass::String) | Some(TokenClass::Value) => self.string,
            Some(TokenClass::Number) => self.number,
            Some(TokenClass::Tag) => self.tag,
            Some(TokenClass::Attribute) => self.attribute,
            Some(TokenClass::Selector) => self.selector,
            Some(TokenClass::Property) => self.property,
        }
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            base: Style::default().fg(Color::White),
            heading: [
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ],
            code: Style::default().fg(Color::Gray),
            code_header: Style::default().fg(Color::Black).bg(Color::DarkGray),
            copy_idle: Style::default().fg(Color::White).bg(Color::DarkGray),
            copy_done: Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            keyword: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            function: Style::default().fg(Color::LightBlue),
            comment: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            string: Style::default().fg(Color::LightGreen),
            number: Style::default().fg(Color::LightYellow),
            tag: Style::default().fg(Color::LightRed),
            attribute: Style::default().fg(Color::Yellow),
            selector: Style::default().fg(Color::LightCyan),
            property: Style::default().fg(Color::Cyan),
            border: Color::DarkGray,
            cursor_line_bg: Color::Rgb(40, 40, 40), // Subtle dark gray
            status_bar_fg: Color::Black,
            status_bar_bg: Color::LightBlue,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            base: Style::default().fg(Color::Black),
            heading: [
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ],
            code: Style::default().fg(Color::Rgb(60, 60, 60)),
            code_header: Style::default().fg(Color::Black).bg(Color::Gray),
            copy_idle: Style::default().fg(Color::Black).bg(Color::Gray),
            copy_done: Style::default()
                .fg(Color::White)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            keyword: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            function: Style::default().fg(Color::Blue),
            comment: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            string: Style::default().fg(Color::Green),
            number: Style::default().fg(Color::Rgb(150, 100, 0)), // Dark yellow
            tag: Style::default().fg(Color::Red),
            attribute: Style::default().fg(Color::Rgb(150, 75, 0)), // Orange-brown
            selector: Style::default().fg(Color::Blue),
            property: Style::default().fg(Color::Cyan),
            border: Color::Gray,
            cursor_line_bg: Color::Rgb(230, 230, 250), // Light lavender
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_styles_differ_from_plain_code() {
        let theme = Theme::dark();
        assert_ne!(theme.token(Some(TokenClass::Keyword)), theme.token(None));
        assert_eq!(
            theme.token(Some(TokenClass::Docstring)),
            theme.token(Some(TokenClass::Comment))
        );
    }
}
