//! ANSI styling for the text output

use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
    White,
    Dim,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "91",
            Color::Green => "92",
            Color::Yellow => "93",
            Color::Cyan => "96",
            Color::White => "97",
            Color::Dim => "2",
        }
    }
}

pub fn colorize(text: &str, color: Color) -> String {
    paint(text, color.code())
}

pub fn bold(text: &str, color: Color) -> String {
    paint(text, &format!("1;{}", color.code()))
}

fn paint(text: &str, codes: &str) -> String {
    if enabled() {
        format!("\x1b[{codes}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Decided once per process; unit tests always get plain text
fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        !cfg!(test)
            && wants_color(
                env::var("NO_COLOR").ok().as_deref(),
                env::var("FORCE_COLOR").ok().as_deref(),
                std::io::stdout().is_terminal(),
                env::var("TERM").ok().as_deref(),
            )
    })
}

fn wants_color(
    no_color: Option<&str>,
    force_color: Option<&str>,
    is_terminal: bool,
    term: Option<&str>,
) -> bool {
    if no_color.is_some() || force_color == Some("0") {
        return false;
    }
    if force_color.is_some() {
        return true;
    }
    is_terminal && term.is_some_and(|term| !term.is_empty() && term != "dumb")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn test_colorize__plain_in_tests() {
        assert_eq!(colorize("reachable", Color::Green), "reachable");
        assert_eq!(bold("Timeout", Color::Cyan), "Timeout");
        assert_eq!(colorize("", Color::Red), "");
    }

    #[test]
    fn test_wants_color__env_overrides() {
        assert!(!wants_color(Some("1"), Some("1"), true, Some("xterm")));
        assert!(!wants_color(None, Some("0"), true, Some("xterm")));
        assert!(wants_color(None, Some("1"), false, None));
    }

    #[test]
    fn test_wants_color__needs_capable_terminal() {
        assert!(wants_color(None, None, true, Some("xterm-256color")));
        assert!(!wants_color(None, None, false, Some("xterm-256color")));
        assert!(!wants_color(None, None, true, Some("dumb")));
        assert!(!wants_color(None, None, true, Some("")));
        assert!(!wants_color(None, None, true, None));
    }

    #[test]
    fn test_color_codes() {
        assert_eq!(Color::Red.code(), "91");
        assert_eq!(Color::Dim.code(), "2");
    }
}
