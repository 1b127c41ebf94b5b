//! ANSI styling for text output.

use std::env;

use colored::{ColoredString, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    enabled: bool,
}

impl Color {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        style(text).to_string()
    }
}

/// Color is on unless disabled by flag, a non-empty `NO_COLOR`, or `TERM=dumb`.
pub fn color_enabled(no_color_flag: bool) -> bool {
    color_enabled_with(
        no_color_flag,
        env::var("NO_COLOR").ok().as_deref(),
        env::var("TERM").ok().as_deref(),
    )
}

pub fn color_enabled_with(no_color_flag: bool, no_color_env: Option<&str>, term: Option<&str>) -> bool {
    if no_color_flag {
        return false;
    }
    if no_color_env.is_some_and(|value| !value.is_empty()) {
        return false;
    }
    term != Some("dumb")
}
