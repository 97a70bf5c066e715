use std::{
    io::IsTerminal,
    sync::{OnceLock, RwLock},
};

use colored::{Color, Colorize};

use crate::cli::output::{current_preferences, OutputPreferences};

#[derive(Clone, Debug)]
pub struct UiStyle {
    pub horizontal: char,
    pub use_color: bool,
    pub color_header: Option<Color>,
    pub plain_mode: bool,
}

static STYLE: OnceLock<RwLock<UiStyle>> = OnceLock::new();

pub fn style() -> UiStyle {
    STYLE
        .get_or_init(|| RwLock::new(UiStyle::detect()))
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_else(|_| UiStyle::plain())
}

pub fn refresh_style() {
    let lock = STYLE.get_or_init(|| RwLock::new(UiStyle::detect()));
    if let Ok(mut guard) = lock.write() {
        *guard = UiStyle::detect();
    }
}

impl UiStyle {
    /// Style without colour or box drawing; used for captured output.
    pub fn plain() -> Self {
        Self::from_preferences(
            &OutputPreferences {
                plain_mode: true,
                color_enabled: false,
            },
            false,
        )
    }

    fn detect() -> Self {
        let tty = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::from_preferences(&current_preferences(), tty)
    }

    fn from_preferences(prefs: &OutputPreferences, tty: bool) -> Self {
        let use_color = tty && prefs.color_enabled && !prefs.plain_mode;
        Self {
            horizontal: if prefs.plain_mode { '-' } else { '─' },
            use_color,
            color_header: use_color.then_some(Color::BrightBlue),
            plain_mode: prefs.plain_mode,
        }
    }

    pub fn horizontal_line(&self, width: usize) -> String {
        self.horizontal.to_string().repeat(width)
    }

    pub fn apply_header_style(&self, text: &str) -> String {
        match (self.use_color, self.color_header) {
            (true, Some(color)) => text.color(color).bold().to_string(),
            (true, None) => text.bold().to_string(),
            _ => text.to_string(),
        }
    }
}
