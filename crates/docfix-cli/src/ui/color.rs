//! Color selection for `docfix` output, driven by `--color` / `DOCFIX_COLOR`.
//!
//! `auto` colors the `[ok]`/`[skip]`/... prefixes only when stdout is a
//! terminal and `NO_COLOR` (https://no-color.org/) is unset, so piped or
//! `--json` output stays plain.

use std::io::IsTerminal;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color even when output is piped.
    Always,
    /// Plain prefixes only.
    Never,
    /// Color when writing to a terminal without `NO_COLOR`.
    #[default]
    Auto,
}

impl ColorMode {
    /// Parse a `--color` value, ignoring case. Unknown values give `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Whether per-file lines should be colored.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => Self::should_auto_colorize(),
        }
    }

    /// Colors in auto mode: off when `NO_COLOR` is set or stdout is not a TTY.
    fn should_auto_colorize() -> bool {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        std::io::stdout().is_terminal()
    }
}
