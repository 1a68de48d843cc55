use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub progress: bool,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(flags, std::io::stdout().is_terminal()));
}

/// Spinners only make sense for a person watching text output.
const fn resolve(flags: &GlobalFlags, is_tty: bool) -> UiPrefs {
    UiPrefs {
        progress: is_tty && !flags.quiet && matches!(flags.format, OutputFormat::Text),
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs { progress: false })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet,
            verbose: false,
        }
    }

    #[test]
    fn progress_needs_tty_and_text() {
        assert!(resolve(&flags(OutputFormat::Text, false), true).progress);
        assert!(!resolve(&flags(OutputFormat::Text, false), false).progress);
        assert!(!resolve(&flags(OutputFormat::Json, false), true).progress);
        assert!(!resolve(&flags(OutputFormat::Text, true), true).progress);
    }
}
