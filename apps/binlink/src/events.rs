//! Event handling and user feedback

use binlink_events::{AppEvent, GeneralEvent, LauncherEvent};
use console::{Style, Term};

use crate::logging::log_event_with_tracing;

/// Logs every event and renders the user-relevant ones on stderr
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    quiet: bool,
    term: Term,
}

impl EventHandler {
    /// `quiet` suppresses all terminal output (JSON mode)
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet,
            term: Term::stderr(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);

        if self.quiet {
            return;
        }
        if let Some(line) = self.render(&event) {
            let _ = self.term.write_line(&line);
        }
    }

    fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Launcher(LauncherEvent::InstallStarted { alias, target, .. }) => {
                Some(self.styled(
                    Style::new().cyan(),
                    &format!("Linking {} -> {}", alias.display(), target.display()),
                ))
            }
            AppEvent::General(GeneralEvent::Warning { message, context }) => {
                let text = match context {
                    Some(context) => format!("Warning: {message} ({context})"),
                    None => format!("Warning: {message}"),
                };
                Some(self.styled(Style::new().yellow(), &text))
            }
            AppEvent::General(GeneralEvent::DebugLog { message }) if self.debug_enabled => {
                Some(self.styled(Style::new().dim(), message))
            }
            _ => None,
        }
    }

    fn styled(&self, style: Style, text: &str) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_install_started_rendered() {
        let handler = EventHandler::new(false, false, false);
        let line = handler
            .render(&AppEvent::Launcher(LauncherEvent::InstallStarted {
                operation_id: "op".into(),
                alias: PathBuf::from("/usr/local/bin/app-bin"),
                target: PathBuf::from("/Applications/App.app/Contents/Resources/app-bin"),
            }))
            .unwrap();
        assert_eq!(
            line,
            "Linking /usr/local/bin/app-bin -> /Applications/App.app/Contents/Resources/app-bin"
        );
    }

    #[test]
    fn test_warning_rendered_with_context() {
        let event = AppEvent::General(GeneralEvent::warning_with_context(
            "failed to remove staging link: Permission denied (os error 13)",
            "/usr/local/bin/.app-bin.1f2e.tmp",
        ));
        assert_eq!(
            EventHandler::new(false, false, false).render(&event).as_deref(),
            Some(
                "Warning: failed to remove staging link: Permission denied (os error 13) \
                 (/usr/local/bin/.app-bin.1f2e.tmp)"
            )
        );
    }

    #[test]
    fn test_debug_only_with_flag() {
        let event = AppEvent::General(GeneralEvent::debug("elevating"));
        assert!(EventHandler::new(false, false, false).render(&event).is_none());
        assert_eq!(
            EventHandler::new(false, true, false).render(&event).as_deref(),
            Some("elevating")
        );
    }
}
