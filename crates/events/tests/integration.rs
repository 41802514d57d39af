//! Integration tests for events

#[cfg(test)]
mod tests {
    use binlink_errors::LauncherError;
    use binlink_events::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_event_sender_emit() {
        let (tx, mut rx) = channel();

        tx.emit_warning_with_context("stale staging link", "/usr/local/bin/.x.tmp");
        tx.emit_debug("test debug");

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            &event1,
            AppEvent::General(GeneralEvent::Warning { context: Some(_), .. })
        ));
        assert_eq!(event1.level(), EventLevel::Warn);

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_debug("ignored");
    }

    #[test]
    fn test_absent_sender_is_noop() {
        let sender: Option<EventSender> = None;
        sender.emit_debug("nobody listening");
    }

    #[test]
    fn test_install_failed_is_error_level() {
        let err = LauncherError::PermissionDenied {
            operation: "link_atomic".into(),
            message: "User canceled.".into(),
        };
        let event = AppEvent::Launcher(LauncherEvent::InstallFailed {
            operation_id: "op".into(),
            alias: PathBuf::from("/usr/local/bin/app-bin"),
            failure: FailureContext::from_error(&err),
        });
        assert_eq!(event.level(), EventLevel::Error);
        assert_eq!(event.log_level(), tracing::Level::ERROR);
        assert_eq!(event.event_source().as_str(), "launcher");
    }

    #[test]
    fn test_launcher_event_serialization() {
        let event = AppEvent::Launcher(LauncherEvent::StatusChecked {
            alias: PathBuf::from("/usr/local/bin/app-bin"),
            target: PathBuf::from("/Applications/App.app/Contents/Resources/app-bin"),
            installed: true,
            detail: None,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "launcher");
        assert_eq!(json["event"]["event_type"], "status_checked");
        assert_eq!(json["event"]["installed"], true);
        assert!(json["event"].get("detail").is_none());
    }

    #[test]
    fn test_failure_context_from_error() {
        let err = LauncherError::Io {
            operation: "symlink".into(),
            path: "/usr/local/bin/app-bin".into(),
            message: "Read-only file system (os error 30)".into(),
        };
        let failure = FailureContext::from_error(&err);
        assert_eq!(failure.code.as_deref(), Some("launcher.io"));
        assert!(failure.message.contains("Read-only file system"));
        assert!(!failure.retryable);
    }
}
