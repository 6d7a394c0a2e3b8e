use super::*;
use serial_test::serial;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.messages.lock().unwrap().push(entry.message.clone());
    }
}

fn install_capture() -> Arc<Mutex<Vec<String>>> {
    let messages = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger {
        messages: messages.clone(),
    });
    messages
}

fn captured(messages: &Arc<Mutex<Vec<String>>>, needle: &str) -> bool {
    messages.lock().unwrap().iter().any(|m| m == needle)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
#[serial]
fn test_initialize_is_idempotent() {
    assert!(Engine::initialize().is_ok());
    assert!(Engine::initialize().is_ok());
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_shutdown_restores_default_logger() {
    let messages = install_capture();

    Engine::log(LogSeverity::Info, "meshstream::tests", "before shutdown".to_string());
    assert!(captured(&messages, "before shutdown"));

    Engine::shutdown();

    // Custom logger replaced; later logs no longer reach the capture
    Engine::log(LogSeverity::Info, "meshstream::tests", "after shutdown".to_string());
    assert!(!captured(&messages, "after shutdown"));
}

// ============================================================================
// log / log_detailed
// ============================================================================

#[test]
#[serial]
fn test_log_detailed_reaches_custom_logger() {
    let messages = install_capture();

    Engine::log_detailed(
        LogSeverity::Error,
        "meshstream::tests",
        "boom".to_string(),
        file!(),
        line!(),
    );
    assert!(captured(&messages, "boom"));

    Engine::reset_logger();
}
