//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");
    let timestamp = Local::now().to_rfc3339();

    // Build the crash report
    let report = format!(
        "=== CRITICAL PANIC ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {:?}\n\
         Payload: {}\n\n\
         Stack Trace:\n{:?}",
        timestamp,
        thread_name,
        info.location(),
        payload_message(info.payload()),
        backtrace
    );

    // 1. Log to stderr (always available)
    eprintln!("{}", report);

    // 2. Log via tracing
    tracing::error!("{}", report);

    // 3. Write crash dump file next to the logs
    let dump_filename = format!(
        "meal_explorer_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let dump_dir = super::log_dir();
    let dump_path = if dump_dir.is_dir() {
        dump_dir.join(&dump_filename)
    } else {
        std::env::temp_dir().join(&dump_filename)
    };

    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    } else {
        eprintln!("Crash dump written to {}", dump_path.display());
    }
}

/// Panic payloads are `&str` for literals and `String` for formatted messages
fn payload_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<unknown>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_message() {
        let literal: Box<dyn Any + Send> = Box::new("boom");
        let formatted: Box<dyn Any + Send> = Box::new(format!("bad id {}", 7));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(payload_message(literal.as_ref()), "boom");
        assert_eq!(payload_message(formatted.as_ref()), "bad id 7");
        assert_eq!(payload_message(other.as_ref()), "<unknown>");
    }
}
