//! Application-level constants and limits.

/// Application name as shown to clients.
pub const APP_NAME: &str = "MedAssist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "medassist_core=debug,info".to_string()
}

/// Maximum chat message length in characters.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Maximum files accepted in a single upload batch.
pub const MAX_UPLOAD_FILES: usize = 5;

/// Maximum decoded size of a single uploaded file (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How long a send/upload cycle waits for the gateway before the
/// pending-reply flag is cleared and the caller gets a timeout.
pub const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn log_filter_names_the_crate() {
        assert!(default_log_filter().contains("medassist_core"));
    }

    #[test]
    fn limits_are_sane() {
        assert!(MAX_MESSAGE_LEN >= 1000);
        assert!(MAX_UPLOAD_FILES >= 1);
        assert!(DEFAULT_REPLY_TIMEOUT_SECS >= 5);
    }
}
