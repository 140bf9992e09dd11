pub mod api; // HTTP router + endpoint handlers
pub mod config;
pub mod consult; // Send/upload orchestration
pub mod doctors; // Doctor directory
pub mod gateway; // Message exchange contract + simulated backend
pub mod models;
pub mod session; // Conversation log + registry

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the built-in default filter applies.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
