//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a fallback level, letting `RUST_LOG` override it
///
/// Returns `false` if a logger was already installed.
pub fn init_with_level(level: log::LevelFilter) -> bool {
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    env_logger::Builder::from_env(env).try_init().is_ok()
}
