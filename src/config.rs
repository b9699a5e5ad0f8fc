use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "DigTrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the HTTP API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info,tower_http=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/DigTrack/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("DigTrack")
}

/// Get the uploaded-files directory (prints and photos, content-addressed)
pub fn files_dir() -> PathBuf {
    app_data_dir().join("files")
}

/// Get the SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("digtrack.db")
}
