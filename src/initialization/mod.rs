//! Application initialization.
//!
//! Process-wide setup performed once by the binary before any pipeline work:
//! loading `.env` and installing the logger.

mod logger;

use log::debug;

// Re-export public API
pub use logger::init_logger_with;

/// Loads environment variables from a `.env` file, if one exists.
///
/// The current directory is tried first, then the directory containing the
/// executable. A missing file is not an error.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let env_path = exe_dir.join(".env");
            if env_path.exists() {
                if let Err(e) = dotenvy::from_path(&env_path) {
                    debug!("Ignoring unreadable {}: {}", env_path.display(), e);
                }
            }
        }
    }
}
