use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Patient Manager";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the data file location.
pub const DATA_FILE_ENV: &str = "PATIENT_MANAGER_DATA";

/// Default data file name inside the application data directory.
pub const DATA_FILE_NAME: &str = "patients.json";

/// Get the application data directory
/// ~/PatientManager/ on all platforms; the working directory if no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("PatientManager")
}

/// Data file path: `$PATIENT_MANAGER_DATA` when set and non-empty, else the default.
pub fn data_file() -> PathBuf {
    data_file_from(std::env::var_os(DATA_FILE_ENV).map(PathBuf::from))
}

fn data_file_from(override_path: Option<PathBuf>) -> PathBuf {
    match override_path {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => app_data_dir().join(DATA_FILE_NAME),
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "warn"
}
