use std::path::PathBuf;

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(v: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (v * factor).round() / factor
}

pub struct StandardPaths {
    pub base_dir: PathBuf,
    pub logs_dir: PathBuf,
}

/// Platform data directory for dashlab.
///
/// - Windows: `%APPDATA%/dashlab`
/// - macOS: `~/Library/Application Support/dashlab`
/// - Linux: `~/.local/share/dashlab`
///
/// Falls back to `./.dashlab` when the platform has no data directory.
pub fn standard_paths() -> StandardPaths {
    let base_dir = match dirs::data_dir() {
        Some(dir) => dir.join("dashlab"),
        None => PathBuf::from(".dashlab"),
    };
    let logs_dir = base_dir.join("logs");
    StandardPaths { base_dir, logs_dir }
}
