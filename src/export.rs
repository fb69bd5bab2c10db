//! PNG export of the canvas surface into the application's `Saved` folder.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

pub const SAVED_SUBDIR: &str = "Saved";

/// Application-private export directory, e.g. `~/.local/share/paintpad/Saved`.
pub fn default_save_dir() -> Result<PathBuf> {
    let base = dirs_next::data_dir().context("no data directory on this platform")?;
    Ok(base.join("paintpad").join(SAVED_SUBDIR))
}

pub fn timestamped_filename(now: DateTime<Local>) -> String {
    format!("{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Write the surface as a timestamped PNG under `dir`, creating the folder
/// if needed. Returns the full path of the written file.
pub fn export_surface(surface: &RgbaImage, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create save folder {}", dir.display()))?;
    let path = dir.join(timestamped_filename(now));
    surface
        .save(&path)
        .with_context(|| format!("write image {}", path.display()))?;
    tracing::info!("saved drawing to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_is_timestamp_dot_png() {
        let dt = Local
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("date time");
        assert_eq!(timestamped_filename(dt), "20260102_030405.png");
    }
}
