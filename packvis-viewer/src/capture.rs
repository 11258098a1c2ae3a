//! Frame capture
//!
//! Saves rendered frames as PNGs: one-off snapshots on demand (and at
//! episode end when requested), plus a numbered frame sequence while
//! recording is toggled on. Sequences can be assembled into video offline;
//! in-process encoding is out of scope.

use packvis_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Capture output locations and numbering for one viewer session.
pub struct Capture {
    dir: PathBuf,
    /// Whether a frame is written on every redraw.
    pub recording: bool,
    frame_index: u64,
    snapshot_index: u64,
}

impl Capture {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            recording: false,
            frame_index: 0,
            snapshot_index: 0,
        }
    }

    /// Next one-off snapshot path, tagged with the episode reward so runs
    /// can be told apart at a glance.
    pub fn snapshot_path(&mut self, reward_sum: f32) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        self.snapshot_index += 1;
        Ok(self.dir.join(format!(
            "snapshot-{:03}-{reward_sum:.1}.png",
            self.snapshot_index
        )))
    }

    /// Next recording-sequence frame path.
    pub fn frame_path(&mut self) -> Result<PathBuf> {
        let frames = self.dir.join("frames");
        std::fs::create_dir_all(&frames)?;
        self.frame_index += 1;
        Ok(frames.join(format!("frame-{:06}.png", self.frame_index)))
    }

    /// Flip recording on or off, returning the new state.
    pub fn toggle_recording(&mut self) -> bool {
        self.recording = !self.recording;
        self.recording
    }
}

/// Encode one mapped frame into a PNG.
///
/// `data` is the padded readback buffer; `bytes_per_row` its row stride.
/// `bgra` converts swapped-channel surface formats on the fly.
pub fn write_png(
    path: &Path,
    data: &[u8],
    width: u32,
    height: u32,
    bytes_per_row: u32,
    bgra: bool,
) -> Result<()> {
    let mut frame = image::RgbaImage::new(width, height);
    for y in 0..height {
        let row = &data[(y * bytes_per_row) as usize..];
        for x in 0..width {
            let i = (x * 4) as usize;
            let pixel = if bgra {
                [row[i + 2], row[i + 1], row[i], row[i + 3]]
            } else {
                [row[i], row[i + 1], row[i + 2], row[i + 3]]
            };
            frame.put_pixel(x, y, image::Rgba(pixel));
        }
    }
    frame
        .save(path)
        .map_err(|e| Error::Visualization(format!("write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_paths_are_numbered_and_tagged() {
        let mut capture = Capture::new(std::env::temp_dir().join("packvis-capture-test"));
        let first = capture.snapshot_path(12.5).unwrap();
        let second = capture.snapshot_path(13.0).unwrap();
        assert!(first.ends_with("snapshot-001-12.5.png"));
        assert!(second.ends_with("snapshot-002-13.0.png"));
    }

    #[test]
    fn toggle_flips_recording_state() {
        let mut capture = Capture::new(std::env::temp_dir().join("packvis-capture-test"));
        assert!(!capture.recording);
        assert!(capture.toggle_recording());
        assert!(!capture.toggle_recording());
    }
}
