use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extensions (lowercase, without the dot) eligible for grouping.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Returns true when the file name ends in `.` plus one of the supported
/// extensions, compared case-insensitively. A bare `.png` counts.
pub fn is_supported_image(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|stem| stem.ends_with('.')))
}

/// Which of the two destination directories an image belongs in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Wider than tall.
    Horizontal,
    /// Taller than wide, or square.
    Vertical,
}

impl Destination {
    /// Decision rule: strictly wider than tall is horizontal, everything else
    /// (including the square case) is vertical.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Destination::Horizontal
        } else {
            Destination::Vertical
        }
    }

    /// Pick the directory matching this destination.
    pub fn select<'a>(self, horizontal: &'a Path, vertical: &'a Path) -> &'a Path {
        match self {
            Destination::Horizontal => horizontal,
            Destination::Vertical => vertical,
        }
    }
}

/// An image that has been opened and measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Absolute source path.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ImageRef {
    pub fn destination(&self) -> Destination {
        Destination::for_dimensions(self.width, self.height)
    }
}

/// A confirmed move: where the file is now and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file currently resides.
    pub current: PathBuf,
    /// Where the file was before it was moved.
    pub original: PathBuf,
    /// When the move was confirmed.
    pub recorded_at: DateTime<Utc>,
}

impl MoveRecord {
    pub fn new(current: impl Into<PathBuf>, original: impl Into<PathBuf>) -> Self {
        Self {
            current: current.into(),
            original: original.into(),
            recorded_at: Utc::now(),
        }
    }

    /// File name shown in user-facing messages.
    pub fn display_name(&self) -> String {
        self.current
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.current.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_are_case_insensitive() {
        assert!(is_supported_image(Path::new("/pool/a.png")));
        assert!(is_supported_image(Path::new("/pool/B.JPG")));
        assert!(is_supported_image(Path::new("/pool/c.JpEg")));
        assert!(is_supported_image(Path::new("d.gif")));
        assert!(is_supported_image(Path::new("e.BMP")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("png")));
        assert!(!is_supported_image(Path::new("archive.png.zip")));
        assert!(!is_supported_image(Path::new("photopng")));
    }

    #[test]
    fn test_dot_only_names_are_images() {
        assert!(is_supported_image(Path::new("/pool/.png")));
        assert!(is_supported_image(Path::new("/pool/.PNG")));
        assert!(is_supported_image(Path::new(".jpeg")));
    }

    #[test]
    fn test_square_is_vertical() {
        assert_eq!(Destination::for_dimensions(800, 600), Destination::Horizontal);
        assert_eq!(Destination::for_dimensions(600, 800), Destination::Vertical);
        assert_eq!(Destination::for_dimensions(512, 512), Destination::Vertical);
    }

    #[test]
    fn test_select_directory() {
        let h = Path::new("/h");
        let v = Path::new("/v");
        assert_eq!(Destination::Horizontal.select(h, v), h);
        assert_eq!(Destination::Vertical.select(h, v), v);
    }
}
