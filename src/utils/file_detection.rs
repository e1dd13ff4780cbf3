use std::collections::HashSet;
use std::path::Path;

use crate::core::ClassifyError;

/// MIME type returned by content sniffing when nothing more specific matched.
const GENERIC_BINARY: &str = "application/octet-stream";

/// Formats a launcher can render as a live preview: raster images plus PDF and EPS.
const PREVIEW_FORMATS: &[&str] = &[
    "image/png", "image/jpeg", "image/gif", "image/bmp", "image/x-bmp", "image/x-ms-bmp",
    "image/tiff", "image/webp", "image/heic", "image/heif", "image/avif", "image/jp2",
    "image/jpx", "image/x-icon", "image/vnd.microsoft.icon", "image/x-icns", "image/icns",
    "image/x-tga", "image/x-targa", "image/vnd.adobe.photoshop", "image/x-photoshop",
    "image/x-exr", "image/vnd.radiance", "image/x-portable-pixmap", "image/x-xbitmap",
    "image/x-canon-cr2", "image/x-canon-crw", "image/x-nikon-nef", "image/x-adobe-dng",
    "image/x-olympus-orf", "image/x-sony-arw", "image/x-fuji-raf", "image/x-panasonic-rw2",
    "image/ktx", "image/x-pict", "image/pict",
    "application/pdf", "application/postscript", "image/x-eps",
];

/// The set of format identifiers that qualify for live previews.
///
/// Built once at start-up and handed to the item builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFormats {
    formats: HashSet<String>,
}

impl ImageFormats {
    /// The formats the system image pipeline can render.
    pub fn system() -> Self {
        PREVIEW_FORMATS.iter().map(|f| f.to_string()).collect()
    }

    pub fn contains(&self, format: &str) -> bool {
        self.formats.contains(&format.to_ascii_lowercase())
    }
}

impl FromIterator<String> for ImageFormats {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            formats: iter.into_iter().map(|f| f.to_ascii_lowercase()).collect(),
        }
    }
}

/// Looks up the format identifier of a file.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, path: &Path) -> Result<String, ClassifyError>;
}

/// Sniffs file content, falling back to the extension.
pub struct MagicClassifier;

impl ContentClassifier for MagicClassifier {
    fn classify(&self, path: &Path) -> Result<String, ClassifyError> {
        if let Some(mime) = tree_magic_mini::from_filepath(path) {
            if mime != GENERIC_BINARY {
                return Ok(mime.to_string());
            }
        }

        mime_guess::from_path(path)
            .first_raw()
            .map(str::to_string)
            .ok_or_else(|| ClassifyError::Unknown(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PNG_HEADER: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn test_system_formats_cover_images_and_pdf() {
        let formats = ImageFormats::system();
        assert!(formats.contains("image/png"));
        assert!(formats.contains("image/JPEG"));
        assert!(formats.contains("application/pdf"));
        assert!(!formats.contains("text/plain"));
        assert!(!formats.contains("application/zip"));
    }

    #[test]
    fn test_classify_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, PNG_HEADER).unwrap();

        let format = MagicClassifier.classify(&path).unwrap();
        assert_eq!(format, "image/png");
    }

    #[test]
    fn test_classify_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "plain words\n").unwrap();

        let format = MagicClassifier.classify(&path).unwrap();
        assert!(!ImageFormats::system().contains(&format));
    }

    #[test]
    fn test_classify_missing_file_without_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist");

        assert!(matches!(
            MagicClassifier.classify(&path),
            Err(ClassifyError::Unknown(p)) if p == path
        ));
    }
}
