//! Conversion of result paths into Script Filter items.

use serde::Serialize;
use std::path::Path;

use crate::config::paths::abbreviate_home;
use crate::utils::file_detection::{ContentClassifier, ImageFormats};

/// Item type telling the launcher to skip its own existence check.
pub const FILE_SKIPCHECK: &str = "file:skipcheck";

/// Hint telling the launcher how to render an item's icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IconType {
    /// Show the icon of the file rather than a preview of its content.
    #[serde(rename = "fileicon")]
    FileIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: String,
    /// `None` lets the launcher render a live preview of `path`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<IconType>,
}

/// One Script Filter result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub uid: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_text: Option<String>,
    pub icon: Icon,
    pub arg: String,
}

/// Display switches that apply to every item of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemOptions {
    pub hide_subtitle: bool,
    pub match_path: bool,
    pub display_images: bool,
}

/// Builds `DisplayItem`s for one run.
pub struct ItemBuilder<'a> {
    options: ItemOptions,
    home: Option<&'a str>,
    image_formats: &'a ImageFormats,
    classifier: &'a dyn ContentClassifier,
}

impl<'a> ItemBuilder<'a> {
    pub fn new(
        options: ItemOptions,
        home: Option<&'a str>,
        image_formats: &'a ImageFormats,
        classifier: &'a dyn ContentClassifier,
    ) -> Self {
        Self {
            options,
            home,
            image_formats,
            classifier,
        }
    }

    pub fn options(&self) -> ItemOptions {
        self.options
    }

    pub fn build(&self, path: &str) -> DisplayItem {
        let subtitle = if self.options.hide_subtitle {
            None
        } else {
            Some(match self.home {
                Some(home) => abbreviate_home(path, home),
                None => path.to_string(),
            })
        };

        DisplayItem {
            uid: path.to_string(),
            title: title_for(path),
            subtitle,
            kind: FILE_SKIPCHECK,
            match_text: self.options.match_path.then(|| path.to_string()),
            icon: Icon {
                path: path.to_string(),
                kind: self.icon_type(path),
            },
            arg: path.to_string(),
        }
    }

    fn icon_type(&self, path: &str) -> Option<IconType> {
        if !self.options.display_images {
            return Some(IconType::FileIcon);
        }

        match self.classifier.classify(Path::new(path)) {
            Ok(format) if self.image_formats.contains(&format) => None,
            Ok(format) => {
                tracing::trace!("{} classified as {}, using file icon", path, format);
                Some(IconType::FileIcon)
            }
            Err(e) => {
                tracing::debug!("{}; falling back to file icon", e);
                Some(IconType::FileIcon)
            }
        }
    }
}

/// The last component of `path`, or the path itself when it has none (e.g. `/`).
fn title_for(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassifyError;
    use std::path::PathBuf;

    /// Classifies by extension only, without touching the filesystem.
    struct ExtensionClassifier;

    impl ContentClassifier for ExtensionClassifier {
        fn classify(&self, path: &Path) -> Result<String, ClassifyError> {
            match path.extension().and_then(|e| e.to_str()) {
                Some("png") => Ok("image/png".to_string()),
                Some("pdf") => Ok("application/pdf".to_string()),
                Some("txt") => Ok("text/plain".to_string()),
                _ => Err(ClassifyError::Unknown(PathBuf::from(path))),
            }
        }
    }

    fn build(path: &str, options: ItemOptions) -> DisplayItem {
        let formats = ImageFormats::system();
        ItemBuilder::new(options, Some("/Users/me"), &formats, &ExtensionClassifier).build(path)
    }

    #[test]
    fn test_default_item_fields() {
        let item = build("/Users/me/Documents/report.pdf", ItemOptions::default());
        assert_eq!(item.uid, "/Users/me/Documents/report.pdf");
        assert_eq!(item.arg, "/Users/me/Documents/report.pdf");
        assert_eq!(item.title, "report.pdf");
        assert_eq!(item.subtitle.as_deref(), Some("~/Documents/report.pdf"));
        assert_eq!(item.kind, FILE_SKIPCHECK);
        assert_eq!(item.match_text, None);
        assert_eq!(item.icon.path, "/Users/me/Documents/report.pdf");
        assert_eq!(item.icon.kind, Some(IconType::FileIcon));
    }

    #[test]
    fn test_hide_subtitle_and_match_path() {
        let options = ItemOptions {
            hide_subtitle: true,
            match_path: true,
            display_images: false,
        };
        let item = build("/Users/me/a.txt", options);
        assert_eq!(item.subtitle, None);
        assert_eq!(item.match_text.as_deref(), Some("/Users/me/a.txt"));
    }

    #[test]
    fn test_subtitle_outside_home_is_unchanged() {
        let item = build("/Volumes/Data/a.txt", ItemOptions::default());
        assert_eq!(item.subtitle.as_deref(), Some("/Volumes/Data/a.txt"));
    }

    #[test]
    fn test_display_images_previews_only_recognized_formats() {
        let options = ItemOptions {
            display_images: true,
            ..Default::default()
        };
        assert_eq!(build("/Users/me/shot.png", options).icon.kind, None);
        assert_eq!(build("/Users/me/doc.pdf", options).icon.kind, None);
        assert_eq!(
            build("/Users/me/notes.txt", options).icon.kind,
            Some(IconType::FileIcon)
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_classification_failure_falls_back_to_file_icon() {
        let options = ItemOptions {
            display_images: true,
            ..Default::default()
        };
        let item = build("/Users/me/mystery", options);
        assert_eq!(item.icon.kind, Some(IconType::FileIcon));
        assert!(logs_contain("falling back to file icon"));
    }

    #[test]
    fn test_title_of_root_and_trailing_slash() {
        assert_eq!(title_for("/"), "/");
        assert_eq!(title_for("/Users/me/Folder/"), "Folder");
    }
}
