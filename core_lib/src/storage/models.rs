use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backend-assigned hint for how a served file should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Download,
    ModalPopup,
    NewBrowserTab,
}

impl DisplayMode {
    /// `Download` maps to an `attachment` disposition; both inline modes map
    /// to `inline`.
    pub fn content_disposition(&self) -> &'static str {
        match self {
            DisplayMode::Download => "attachment",
            DisplayMode::ModalPopup | DisplayMode::NewBrowserTab => "inline",
        }
    }

    /// Picks the mode for a stored name. Extensions on the inline list are
    /// opened in a new tab; everything else defaults to a download.
    pub fn for_filename(name: &str, inline_extensions: &[String]) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        if !extension.is_empty()
            && inline_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension))
        {
            DisplayMode::NewBrowserTab
        } else {
            DisplayMode::Download
        }
    }
}

/// Read-only view of one stored file, valid for the duration of a single
/// response. The backend owns the name, content type, and display mode.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub content_type: String,
    pub display_mode: DisplayMode,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_mapping() {
        assert_eq!(DisplayMode::Download.content_disposition(), "attachment");
        assert_eq!(DisplayMode::ModalPopup.content_disposition(), "inline");
        assert_eq!(DisplayMode::NewBrowserTab.content_disposition(), "inline");
    }

    #[test]
    fn test_display_mode_for_filename() {
        let inline = vec!["png".to_string(), "pdf".to_string()];

        assert_eq!(
            DisplayMode::for_filename("report.pdf", &inline),
            DisplayMode::NewBrowserTab
        );
        assert_eq!(
            DisplayMode::for_filename("photo.PNG", &inline),
            DisplayMode::NewBrowserTab
        );
        assert_eq!(
            DisplayMode::for_filename("archive.zip", &inline),
            DisplayMode::Download
        );
        assert_eq!(
            DisplayMode::for_filename("no_extension", &inline),
            DisplayMode::Download
        );
        assert_eq!(
            DisplayMode::for_filename("anything.txt", &[]),
            DisplayMode::Download
        );
    }
}
