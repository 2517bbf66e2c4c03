//! Media source and image format types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where image content is sourced from.
///
/// # Examples
///
/// ```
/// use storyweaver_core::MediaSource;
///
/// let on_disk = MediaSource::Path("characters/sam.png".into());
/// let in_memory = MediaSource::Binary(vec![0x89, 0x50, 0x4E, 0x47]);
/// assert!(on_disk.path().is_some());
/// assert!(in_memory.path().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// File on the local filesystem, read when the request is sent
    Path(PathBuf),
    /// Raw binary data
    Binary(Vec<u8>),
}

impl MediaSource {
    /// The file path, when the content lives on disk.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            MediaSource::Path(path) => Some(path),
            MediaSource::Binary(_) => None,
        }
    }
}

/// Raster formats the image service can return.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageFormat {
    /// PNG (the default)
    #[default]
    Png,
    /// JPEG
    Jpeg,
    /// WebP
    Webp,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }

    /// MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Guess the format of a reference image from its file extension.
    ///
    /// ```
    /// use storyweaver_core::ImageFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(ImageFormat::from_path(Path::new("sam.JPG")), Some(ImageFormat::Jpeg));
    /// assert_eq!(ImageFormat::from_path(Path::new("sam.gif")), None);
    /// ```
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }
}
