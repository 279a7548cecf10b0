use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed thumbnail size classes. Each maps to a square pixel box and an
/// encoding quality for the lossy formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl ThumbnailSize {
    pub const ALL: [ThumbnailSize; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn px(self) -> u32 {
        match self {
            Self::Small => 200,
            Self::Medium => 400,
            Self::Large => 800,
        }
    }

    pub fn quality(self) -> u8 {
        match self {
            Self::Small => 75,
            Self::Medium => 80,
            Self::Large => 85,
        }
    }
}

impl FromStr for ThumbnailSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailFormat {
    #[default]
    Webp,
    Jpeg,
    Png,
}

impl ThumbnailFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Webp => "image/webp",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl FromStr for ThumbnailFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(Self::Webp),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ThumbnailFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Webp => write!(f, "webp"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
        }
    }
}

/// Descriptive metadata for a derivative, returned whether it was freshly
/// generated or found by the storage probe.
#[derive(Debug, Clone, Serialize)]
pub struct ThumbnailInfo {
    pub media_id: String,
    pub size: ThumbnailSize,
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub format: ThumbnailFormat,
    pub cached: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponsiveThumbnails {
    pub small: String,
    pub medium: String,
    pub large: String,
}
