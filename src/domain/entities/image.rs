use serde::Serialize;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Encodings a listing image may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageKind {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
}

impl ImageKind {
    pub const ALL: [ImageKind; 3] = [ImageKind::Jpeg, ImageKind::Png, ImageKind::Webp];

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }
}

/// A locally selected file offered for a listing, not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCandidate {
    pub file_name: String,
    /// Content type declared by the client.
    pub content_type: Option<String>,
    pub size: usize,
    /// File contents. Left empty when the file was too large to read.
    pub data: Vec<u8>,
}

impl ImageCandidate {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, data: Vec<u8>) -> Self {
        ImageCandidate {
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            size: data.len(),
            data,
        }
    }
}

/// A candidate that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedImage {
    pub file_name: String,
    pub kind: ImageKind,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ImageNotice {
    InvalidType { file_name: String, message: String },
    TooLarge { file_name: String, message: String },
    TooMany { dropped: usize, message: String },
}

impl ImageNotice {
    pub fn invalid_type(file_name: &str) -> Self {
        ImageNotice::InvalidType {
            file_name: file_name.to_string(),
            message: "Please upload JPG, PNG, or WebP images only.".to_string(),
        }
    }

    pub fn too_large(file_name: &str) -> Self {
        ImageNotice::TooLarge {
            file_name: file_name.to_string(),
            message: "Image must be less than 5MB.".to_string(),
        }
    }

    pub fn too_many(max: usize, dropped: usize) -> Self {
        ImageNotice::TooMany {
            dropped,
            message: format!("You can only upload {} images total.", max),
        }
    }

    /// The notice as one line, prefixed with the file it concerns.
    pub fn describe(&self) -> String {
        match self {
            ImageNotice::InvalidType { file_name, message }
            | ImageNotice::TooLarge { file_name, message } => format!("{}: {}", file_name, message),
            ImageNotice::TooMany { message, .. } => message.clone(),
        }
    }
}

/// An image stored by one submission: its object key and public URL.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}
