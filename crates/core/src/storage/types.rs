use serde::{Deserialize, Serialize};

/// An object as reported by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub name: String,
}

/// An image file to attach to an event or a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name; only its extension is used.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// Where an image lives and how its objects are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `event-images/events/event-<id>.<ext>`
    Event,
    /// `user-images/profiles/user-<id>.<ext>`
    Profile,
}

impl ImageKind {
    pub fn bucket(&self) -> &'static str {
        match self {
            ImageKind::Event => super::EVENT_IMAGES_BUCKET,
            ImageKind::Profile => super::USER_IMAGES_BUCKET,
        }
    }

    pub fn folder(&self) -> &'static str {
        match self {
            ImageKind::Event => "events",
            ImageKind::Profile => "profiles",
        }
    }

    fn file_prefix(&self) -> &'static str {
        match self {
            ImageKind::Event => "event",
            ImageKind::Profile => "user",
        }
    }

    /// File name (without folder) for the owner's image.
    pub fn file_name(&self, owner_id: u64, extension: &str) -> String {
        format!("{}-{}.{}", self.file_prefix(), owner_id, extension)
    }

    /// Full object path inside the bucket.
    pub fn object_path(&self, owner_id: u64, extension: &str) -> String {
        format!("{}/{}", self.folder(), self.file_name(owner_id, extension))
    }
}
