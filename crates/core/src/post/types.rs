use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::UserId;
use crate::serde::{deserialize_optional_string, deserialize_timestamp_millis};
use crate::storage::ImageUpload;

/// Backend identifier of a business post.
pub type PostId = u64;

/// Backend identifier of a post image record.
pub type PostImageId = u64;

/// File metadata the backend attaches to an uploaded image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendImageFile {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime: String,
}

/// An image record as returned by `GET /images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPostImage {
    pub id: PostImageId,
    #[serde(default)]
    pub created_at: i64,
    pub business_posts_id: PostId,
    #[serde(default)]
    pub image: Option<BackendImageFile>,
}

/// A post record as returned by `GET /business_posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPost {
    pub id: PostId,
    /// Creation time in epoch milliseconds. The backend sends either a
    /// number or a date string.
    #[serde(default, deserialize_with = "deserialize_timestamp_millis")]
    pub created_at: i64,
    pub business_id: UserId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub business_name: Option<String>,
}

/// Body of `POST /business_posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub business_id: UserId,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(business_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            business_id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Body of `PATCH /business_posts/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Body of `POST /images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPostImage {
    pub business_posts_id: PostId,
    /// The image as a `data:<mime>;base64,<payload>` URL.
    pub file: String,
}

impl NewPostImage {
    pub fn from_upload(post_id: PostId, upload: &ImageUpload) -> Self {
        let mime = if upload.content_type.is_empty() {
            "application/octet-stream"
        } else {
            upload.content_type.as_str()
        };
        let payload = base64::engine::general_purpose::STANDARD.encode(&upload.bytes);
        Self {
            business_posts_id: post_id,
            file: format!("data:{};base64,{}", mime, payload),
        }
    }

    /// MIME type declared by the data URL, if well formed.
    pub fn mime(&self) -> Option<&str> {
        self.file
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(mime, _)| mime)
    }
}

/// An image attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    pub id: PostImageId,
    pub post_id: PostId,
    pub url: String,
    pub name: String,
    pub alt_text: String,
}

/// A business announcement with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessPost {
    pub id: PostId,
    pub business_id: UserId,
    pub business_name: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<PostImage>,
}
