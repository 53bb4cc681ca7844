//! Object naming for event and profile images.

mod naming;
mod types;

pub use naming::{file_extension, find_in_listing, IMAGE_EXTENSIONS};
pub use types::{ImageKind, ImageUpload, ObjectInfo};

/// Bucket holding event cover images.
pub const EVENT_IMAGES_BUCKET: &str = "event-images";

/// Bucket holding profile pictures.
pub const USER_IMAGES_BUCKET: &str = "user-images";

/// Image shown for events without an uploaded cover.
pub const FALLBACK_EVENT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?ixlib=rb-4.0.3&auto=format&fit=crop&w=2340&q=80";
