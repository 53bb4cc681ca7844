use super::types::ObjectInfo;

/// Extensions tried, in order, when looking up an existing image.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Extension used when the uploaded file name has none.
const DEFAULT_EXTENSION: &str = "jpg";

/// Returns the lowercase extension of a file name, or `jpg` if there is none.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Returns true if a listing contains an object named exactly `file_name`.
///
/// Listing searches are prefix/substring matches, so the exact name is
/// checked here.
pub fn find_in_listing(listing: &[ObjectInfo], file_name: &str) -> bool {
    listing.iter().any(|object| object.name == file_name)
}
