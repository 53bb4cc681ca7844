use crate::event::{millis_to_datetime, UserId};

use super::error::PostError;
use super::types::{
    BackendPost, BackendPostImage, BusinessPost, NewPost, PostId, PostImage, PostPatch,
};

/// Posts published by one business, newest first.
pub fn posts_for_business(posts: &[BackendPost], business_id: UserId) -> Vec<BackendPost> {
    let mut ours: Vec<BackendPost> = posts
        .iter()
        .filter(|post| post.business_id == business_id)
        .cloned()
        .collect();
    ours.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    ours
}

/// Converts a backend image record. Records without file metadata keep an
/// empty URL.
pub fn transform_post_image(raw: &BackendPostImage) -> PostImage {
    let file = raw.image.clone().unwrap_or_default();
    PostImage {
        id: raw.id,
        post_id: raw.business_posts_id,
        url: file.url,
        alt_text: file.name.clone(),
        name: file.name,
    }
}

/// Images attached to one post, in upload order.
pub fn images_for_post(images: &[BackendPostImage], post_id: PostId) -> Vec<PostImage> {
    let mut ours: Vec<PostImage> = images
        .iter()
        .filter(|image| image.business_posts_id == post_id)
        .map(transform_post_image)
        .collect();
    ours.sort_by_key(|image| image.id);
    ours
}

pub fn transform_post(raw: &BackendPost, images: Vec<PostImage>) -> BusinessPost {
    BusinessPost {
        id: raw.id,
        business_id: raw.business_id,
        business_name: raw.business_name.clone(),
        title: raw.title.clone(),
        content: raw.content.clone(),
        created_at: millis_to_datetime(raw.created_at),
        images,
    }
}

pub fn validate_new_post(post: &NewPost) -> Result<(), PostError> {
    if post.title.trim().is_empty() {
        return Err(PostError::EmptyTitle);
    }
    if post.content.trim().is_empty() {
        return Err(PostError::EmptyContent);
    }
    Ok(())
}

/// Checks the fields a patch sets. An empty patch is accepted here; callers
/// decide whether it carries other changes.
pub fn validate_post_patch(patch: &PostPatch) -> Result<(), PostError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(PostError::EmptyTitle);
    }
    if patch.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(PostError::EmptyContent);
    }
    Ok(())
}
