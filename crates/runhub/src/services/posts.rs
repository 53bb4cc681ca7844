//! Business posts.
//!
//! Posts and their images come from two flat listings that are joined here.
//! Writes publish one invalidation each, like every other write path.

use std::sync::Arc;

use runhub_core::api::{ApiResult, BusinessPostsApi};
use runhub_core::event::UserId;
use runhub_core::post::{
    images_for_post, posts_for_business, transform_post, transform_post_image, validate_new_post,
    validate_post_patch, BackendPostImage, BusinessPost, NewPost, NewPostImage, PostError, PostId,
    PostImage, PostImageId, PostPatch,
};
use runhub_core::retry::RetryPolicy;
use runhub_core::storage::ImageUpload;

use crate::cache::InvalidationBus;
use crate::retry::with_retry;

use super::error::Result;

/// Image changes applied alongside a post update.
#[derive(Debug, Clone, Default)]
pub struct PostImageChanges {
    pub added: Vec<ImageUpload>,
    pub removed: Vec<PostImageId>,
}

impl PostImageChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Publishes and manages a business's posts.
#[derive(Clone)]
pub struct BusinessPostService {
    api: Arc<dyn BusinessPostsApi>,
    bus: Arc<InvalidationBus>,
    retry: RetryPolicy,
}

impl BusinessPostService {
    pub fn new(api: Arc<dyn BusinessPostsApi>, bus: Arc<InvalidationBus>) -> Self {
        Self {
            api,
            bus,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Lists a business's posts, newest first, with their images.
    ///
    /// The post listing is retried and its failure propagates. A failed image
    /// listing is logged and leaves the posts without images.
    pub async fn business_posts(&self, business_id: UserId) -> ApiResult<Vec<BusinessPost>> {
        let api = &self.api;
        let all = with_retry(self.retry, "list_posts", move || api.list_posts()).await?;
        let posts = posts_for_business(&all, business_id);
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let images = self.all_images().await;
        Ok(posts
            .iter()
            .map(|post| transform_post(post, images_for_post(&images, post.id)))
            .collect())
    }

    /// Creates a post and uploads its images.
    ///
    /// Failed uploads are logged and left out of the returned post; the post
    /// itself is still created.
    pub async fn create_post(&self, post: NewPost, images: Vec<ImageUpload>) -> Result<BusinessPost> {
        validate_new_post(&post)?;

        // 1. Persist
        let created = self.api.create_post(&post).await?;

        // 2. Attach images
        let uploaded = self.upload_images(created.id, &images).await;

        // 3. Invalidate
        self.bus.invalidate_all().await;

        tracing::info!(post_id = created.id, images = uploaded.len(), "Post created");
        Ok(transform_post(&created, uploaded))
    }

    /// Updates a post's text and applies image changes.
    ///
    /// The text update must succeed; image changes that fail are logged.
    pub async fn update_post(
        &self,
        id: PostId,
        patch: PostPatch,
        images: PostImageChanges,
    ) -> Result<BusinessPost> {
        if patch.is_empty() && images.is_empty() {
            return Err(PostError::EmptyUpdate.into());
        }
        validate_post_patch(&patch)?;

        // 1. Persist
        let updated = self.api.update_post(id, &patch).await?;

        // 2. Apply image changes
        self.upload_images(id, &images.added).await;
        for image_id in &images.removed {
            if let Err(err) = self.api.delete_post_image(*image_id).await {
                tracing::warn!(post_id = id, image_id, error = %err, "Failed to delete post image");
            }
        }

        // 3. Invalidate
        self.bus.invalidate_all().await;

        tracing::info!(post_id = id, "Post updated");
        let images = images_for_post(&self.all_images().await, id);
        Ok(transform_post(&updated, images))
    }

    pub async fn delete_post(&self, id: PostId) -> Result<()> {
        self.api.delete_post(id).await?;
        self.bus.invalidate_all().await;

        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn upload_images(&self, post_id: PostId, images: &[ImageUpload]) -> Vec<PostImage> {
        let mut uploaded = Vec::with_capacity(images.len());
        for upload in images {
            let body = NewPostImage::from_upload(post_id, upload);
            match self.api.create_post_image(&body).await {
                Ok(raw) => uploaded.push(transform_post_image(&raw)),
                Err(err) => tracing::warn!(
                    post_id,
                    file_name = %upload.file_name,
                    error = %err,
                    "Failed to upload post image"
                ),
            }
        }
        uploaded
    }

    async fn all_images(&self) -> Vec<BackendPostImage> {
        match self.api.list_post_images().await {
            Ok(images) => images,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to list post images");
                Vec::new()
            }
        }
    }
}
