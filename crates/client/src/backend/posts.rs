//! Business post and post image endpoints.

use async_trait::async_trait;
use runhub_core::api::{ApiResult, BusinessPostsApi};
use runhub_core::post::{
    BackendPost, BackendPostImage, NewPost, NewPostImage, PostId, PostImageId, PostPatch,
};

use super::BackendClient;

#[async_trait]
impl BusinessPostsApi for BackendClient {
    async fn list_posts(&self) -> ApiResult<Vec<BackendPost>> {
        tracing::debug!("GET /business_posts");
        self.request_json(self.client.get(self.url("/business_posts")))
            .await
    }

    async fn create_post(&self, post: &NewPost) -> ApiResult<BackendPost> {
        tracing::debug!(business_id = post.business_id, "POST /business_posts");
        self.request_json(self.client.post(self.url("/business_posts")).json(post))
            .await
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> ApiResult<BackendPost> {
        tracing::debug!(post_id = id, "PATCH /business_posts/{{id}}");
        self.request_json(
            self.client
                .patch(self.url(&format!("/business_posts/{}", id)))
                .json(patch),
        )
        .await
    }

    async fn delete_post(&self, id: PostId) -> ApiResult<()> {
        tracing::debug!(post_id = id, "DELETE /business_posts/{{id}}");
        self.request_empty(
            self.client
                .delete(self.url(&format!("/business_posts/{}", id))),
        )
        .await
    }

    async fn list_post_images(&self) -> ApiResult<Vec<BackendPostImage>> {
        tracing::debug!("GET /images");
        self.request_json(self.client.get(self.url("/images"))).await
    }

    async fn create_post_image(&self, image: &NewPostImage) -> ApiResult<BackendPostImage> {
        tracing::debug!(post_id = image.business_posts_id, "POST /images");
        self.request_json(self.client.post(self.url("/images")).json(image))
            .await
    }

    async fn delete_post_image(&self, id: PostImageId) -> ApiResult<()> {
        tracing::debug!(image_id = id, "DELETE /images/{{id}}");
        self.request_empty(self.client.delete(self.url(&format!("/images/{}", id))))
            .await
    }
}
