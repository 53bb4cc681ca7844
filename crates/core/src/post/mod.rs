mod error;
mod operations;
mod types;

pub use error::PostError;
pub use operations::{
    images_for_post, posts_for_business, transform_post, transform_post_image, validate_new_post,
    validate_post_patch,
};
pub use types::{
    BackendImageFile, BackendPost, BackendPostImage, BusinessPost, NewPost, NewPostImage, PostId,
    PostImage, PostImageId, PostPatch,
};
