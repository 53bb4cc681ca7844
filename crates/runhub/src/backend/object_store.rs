use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use runhub_core::api::{ApiError, ApiResult, ObjectStore};
use runhub_core::storage::ObjectInfo;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store keeping every bucket in memory.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    base_url: String,
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    fail_uploads: AtomicBool,
}

impl InMemoryObjectStore {
    /// Creates an empty store whose public URLs start with `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(BTreeMap::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Makes uploads fail with a server error.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<String> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 500,
                message: "upload rejected".to_string(),
            });
        }
        self.objects.lock().unwrap_or_else(|p| p.into_inner()).insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(path.to_string())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        search: Option<&str>,
    ) -> ApiResult<Vec<ObjectInfo>> {
        let folder = format!("{}/", prefix.trim_end_matches('/'));
        let objects = self.objects.lock().unwrap_or_else(|p| p.into_inner());
        Ok(objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .filter_map(|(_, path)| path.strip_prefix(&folder))
            .filter(|name| !name.contains('/'))
            .filter(|name| search.map_or(true, |s| name.contains(s)))
            .map(|name| ObjectInfo {
                name: name.to_string(),
            })
            .collect())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_scopes_to_folder_and_search() {
        let store = InMemoryObjectStore::new("http://storage.local/");
        store
            .upload("event-images", "events/event-1.png", vec![1], "image/png")
            .await
            .unwrap();
        store
            .upload("event-images", "events/event-12.jpg", vec![2], "image/jpeg")
            .await
            .unwrap();
        store
            .upload("user-images", "profiles/user-1.jpg", vec![3], "image/jpeg")
            .await
            .unwrap();

        let all = store.list("event-images", "events", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let searched = store
            .list("event-images", "events", Some("event-1."))
            .await
            .unwrap();
        assert_eq!(
            searched,
            vec![ObjectInfo {
                name: "event-1.png".to_string()
            }]
        );
        assert_eq!(
            store.public_url("event-images", "events/event-1.png"),
            "http://storage.local/storage/v1/object/public/event-images/events/event-1.png"
        );
    }

    #[tokio::test]
    async fn test_failed_upload_stores_nothing() {
        let store = InMemoryObjectStore::new("http://storage.local");
        store.fail_uploads(true);
        assert!(store
            .upload("event-images", "events/event-1.png", vec![1], "image/png")
            .await
            .is_err());
        assert!(store.is_empty());
    }
}
