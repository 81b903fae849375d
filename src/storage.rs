use std::path::{Path, PathBuf};

use axum::body::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::error::{storage_error, upload_error, Error};

/// Accepted image content types and the extension stored for each.
const MIME_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
];

/// Upload size ceiling, in bytes.
pub const MAX_IMAGE_BYTES: usize = 500_000;

/// Disk backed store for uploaded place images. Files are keyed by a
/// generated name; the returned URL is the stored path, which doubles as
/// the removal key.
#[derive(Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn init(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.root).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, bytes))]
    pub async fn store(&self, content_type: &str, bytes: Bytes) -> Result<String, Error> {
        let ext =
            extension_for(content_type).ok_or_else(|| upload_error("invalid image type"))?;

        if bytes.is_empty() {
            return Err(upload_error("empty image upload"));
        }

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(upload_error("image exceeds the size limit"));
        }

        let path = self.root.join(format!("{}.{}", Uuid::new_v4(), ext));
        fs::write(&path, &bytes).await?;

        Ok(path.to_string_lossy().into_owned())
    }

    /// Removes a previously stored image. Only URLs minted by `store` are
    /// accepted; anything pointing outside the root is refused.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, image_url: &str) -> Result<(), Error> {
        let path = Path::new(image_url);

        if !path.starts_with(&self.root) {
            return Err(storage_error(format!(
                "{} is outside the image store",
                image_url
            )));
        }

        fs::remove_file(path).await?;

        Ok(())
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> ImageStore {
        let root = std::env::temp_dir().join(format!("mekan-images-{}", Uuid::new_v4()));

        ImageStore::new(root)
    }

    #[tokio::test]
    async fn stores_and_removes_an_image_test() {
        let store = test_store();
        store.init().await.unwrap();

        let url = store
            .store("image/png", Bytes::from_static(b"not really a png"))
            .await
            .unwrap();

        assert!(url.ends_with(".png"));
        assert!(Path::new(&url).exists());

        store.remove(&url).await.unwrap();

        assert!(!Path::new(&url).exists());
    }

    #[tokio::test]
    async fn rejects_unknown_content_type_test() {
        let store = test_store();
        store.init().await.unwrap();

        let err = store
            .store("image/gif", Bytes::from_static(b"gif bytes"))
            .await
            .unwrap_err();

        assert_eq!(err.code, 422);
    }

    #[tokio::test]
    async fn rejects_oversized_image_test() {
        let store = test_store();
        store.init().await.unwrap();

        let bytes = Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]);

        let err = store.store("image/jpeg", bytes).await.unwrap_err();

        assert_eq!(err.code, 422);
    }

    #[tokio::test]
    async fn rejects_empty_image_test() {
        let store = test_store();
        store.init().await.unwrap();

        let err = store.store("image/jpeg", Bytes::new()).await.unwrap_err();

        assert_eq!(err.code, 422);
    }

    #[tokio::test]
    async fn refuses_to_remove_files_outside_the_store_test() {
        let store = test_store();

        assert!(store.remove("/etc/hostname").await.is_err());
    }
}
