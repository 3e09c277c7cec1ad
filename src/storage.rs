use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use tokio::{fs, io::AsyncWriteExt};

use crate::error::{AppError, AppResult};

pub const PROFILE_FOLDER: &str = "profile/images";
pub const DONATION_COVER_FOLDER: &str = "donationbookimage";
pub const REVIEW_COVER_FOLDER: &str = "review/images";

/// Public URL prefix under which the upload root is served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Writes uploaded files into one folder below the upload root.
#[derive(Debug, Clone)]
pub struct StorageService {
    folder: PathBuf,
    relative: String,
    max_bytes: usize,
}

impl StorageService {
    /// Creates `root/relative` if it does not exist yet.
    pub async fn new(root: &Path, relative: &str, max_bytes: usize) -> std::io::Result<Self> {
        let folder = root.join(relative);
        fs::create_dir_all(&folder).await?;
        Ok(Self {
            folder,
            relative: relative.trim_matches('/').to_string(),
            max_bytes,
        })
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.folder.join(filename)
    }

    /// URL path clients use to fetch `filename` once written.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}/{}", UPLOAD_URL_PREFIX, self.relative, filename)
    }

    /// Streams `body` into `folder/filename`. The partial file is removed when
    /// the stream fails or grows past the size limit.
    pub async fn write_stream<S, E>(&self, body: S, filename: &str) -> AppResult<PathBuf>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let path = self.path_for(filename);
        let result = self.copy_into(body, &path).await;
        if result.is_err() {
            if let Err(err) = fs::remove_file(&path).await {
                tracing::warn!(error = %err, path = %path.display(), "failed to remove partial upload");
            }
        }
        result.map(|_| path)
    }

    async fn copy_into<S, E>(&self, mut body: S, path: &Path) -> AppResult<()>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let mut file = fs::File::create(path).await?;
        let mut written = 0usize;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| AppError::bad_request(format!("Upload gagal: {e}")))?;
            written += chunk.len();
            if written > self.max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Ukuran berkas melebihi batas {} byte",
                    self.max_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    pub async fn remove(&self, filename: &str) {
        let path = self.path_for(filename);
        if let Err(err) = fs::remove_file(&path).await {
            tracing::warn!(error = %err, path = %path.display(), "failed to remove upload");
        }
    }
}

/// One storage folder per upload feature.
#[derive(Debug, Clone)]
pub struct Storage {
    pub profiles: StorageService,
    pub donation_covers: StorageService,
    pub review_covers: StorageService,
}

impl Storage {
    pub async fn new(root: &Path, max_bytes: usize) -> std::io::Result<Self> {
        Ok(Self {
            profiles: StorageService::new(root, PROFILE_FOLDER, max_bytes).await?,
            donation_covers: StorageService::new(root, DONATION_COVER_FOLDER, max_bytes).await?,
            review_covers: StorageService::new(root, REVIEW_COVER_FOLDER, max_bytes).await?,
        })
    }
}

/// Extension of `original` including the dot, or an empty string.
pub fn extension_of(original: &str) -> String {
    Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// `<timestamp-ms><basename>` with any directory part of the client name dropped.
pub fn timestamped_filename(original: &str, now_millis: i64) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("upload");
    format!("{now_millis}{base}")
}

/// `<prefix>-<id><ext>`, e.g. `donation_book-donation-abc.jpg`.
pub fn entity_filename(prefix: &str, id: &str, original: &str) -> String {
    format!("{}-{}{}", prefix, id, extension_of(original))
}

/// An image read fully into memory, used when the owning row does not exist
/// yet (multipart fields may arrive in any order).
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl StorageService {
    pub async fn write_bytes(&self, data: Bytes, filename: &str) -> AppResult<PathBuf> {
        let body = futures::stream::iter([Ok::<_, std::convert::Infallible>(data)]);
        self.write_stream(body, filename).await
    }
}
