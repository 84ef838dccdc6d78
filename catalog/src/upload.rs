//! Image attachments for items. Files land in a blob location and items keep only the public URL.

use crate::err::CatalogError;
use axum::body::Bytes;
use std::path::PathBuf;
use std::{fs, io};
use ulid::Ulid;

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 200_000;

/// Raster formats accepted as item images, with the extension their files are stored under.
/// The stored extension decides the content type the file is served with, so it never comes from the client.
const IMAGE_TYPES: [(&str, &str); 5] = [
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    extension: &'static str,
}

impl ImageUpload {
    /// Admits png, jpeg, gif or webp content of at most `max_bytes`.
    pub fn accept(file_name: &str, content_type: &str, bytes: Bytes, max_bytes: usize) -> Result<Self, CatalogError> {
        let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        let Some(extension) = IMAGE_TYPES.iter().find(|(known, _)| *known == mime).map(|(_, ext)| *ext) else {
            return Err(CatalogError::UploadRejected("Not an image! Please upload only png, jpeg, gif or webp images.".into()));
        };
        if bytes.len() > max_bytes {
            return Err(CatalogError::UploadRejected(format!("Image exceeds the {} byte limit.", max_bytes)));
        }
        Ok(Self { file_name: file_name.to_string(), content_type: mime, bytes, extension })
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }
}

/// Where item images are kept.
pub trait BlobStore: Send + Sync {
    /// Persists the image and returns the URL it is served under.
    fn put(&self, upload: &ImageUpload) -> Result<String, CatalogError>;

    /// Removes an image previously returned by `put`. Unknown URLs are ignored.
    fn remove(&self, url: &str) -> Result<(), CatalogError>;
}

/// Blob store on the local filesystem, served as static files under `public_path`.
pub struct LocalBlobStore {
    dir: PathBuf,
    public_path: String,
}

impl LocalBlobStore {
    pub fn new(dir: PathBuf, public_path: &str) -> Result<Self, CatalogError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, public_path: public_path.trim_end_matches('/').to_string() })
    }

    fn file_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.public_path)?.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return None;
        }
        Some(self.dir.join(name))
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, upload: &ImageUpload) -> Result<String, CatalogError> {
        let name = format!("{}.{}", Ulid::new().to_string().to_lowercase(), upload.extension());
        fs::write(self.dir.join(&name), &upload.bytes)?;
        Ok(format!("{}/{}", self.public_path, name))
    }

    fn remove(&self, url: &str) -> Result<(), CatalogError> {
        let Some(path) = self.file_for(url) else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
