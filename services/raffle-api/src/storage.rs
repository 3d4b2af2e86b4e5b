use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::ApiError;

/// Image formats accepted for upload, detected from the file's magic bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageKind::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageKind::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageKind::Webp)
        } else {
            None
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(ImageKind::Png),
            "jpg" => Some(ImageKind::Jpeg),
            "gif" => Some(ImageKind::Gif),
            "webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::Gif => "gif",
            ImageKind::Webp => "webp",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
        }
    }
}

/// Content-addressed image directory: each file is stored as
/// `<sha256 hex>.<ext>`, so re-uploading the same bytes is a no-op.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub async fn open(root: impl AsRef<Path>, max_bytes: usize) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(ImageStore { root, max_bytes })
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store an image and return its file name.
    pub async fn put(&self, bytes: &[u8]) -> Result<String, ApiError> {
        if bytes.len() > self.max_bytes {
            return Err(ApiError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }
        let kind = ImageKind::sniff(bytes).ok_or(ApiError::UnsupportedMediaType)?;
        let digest = hex::encode(Sha256::digest(bytes));
        let filename = format!("{}.{}", digest, kind.extension());

        let path = self.root.join(&filename);
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(%filename, "image already stored");
            return Ok(filename);
        }
        let root = self.root.clone();
        let owned = bytes.to_vec();
        tokio::task::spawn_blocking(move || persist_new(&root, &path, &owned))
            .await
            .map_err(std::io::Error::other)??;
        tracing::info!(%filename, size = bytes.len(), "image stored");
        Ok(filename)
    }

    /// Read a stored image. Names that are not `<sha256 hex>.<known ext>`
    /// are rejected before touching the filesystem.
    pub async fn get(&self, filename: &str) -> Result<Option<(Vec<u8>, ImageKind)>, ApiError> {
        let kind = parse_filename(filename)
            .ok_or_else(|| ApiError::bad_request(format!("invalid image name {}", filename)))?;
        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(Some((bytes, kind))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Write into a uniquely named temp file beside `path`, then rename it into
/// place. Concurrent writers of the same content each own their temp file,
/// and the rename replaces one complete copy with another.
fn persist_new(root: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = NamedTempFile::new_in(root)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}

fn parse_filename(filename: &str) -> Option<ImageKind> {
    let (stem, ext) = filename.split_once('.')?;
    let digest = hex::decode(stem).ok()?;
    if digest.len() != 32 || stem.chars().any(|c| c.is_ascii_uppercase()) {
        return None;
    }
    ImageKind::from_extension(ext)
}
