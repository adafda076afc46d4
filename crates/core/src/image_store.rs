//! Image payload codec and on-disk image store.
//!
//! Publication images arrive as data URIs (`data:image/png;base64,...`).
//! [`ImagePayload::parse`] turns one into raw bytes plus a file extension;
//! [`ImageStore`] writes those bytes under `<root>/uploads/posts/` and removes
//! them again when the owning row goes away.
//!
//! Paths handed back to callers are relative to the store root
//! (`uploads/posts/<key>.<ext>`) and are what gets persisted in `posts.image_path`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use base64::Engine as _;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Directory, relative to the store root, that holds publication images.
pub const UPLOAD_SUBDIR: &str = "uploads/posts";

/// Upper bound on `-<n>` suffixes tried when a file name is already taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Accepted `image/<subtype>` values and the extension written to disk.
const SUPPORTED_SUBTYPES: &[(&str, &str)] = &[
    ("png", "png"),
    ("jpeg", "jpg"),
    ("jpg", "jpg"),
    ("gif", "gif"),
    ("webp", "webp"),
];

// ---------------------------------------------------------------------------
// Payload codec
// ---------------------------------------------------------------------------

/// A decoded image payload: media type, on-disk extension and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    media_type: String,
    extension: &'static str,
    bytes: Vec<u8>,
}

impl ImagePayload {
    /// Decode a `data:image/<subtype>;base64,<body>` string.
    ///
    /// Anything else (missing prefix, non-image media type, unsupported
    /// subtype, undecodable or empty body) is a [`CoreError::Validation`].
    pub fn parse(payload: &str) -> Result<Self, CoreError> {
        let rest = payload
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| malformed("missing 'data:' prefix"))?;

        let (header, body) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing ',' between header and body"))?;

        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| malformed("body must be base64 encoded"))?
            .to_ascii_lowercase();

        let subtype = media_type.strip_prefix("image/").ok_or_else(|| {
            CoreError::Validation(format!("Unsupported media type '{media_type}'"))
        })?;

        let extension = SUPPORTED_SUBTYPES
            .iter()
            .find(|(name, _)| *name == subtype)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                CoreError::Validation(format!("Unsupported image type '{media_type}'"))
            })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body.trim())
            .map_err(|e| malformed(&format!("body is not valid base64: {e}")))?;

        if bytes.is_empty() {
            return Err(malformed("image body is empty"));
        }

        Ok(Self {
            media_type,
            extension,
            bytes,
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// File extension used on disk (without the dot).
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn malformed(reason: &str) -> CoreError {
    CoreError::Validation(format!("Malformed image payload: {reason}"))
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Filesystem-backed store for publication images.
///
/// The upload directory is created lazily on the first save.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (or root-relative) directory that holds image files.
    pub fn upload_dir(&self) -> PathBuf {
        self.root.join(UPLOAD_SUBDIR)
    }

    /// Build the default file key for a vendor: `<vendorId>-<unixMillis>`.
    pub fn image_key(vendor_id: DbId) -> String {
        format!("{vendor_id}-{}", chrono::Utc::now().timestamp_millis())
    }

    /// Decode `encoded` and store it. See [`save`](Self::save).
    pub async fn save_encoded(&self, encoded: &str, key: &str) -> Result<String, CoreError> {
        let payload = ImagePayload::parse(encoded)?;
        self.save(&payload, key).await
    }

    /// Write `payload` to `<upload_dir>/<key>.<ext>` and return the relative
    /// path to persist.
    ///
    /// Files are created exclusively: if the name is taken, `-1`, `-2`, ...
    /// is appended to the key so an existing image is never overwritten. The
    /// file is synced before returning.
    pub async fn save(&self, payload: &ImagePayload, key: &str) -> Result<String, CoreError> {
        validate_key(key)?;

        let dir = self.upload_dir();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            CoreError::Storage(format!(
                "Cannot create upload directory {}: {e}",
                dir.display()
            ))
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{key}.{}", payload.extension())
            } else {
                format!("{key}-{attempt}.{}", payload.extension())
            };
            let path = dir.join(&file_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(CoreError::Storage(format!(
                        "Cannot create image file {}: {e}",
                        path.display()
                    )))
                }
            };

            let written = async {
                file.write_all(payload.bytes()).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %cleanup,
                        "Failed to remove partially written image"
                    );
                }
                return Err(CoreError::Storage(format!(
                    "Cannot write image file {}: {e}",
                    path.display()
                )));
            }

            tracing::debug!(
                path = %path.display(),
                bytes = payload.bytes().len(),
                media_type = payload.media_type(),
                "Image stored"
            );
            return Ok(format!("{UPLOAD_SUBDIR}/{file_name}"));
        }

        Err(CoreError::Storage(format!(
            "No free file name for image key '{key}'"
        )))
    }

    /// Remove the file at `relative_path`.
    ///
    /// Returns `Ok(true)` if a file was removed and `Ok(false)` if it was
    /// already absent; a missing file is not an error.
    pub async fn delete(&self, relative_path: &str) -> Result<bool, CoreError> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Image removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::Storage(format!(
                "Cannot remove image file {}: {e}",
                path.display()
            ))),
        }
    }

    /// Whether a file currently exists at `relative_path`.
    pub async fn exists(&self, relative_path: &str) -> Result<bool, CoreError> {
        let path = self.resolve(relative_path)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| CoreError::Storage(format!("Cannot stat {}: {e}", path.display())))
    }

    /// Map a persisted relative path onto the filesystem.
    ///
    /// Only plain file names directly inside [`UPLOAD_SUBDIR`] are accepted;
    /// a leading `/` is tolerated.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, CoreError> {
        let trimmed = relative_path.trim_start_matches('/');
        let file = Path::new(trimmed)
            .strip_prefix(UPLOAD_SUBDIR)
            .map_err(|_| outside_upload_dir(relative_path))?;

        let mut components = file.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.upload_dir().join(name)),
            _ => Err(outside_upload_dir(relative_path)),
        }
    }
}

fn outside_upload_dir(path: &str) -> CoreError {
    CoreError::Validation(format!(
        "Image path '{path}' is not inside {UPLOAD_SUBDIR}/"
    ))
}

/// Keys become file names, so they are restricted to `[A-Za-z0-9_-]`.
fn validate_key(key: &str) -> Result<(), CoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid image key '{key}'")))
    }
}
