//! Asset handles and rendered output payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to a stored asset.
///
/// Handles are produced by the object store when a rendered image is
/// persisted, and by reference-image ingestion before a job starts. The
/// pipeline never inspects the contents.
///
/// # Examples
///
/// ```
/// use fumetti_core::AssetHandle;
///
/// let handle = AssetHandle::new("assets/ref-042.png");
/// assert_eq!(handle.as_str(), "assets/ref-042.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct AssetHandle(String);

impl AssetHandle {
    /// Wrap an existing storage key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Mint a fresh random handle.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// View the underlying storage key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw bytes returned by the render service before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAsset {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// MIME type reported by the service
    pub mime_type: String,
}

impl RenderedAsset {
    /// Create a rendered asset from bytes and a MIME type.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Aspect selection passed through to the render service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SizeHint {
    /// 1:1 panel
    #[default]
    Square,
    /// 16:9 panel, used for climactic spreads
    Wide,
    /// 9:16 panel
    Tall,
}
