//! Request and response types for firmware uploads

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// Raw action inputs, exactly as supplied by the invoking environment
///
/// Nothing here has been checked yet; `validate::validate` turns it into an
/// [`UploadRequest`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub access_token: String,
    pub firmware_path: String,
    pub firmware_version: String,
    pub product: String,
    pub title: String,
    pub description: String,
}

/// A validated firmware upload, consumed by a single upload attempt
#[derive(Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub(crate) access_token: String,
    pub(crate) firmware_path: String,
    pub(crate) firmware_version: String,
    pub(crate) product: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
}

impl UploadRequest {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn firmware_path(&self) -> &str {
        &self.firmware_path
    }

    pub fn firmware_version(&self) -> &str {
        &self.firmware_version
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description, `None` when it was not supplied or empty
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Filename sent with the `binary` part
    ///
    /// The last `/`-separated segment of the firmware path, or `firmware.bin`
    /// when that segment is empty (e.g. a path ending in `/`).
    pub fn firmware_filename(&self) -> &str {
        firmware_filename(&self.firmware_path)
    }
}

pub(crate) const DEFAULT_FIRMWARE_FILENAME: &str = "firmware.bin";

pub(crate) fn firmware_filename(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_FIRMWARE_FILENAME,
    }
}

/// Debug view of a secret that only shows its length
struct Redacted<'a>(&'a str);

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted, {} chars>", self.0.chars().count())
    }
}

impl fmt::Debug for RawInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawInputs")
            .field("access_token", &Redacted(&self.access_token))
            .field("firmware_path", &self.firmware_path)
            .field("firmware_version", &self.firmware_version)
            .field("product", &self.product)
            .field("title", &self.title)
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("access_token", &Redacted(&self.access_token))
            .field("firmware_path", &self.firmware_path)
            .field("firmware_version", &self.firmware_version)
            .field("product", &self.product)
            .field("title", &self.title)
            .field("description", &self.description)
            .finish()
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Title echoed back by the server
    pub title: String,
    /// Username of the account that owns the upload
    pub uploaded_by: String,
}

/// Body of a `201 Created` answer from the product firmware endpoint
///
/// Only the fields this client needs; the server sends more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareUploadResponse {
    pub title: String,
    pub uploaded_by: UploadedBy,
}

/// Nested uploader object in [`FirmwareUploadResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedBy {
    pub username: String,
}

impl From<FirmwareUploadResponse> for UploadResult {
    fn from(response: FirmwareUploadResponse) -> Self {
        Self {
            title: response.title,
            uploaded_by: response.uploaded_by.username,
        }
    }
}
