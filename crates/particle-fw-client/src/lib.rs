//! Particle Firmware Upload Library
//!
//! Validates the inputs of a firmware release and uploads the binary to a
//! Particle product in one multipart POST.
//!
//! # Example
//!
//! ```rust,no_run
//! use particle_fw_client::{validate, FirmwareUploader, RawInputs};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let request = validate(RawInputs {
//!         access_token: std::env::var("PARTICLE_ACCESS_TOKEN")?,
//!         firmware_path: "target/firmware.bin".into(),
//!         firmware_version: "3".into(),
//!         product: "12345".into(),
//!         title: "Release 3".into(),
//!         description: String::new(),
//!     })?;
//!
//!     let uploader = FirmwareUploader::new()?;
//!     let result = uploader.upload(&request).await?;
//!     println!("{} uploaded by {}", result.title, result.uploaded_by);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Running as a CI step
//!
//! [`action::run`] performs the whole step: read inputs from an
//! [`InputSource`], validate them, upload, and hand status lines and the
//! failure message to a [`Reporter`].
//!
//! # Testing
//!
//! The `testing` module serves a recording mock of the firmware endpoint:
//!
//! ```rust,ignore
//! use particle_fw_client::testing::{MockParticleApi, TestServer};
//!
//! let api = MockParticleApi::new();
//! let server = TestServer::start(api.router()).await?;
//! server.uploader.upload(&request).await?;
//! let sent = &api.requests()[0];
//! ```

pub mod action;
mod client;
pub mod config;
mod error;
pub mod inputs;
pub mod testing;
mod types;
pub mod validate;

pub use action::{RecordingReporter, Reporter};
pub use client::{FirmwareUploader, API_VERSION_HEADER, PARTICLE_TOOL_HEADER};
pub use config::{UploaderConfig, UploaderConfigBuilder};
pub use error::{ActionError, ConfigError, InputError, Result, UploadError, ValidationError};
pub use inputs::InputSource;
pub use types::*;
pub use validate::validate;
