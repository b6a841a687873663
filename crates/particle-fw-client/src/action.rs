//! One complete action run: collect, validate, upload, report

use tracing::{info, warn};

use crate::client::FirmwareUploader;
use crate::error::ActionError;
use crate::inputs::{self, InputSource};
use crate::types::UploadResult;
use crate::validate::validate;

/// Where status lines and the failure message go
pub trait Reporter {
    /// An informational line
    fn info(&mut self, message: &str);

    /// The single failure message of the run
    fn set_failed(&mut self, message: &str);
}

/// Run the whole pipeline and return its outcome
///
/// Nothing touches the network unless every input is present and valid.
/// Emits the pre-upload and post-upload lines through `reporter`; errors are
/// returned, not reported.
pub async fn execute<S, R>(
    source: &S,
    uploader: &FirmwareUploader,
    reporter: &mut R,
) -> Result<UploadResult, ActionError>
where
    S: InputSource,
    R: Reporter,
{
    let raw = inputs::collect(source)?;
    let request = validate(raw)?;

    reporter.info(&format!(
        "Uploading firmware {} to product {} with version {}",
        request.firmware_path(),
        request.product(),
        request.firmware_version()
    ));

    let result = uploader.upload(&request).await?;

    reporter.info(&format!(
        "Firmware uploaded successfully. \nTitle: {} \nUploaded by: {}",
        result.title, result.uploaded_by
    ));

    Ok(result)
}

/// Run the pipeline, sending any failure to `reporter`
///
/// Returns `true` on success. Never panics on a pipeline failure; the caller
/// decides the exit code.
pub async fn run<S, R>(source: &S, uploader: &FirmwareUploader, reporter: &mut R) -> bool
where
    S: InputSource,
    R: Reporter,
{
    match execute(source, uploader, reporter).await {
        Ok(result) => {
            info!(title = %result.title, uploaded_by = %result.uploaded_by, "Upload complete");
            true
        }
        Err(e) => {
            warn!("Action failed: {}", e);
            reporter.set_failed(&e.to_string());
            false
        }
    }
}

/// Reporter that keeps every line, for tests and embedding
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingReporter {
    pub infos: Vec<String>,
    pub failures: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn set_failed(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploaderConfig;
    use std::collections::HashMap;

    fn offline_uploader() -> FirmwareUploader {
        // Nothing listens here; any request would fail with a transport error.
        let config = UploaderConfig::builder()
            .base_url("http://127.0.0.1:9")
            .build();
        FirmwareUploader::with_config(config).unwrap()
    }

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_input_is_reported() {
        let src = source(&[
            (inputs::ACCESS_TOKEN, "abcde".repeat(8).as_str()),
            (inputs::FIRMWARE_PATH, ""),
            (inputs::FIRMWARE_VERSION, "1"),
            (inputs::PRODUCT_ID, "400"),
            (inputs::TITLE, "smthng"),
        ]);
        let mut reporter = RecordingReporter::default();

        let ok = run(&src, &offline_uploader(), &mut reporter).await;

        assert!(!ok);
        assert!(reporter.infos.is_empty());
        assert_eq!(
            reporter.failures,
            vec!["Input required and not supplied: firmware-path".to_string()]
        );
    }

    #[tokio::test]
    async fn test_validation_failure_is_reported() {
        let src = source(&[
            (inputs::ACCESS_TOKEN, "too-short"),
            (inputs::FIRMWARE_PATH, "firmware.bin"),
            (inputs::FIRMWARE_VERSION, "1"),
            (inputs::PRODUCT_ID, "201"),
            (inputs::TITLE, "smthng"),
        ]);
        let mut reporter = RecordingReporter::default();

        let ok = run(&src, &offline_uploader(), &mut reporter).await;

        assert!(!ok);
        assert!(reporter.infos.is_empty());
        assert_eq!(reporter.failures, vec!["invalid access token".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_firmware_file_is_reported_after_status_line() {
        let src = source(&[
            (inputs::ACCESS_TOKEN, "abcde".repeat(8).as_str()),
            (inputs::FIRMWARE_PATH, "/definitely/not/here.bin"),
            (inputs::FIRMWARE_VERSION, "3"),
            (inputs::PRODUCT_ID, "201"),
            (inputs::TITLE, "smthng"),
        ]);
        let mut reporter = RecordingReporter::default();

        let ok = run(&src, &offline_uploader(), &mut reporter).await;

        assert!(!ok);
        assert_eq!(
            reporter.infos,
            vec![
                "Uploading firmware /definitely/not/here.bin to product 201 with version 3"
                    .to_string()
            ]
        );
        assert_eq!(reporter.failures.len(), 1);
        assert!(reporter.failures[0]
            .starts_with("Error uploading firmware: failed to read /definitely/not/here.bin"));
    }
}
