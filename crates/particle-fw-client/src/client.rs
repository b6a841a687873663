//! Firmware uploader for the Particle product firmware endpoint

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::UploaderConfig;
use crate::error::{ConfigError, Result, UploadError};
use crate::types::{FirmwareUploadResponse, UploadRequest, UploadResult};

/// Header naming the tool that performed the upload
pub const PARTICLE_TOOL_HEADER: &str = "x-particle-tool";
/// Header pinning the API version
pub const API_VERSION_HEADER: &str = "x-api-version";

/// Uploads product firmware in a single multipart POST
///
/// One call to [`upload`](Self::upload) is one attempt; there is no retry.
#[derive(Debug, Clone)]
pub struct FirmwareUploader {
    client: Client,
    base_url: Url,
    config: UploaderConfig,
}

impl FirmwareUploader {
    /// Create an uploader for the production Particle API
    pub fn new() -> std::result::Result<Self, ConfigError> {
        Self::with_config(UploaderConfig::default())
    }

    /// Create an uploader from configuration
    pub fn with_config(config: UploaderConfig) -> std::result::Result<Self, ConfigError> {
        let mut builder = Client::builder().default_headers(static_headers(&config)?);
        if let Some(ms) = config.timeouts.request_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = config.timeouts.connect_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        let client = builder.build()?;

        let base_url =
            Url::parse(&config.base_url).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("Firmware uploader created for {}", base_url);

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Endpoint a request for `product` is sent to
    pub fn firmware_url(&self, product: &str) -> Result<Url> {
        self.base_url
            .join(&self.config.product_firmware_path(product))
            .map_err(Into::into)
    }

    /// Upload the firmware described by `request`
    ///
    /// Succeeds only on `201 Created`. Any other status is returned as
    /// [`UploadError::Upstream`] with the body untouched; a request that never
    /// got a response is [`UploadError::Transport`].
    #[instrument(skip(self, request), fields(product = %request.product(), version = %request.firmware_version()))]
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadResult> {
        let url = self.firmware_url(request.product())?;
        let form = build_form(request).await?;

        info!("Uploading firmware to {}", url);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", request.access_token()))
            .multipart(form)
            .send()
            .await?;

        handle_response(response).await
    }
}

/// Headers sent with every request, independent of the upload
fn static_headers(config: &UploaderConfig) -> std::result::Result<HeaderMap, ConfigError> {
    let value = |name: &'static str, v: &str| {
        HeaderValue::from_str(v).map_err(|e| ConfigError::InvalidHeader {
            name,
            message: e.to_string(),
        })
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, value("user-agent", &config.tool_name)?);
    headers.insert(
        PARTICLE_TOOL_HEADER,
        value(PARTICLE_TOOL_HEADER, &config.tool_name)?,
    );
    headers.insert(
        API_VERSION_HEADER,
        value(API_VERSION_HEADER, &config.api_version)?,
    );
    Ok(headers)
}

/// Build the multipart body: `binary`, `version`, `title`, then `description`
/// when there is one
///
/// The firmware file is read in full here, so its handle is closed before the
/// request goes out.
async fn build_form(request: &UploadRequest) -> Result<Form> {
    let path = request.firmware_path();
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| UploadError::FileAccess {
            path: path.to_string(),
            source,
        })?;

    debug!("Read {} bytes from {}", data.len(), path);

    let binary = binary_part(data, request.firmware_filename(), "application/octet-stream")?;

    let mut form = Form::new()
        .part("binary", binary)
        .text("version", request.firmware_version().to_string())
        .text("title", request.title().to_string());

    if let Some(description) = request.description() {
        form = form.text("description", description.to_string());
    }

    Ok(form)
}

fn binary_part(data: Vec<u8>, file_name: &str, mime: &str) -> Result<Part> {
    Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .map_err(|e| UploadError::Encode(e.to_string()))
}

async fn handle_response(response: reqwest::Response) -> Result<UploadResult> {
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::CREATED {
        debug!("Upload rejected with status {}", status);
        return Err(UploadError::upstream(status.as_u16(), body));
    }

    let parsed: FirmwareUploadResponse =
        serde_json::from_str(&body).map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

    Ok(parsed.into())
}
