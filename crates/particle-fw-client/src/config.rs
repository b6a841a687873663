//! Uploader configuration with YAML support

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Production Particle cloud API
pub const DEFAULT_BASE_URL: &str = "https://api.particle.io";
/// Value of the `user-agent` and `x-particle-tool` headers
pub const DEFAULT_TOOL_NAME: &str = "particle-firmware-upload-action";
/// Value of the `x-api-version` header
pub const DEFAULT_API_VERSION: &str = "1.2.0";

/// Firmware uploader configuration
///
/// Every field has a default, so an empty document is a valid configuration
/// pointing at the production API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Base URL of the Particle API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Tool identifier sent as `user-agent` and `x-particle-tool`
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// API version sent as `x-api-version`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tool_name: default_tool_name(),
            api_version: default_api_version(),
            timeouts: TimeoutsConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_tool_name() -> String {
    DEFAULT_TOOL_NAME.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Timeout configuration
///
/// Unset values leave the HTTP client's own defaults in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Whole-request timeout in milliseconds
    #[serde(default)]
    pub request_ms: Option<u64>,

    /// Connect timeout in milliseconds
    #[serde(default)]
    pub connect_ms: Option<u64>,
}

impl UploaderConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder() -> UploaderConfigBuilder {
        UploaderConfigBuilder::new()
    }

    /// Path of the product firmware endpoint, relative to the base URL
    ///
    /// The product id is inserted as given.
    pub fn product_firmware_path(&self, product: &str) -> String {
        format!("/v1/products/{}/firmware", product)
    }
}

/// Builder for UploaderConfig
#[derive(Debug, Default)]
pub struct UploaderConfigBuilder {
    config: UploaderConfig,
}

impl UploaderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the tool identifier
    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.config.tool_name = name.into();
        self
    }

    /// Set the API version header value
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set request timeout in milliseconds
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = Some(ms);
        self
    }

    /// Set connect timeout in milliseconds
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.connect_ms = Some(ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> UploaderConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UploaderConfig::default();
        assert_eq!(config.base_url, "https://api.particle.io");
        assert_eq!(config.tool_name, "particle-firmware-upload-action");
        assert_eq!(config.api_version, "1.2.0");
        assert_eq!(config.timeouts.request_ms, None);
        assert_eq!(config.timeouts.connect_ms, None);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
base_url: "http://localhost:8080"
tool_name: "my-ci"

timeouts:
  request_ms: 60000
"#;

        let config = UploaderConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.tool_name, "my-ci");
        assert_eq!(config.api_version, "1.2.0");
        assert_eq!(config.timeouts.request_ms, Some(60000));
        assert_eq!(config.timeouts.connect_ms, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            UploaderConfig::from_yaml("\n").unwrap(),
            UploaderConfig::default()
        );
    }

    #[test]
    fn test_json_parsing() {
        let config = UploaderConfig::from_json(r#"{"base_url":"http://127.0.0.1:1"}"#).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:1");
        assert_eq!(config.tool_name, DEFAULT_TOOL_NAME);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = UploaderConfig::from_yaml("timeouts: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_builder() {
        let config = UploaderConfig::builder()
            .base_url("http://localhost:9080")
            .tool_name("tool")
            .api_version("2.0.0")
            .request_timeout_ms(5_000)
            .connect_timeout_ms(1_000)
            .build();

        assert_eq!(config.base_url, "http://localhost:9080");
        assert_eq!(config.tool_name, "tool");
        assert_eq!(config.api_version, "2.0.0");
        assert_eq!(config.timeouts.request_ms, Some(5_000));
        assert_eq!(config.timeouts.connect_ms, Some(1_000));
    }

    #[test]
    fn test_product_firmware_path() {
        let config = UploaderConfig::default();
        assert_eq!(config.product_firmware_path("201"), "/v1/products/201/firmware");
        assert_eq!(
            config.product_firmware_path("my-product"),
            "/v1/products/my-product/firmware"
        );
    }

    #[test]
    fn test_to_yaml() {
        let yaml = UploaderConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("base_url"));
        assert!(yaml.contains("https://api.particle.io"));
    }
}
