//! Collecting action inputs at the process boundary
//!
//! Inputs are read once, trimmed, and checked for presence in a fixed order.
//! Core logic only ever sees the resulting [`RawInputs`].

use std::collections::HashMap;

use crate::error::InputError;
use crate::types::RawInputs;

pub const ACCESS_TOKEN: &str = "particle-access-token";
pub const FIRMWARE_PATH: &str = "firmware-path";
pub const FIRMWARE_VERSION: &str = "firmware-version";
pub const PRODUCT_ID: &str = "product-id";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";

/// Something that can answer "what value was given for this input?"
pub trait InputSource {
    /// Raw value of the named input, `None` when it was not supplied
    fn input(&self, name: &str) -> Option<String>;
}

impl InputSource for HashMap<String, String> {
    fn input(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Name of the environment variable a CI runner uses for an input
///
/// `firmware-path` becomes `INPUT_FIRMWARE-PATH`; spaces become underscores.
pub fn env_var_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Trimmed value of an optional input, empty when absent
pub fn optional(source: &impl InputSource, name: &str) -> String {
    source
        .input(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed value of a required input
pub fn required(source: &impl InputSource, name: &str) -> Result<String, InputError> {
    let value = optional(source, name);
    if value.is_empty() {
        return Err(InputError::required(name));
    }
    Ok(value)
}

/// Read every action input
///
/// Required inputs are read in the order access token, firmware path,
/// firmware version, product id, title; the first one missing is reported.
pub fn collect(source: &impl InputSource) -> Result<RawInputs, InputError> {
    let access_token = required(source, ACCESS_TOKEN)?;
    let firmware_path = required(source, FIRMWARE_PATH)?;
    let firmware_version = required(source, FIRMWARE_VERSION)?;
    let product = required(source, PRODUCT_ID)?;
    let title = required(source, TITLE)?;
    let description = optional(source, DESCRIPTION);

    Ok(RawInputs {
        access_token,
        firmware_path,
        firmware_version,
        product,
        title,
        description,
    })
}
