//! Syntactic checks on raw action inputs

use crate::error::ValidationError;
use crate::types::{RawInputs, UploadRequest};

/// Length of a Particle access token
pub const ACCESS_TOKEN_LEN: usize = 40;

/// Check raw inputs and build the request they describe
///
/// Fields are checked in a fixed order (access token, product, firmware path,
/// firmware version, title) and the first failure is returned. The description
/// is never checked; an empty one becomes `None`.
pub fn validate(inputs: RawInputs) -> Result<UploadRequest, ValidationError> {
    if !valid_access_token(&inputs.access_token) {
        return Err(ValidationError::AccessToken);
    }
    if !valid_product_id(&inputs.product) {
        return Err(ValidationError::ProductId);
    }
    if !valid_firmware_path(&inputs.firmware_path) {
        return Err(ValidationError::FirmwarePath);
    }
    if !valid_version(&inputs.firmware_version) {
        return Err(ValidationError::FirmwareVersion);
    }
    if !valid_title(&inputs.title) {
        return Err(ValidationError::Title);
    }

    let description = Some(inputs.description).filter(|d| !d.is_empty());

    Ok(UploadRequest {
        access_token: inputs.access_token,
        firmware_path: inputs.firmware_path,
        firmware_version: inputs.firmware_version,
        product: inputs.product,
        title: inputs.title,
        description,
    })
}

pub fn valid_access_token(access_token: &str) -> bool {
    access_token.chars().count() == ACCESS_TOKEN_LEN
}

/// Any non-empty product id is accepted, numeric or slug
pub fn valid_product_id(product: &str) -> bool {
    !product.is_empty()
}

pub fn valid_firmware_path(firmware_path: &str) -> bool {
    !firmware_path.is_empty()
}

pub fn valid_title(title: &str) -> bool {
    !title.is_empty()
}

/// True when the version starts with a base-10 integer
///
/// Leading whitespace and one sign character are skipped; anything after the
/// first run of digits is ignored, so `"1abc"` passes and `"abc"` does not.
pub fn valid_version(firmware_version: &str) -> bool {
    leading_integer(firmware_version).is_some()
}

/// Parse the integer prefix of `s`
///
/// Saturates instead of failing on overflow; only the presence of digits
/// matters for validation.
pub fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for digit in digits {
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn valid_inputs() -> RawInputs {
        RawInputs {
            access_token: "abcde".repeat(8),
            firmware_path: "firmware.bin".into(),
            firmware_version: "1".into(),
            product: "201".into(),
            title: "Test Firmware".into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_valid_inputs_build_request() {
        let request = validate(valid_inputs()).unwrap();
        assert_eq!(request.product(), "201");
        assert_eq!(request.firmware_version(), "1");
        assert_eq!(request.title(), "Test Firmware");
        assert_eq!(request.description(), None);
    }

    #[test]
    fn test_description_kept_when_present() {
        let inputs = RawInputs {
            description: "smthng".into(),
            ..valid_inputs()
        };
        assert_eq!(validate(inputs).unwrap().description(), Some("smthng"));
    }

    #[rstest]
    #[case(String::new())]
    #[case("short".to_string())]
    #[case("a".repeat(39))]
    #[case("a".repeat(41))]
    #[case(" ".repeat(80))]
    fn test_access_token_length(#[case] token: String) {
        let inputs = RawInputs {
            access_token: token,
            ..valid_inputs()
        };
        assert_eq!(validate(inputs), Err(ValidationError::AccessToken));
    }

    // Length counts Unicode scalar values, not bytes or UTF-16 units.
    #[rstest]
    #[case("é".repeat(40), true)]
    #[case("😀".repeat(20), false)]
    #[case("😀".repeat(40), true)]
    fn test_access_token_non_ascii_length(#[case] token: String, #[case] ok: bool) {
        let inputs = RawInputs {
            access_token: token,
            ..valid_inputs()
        };
        assert_eq!(validate(inputs).is_ok(), ok);
    }

    #[test]
    fn test_access_token_charset_is_not_checked() {
        let inputs = RawInputs {
            access_token: "!@#$%^&*()".repeat(4),
            ..valid_inputs()
        };
        assert!(validate(inputs).is_ok());
    }

    #[rstest]
    #[case("201", true)]
    #[case("my-product-slug", true)]
    #[case("", false)]
    fn test_product_id(#[case] product: &str, #[case] ok: bool) {
        let inputs = RawInputs {
            product: product.to_string(),
            ..valid_inputs()
        };
        assert_eq!(validate(inputs).is_ok(), ok);
    }

    #[rstest]
    #[case("1", true)]
    #[case("10", true)]
    #[case("1abc", true)]
    #[case("  42", true)]
    #[case("-3", true)]
    #[case("+7", true)]
    #[case("abc", false)]
    #[case("", false)]
    #[case("-", false)]
    #[case("v1", false)]
    fn test_firmware_version(#[case] version: &str, #[case] ok: bool) {
        let inputs = RawInputs {
            firmware_version: version.to_string(),
            ..valid_inputs()
        };
        let result = validate(inputs);
        if ok {
            assert!(result.is_ok(), "expected {:?} to pass", version);
        } else {
            assert_eq!(result, Err(ValidationError::FirmwareVersion));
        }
    }

    #[test]
    fn test_leading_integer_values() {
        assert_eq!(leading_integer("1abc"), Some(1));
        assert_eq!(leading_integer(" -12x"), Some(-12));
        assert_eq!(leading_integer("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(leading_integer("x1"), None);
    }

    #[test]
    fn test_first_failure_wins() {
        let all_bad = RawInputs::default();
        assert_eq!(validate(all_bad), Err(ValidationError::AccessToken));

        let inputs = RawInputs {
            product: String::new(),
            firmware_path: String::new(),
            title: String::new(),
            ..valid_inputs()
        };
        assert_eq!(validate(inputs), Err(ValidationError::ProductId));

        let inputs = RawInputs {
            firmware_path: String::new(),
            firmware_version: "abc".into(),
            ..valid_inputs()
        };
        assert_eq!(validate(inputs), Err(ValidationError::FirmwarePath));

        let inputs = RawInputs {
            firmware_version: "abc".into(),
            title: String::new(),
            ..valid_inputs()
        };
        assert_eq!(validate(inputs), Err(ValidationError::FirmwareVersion));

        let inputs = RawInputs {
            title: String::new(),
            ..valid_inputs()
        };
        assert_eq!(validate(inputs), Err(ValidationError::Title));
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::AccessToken.to_string(), "invalid access token");
        assert_eq!(ValidationError::ProductId.to_string(), "invalid product id");
        assert_eq!(ValidationError::FirmwarePath.to_string(), "invalid firmware path");
        assert_eq!(
            ValidationError::FirmwareVersion.to_string(),
            "invalid firmware version"
        );
        assert_eq!(ValidationError::Title.to_string(), "invalid title");
    }
}
