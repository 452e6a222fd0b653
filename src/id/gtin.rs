//! GTIN normalization and GS1 check-digit math.

use regex::Regex;

use crate::error::{GtinRule, KglinkError, Result};

/// Normalize a raw GTIN to the 14-digit GTIN-14 form.
///
/// Strips any non-digit formatting (hyphens, spaces), accepts 8, 12, 13,
/// or 14 digit inputs, left-pads with zeros, and validates the GS1 check
/// digit on the padded value. Left-padding never changes check-digit
/// validity since leading zeros contribute nothing to the weighted sum.
pub fn normalize_gtin(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if !matches!(digits.len(), 8 | 12 | 13 | 14) {
        return Err(KglinkError::InvalidGtin {
            gtin: raw.to_string(),
            rule: GtinRule::Length(digits.len()),
        });
    }

    let gtin14 = format!("{:0>14}", digits);

    if !validate_gtin_check_digit(&gtin14) {
        return Err(KglinkError::InvalidGtin {
            gtin: raw.to_string(),
            rule: GtinRule::CheckDigit,
        });
    }

    Ok(gtin14)
}

/// Validate the GS1 check digit of a 14-digit GTIN.
///
/// Weights alternate 3, 1 starting from the digit adjacent to the check
/// digit; the check digit is whatever makes the weighted sum a multiple
/// of 10. Returns false for anything that is not exactly 14 ASCII digits.
pub fn validate_gtin_check_digit(gtin14: &str) -> bool {
    if gtin14.len() != 14 || !gtin14.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = gtin14.chars().filter_map(|c| c.to_digit(10)).collect();

    let total: u32 = digits[..13]
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| d * if i % 2 == 0 { 3 } else { 1 })
        .sum();

    let expected = (10 - (total % 10)) % 10;
    digits[13] == expected
}

/// Extract a GTIN-14 from a GS1 Digital Link URL, if it contains one.
pub fn extract_gtin_from_url(url: &str) -> Option<String> {
    // Digital Link product key: /01/{14-digit-gtin}
    let pattern = Regex::new(r"/01/(\d{14})").expect("Invalid regex pattern");
    pattern
        .captures(url)
        .map(|cap| cap.get(1).unwrap().as_str().to_string())
}

/// Whether a URL carries a GS1 Digital Link product identifier.
pub fn is_product_url(url: &str) -> bool {
    extract_gtin_from_url(url).is_some()
}
