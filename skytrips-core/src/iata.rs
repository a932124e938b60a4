use serde::{Deserialize, Serialize};

// ============================================================================
// Airport records
// ============================================================================

/// Display record carried next to a bare IATA code so the results page can
/// render names without another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl Airport {
    pub fn new(code: &str, name: &str, city: &str, country: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            country: country.to_string(),
        }
    }
}

// ============================================================================
// Code checks
// ============================================================================

/// Three uppercase ASCII letters, e.g. `SYD`.
pub fn is_iata_code(code: &str) -> bool {
    is_upper_alpha(code, 3)
}

/// ISO 4217 style, e.g. `AUD`.
pub fn is_currency_code(code: &str) -> bool {
    is_upper_alpha(code, 3)
}

fn is_upper_alpha(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_uppercase())
}
