//! Quantity parsing.

/// Result of parsing a quantity cell.
///
/// `value` is always finite and non-negative; `valid` is false when the
/// source text had to be coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub valid: bool,
}

impl Quantity {
    const ZERO_INVALID: Self = Self {
        value: 0.0,
        valid: false,
    };
}

/// Parse a quantity cell.
///
/// Surrounding whitespace and trailing `#` markers (added by upstream report
/// steps) are ignored. Unparsable, NaN, infinite or negative values become 0
/// and are flagged as invalid.
#[must_use]
pub fn parse_quantity(raw: &str) -> Quantity {
    let trimmed = raw.trim().trim_end_matches('#').trim_end();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Quantity { value, valid: true },
        _ => Quantity::ZERO_INVALID,
    }
}
