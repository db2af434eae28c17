//! Number formatting for content-stream operands.
//!
//! Numbers are printed with a fixed number of decimals and trailing zeros
//! trimmed, so `1.0` at two decimals becomes `1.` and `0.5` stays `0.5`.

/// Precision used by [`NumberFormat::hpf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatPrecision {
    /// 16 decimals for values in (-1, 1), 5 otherwise
    Smart,
    /// Always this many decimals
    Fixed(usize),
}

impl Default for FloatPrecision {
    fn default() -> Self {
        FloatPrecision::Smart
    }
}

/// Shared number formatter carried by a document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberFormat {
    /// Overrides every requested precision when set
    pub precision: Option<usize>,
    pub float_precision: FloatPrecision,
}

impl NumberFormat {
    pub fn new(precision: Option<usize>, float_precision: FloatPrecision) -> Self {
        Self {
            precision,
            float_precision,
        }
    }

    /// Rounds `value` to `digits` decimals and trims trailing zeros.
    pub fn round(&self, value: f64, digits: usize) -> String {
        round_to_precision(value, self.precision.unwrap_or(digits))
    }

    pub fn f2(&self, value: f64) -> String {
        self.round(value, 2)
    }

    pub fn f3(&self, value: f64) -> String {
        self.round(value, 3)
    }

    /// High precision format used for coordinates and matrices.
    pub fn hpf(&self, value: f64) -> String {
        match self.float_precision {
            FloatPrecision::Smart => {
                if value > -1.0 && value < 1.0 {
                    self.round(value, 16)
                } else {
                    self.round(value, 5)
                }
            }
            FloatPrecision::Fixed(digits) => self.round(value, digits),
        }
    }
}

pub fn round_to_precision(value: f64, digits: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let fixed = format!("{value:.digits$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0." || trimmed == "-0" {
        return "0.".to_string();
    }
    trimmed.to_string()
}

/// Shortest representation after rounding to two decimals, as used in
/// page boxes (`595.28`, `612`).
pub fn box_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision_trims_zeros() {
        assert_eq!(round_to_precision(1.0, 2), "1.");
        assert_eq!(round_to_precision(0.0, 2), "0.");
        assert_eq!(round_to_precision(0.5, 2), "0.5");
        assert_eq!(round_to_precision(0.125, 3), "0.125");
        assert_eq!(round_to_precision(2.0 / 3.0, 2), "0.67");
        assert_eq!(round_to_precision(-0.0, 2), "0.");
        assert_eq!(round_to_precision(12.0, 0), "12");
    }

    #[test]
    fn test_hpf_smart() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.hpf(0.200025), "0.200025");
        assert_eq!(fmt.hpf(841.89), "841.89");
        assert_eq!(fmt.hpf(1.0), "1.");
        assert_eq!(fmt.hpf(-2.5), "-2.5");
        assert_eq!(fmt.hpf(123.456789), "123.45679");
    }

    #[test]
    fn test_hpf_fixed_and_override() {
        let fmt = NumberFormat::new(None, FloatPrecision::Fixed(2));
        assert_eq!(fmt.hpf(0.123456), "0.12");

        let fmt = NumberFormat::new(Some(1), FloatPrecision::Smart);
        assert_eq!(fmt.f2(0.25), "0.3");
        assert_eq!(fmt.hpf(0.25), "0.3");
    }

    #[test]
    fn test_box_number() {
        assert_eq!(box_number(595.28), "595.28");
        assert_eq!(box_number(612.0), "612");
        assert_eq!(box_number(841.8897637795), "841.89");
        assert_eq!(box_number(0.0), "0");
    }
}
