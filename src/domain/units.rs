// Unit selection - picks a human-scale unit for a panel's largest value
use serde::Serialize;

/// Category of measurement; decides which ladder and formatter apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuantityClass {
    Bytes,
    Bandwidth,
    Count,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitSpec {
    pub unit: &'static str,
    pub divisor: f64,
}

impl UnitSpec {
    pub const fn new(unit: &'static str, divisor: f64) -> Self {
        Self { unit, divisor }
    }

    /// Convert a raw value into this unit for display.
    pub fn scale(&self, value: f64) -> f64 {
        scale(value, self.divisor)
    }
}

const KIB: f64 = 1024.0;

// Rungs are ordered largest first; the base rung (divisor 1) is implicit.
const BYTE_LADDER: [UnitSpec; 4] = [
    UnitSpec::new("TB", KIB * KIB * KIB * KIB),
    UnitSpec::new("GB", KIB * KIB * KIB),
    UnitSpec::new("MB", KIB * KIB),
    UnitSpec::new("KB", KIB),
];

const BANDWIDTH_LADDER: [UnitSpec; 3] = [
    UnitSpec::new("Gbps", 1_000_000_000.0),
    UnitSpec::new("Mbps", 1_000_000.0),
    UnitSpec::new("Kbps", 1_000.0),
];

const COUNT_LADDER: [UnitSpec; 2] = [
    UnitSpec::new(HUNDRED_MILLION, 100_000_000.0),
    UnitSpec::new(TEN_THOUSAND, 10_000.0),
];

pub const TEN_THOUSAND: &str = "万";
pub const HUNDRED_MILLION: &str = "亿";
/// Base label for plain event counts.
pub const OCCURRENCES: &str = "次";

impl QuantityClass {
    pub fn base_unit(self) -> UnitSpec {
        match self {
            QuantityClass::Bytes => UnitSpec::new("B", 1.0),
            QuantityClass::Bandwidth => UnitSpec::new("bps", 1.0),
            QuantityClass::Count => UnitSpec::new(OCCURRENCES, 1.0),
            QuantityClass::Duration => UnitSpec::new("ms", 1.0),
        }
    }

    fn ladder(self) -> &'static [UnitSpec] {
        match self {
            QuantityClass::Bytes => &BYTE_LADDER,
            QuantityClass::Bandwidth => &BANDWIDTH_LADDER,
            QuantityClass::Count => &COUNT_LADDER,
            QuantityClass::Duration => &[],
        }
    }
}

/// Pick the largest unit whose divisor does not exceed `max_value`.
///
/// A zero, negative or non-finite maximum always yields the base unit with
/// divisor 1, so an empty panel still gets a usable axis.
pub fn select_unit(max_value: f64, class: QuantityClass) -> UnitSpec {
    if !max_value.is_finite() || max_value <= 0.0 {
        return class.base_unit();
    }

    class
        .ladder()
        .iter()
        .find(|rung| max_value >= rung.divisor)
        .copied()
        .unwrap_or_else(|| class.base_unit())
}

/// Divide by `divisor`; values are rounded to two decimals once scaled.
pub fn scale(value: f64, divisor: f64) -> f64 {
    if divisor > 1.0 {
        round2(value / divisor)
    } else {
        value
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Largest finite value in a series, or 0 for an empty one.
pub fn series_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_uses_base_unit() {
        for class in [
            QuantityClass::Bytes,
            QuantityClass::Bandwidth,
            QuantityClass::Count,
            QuantityClass::Duration,
        ] {
            let spec = select_unit(0.0, class);
            assert_eq!(spec.divisor, 1.0);
            assert_eq!(spec, class.base_unit());
        }
    }

    #[test]
    fn test_gigabyte_scale() {
        let spec = select_unit(2e9, QuantityClass::Bytes);
        assert_eq!(spec.unit, "GB");
        assert_eq!(spec.scale(1e9), 0.93);
        assert_eq!(spec.scale(2e9), 1.86);
    }

    #[test]
    fn test_bandwidth_ladder() {
        assert_eq!(select_unit(999.0, QuantityClass::Bandwidth).unit, "bps");
        assert_eq!(select_unit(1_000.0, QuantityClass::Bandwidth).unit, "Kbps");
        assert_eq!(select_unit(45_000_000.0, QuantityClass::Bandwidth).unit, "Mbps");
        assert_eq!(select_unit(3.2e12, QuantityClass::Bandwidth).unit, "Gbps");
    }

    #[test]
    fn test_count_ladder_base_threshold() {
        let spec = select_unit(3000.0, QuantityClass::Count);
        assert_eq!(spec.divisor, 1.0);
        assert_eq!(spec.scale(3000.0), 3000.0);

        assert_eq!(select_unit(10_000.0, QuantityClass::Count).unit, TEN_THOUSAND);
        assert_eq!(select_unit(250_000_000.0, QuantityClass::Count).unit, HUNDRED_MILLION);
    }

    #[test]
    fn test_scaled_max_stays_readable() {
        // (class, first scaled value, rung width)
        let cases = [
            (QuantityClass::Bytes, 1.0, 1024.0),
            (QuantityClass::Bandwidth, 1.0, 1000.0),
            (QuantityClass::Count, 10_000.0, 10_000.0),
        ];
        for (class, start, step) in cases {
            let mut value = start;
            while value < 1e12 {
                let spec = select_unit(value, class);
                let scaled = value / spec.divisor;
                assert!(scaled >= 1.0, "{class:?} {value} scaled to {scaled}");
                assert!(scaled < step, "{class:?} {value} scaled to {scaled}");
                value *= 3.7;
            }
        }
    }

    #[test]
    fn test_count_rungs_switch_at_exact_powers() {
        assert_eq!(select_unit(9_999.0, QuantityClass::Count).divisor, 1.0);
        assert_eq!(select_unit(99_999_999.0, QuantityClass::Count).unit, TEN_THOUSAND);
        assert_eq!(select_unit(100_000_000.0, QuantityClass::Count).unit, HUNDRED_MILLION);
        assert_eq!(select_unit(9.9e11, QuantityClass::Count).scale(9.9e11), 9900.0);
    }

    #[test]
    fn test_scale_round_trip() {
        let spec = select_unit(5.5e9, QuantityClass::Bytes);
        for raw in [1.0e9, 3.3e9, 5.5e9] {
            let restored = spec.scale(raw) * spec.divisor;
            assert!((restored - raw).abs() <= 0.0051 * spec.divisor);
        }
    }

    #[test]
    fn test_non_finite_max() {
        assert_eq!(select_unit(f64::NAN, QuantityClass::Bytes).divisor, 1.0);
        assert_eq!(series_max(&[]), 0.0);
        assert_eq!(series_max(&[1.0, f64::NAN, 4.0]), 4.0);
    }
}
