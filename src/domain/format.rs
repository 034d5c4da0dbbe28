// Value formatting for KPI tiles and tooltips
use super::units::{select_unit, QuantityClass, HUNDRED_MILLION, OCCURRENCES, TEN_THOUSAND};

/// Format a raw value with its own unit, independent of any chart scale.
pub fn format_value(value: f64, class: QuantityClass) -> String {
    match class {
        QuantityClass::Bytes => format_bytes(value),
        QuantityClass::Bandwidth => format_bps(value),
        QuantityClass::Count => format_count(value),
        QuantityClass::Duration => format_duration_total(value),
    }
}

pub fn format_bytes(value: f64) -> String {
    format_scaled(value, QuantityClass::Bytes)
}

pub fn format_bps(value: f64) -> String {
    format_scaled(value, QuantityClass::Bandwidth)
}

fn format_scaled(value: f64, class: QuantityClass) -> String {
    let value = finite_or_zero(value);
    let step = select_unit(value, class);
    if step.divisor > 1.0 {
        format!("{:.2} {}", value / step.divisor, step.unit)
    } else {
        format!("{} {}", plain(value), step.unit)
    }
}

/// Counts read as `1.23 万` above the base threshold and `6,000` below it.
pub fn format_count(value: f64) -> String {
    let value = finite_or_zero(value);
    let step = select_unit(value, QuantityClass::Count);
    if step.divisor > 1.0 {
        format!("{:.2} {}", value / step.divisor, step.unit)
    } else {
        group_thousands(value)
    }
}

/// Average latency, always two decimals.
pub fn format_duration_avg(value: f64) -> String {
    format!("{:.2} ms", finite_or_zero(value))
}

/// Accumulated time, grouped like any other large number.
pub fn format_duration_total(value: f64) -> String {
    format!("{} ms", format_locale(value))
}

/// Whether a formatted count already carries a scale suffix.
pub fn has_scale_suffix(formatted: &str) -> bool {
    formatted.contains(TEN_THOUSAND) || formatted.contains(HUNDRED_MILLION) || formatted.contains('千')
}

/// Append the occurrences suffix to a formatted count.
pub fn with_occurrences(formatted: String) -> String {
    if has_scale_suffix(&formatted) {
        format!("{formatted}{OCCURRENCES}")
    } else {
        format!("{formatted} {OCCURRENCES}")
    }
}

pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", finite_or_zero(ratio) * 100.0)
}

/// Thousands-grouped integer, e.g. `1234567` -> `1,234,567`.
pub fn group_thousands(value: f64) -> String {
    let rounded = finite_or_zero(value).round();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped integer part, with up to two decimals when the value has any.
pub fn format_locale(value: f64) -> String {
    let value = finite_or_zero(value);
    if value.fract() == 0.0 {
        return group_thousands(value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let int_value: f64 = int_part.parse().unwrap_or(0.0);
    let frac_part = frac_part.trim_end_matches('0');

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{}", group_thousands(int_value))
    } else {
        format!("{sign}{}.{frac_part}", group_thousands(int_value))
    }
}

fn plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1536.0), "1.50 KB");
        assert_eq!(format_bytes(29312178.0), "27.95 MB");
        assert_eq!(format_bytes(1073741824.0), "1.00 GB");
    }

    #[test]
    fn test_format_bps() {
        assert_eq!(format_bps(800.0), "800 bps");
        assert_eq!(format_bps(1_500.0), "1.50 Kbps");
        assert_eq!(format_bps(2_340_000_000.0), "2.34 Gbps");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(6000.0), "6,000");
        assert_eq!(format_count(9999.0), "9,999");
        assert_eq!(format_count(12_345.0), "1.23 万");
        assert_eq!(format_count(320_000_000.0), "3.20 亿");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
        assert_eq!(group_thousands(-45_000.0), "-45,000");
        assert_eq!(group_thousands(f64::INFINITY), "0");
    }

    #[test]
    fn test_format_locale() {
        assert_eq!(format_locale(1234.5), "1,234.5");
        assert_eq!(format_locale(98765.432), "98,765.43");
        assert_eq!(format_locale(3000.0), "3,000");
    }

    #[test]
    fn test_with_occurrences() {
        assert_eq!(with_occurrences(format_count(500.0)), "500 次");
        assert_eq!(with_occurrences(format_count(12_345.0)), "1.23 万次");
    }

    #[test]
    fn test_durations_and_percent() {
        assert_eq!(format_duration_avg(12.346), "12.35 ms");
        assert_eq!(format_duration_total(123456.0), "123,456 ms");
        assert_eq!(format_percent(0.8765), "87.65%");
        assert_eq!(format_percent(-0.25), "-25.00%");
    }
}
