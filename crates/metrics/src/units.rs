//! Unit normalization for the loosely-typed numbers metric sources send.
//!
//! Sources never declare units, so memory sizes are classified by
//! magnitude (see [`infer_unit`]). Percentages are clamped where they are
//! derived.

pub const KIB: u64 = 1 << 10;
pub const MIB: u64 = 1 << 20;
pub const GIB: u64 = 1 << 30;

/// Unit a raw memory figure is believed to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawUnit {
    Bytes,
    Mebibytes,
}

/// Classify a memory total by size.
///
/// At least 1 GiB worth of units reads as bytes; at least 1024 reads as
/// MiB; anything smaller is taken as bytes verbatim.
pub fn infer_unit(total: f64) -> RawUnit {
    if total >= GIB as f64 {
        RawUnit::Bytes
    } else if total >= KIB as f64 {
        RawUnit::Mebibytes
    } else {
        RawUnit::Bytes
    }
}

/// Convert a `(total, used)` pair to bytes, choosing the unit from `total`.
pub fn pair_to_bytes(total: f64, used: f64) -> (u64, u64) {
    let unit = infer_unit(total);
    (to_bytes(total, unit), to_bytes(used, unit))
}

/// Convert a single raw figure to bytes, choosing the unit from itself.
pub fn value_to_bytes(value: f64) -> u64 {
    to_bytes(value, infer_unit(value))
}

/// Convert `value` expressed in `unit` to whole bytes. Negative and
/// non-finite inputs become 0.
pub fn to_bytes(value: f64, unit: RawUnit) -> u64 {
    let scaled = match unit {
        RawUnit::Bytes => value,
        RawUnit::Mebibytes => value * MIB as f64,
    };
    if scaled.is_finite() && scaled > 0.0 {
        scaled.round() as u64
    } else {
        0
    }
}

/// Convert MiB to bytes.
pub fn mib_to_bytes(mib: f64) -> u64 {
    to_bytes(mib, RawUnit::Mebibytes)
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / GIB as f64
}

/// Clamp a percentage into `[0, 100]`; NaN becomes 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Floor a quantity at 0; NaN becomes 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Format a MiB figure the way process tables show it (`"512 MB"`).
pub fn format_mib_label(mib: f64) -> String {
    format!("{} MB", non_negative(mib).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_sized_totals_stay_bytes() {
        assert_eq!(pair_to_bytes(17_179_869_184.0, 8_589_934_592.0), (16 * GIB, 8 * GIB));
    }

    #[test]
    fn mid_sized_totals_are_mebibytes() {
        let (total, used) = pair_to_bytes(16_000.0, 8_000.0);
        assert_eq!(total, 16_000 * MIB);
        assert_eq!(used, 8_000 * MIB);
        assert!((bytes_to_gib(total) - 15.625).abs() < 1e-9);
    }

    #[test]
    fn tiny_totals_are_taken_verbatim() {
        assert_eq!(pair_to_bytes(512.0, 100.0), (512, 100));
    }

    #[test]
    fn unit_comes_from_total_not_used() {
        // used alone would look like bytes; the MiB-sized total wins.
        assert_eq!(pair_to_bytes(2048.0, 0.5), (2048 * MIB, MIB / 2));
    }

    #[test]
    fn negative_and_nan_become_zero_bytes() {
        assert_eq!(to_bytes(-5.0, RawUnit::Bytes), 0);
        assert_eq!(to_bytes(f64::NAN, RawUnit::Mebibytes), 0);
    }

    #[test]
    fn clamp_percent_bounds() {
        assert_eq!(clamp_percent(-5.0), 0.0);
        assert_eq!(clamp_percent(150.0), 100.0);
        assert_eq!(clamp_percent(42.5), 42.5);
        assert_eq!(clamp_percent(f64::NAN), 0.0);
    }

    #[test]
    fn mib_label() {
        assert_eq!(format_mib_label(511.6), "512 MB");
        assert_eq!(format_mib_label(-3.0), "0 MB");
    }
}
