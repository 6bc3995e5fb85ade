//! Valid IOPS and throughput ranges for a storage tier.

use crate::domain::model::{RangeConstraint, StorageType};
use crate::domain::ports::RateSource;

/// IOPS allowed for a volume of `total_size_gb`.
///
/// Below the provider's minimum scaling size only the floor applies and the
/// maximum stays at the tier's absolute cap.
pub fn iops_range<R: RateSource + ?Sized>(
    rates: &R,
    storage_type: StorageType,
    total_size_gb: f64,
) -> RangeConstraint {
    let bounds = rates.iops_bounds(storage_type);
    if !scales_with_size(rates, total_size_gb) {
        return bounds;
    }
    let scaled = rates.iops_per_gb(storage_type) * total_size_gb;
    RangeConstraint::new(bounds.min, scaled.min(bounds.max))
}

/// Throughput allowed for `provisioned_iops`; `None` for tiers without a
/// throughput dial.
pub fn throughput_range<R: RateSource + ?Sized>(
    rates: &R,
    storage_type: StorageType,
    provisioned_iops: f64,
) -> Option<RangeConstraint> {
    let bounds = rates.throughput_bounds(storage_type)?;
    let scaled = rates.throughput_per_iops() * provisioned_iops;
    Some(RangeConstraint::new(bounds.min, scaled.min(bounds.max)))
}

pub fn scales_with_size<R: RateSource + ?Sized>(rates: &R, total_size_gb: f64) -> bool {
    total_size_gb >= rates.min_scaling_size_gb()
}

/// Helper line shown under the IOPS input.
pub fn iops_hint<R: RateSource + ?Sized>(
    rates: &R,
    storage_type: StorageType,
    total_size_gb: f64,
) -> String {
    let range = iops_range(rates, storage_type, total_size_gb);
    if scales_with_size(rates, total_size_gb) {
        format!(
            "IOPS must be between {} and {} based on your disk size.",
            group_thousands(range.min),
            group_thousands(range.max)
        )
    } else {
        format!("IOPS must be at least {}", group_thousands(range.min))
    }
}

pub fn throughput_hint<R: RateSource + ?Sized>(
    rates: &R,
    storage_type: StorageType,
    provisioned_iops: f64,
) -> Option<String> {
    throughput_range(rates, storage_type, provisioned_iops).map(|range| {
        format!(
            "Throughput must be between {} and {} MB/s based on your IOPS.",
            group_thousands(range.min),
            group_thousands(range.max)
        )
    })
}

/// Formats `16000` as `16,000`; fractional parts keep up to two digits.
pub fn group_thousands(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let magnitude = rounded.abs();
    let whole = magnitude.trunc() as u64;
    let cents = ((magnitude - magnitude.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if cents > 0 {
        let fraction = format!("{:02}", cents);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateCard;

    #[test]
    fn test_gp3_iops_range_caps_at_absolute_max() {
        let rates = RateCard::default();
        let range = iops_range(&rates, StorageType::Gp3, 100.0);
        assert_eq!(range, RangeConstraint::new(3000.0, 16000.0));
    }

    #[test]
    fn test_iops_range_scales_with_size() {
        let rates = RateCard::default();
        for size in [8.0, 10.0, 20.0, 31.0, 32.0, 33.0, 500.0] {
            let gp3 = iops_range(&rates, StorageType::Gp3, size);
            assert_eq!(gp3.max, (500.0 * size).min(16000.0), "gp3 size {}", size);
            let io2 = iops_range(&rates, StorageType::Io2, size);
            assert_eq!(io2.max, (1000.0 * size).min(256000.0), "io2 size {}", size);
            assert!(gp3.min <= gp3.max);
            assert!(io2.min <= io2.max);
        }
    }

    #[test]
    fn test_small_disks_only_enforce_floor() {
        let rates = RateCard::default();
        let range = iops_range(&rates, StorageType::Gp3, 4.0);
        assert_eq!(range.min, 3000.0);
        assert_eq!(range.max, 16000.0);
        assert_eq!(
            iops_hint(&rates, StorageType::Gp3, 4.0),
            "IOPS must be at least 3,000"
        );
    }

    #[test]
    fn test_throughput_range() {
        let rates = RateCard::default();
        assert_eq!(throughput_range(&rates, StorageType::Io2, 5000.0), None);
        for iops in [0.0, 400.0, 3000.0, 3001.0, 4000.0, 16000.0] {
            let range = throughput_range(&rates, StorageType::Gp3, iops).unwrap();
            assert_eq!(range.min, 125.0);
            assert_eq!(range.max, (0.25 * iops).min(1000.0));
        }
    }

    #[test]
    fn test_hints() {
        let rates = RateCard::default();
        assert_eq!(
            iops_hint(&rates, StorageType::Io2, 100.0),
            "IOPS must be between 100 and 100,000 based on your disk size."
        );
        assert_eq!(
            throughput_hint(&rates, StorageType::Gp3, 3001.0).unwrap(),
            "Throughput must be between 125 and 750.25 MB/s based on your IOPS."
        );
        assert!(throughput_hint(&rates, StorageType::Io2, 3000.0).is_none());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(256000.0), "256,000");
        assert_eq!(group_thousands(1234567.5), "1,234,567.5");
    }
}
