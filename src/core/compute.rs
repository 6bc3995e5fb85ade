//! Compute size options and the disk performance ceiling each size imposes.

use crate::domain::model::{ComputeOption, PriceInterval};
use crate::domain::ports::RateSource;
use serde::Serialize;

pub const DEFAULT_COMPUTE_SIZE: &str = "ci_micro";

/// Micro instance, offered even when the addon listing omits it.
pub fn micro_option() -> ComputeOption {
    ComputeOption::new(DEFAULT_COMPUTE_SIZE, "Micro", 0.01344, PriceInterval::Hourly)
}

pub fn available_compute_options(variants: &[ComputeOption]) -> Vec<ComputeOption> {
    let mut options = variants.to_vec();
    if !options
        .iter()
        .any(|option| option.identifier == DEFAULT_COMPUTE_SIZE)
    {
        options.insert(0, micro_option());
    }
    options
}

/// What the instance can actually deliver for a requested value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsableValue {
    pub requested: f64,
    pub usable: f64,
    pub note: Option<String>,
}

impl UsableValue {
    pub fn is_capped(&self) -> bool {
        self.usable < self.requested
    }
}

pub fn usable_iops<R: RateSource + ?Sized>(
    rates: &R,
    provisioned_iops: f64,
    compute: &ComputeOption,
) -> UsableValue {
    match rates.compute_max_iops(&compute.identifier) {
        Some(cap) if provisioned_iops > cap => UsableValue {
            requested: provisioned_iops,
            usable: cap,
            note: Some(format!(
                "Note: Final usable IOPS will be at {} based on your current compute size of {}",
                crate::core::ranges::group_thousands(cap),
                display_name(compute)
            )),
        },
        _ => UsableValue {
            requested: provisioned_iops,
            usable: provisioned_iops,
            note: None,
        },
    }
}

pub fn usable_throughput<R: RateSource + ?Sized>(
    rates: &R,
    throughput_mbps: f64,
    compute: &ComputeOption,
) -> UsableValue {
    match rates.compute_max_throughput(&compute.identifier) {
        Some(cap) if throughput_mbps > cap => UsableValue {
            requested: throughput_mbps,
            usable: cap,
            note: Some(format!(
                "Note: Final usable throughput will be at {:.0} MB/s based on your current compute size of {}",
                cap,
                display_name(compute)
            )),
        },
        _ => UsableValue {
            requested: throughput_mbps,
            usable: throughput_mbps,
            note: None,
        },
    }
}

fn display_name(compute: &ComputeOption) -> &str {
    if compute.name.is_empty() {
        &compute.identifier
    } else {
        &compute.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateCard;

    #[test]
    fn test_micro_is_prepended_when_missing() {
        let variants = vec![ComputeOption::new(
            "ci_small",
            "Small",
            0.0206,
            PriceInterval::Hourly,
        )];
        let options = available_compute_options(&variants);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].identifier, "ci_micro");
        assert_eq!(options[1].identifier, "ci_small");
    }

    #[test]
    fn test_existing_micro_is_not_duplicated() {
        let variants = vec![micro_option()];
        assert_eq!(available_compute_options(&variants).len(), 1);
    }

    #[test]
    fn test_iops_capped_by_compute() {
        let rates = RateCard::default();
        let micro = micro_option();
        let capped = usable_iops(&rates, 16000.0, &micro);
        assert!(capped.is_capped());
        assert_eq!(capped.usable, 11800.0);
        assert_eq!(
            capped.note.as_deref(),
            Some("Note: Final usable IOPS will be at 11,800 based on your current compute size of Micro")
        );

        let fine = usable_iops(&rates, 3000.0, &micro);
        assert!(!fine.is_capped());
        assert!(fine.note.is_none());
    }

    #[test]
    fn test_unknown_compute_is_uncapped() {
        let rates = RateCard::default();
        let custom = ComputeOption::new("ci_custom", "", 1.0, PriceInterval::Hourly);
        assert!(!usable_throughput(&rates, 1000.0, &custom).is_capped());
    }
}
