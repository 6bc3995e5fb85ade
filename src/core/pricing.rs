//! Old/new price pairs for a proposed disk or compute change.
//!
//! Inputs are priced as given. Range clamping happens before these functions
//! are called, so out-of-range values simply produce out-of-range prices.

use crate::domain::model::{ComputeOption, PlanId, PriceDelta, StorageType};
use crate::domain::ports::RateSource;

/// Monthly price of the old and new compute sizes. Unknown identifiers cost nothing.
pub fn compute_size_price<R: RateSource + ?Sized>(
    rates: &R,
    available_options: &[ComputeOption],
    old_compute_size: &str,
    new_compute_size: &str,
) -> PriceDelta {
    let price_of = |identifier: &str| {
        available_options
            .iter()
            .find(|option| option.identifier == identifier)
            .map(|option| option.monthly_price(rates.hours_per_month()))
            .unwrap_or(0.0)
    };

    PriceDelta::new(price_of(old_compute_size), price_of(new_compute_size))
}

/// Disk size is charged per GB above what the plan includes for the tier.
pub fn disk_size_price<R: RateSource + ?Sized>(
    rates: &R,
    plan: PlanId,
    old_size_gb: f64,
    old_storage_type: StorageType,
    new_size_gb: f64,
    new_storage_type: StorageType,
) -> PriceDelta {
    let price_of = |size_gb: f64, storage_type: StorageType| {
        let chargeable = (size_gb - rates.included_disk_gb(plan, storage_type)).max(0.0);
        chargeable * rates.disk_rates(storage_type).storage_per_gb
    };

    PriceDelta::new(
        price_of(old_size_gb, old_storage_type),
        price_of(new_size_gb, new_storage_type),
    )
}

pub fn iops_price<R: RateSource + ?Sized>(
    rates: &R,
    old_storage_type: StorageType,
    old_provisioned_iops: f64,
    new_storage_type: StorageType,
    new_provisioned_iops: f64,
) -> PriceDelta {
    let price_of = |iops: f64, storage_type: StorageType| {
        let tier = rates.disk_rates(storage_type);
        (iops - tier.included_iops).max(0.0) * tier.iops
    };

    PriceDelta::new(
        price_of(old_provisioned_iops, old_storage_type),
        price_of(new_provisioned_iops, new_storage_type),
    )
}

/// Throughput is only billed on tiers with a throughput dial; absent values count as zero.
pub fn throughput_price<R: RateSource + ?Sized>(
    rates: &R,
    storage_type: StorageType,
    old_throughput_mbps: Option<f64>,
    new_throughput_mbps: Option<f64>,
) -> PriceDelta {
    if rates.throughput_bounds(storage_type).is_none() {
        return PriceDelta::ZERO;
    }

    let tier = rates.disk_rates(storage_type);
    let price_of = |mbps: Option<f64>| {
        (mbps.unwrap_or(0.0) - tier.included_throughput_mbps).max(0.0) * tier.throughput_per_mbps
    };

    PriceDelta::new(
        price_of(old_throughput_mbps),
        price_of(new_throughput_mbps),
    )
}
