//! Keeps dependent disk fields consistent after the storage type or size changes.

use crate::core::ranges::throughput_range;
use crate::domain::model::{DiskConfiguration, StorageType};
use crate::domain::ports::RateSource;

/// Applies `storage_type`, then fixes throughput against the recomputed range.
pub fn change_storage_type<R: RateSource + ?Sized>(
    rates: &R,
    disk: &DiskConfiguration,
    storage_type: StorageType,
) -> DiskConfiguration {
    let changed = DiskConfiguration {
        storage_type,
        ..*disk
    };
    reconcile_throughput(rates, &changed)
}

pub fn change_total_size<R: RateSource + ?Sized>(
    rates: &R,
    disk: &DiskConfiguration,
    total_size_gb: f64,
) -> DiskConfiguration {
    let changed = DiskConfiguration {
        total_size_gb,
        ..*disk
    };
    reconcile_throughput(rates, &changed)
}

/// Tiers without a throughput dial drop the value; others fall back to the
/// tier floor when the value is missing or outside the current range.
pub fn reconcile_throughput<R: RateSource + ?Sized>(
    rates: &R,
    disk: &DiskConfiguration,
) -> DiskConfiguration {
    let throughput_mbps = match throughput_range(rates, disk.storage_type, disk.provisioned_iops) {
        None => None,
        Some(range) => match disk.throughput_mbps {
            Some(current) if range.contains(current) => Some(current),
            _ => Some(range.min),
        },
    };

    if throughput_mbps != disk.throughput_mbps {
        tracing::debug!(
            storage_type = %disk.storage_type,
            from = ?disk.throughput_mbps,
            to = ?throughput_mbps,
            "reconciled throughput"
        );
    }

    DiskConfiguration {
        throughput_mbps,
        ..*disk
    }
}
