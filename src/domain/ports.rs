use crate::domain::model::{PlanId, RangeConstraint, StorageType};

/// Per-tier unit prices, all per month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskRates {
    pub storage_per_gb: f64,
    pub iops: f64,
    pub throughput_per_mbps: f64,
    pub included_iops: f64,
    pub included_throughput_mbps: f64,
}

/// Static lookup data behind range derivation and pricing.
pub trait RateSource {
    fn iops_bounds(&self, storage_type: StorageType) -> RangeConstraint;
    /// IOPS granted per GB of disk before the absolute maximum applies.
    fn iops_per_gb(&self, storage_type: StorageType) -> f64;
    /// `None` when the tier has no configurable throughput.
    fn throughput_bounds(&self, storage_type: StorageType) -> Option<RangeConstraint>;
    fn throughput_per_iops(&self) -> f64;
    /// Disk size below which IOPS are not scaled by size.
    fn min_scaling_size_gb(&self) -> f64;
    fn disk_rates(&self, storage_type: StorageType) -> DiskRates;
    fn included_disk_gb(&self, plan: PlanId, storage_type: StorageType) -> f64;
    fn compute_max_iops(&self, compute_size: &str) -> Option<f64>;
    fn compute_max_throughput(&self, compute_size: &str) -> Option<f64>;
    fn hours_per_month(&self) -> f64;
    fn cooldown_hours(&self) -> i64;
}
