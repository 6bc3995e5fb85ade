pub mod compute;
pub mod cooldown;
pub mod form;
pub mod planner;
pub mod pricing;
pub mod ranges;
pub mod reconcile;
pub mod usage;

pub use crate::domain::model::{
    ComputeOption, DiskConfiguration, PriceDelta, RangeConstraint, StorageType,
};
pub use crate::domain::ports::RateSource;
pub use crate::utils::error::Result;
