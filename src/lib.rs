pub mod assistant;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{RateCard, Scenario};
pub use crate::core::form::{DiskForm, DiskFormValues, FormContext, FormEvent, FormView};
pub use crate::core::planner::DiskPlanner;
pub use domain::model::{
    ComputeOption, DiskConfiguration, PlanId, PriceDelta, PriceInterval, RangeConstraint,
    StorageType,
};
pub use domain::ports::RateSource;
pub use utils::error::{DiskPlanError, Result};
