use crate::utils::error::DiskPlanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Gp3,
    Io2,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Gp3 => "gp3",
            StorageType::Io2 => "io2",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = DiskPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gp3" => Ok(StorageType::Gp3),
            "io2" => Ok(StorageType::Io2),
            other => Err(DiskPlanError::UnknownVariant {
                kind: "storage type",
                value: other.to_string(),
            }),
        }
    }
}

/// A snapshot of the disk attributes of one database.
///
/// `throughput_mbps` only carries a value for gp3 volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskConfiguration {
    pub storage_type: StorageType,
    pub total_size_gb: f64,
    pub provisioned_iops: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_mbps: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceInterval {
    Hourly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeOption {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    pub price: f64,
    pub price_interval: PriceInterval,
}

impl ComputeOption {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        price_interval: PriceInterval,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            price,
            price_interval,
        }
    }

    pub fn monthly_price(&self, hours_per_month: f64) -> f64 {
        match self.price_interval {
            PriceInterval::Hourly => self.price * hours_per_month,
            PriceInterval::Monthly => self.price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDelta {
    pub old_price: f64,
    pub new_price: f64,
}

impl PriceDelta {
    pub const ZERO: PriceDelta = PriceDelta {
        old_price: 0.0,
        new_price: 0.0,
    };

    pub fn new(old_price: f64, new_price: f64) -> Self {
        Self {
            old_price: old_price.max(0.0),
            new_price: new_price.max(0.0),
        }
    }
}

impl fmt::Display for PriceDelta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${:.2} -> ${:.2}", self.old_price, self.new_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConstraint {
    pub min: f64,
    pub max: f64,
}

impl RangeConstraint {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Free,
    Pro,
    Team,
    Enterprise,
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlanId::Free => write!(f, "free"),
            PlanId::Pro => write!(f, "pro"),
            PlanId::Team => write!(f, "team"),
            PlanId::Enterprise => write!(f, "enterprise"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    ComputeSize,
    StorageType,
    ProvisionedIops,
    Throughput,
    TotalSize,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FormField::ComputeSize => "compute_size",
            FormField::StorageType => "storage_type",
            FormField::ProvisionedIops => "provisioned_iops",
            FormField::Throughput => "throughput",
            FormField::TotalSize => "total_size",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parsing() {
        assert_eq!("gp3".parse::<StorageType>().unwrap(), StorageType::Gp3);
        assert_eq!(" IO2 ".parse::<StorageType>().unwrap(), StorageType::Io2);
        assert!("st1".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_price_delta_floors_negative_prices() {
        let delta = PriceDelta::new(-3.0, 4.5);
        assert_eq!(delta.old_price, 0.0);
        assert_eq!(delta.new_price, 4.5);
        assert_eq!(delta.to_string(), "$0.00 -> $4.50");
    }

    #[test]
    fn test_hourly_compute_price_is_normalised_to_month() {
        let micro = ComputeOption::new("ci_micro", "Micro", 0.01344, PriceInterval::Hourly);
        assert!((micro.monthly_price(730.0) - 9.8112).abs() < 1e-9);
        let fixed = ComputeOption::new("ci_small", "Small", 15.0, PriceInterval::Monthly);
        assert_eq!(fixed.monthly_price(730.0), 15.0);
    }
}
