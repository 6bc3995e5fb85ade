use crate::domain::model::{PlanId, RangeConstraint, StorageType};
use crate::domain::ports::{DiskRates, RateSource};
use crate::utils::error::{DiskPlanError, Result};
use crate::utils::validation::{validate_bounds, validate_non_negative, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Limits and unit prices for one storage tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub iops_min: f64,
    pub iops_max: f64,
    pub iops_per_gb: f64,
    /// Absent for tiers where throughput cannot be configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_max: Option<f64>,
    pub storage_price_per_gb: f64,
    pub iops_price: f64,
    #[serde(default)]
    pub throughput_price_per_mbps: f64,
    #[serde(default)]
    pub included_iops: f64,
    #[serde(default)]
    pub included_throughput_mbps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludedDisk {
    pub gp3: f64,
    pub io2: f64,
}

impl IncludedDisk {
    fn get(&self, storage_type: StorageType) -> f64 {
        match storage_type {
            StorageType::Gp3 => self.gp3,
            StorageType::Io2 => self.io2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanAllowances {
    pub free: IncludedDisk,
    pub pro: IncludedDisk,
    pub team: IncludedDisk,
    pub enterprise: IncludedDisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputeCaps {
    pub max_iops: f64,
    pub max_throughput_mbps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateCard {
    #[serde(default = "default_min_scaling_size_gb")]
    pub min_scaling_size_gb: f64,
    #[serde(default = "default_throughput_per_iops")]
    pub throughput_per_iops: f64,
    #[serde(default = "default_hours_per_month")]
    pub hours_per_month: f64,
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: i64,
    pub gp3: TierConfig,
    pub io2: TierConfig,
    pub included_disk_gb: PlanAllowances,
    #[serde(default)]
    pub compute: BTreeMap<String, ComputeCaps>,
}

fn default_min_scaling_size_gb() -> f64 {
    8.0
}

fn default_throughput_per_iops() -> f64 {
    0.25
}

fn default_hours_per_month() -> f64 {
    730.0
}

fn default_cooldown_hours() -> i64 {
    6
}

impl Default for RateCard {
    fn default() -> Self {
        let included = IncludedDisk { gp3: 8.0, io2: 0.0 };
        let compute = [
            ("ci_micro", 11_800.0, 260.0),
            ("ci_small", 11_800.0, 260.0),
            ("ci_medium", 11_800.0, 260.0),
            ("ci_large", 20_000.0, 594.0),
            ("ci_xlarge", 20_000.0, 594.0),
            ("ci_2xlarge", 20_000.0, 594.0),
            ("ci_4xlarge", 20_000.0, 594.0),
            ("ci_8xlarge", 40_000.0, 1_188.0),
            ("ci_12xlarge", 50_000.0, 1_188.0),
            ("ci_16xlarge", 80_000.0, 2_375.0),
        ]
        .into_iter()
        .map(|(id, max_iops, max_throughput_mbps)| {
            (
                id.to_string(),
                ComputeCaps {
                    max_iops,
                    max_throughput_mbps,
                },
            )
        })
        .collect();

        Self {
            min_scaling_size_gb: default_min_scaling_size_gb(),
            throughput_per_iops: default_throughput_per_iops(),
            hours_per_month: default_hours_per_month(),
            cooldown_hours: default_cooldown_hours(),
            gp3: TierConfig {
                iops_min: 3_000.0,
                iops_max: 16_000.0,
                iops_per_gb: 500.0,
                throughput_min: Some(125.0),
                throughput_max: Some(1_000.0),
                storage_price_per_gb: 0.125,
                iops_price: 0.024,
                throughput_price_per_mbps: 0.095,
                included_iops: 3_000.0,
                included_throughput_mbps: 125.0,
            },
            io2: TierConfig {
                iops_min: 100.0,
                iops_max: 256_000.0,
                iops_per_gb: 1_000.0,
                throughput_min: None,
                throughput_max: None,
                storage_price_per_gb: 0.195,
                iops_price: 0.119,
                throughput_price_per_mbps: 0.0,
                included_iops: 0.0,
                included_throughput_mbps: 0.0,
            },
            included_disk_gb: PlanAllowances {
                free: IncludedDisk { gp3: 0.5, io2: 0.0 },
                pro: included,
                team: included,
                enterprise: included,
            },
            compute,
        }
    }
}

impl RateCard {
    /// 從 TOML 檔案載入費率表
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!(path = %path.as_ref().display(), "loading rate card");
        let card = Self::from_toml_str(&content)?;
        card.validate()?;
        Ok(card)
    }

    /// 從 TOML 字串解析費率表
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    pub fn tier(&self, storage_type: StorageType) -> &TierConfig {
        match storage_type {
            StorageType::Gp3 => &self.gp3,
            StorageType::Io2 => &self.io2,
        }
    }

    fn allowance(&self, plan: PlanId) -> &IncludedDisk {
        match plan {
            PlanId::Free => &self.included_disk_gb.free,
            PlanId::Pro => &self.included_disk_gb.pro,
            PlanId::Team => &self.included_disk_gb.team,
            PlanId::Enterprise => &self.included_disk_gb.enterprise,
        }
    }
}

/// 替換環境變數 (例如 ${RATE_CARD_REGION})
///
/// Unset variables are left in place so the TOML parser reports them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| DiskPlanError::ConfigValidationError {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

impl Validate for RateCard {
    fn validate(&self) -> Result<()> {
        validate_non_negative("min_scaling_size_gb", self.min_scaling_size_gb)?;
        validate_non_negative("throughput_per_iops", self.throughput_per_iops)?;
        validate_non_negative("hours_per_month", self.hours_per_month)?;
        if self.cooldown_hours < 0 {
            return Err(DiskPlanError::InvalidConfigValueError {
                field: "cooldown_hours".to_string(),
                value: self.cooldown_hours.to_string(),
                reason: "Cooldown cannot be negative".to_string(),
            });
        }

        for storage_type in [StorageType::Gp3, StorageType::Io2] {
            let tier = self.tier(storage_type);
            let name = storage_type.as_str();
            validate_bounds(&format!("{}.iops", name), tier.iops_min, tier.iops_max)?;
            validate_non_negative(&format!("{}.iops_per_gb", name), tier.iops_per_gb)?;
            validate_non_negative(&format!("{}.storage_price_per_gb", name), tier.storage_price_per_gb)?;
            validate_non_negative(&format!("{}.iops_price", name), tier.iops_price)?;
            validate_non_negative(
                &format!("{}.throughput_price_per_mbps", name),
                tier.throughput_price_per_mbps,
            )?;
            match (tier.throughput_min, tier.throughput_max) {
                (Some(min), Some(max)) => {
                    validate_bounds(&format!("{}.throughput", name), min, max)?
                }
                (None, None) => {}
                _ => {
                    return Err(DiskPlanError::ConfigValidationError {
                        field: format!("{}.throughput", name),
                        message: "throughput_min and throughput_max must be set together"
                            .to_string(),
                    })
                }
            }
        }

        for (id, caps) in &self.compute {
            validate_non_negative(&format!("compute.{}.max_iops", id), caps.max_iops)?;
            validate_non_negative(
                &format!("compute.{}.max_throughput_mbps", id),
                caps.max_throughput_mbps,
            )?;
        }

        Ok(())
    }
}

impl RateSource for RateCard {
    fn iops_bounds(&self, storage_type: StorageType) -> RangeConstraint {
        let tier = self.tier(storage_type);
        RangeConstraint::new(tier.iops_min, tier.iops_max)
    }

    fn iops_per_gb(&self, storage_type: StorageType) -> f64 {
        self.tier(storage_type).iops_per_gb
    }

    fn throughput_bounds(&self, storage_type: StorageType) -> Option<RangeConstraint> {
        let tier = self.tier(storage_type);
        Some(RangeConstraint::new(tier.throughput_min?, tier.throughput_max?))
    }

    fn throughput_per_iops(&self) -> f64 {
        self.throughput_per_iops
    }

    fn min_scaling_size_gb(&self) -> f64 {
        self.min_scaling_size_gb
    }

    fn disk_rates(&self, storage_type: StorageType) -> DiskRates {
        let tier = self.tier(storage_type);
        DiskRates {
            storage_per_gb: tier.storage_price_per_gb,
            iops: tier.iops_price,
            throughput_per_mbps: tier.throughput_price_per_mbps,
            included_iops: tier.included_iops,
            included_throughput_mbps: tier.included_throughput_mbps,
        }
    }

    fn included_disk_gb(&self, plan: PlanId, storage_type: StorageType) -> f64 {
        self.allowance(plan).get(storage_type)
    }

    fn compute_max_iops(&self, compute_size: &str) -> Option<f64> {
        self.compute.get(compute_size).map(|caps| caps.max_iops)
    }

    fn compute_max_throughput(&self, compute_size: &str) -> Option<f64> {
        self.compute
            .get(compute_size)
            .map(|caps| caps.max_throughput_mbps)
    }

    fn hours_per_month(&self) -> f64 {
        self.hours_per_month
    }

    fn cooldown_hours(&self) -> i64 {
        self.cooldown_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &str = r#"
min_scaling_size_gb = 10

[gp3]
iops_min = 3000
iops_max = 12000
iops_per_gb = 500
throughput_min = 125
throughput_max = 500
storage_price_per_gb = 0.1
iops_price = 0.02
throughput_price_per_mbps = 0.08
included_iops = 3000
included_throughput_mbps = 125

[io2]
iops_min = 100
iops_max = 64000
iops_per_gb = 500
storage_price_per_gb = 0.2
iops_price = 0.1

[included_disk_gb]
free = { gp3 = 0.5, io2 = 0 }
pro = { gp3 = 8, io2 = 0 }
team = { gp3 = 8, io2 = 0 }
enterprise = { gp3 = 16, io2 = 0 }

[compute.ci_micro]
max_iops = 11800
max_throughput_mbps = 260
"#;

    #[test]
    fn test_default_rate_card_is_valid() {
        assert!(RateCard::default().validate().is_ok());
    }

    #[test]
    fn test_parse_custom_rate_card() {
        let card = RateCard::from_toml_str(CUSTOM).unwrap();
        assert!(card.validate().is_ok());
        assert_eq!(card.min_scaling_size_gb, 10.0);
        assert_eq!(card.cooldown_hours, 6);
        assert_eq!(card.throughput_bounds(StorageType::Io2), None);
        assert_eq!(
            card.throughput_bounds(StorageType::Gp3),
            Some(RangeConstraint::new(125.0, 500.0))
        );
        assert_eq!(card.included_disk_gb(PlanId::Enterprise, StorageType::Gp3), 16.0);
        assert_eq!(card.compute_max_iops("ci_micro"), Some(11800.0));
        assert_eq!(card.compute_max_iops("ci_large"), None);
    }

    #[test]
    fn test_inverted_bounds_fail_validation() {
        let mut card = RateCard::default();
        card.gp3.iops_min = 20_000.0;
        let err = card.validate().unwrap_err();
        assert!(err.to_string().contains("gp3.iops"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let input = CUSTOM.replace("min_scaling_size_gb = 10", "min_size = 10");
        assert!(matches!(
            RateCard::from_toml_str(&input),
            Err(DiskPlanError::TomlError(_))
        ));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("DISK_PLANNER_TEST_GP3_MAX", "14000");
        let input = CUSTOM.replace("iops_max = 12000", "iops_max = ${DISK_PLANNER_TEST_GP3_MAX}");
        let card = RateCard::from_toml_str(&input).unwrap();
        assert_eq!(card.gp3.iops_max, 14000.0);
    }
}
