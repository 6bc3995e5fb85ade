use crate::core::cooldown::remaining_cooldown;
use crate::core::form::{DiskFormValues, FormContext, FormEvent};
use crate::domain::model::{ComputeOption, PlanId, StorageType};
use crate::domain::ports::RateSource;
use crate::utils::error::{DiskPlanError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_required_field, Validate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A current disk configuration plus the edits a user wants to make to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub plan: PlanId,
    #[serde(default)]
    pub usage_billing_enabled: bool,
    #[serde(default = "default_can_update")]
    pub can_update: bool,
    #[serde(default)]
    pub modification_pending: bool,
    pub last_modified_at: Option<DateTime<Utc>>,
    /// Evaluation time; defaults to the wall clock.
    pub now: Option<DateTime<Utc>>,
    pub fs_used_bytes: Option<u64>,
    pub current: DiskFormValues,
    #[serde(default)]
    pub proposed: ProposedChanges,
    #[serde(default)]
    pub compute_options: Vec<ComputeOption>,
}

fn default_can_update() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposedChanges {
    pub compute_size: Option<String>,
    pub storage_type: Option<StorageType>,
    pub total_size_gb: Option<f64>,
    pub provisioned_iops: Option<f64>,
    pub throughput_mbps: Option<f64>,
}

impl ProposedChanges {
    /// Storage type goes first so size and throughput are reconciled against the new tier.
    pub fn events(&self) -> Vec<FormEvent> {
        let mut events = Vec::new();
        if let Some(compute_size) = &self.compute_size {
            events.push(FormEvent::SetComputeSize(compute_size.clone()));
        }
        if let Some(storage_type) = self.storage_type {
            events.push(FormEvent::SetStorageType(storage_type));
        }
        if let Some(total_size_gb) = self.total_size_gb {
            events.push(FormEvent::SetTotalSize(total_size_gb));
        }
        if let Some(provisioned_iops) = self.provisioned_iops {
            events.push(FormEvent::SetIops(provisioned_iops));
        }
        if let Some(throughput_mbps) = self.throughput_mbps {
            events.push(FormEvent::SetThroughput(Some(throughput_mbps)));
        }
        events
    }
}

impl Scenario {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!(path = %path.as_ref().display(), "loading scenario");
        let scenario = Self::from_toml_str(&content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = super::rate_card::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    pub fn context<R: RateSource + ?Sized>(&self, rates: &R) -> FormContext {
        let now = self.now.unwrap_or_else(Utc::now);
        FormContext {
            plan: self.plan,
            usage_billing_enabled: self.usage_billing_enabled,
            can_update: self.can_update,
            modification_pending: self.modification_pending,
            cooldown_remaining: remaining_cooldown(self.last_modified_at, now, rates.cooldown_hours()),
            compute_variants: self.compute_options.clone(),
            fs_used_bytes: self.fs_used_bytes,
        }
    }
}

impl Validate for Scenario {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("current.compute_size", &self.current.compute_size)?;
        validate_non_negative("current.total_size_gb", self.current.disk.total_size_gb)?;
        validate_non_negative("current.provisioned_iops", self.current.disk.provisioned_iops)?;
        match self.current.disk.storage_type {
            StorageType::Gp3 => {
                let throughput = validate_required_field(
                    "current.throughput_mbps",
                    &self.current.disk.throughput_mbps,
                )?;
                validate_non_negative("current.throughput_mbps", *throughput)?;
            }
            storage_type if self.current.disk.throughput_mbps.is_some() => {
                return Err(DiskPlanError::ConfigValidationError {
                    field: "current.throughput_mbps".to_string(),
                    message: format!("throughput is not configurable for {}", storage_type),
                });
            }
            _ => {}
        }
        if let Some(compute_size) = &self.proposed.compute_size {
            validate_non_empty_string("proposed.compute_size", compute_size)?;
        }
        for option in &self.compute_options {
            validate_non_empty_string("compute_options.identifier", &option.identifier)?;
            validate_non_negative("compute_options.price", option.price)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateCard;
    use chrono::Duration;

    const SCENARIO: &str = r#"
plan = "pro"
usage_billing_enabled = true
last_modified_at = "2024-09-01T10:00:00Z"
now = "2024-09-01T12:00:00Z"

[current]
compute_size = "ci_micro"
storage_type = "gp3"
total_size_gb = 8
provisioned_iops = 3000
throughput_mbps = 125

[proposed]
storage_type = "io2"
total_size_gb = 50

[[compute_options]]
identifier = "ci_small"
name = "Small"
price = 0.0206
price_interval = "hourly"
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        assert!(scenario.validate().is_ok());
        assert_eq!(scenario.plan, PlanId::Pro);
        assert!(scenario.can_update);
        assert_eq!(scenario.current.disk.throughput_mbps, Some(125.0));
        assert_eq!(
            scenario.proposed.events(),
            vec![
                FormEvent::SetStorageType(StorageType::Io2),
                FormEvent::SetTotalSize(50.0),
            ]
        );
    }

    #[test]
    fn test_context_reports_cooldown() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let context = scenario.context(&RateCard::default());
        assert_eq!(context.cooldown_remaining, Duration::hours(4));
        assert_eq!(context.compute_variants.len(), 1);
    }

    #[test]
    fn test_blank_compute_size_is_invalid() {
        let input = SCENARIO.replace("compute_size = \"ci_micro\"", "compute_size = \" \"");
        let scenario = Scenario::from_toml_str(&input).unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_gp3_requires_current_throughput() {
        let input = SCENARIO.replace("throughput_mbps = 125\n", "");
        let scenario = Scenario::from_toml_str(&input).unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(DiskPlanError::MissingConfigError { field }) if field == "current.throughput_mbps"
        ));
    }

    #[test]
    fn test_io2_rejects_current_throughput() {
        let input = SCENARIO.replace("storage_type = \"gp3\"", "storage_type = \"io2\"");
        let scenario = Scenario::from_toml_str(&input).unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(DiskPlanError::ConfigValidationError { .. })
        ));
    }
}
