use crate::config::{RateCard, Scenario};
use crate::core::form::{DiskForm, FormView};
use crate::core::ranges::{iops_range, throughput_range};
use crate::domain::model::{RangeConstraint, StorageType};
use serde::Serialize;

/// Entry point tying a rate card to scenarios.
#[derive(Debug, Clone, Default)]
pub struct DiskPlanner {
    rates: RateCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeReport {
    pub storage_type: StorageType,
    pub total_size_gb: f64,
    pub iops: RangeConstraint,
    pub iops_hint: String,
    pub throughput: Option<RangeConstraint>,
}

impl DiskPlanner {
    pub fn new(rates: RateCard) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    /// Ranges for a disk; throughput is derived from `provisioned_iops` or the IOPS floor.
    pub fn ranges(
        &self,
        storage_type: StorageType,
        total_size_gb: f64,
        provisioned_iops: Option<f64>,
    ) -> RangeReport {
        let iops = iops_range(&self.rates, storage_type, total_size_gb);
        let throughput = throughput_range(
            &self.rates,
            storage_type,
            provisioned_iops.unwrap_or(iops.min),
        );
        RangeReport {
            storage_type,
            total_size_gb,
            iops,
            iops_hint: crate::core::ranges::iops_hint(&self.rates, storage_type, total_size_gb),
            throughput,
        }
    }

    pub fn evaluate(&self, scenario: &Scenario) -> FormView {
        let events = scenario.proposed.events();
        tracing::info!(
            plan = %scenario.plan,
            storage_type = %scenario.current.disk.storage_type,
            events = events.len(),
            "evaluating disk scenario"
        );

        let form = DiskForm::new(scenario.current.clone()).apply_all(&self.rates, events);
        let view = form.view(&self.rates, &scenario.context(&self.rates));

        if view.errors.is_empty() {
            tracing::info!(dirty = view.dirty_fields.len(), "proposed configuration is valid");
        } else {
            for error in &view.errors {
                tracing::warn!(field = %error.field, "{}", error.message);
            }
        }
        if view.input_disabled {
            tracing::warn!(availability = ?view.availability, "disk configuration is locked");
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_report_defaults_throughput_to_iops_floor() {
        let planner = DiskPlanner::default();
        let report = planner.ranges(StorageType::Gp3, 100.0, None);
        assert_eq!(report.iops, RangeConstraint::new(3000.0, 16000.0));
        assert_eq!(report.throughput, Some(RangeConstraint::new(125.0, 750.0)));

        let io2 = planner.ranges(StorageType::Io2, 100.0, Some(5000.0));
        assert_eq!(io2.throughput, None);
    }
}
