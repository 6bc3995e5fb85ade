//! Disk management form as an immutable snapshot.
//!
//! Every edit is a [`FormEvent`] applied with [`DiskForm::apply`], which
//! returns the next snapshot. [`DiskForm::view`] derives everything the
//! display needs: ranges, prices, hints, validation and gating.

use crate::core::compute::{self, UsableValue};
use crate::core::cooldown::Countdown;
use crate::core::pricing;
use crate::core::ranges::{iops_hint, iops_range, throughput_hint, throughput_range};
use crate::core::reconcile;
use crate::core::usage;
use crate::domain::model::{
    ComputeOption, DiskConfiguration, FormField, PlanId, PriceDelta, RangeConstraint, StorageType,
};
use crate::domain::ports::RateSource;
use crate::utils::validation::{validate_disk_configuration, FieldError};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskFormValues {
    pub compute_size: String,
    #[serde(flatten)]
    pub disk: DiskConfiguration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    SetComputeSize(String),
    SetStorageType(StorageType),
    SetTotalSize(f64),
    SetIops(f64),
    SetThroughput(Option<f64>),
    ResetField(FormField),
    /// New baseline, e.g. after a submitted change has been applied.
    Reset(DiskFormValues),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskForm {
    baseline: DiskFormValues,
    values: DiskFormValues,
}

impl DiskForm {
    pub fn new(baseline: DiskFormValues) -> Self {
        Self {
            values: baseline.clone(),
            baseline,
        }
    }

    pub fn baseline(&self) -> &DiskFormValues {
        &self.baseline
    }

    pub fn values(&self) -> &DiskFormValues {
        &self.values
    }

    pub fn apply<R: RateSource + ?Sized>(&self, rates: &R, event: FormEvent) -> DiskForm {
        tracing::debug!(?event, "applying form event");
        let mut next = self.clone();
        let disk = &self.values.disk;

        match event {
            FormEvent::SetComputeSize(compute_size) => next.values.compute_size = compute_size,
            FormEvent::SetStorageType(storage_type) => {
                next.values.disk = reconcile::change_storage_type(rates, disk, storage_type);
            }
            FormEvent::SetTotalSize(total_size_gb) => {
                next.values.disk = reconcile::change_total_size(rates, disk, total_size_gb);
            }
            FormEvent::SetIops(provisioned_iops) => {
                next.values.disk.provisioned_iops = provisioned_iops;
            }
            FormEvent::SetThroughput(throughput_mbps) => {
                next.values.disk.throughput_mbps = throughput_mbps;
            }
            FormEvent::ResetField(field) => next.reset_field(rates, field),
            FormEvent::Reset(baseline) => next = DiskForm::new(baseline),
        }

        next
    }

    pub fn apply_all<R, I>(&self, rates: &R, events: I) -> DiskForm
    where
        R: RateSource + ?Sized,
        I: IntoIterator<Item = FormEvent>,
    {
        events
            .into_iter()
            .fold(self.clone(), |form, event| form.apply(rates, event))
    }

    /// Storage type and throughput go back together; reconciliation may have
    /// rewritten throughput when the type changed.
    fn reset_field<R: RateSource + ?Sized>(&mut self, rates: &R, field: FormField) {
        let baseline = &self.baseline;
        let disk = &mut self.values.disk;
        match field {
            FormField::ComputeSize => self.values.compute_size = baseline.compute_size.clone(),
            FormField::StorageType => {
                disk.storage_type = baseline.disk.storage_type;
                disk.throughput_mbps = baseline.disk.throughput_mbps;
                *disk = reconcile::reconcile_throughput(rates, disk);
            }
            FormField::ProvisionedIops => disk.provisioned_iops = baseline.disk.provisioned_iops,
            FormField::Throughput => disk.throughput_mbps = baseline.disk.throughput_mbps,
            FormField::TotalSize => {
                *disk = reconcile::change_total_size(rates, disk, baseline.disk.total_size_gb);
            }
        }
    }

    pub fn dirty_fields(&self) -> BTreeSet<FormField> {
        let (old, new) = (&self.baseline, &self.values);
        let mut dirty = BTreeSet::new();
        if old.compute_size != new.compute_size {
            dirty.insert(FormField::ComputeSize);
        }
        if old.disk.storage_type != new.disk.storage_type {
            dirty.insert(FormField::StorageType);
        }
        if old.disk.provisioned_iops != new.disk.provisioned_iops {
            dirty.insert(FormField::ProvisionedIops);
        }
        if old.disk.throughput_mbps != new.disk.throughput_mbps {
            dirty.insert(FormField::Throughput);
        }
        if old.disk.total_size_gb != new.disk.total_size_gb {
            dirty.insert(FormField::TotalSize);
        }
        dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_fields().is_empty()
    }

    pub fn view<R: RateSource + ?Sized>(&self, rates: &R, ctx: &FormContext) -> FormView {
        let old = &self.baseline;
        let new = &self.values;
        let storage_type = new.disk.storage_type;
        let options = compute::available_compute_options(&ctx.compute_variants);

        let prices = FormPrices {
            compute_size: pricing::compute_size_price(
                rates,
                &options,
                &old.compute_size,
                &new.compute_size,
            ),
            disk_size: pricing::disk_size_price(
                rates,
                ctx.plan,
                old.disk.total_size_gb,
                old.disk.storage_type,
                new.disk.total_size_gb,
                storage_type,
            ),
            iops: pricing::iops_price(
                rates,
                old.disk.storage_type,
                old.disk.provisioned_iops,
                storage_type,
                new.disk.provisioned_iops,
            ),
            throughput: pricing::throughput_price(
                rates,
                storage_type,
                old.disk.throughput_mbps,
                new.disk.throughput_mbps,
            ),
        };

        // caps follow the compute size currently running, not the proposed one
        let current_compute = options
            .iter()
            .find(|option| option.identifier == old.compute_size)
            .cloned()
            .unwrap_or_else(compute::micro_option);

        let availability = ctx.availability();

        FormView {
            values: new.clone(),
            dirty_fields: self.dirty_fields().into_iter().collect(),
            iops_range: iops_range(rates, storage_type, new.disk.total_size_gb),
            throughput_range: throughput_range(rates, storage_type, new.disk.provisioned_iops),
            iops_hint: iops_hint(rates, storage_type, new.disk.total_size_gb),
            throughput_hint: throughput_hint(rates, storage_type, new.disk.provisioned_iops),
            included_disk_gb: rates.included_disk_gb(ctx.plan, storage_type),
            usable_iops: compute::usable_iops(rates, new.disk.provisioned_iops, &current_compute),
            usable_throughput: new
                .disk
                .throughput_mbps
                .map(|mbps| compute::usable_throughput(rates, mbps, &current_compute)),
            disk_used_gb: usage::used_gb(ctx.fs_used_bytes),
            replica_disk_size_gb: usage::replica_disk_size(new.disk.total_size_gb),
            cooldown: (ctx.cooldown_remaining > Duration::zero())
                .then(|| Countdown::new(ctx.cooldown_remaining)),
            prices,
            errors: validate_disk_configuration(rates, ctx.plan, &new.disk),
            input_disabled: availability.input_disabled(),
            availability,
        }
    }
}

/// Facts about the project the form is rendered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormContext {
    pub plan: PlanId,
    #[serde(default)]
    pub usage_billing_enabled: bool,
    #[serde(default = "default_true")]
    pub can_update: bool,
    #[serde(default)]
    pub modification_pending: bool,
    #[serde(default = "Duration::zero", with = "seconds")]
    pub cooldown_remaining: Duration,
    #[serde(default)]
    pub compute_variants: Vec<ComputeOption>,
    #[serde(default)]
    pub fs_used_bytes: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl FormContext {
    pub fn availability(&self) -> Availability {
        if self.plan == PlanId::Free {
            return Availability::Unavailable;
        }
        let mut reasons = Vec::new();
        if self.modification_pending {
            reasons.push(LockReason::ModificationPending);
        }
        if self.plan == PlanId::Pro && !self.usage_billing_enabled {
            reasons.push(LockReason::PlanUpgradeRequired);
        }
        if self.cooldown_remaining > Duration::zero() {
            reasons.push(LockReason::CooldownActive);
        }
        if !self.can_update {
            reasons.push(LockReason::MissingPermission);
        }
        if reasons.is_empty() {
            Availability::Editable
        } else {
            Availability::Locked { reasons }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    /// Disk management is not offered on the free plan.
    Unavailable,
    Locked { reasons: Vec<LockReason> },
    Editable,
}

impl Availability {
    pub fn input_disabled(&self) -> bool {
        !matches!(self, Availability::Editable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    ModificationPending,
    PlanUpgradeRequired,
    CooldownActive,
    MissingPermission,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormPrices {
    pub compute_size: PriceDelta,
    pub disk_size: PriceDelta,
    pub iops: PriceDelta,
    pub throughput: PriceDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub values: DiskFormValues,
    pub dirty_fields: Vec<FormField>,
    pub iops_range: RangeConstraint,
    pub throughput_range: Option<RangeConstraint>,
    pub iops_hint: String,
    pub throughput_hint: Option<String>,
    pub included_disk_gb: f64,
    pub usable_iops: UsableValue,
    pub usable_throughput: Option<UsableValue>,
    pub disk_used_gb: f64,
    /// Read replicas are resized along with the primary.
    pub replica_disk_size_gb: f64,
    pub cooldown: Option<Countdown>,
    pub prices: FormPrices,
    pub errors: Vec<FieldError>,
    pub availability: Availability,
    pub input_disabled: bool,
}

impl FormView {
    /// A change can be submitted when something changed, nothing is invalid and input is enabled.
    pub fn can_submit(&self) -> bool {
        !self.dirty_fields.is_empty() && self.errors.is_empty() && !self.input_disabled
    }
}

mod seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(secs.max(0)))
    }
}
