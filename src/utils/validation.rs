use crate::core::ranges::{group_thousands, iops_range, scales_with_size, throughput_range};
use crate::domain::model::{DiskConfiguration, FormField, PlanId};
use crate::domain::ports::RateSource;
use crate::utils::error::{DiskPlanError, Result};
use serde::Serialize;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();
    if raw.is_empty() {
        return Err(DiskPlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.contains('\0') {
        return Err(DiskPlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DiskPlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite, non-negative number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DiskPlanError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DiskPlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// `min <= max` for a pair of configured bounds.
pub fn validate_bounds(field_name: &str, min: f64, max: f64) -> Result<()> {
    validate_non_negative(&format!("{}.min", field_name), min)?;
    validate_non_negative(&format!("{}.max", field_name), max)?;
    if min > max {
        return Err(DiskPlanError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("min ({}) must not exceed max ({})", min, max),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Schema checks for a proposed disk configuration, reported per field.
pub fn validate_disk_configuration<R: RateSource + ?Sized>(
    rates: &R,
    plan: PlanId,
    disk: &DiskConfiguration,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let min_size = rates.included_disk_gb(plan, disk.storage_type);
    if !disk.total_size_gb.is_finite() || disk.total_size_gb <= 0.0 {
        errors.push(FieldError::new(
            FormField::TotalSize,
            "Disk size must be a positive number",
        ));
    } else if disk.total_size_gb < min_size {
        errors.push(FieldError::new(
            FormField::TotalSize,
            format!(
                "Disk size must be at least {} GB for {}",
                group_thousands(min_size),
                disk.storage_type
            ),
        ));
    }

    let iops = iops_range(rates, disk.storage_type, disk.total_size_gb);
    if !disk.provisioned_iops.is_finite() || disk.provisioned_iops < iops.min {
        errors.push(FieldError::new(
            FormField::ProvisionedIops,
            format!("IOPS must be at least {}", group_thousands(iops.min)),
        ));
    } else if scales_with_size(rates, disk.total_size_gb) && disk.provisioned_iops > iops.max {
        errors.push(FieldError::new(
            FormField::ProvisionedIops,
            format!(
                "IOPS must be at most {} for a {} GB {} disk",
                group_thousands(iops.max),
                group_thousands(disk.total_size_gb),
                disk.storage_type
            ),
        ));
    }

    match (
        throughput_range(rates, disk.storage_type, disk.provisioned_iops),
        disk.throughput_mbps,
    ) {
        (None, Some(_)) => errors.push(FieldError::new(
            FormField::Throughput,
            format!("Throughput is not configurable for {}", disk.storage_type),
        )),
        (Some(_), None) => errors.push(FieldError::new(
            FormField::Throughput,
            format!("Throughput is required for {}", disk.storage_type),
        )),
        (Some(range), Some(value)) if !range.contains(value) => {
            errors.push(FieldError::new(
                FormField::Throughput,
                format!(
                    "Throughput must be between {} and {} MB/s",
                    group_thousands(range.min),
                    group_thousands(range.max)
                ),
            ))
        }
        _ => {}
    }

    errors
}
