pub const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Read replicas are provisioned with this much headroom over the primary.
pub const REPLICA_SIZE_FACTOR: f64 = 1.25;

/// Used filesystem space in GB, rounded to two decimals.
pub fn used_gb(fs_used_bytes: Option<u64>) -> f64 {
    let bytes = fs_used_bytes.unwrap_or(0) as f64;
    ((bytes / GB) * 100.0).round() / 100.0
}

pub fn replica_disk_size(total_size_gb: f64) -> f64 {
    total_size_gb * REPLICA_SIZE_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_gb_rounds_to_cents() {
        assert_eq!(used_gb(None), 0.0);
        assert_eq!(used_gb(Some(1024 * 1024 * 1024)), 1.0);
        assert_eq!(used_gb(Some(1_610_612_736)), 1.5);
        assert_eq!(used_gb(Some(1_000_000_000)), 0.93);
    }

    #[test]
    fn test_replica_disk_size() {
        assert_eq!(replica_disk_size(8.0), 10.0);
    }
}
