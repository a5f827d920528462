// rdsrestoretool/src/restore/point_in_time.rs
use crate::config::RestoreRequest;
use crate::errors::{Operation, RestoreError};
use crate::rds::{ControlPlane, PointInTimeSpec};

/// Issues the restore-to-point-in-time request that materializes the
/// destination cluster from the source's history.
///
/// Not retried on failure: a second identical call while the first one's
/// effects are still propagating would itself fault on "already exists".
pub async fn restore_cluster<C: ControlPlane>(
    rds: &C,
    request: &RestoreRequest,
) -> Result<(), RestoreError> {
    let spec = PointInTimeSpec::from_request(request);

    match spec.restore_to_time {
        Some(restore_to) => println!(
            "Restoring RDS cluster [{}] from [{}] at [{}]",
            spec.destination_cluster_id, spec.source_cluster_id, restore_to
        ),
        None => println!(
            "Restoring RDS cluster [{}] from the latest restorable time of [{}]",
            spec.destination_cluster_id, spec.source_cluster_id
        ),
    }

    rds.restore_cluster(&spec).await.map_err(|fault| {
        RestoreError::fatal(Operation::RestoreCluster, &spec.destination_cluster_id, fault)
    })?;

    println!(
        "Point-in-time restore accepted for [{}] -> [{}]",
        spec.source_cluster_id, spec.destination_cluster_id
    );
    Ok(())
}
