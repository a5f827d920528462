// rdsrestoretool/src/restore/teardown.rs
use crate::errors::{Operation, RestoreError};
use crate::rds::{ControlPlane, ResourceRef};

/// Requests deletion of the destination's compute instance, skipping the
/// final snapshot — the destination is disposable. Deleting an instance
/// that is already gone succeeds.
///
/// The owning cluster only becomes deletable once this instance is
/// confirmed gone; callers wait on the deletion before touching the
/// cluster.
pub async fn delete_instance<C: ControlPlane>(
    rds: &C,
    instance: &ResourceRef,
) -> Result<(), RestoreError> {
    println!("Deleting RDS instance [{}] ...", instance.id);
    rds.delete_instance(&instance.id)
        .await
        .map_err(|fault| RestoreError::fatal(Operation::DeleteInstance, &instance.id, fault))
}

/// Requests deletion of the destination cluster, skipping the final
/// snapshot. Deleting a cluster that is already gone succeeds.
pub async fn delete_cluster<C: ControlPlane>(
    rds: &C,
    cluster: &ResourceRef,
) -> Result<(), RestoreError> {
    println!("Deleting RDS cluster [{}] ...", cluster.id);
    rds.delete_cluster(&cluster.id)
        .await
        .map_err(|fault| RestoreError::fatal(Operation::DeleteCluster, &cluster.id, fault))
}
