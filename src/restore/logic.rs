// rdsrestoretool/src/restore/logic.rs
use tokio_util::sync::CancellationToken;

use super::waiter::{wait_for_state, WaitPolicy, WaitTarget};
use super::{point_in_time, provision, teardown};
use crate::config::RestoreRequest;
use crate::errors::{Operation, RestoreError};
use crate::rds::{ControlPlane, ResourceKind, ResourceRef};

/// Determines whether the referenced resource currently exists.
///
/// An inconclusive describe is an error, not a "probably absent": acting
/// on a resource whose state is unknown risks deleting or restoring over
/// something mid-transition.
pub(crate) async fn exists<C: ControlPlane>(
    rds: &C,
    resource: &ResourceRef,
) -> Result<bool, RestoreError> {
    let (described, operation) = match resource.kind {
        ResourceKind::Cluster => (
            rds.describe_cluster(&resource.id).await,
            Operation::DescribeCluster,
        ),
        ResourceKind::Instance => (
            rds.describe_instance(&resource.id).await,
            Operation::DescribeInstance,
        ),
    };

    match described {
        Ok(Some(_)) => Ok(true),
        Ok(None) => Ok(false),
        Err(fault) => Err(RestoreError::fatal(operation, &resource.id, fault)),
    }
}

/// Runs the full re-provisioning sequence against the destination:
/// teardown of whatever is already there, point-in-time restore from the
/// source, then recreation of the compute instance, each transition
/// confirmed by a bounded status wait.
///
/// The sequence is not transactional. A failure after teardown but before
/// a successful restore leaves no destination resource at all; the error
/// names the step that stopped the run.
pub(crate) async fn perform_restore_orchestration<C: ControlPlane>(
    rds: &C,
    request: &RestoreRequest,
    cancel: &CancellationToken,
) -> Result<(), RestoreError> {
    let cluster = ResourceRef::cluster(&request.destination_cluster_id);
    let instance = ResourceRef::primary_instance(&request.destination_cluster_id);
    let policy = WaitPolicy::default();

    // The stale instance goes first: its deletion is what makes the owning
    // cluster deletable.
    if exists(rds, &instance).await? {
        println!(
            "RDS instance [{}] already exists, deleting it now ...",
            instance.id
        );
        teardown::delete_instance(rds, &instance).await?;
        wait_for_state(rds, &instance, WaitTarget::Gone, &policy, cancel).await?;
    } else {
        println!(
            "RDS instance [{}] doesn't exist, skipping delete step",
            instance.id
        );
    }

    // Checked only after the instance branch settles; an instance deletion
    // in flight can take the cluster with it.
    if exists(rds, &cluster).await? {
        println!(
            "RDS cluster [{}] already exists, deleting it now ...",
            cluster.id
        );
        teardown::delete_cluster(rds, &cluster).await?;
        wait_for_state(rds, &cluster, WaitTarget::Gone, &policy, cancel).await?;
    } else {
        println!(
            "RDS cluster [{}] doesn't exist, skipping delete step",
            cluster.id
        );
    }

    point_in_time::restore_cluster(rds, request).await?;
    wait_for_state(rds, &cluster, WaitTarget::Available, &policy, cancel).await?;

    provision::create_instance(rds, request).await?;
    wait_for_state(rds, &instance, WaitTarget::Available, &policy, cancel).await?;

    Ok(())
}
