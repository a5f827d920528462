// rdsrestoretool/src/restore/waiter.rs
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{Operation, RestoreError};
use crate::rds::{ControlPlane, ResourceKind, ResourceRef};

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const MAX_WAIT_ATTEMPTS: u32 = 120;

/// Polling cadence for one wait. The defaults put a hard one-hour ceiling
/// on each state transition (120 attempts at 30s). No backoff: the remote
/// transitions take minutes, not seconds.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy {
            poll_interval: POLL_INTERVAL,
            max_attempts: MAX_WAIT_ATTEMPTS,
        }
    }
}

/// Status a wait loop drives towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    /// The resource reports the `available` status.
    Available,
    /// Describing the resource reports not-found; terminal for deletion.
    Gone,
}

impl WaitTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitTarget::Available => "available",
            WaitTarget::Gone => "not-found",
        }
    }
}

/// Polls the resource's status until it reaches `target`, the attempt
/// budget runs out, or `cancel` fires.
///
/// Intermediate statuses (`creating`, `deleting`, `backing-up`,
/// `modifying`, ...) keep the loop waiting. A failing describe stops the
/// loop immediately, as does the resource vanishing while the target is
/// `available` — that means a wrong identifier or a race with an external
/// actor, and should never happen.
pub async fn wait_for_state<C: ControlPlane>(
    rds: &C,
    resource: &ResourceRef,
    target: WaitTarget,
    policy: &WaitPolicy,
    cancel: &CancellationToken,
) -> Result<(), RestoreError> {
    let (kind_label, describe_op) = match resource.kind {
        ResourceKind::Cluster => ("RDS cluster", Operation::DescribeCluster),
        ResourceKind::Instance => ("RDS instance", Operation::DescribeInstance),
    };

    println!(
        "Wait until {kind_label} [{}] is {} ...",
        resource.id,
        target.as_str()
    );

    let start = Instant::now();
    let mut last_status = String::from("unknown");

    for attempt in 0..policy.max_attempts {
        if cancel.is_cancelled() {
            return Err(RestoreError::Cancelled);
        }

        let described = match resource.kind {
            ResourceKind::Cluster => rds.describe_cluster(&resource.id).await,
            ResourceKind::Instance => rds.describe_instance(&resource.id).await,
        };

        match described {
            Ok(None) => match target {
                WaitTarget::Gone => {
                    println!("{kind_label} [{}] deleted successfully", resource.id);
                    return Ok(());
                }
                WaitTarget::Available => {
                    return Err(RestoreError::NotFound {
                        operation: "wait until available",
                        resource: resource.id.clone(),
                    });
                }
            },
            Ok(Some(status)) => {
                if target == WaitTarget::Available && status == target.as_str() {
                    println!("{kind_label} [{}] is now available", resource.id);
                    return Ok(());
                }
                last_status = status;
            }
            Err(fault) => {
                // A failing describe mid-wait is a hard stop, not retried.
                return Err(RestoreError::fatal(describe_op, &resource.id, fault));
            }
        }

        if attempt > 0 {
            println!(
                "{kind_label} [{}] status: [{last_status}], elapsed: {}s",
                resource.id,
                start.elapsed().as_secs()
            );
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(RestoreError::Cancelled),
            _ = tokio::time::sleep(policy.poll_interval) => {}
        }
    }

    Err(RestoreError::Timeout {
        resource: resource.id.clone(),
        target: target.as_str(),
        attempts: policy.max_attempts,
        waited_secs: start.elapsed().as_secs(),
    })
}
