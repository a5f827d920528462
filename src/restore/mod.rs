// rdsrestoretool/src/restore/mod.rs
mod logic;
pub(crate) mod point_in_time;
pub(crate) mod provision;
pub(crate) mod teardown;
pub(crate) mod waiter;

use tokio_util::sync::CancellationToken;

use crate::config::RestoreRequest;
use crate::errors::RestoreError;
use crate::rds::ControlPlane;

/// Public entry point for the restore process.
/// Orchestrates teardown, point-in-time restore and instance provisioning
/// for the destination cluster described by `request`.
pub async fn run_restore_flow<C: ControlPlane>(
    rds: &C,
    request: &RestoreRequest,
    cancel: &CancellationToken,
) -> Result<(), RestoreError> {
    logic::perform_restore_orchestration(rds, request, cancel).await
}
