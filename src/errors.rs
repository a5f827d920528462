// rdsrestoretool/src/errors.rs
use thiserror::Error;

/// Remote control-plane operations. Selects which fault table applies to a
/// given call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DescribeCluster,
    DescribeInstance,
    DeleteCluster,
    DeleteInstance,
    RestoreCluster,
    CreateInstance,
}

impl Operation {
    /// Name used in failure messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::DescribeCluster => "describe RDS cluster",
            Operation::DescribeInstance => "describe RDS instance",
            Operation::DeleteCluster => "delete RDS cluster",
            Operation::DeleteInstance => "delete RDS instance",
            Operation::RestoreCluster => "restore RDS cluster",
            Operation::CreateInstance => "create RDS instance",
        }
    }
}

/// How a provider fault code is handled at a given call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultDisposition {
    /// The resource is absent. Success-bearing for existence checks and
    /// deletion waits, failure-bearing everywhere else.
    NotFound,
    /// The call can be treated as a success (deleting a resource that is
    /// already gone).
    Ignorable,
    /// The run must stop.
    Fatal,
}

// Fault codes as reported by the RDS API. The instance not-found code has
// two spellings in the wild; both are accepted.
const DB_CLUSTER_NOT_FOUND: &str = "DBClusterNotFoundFault";
const DB_INSTANCE_NOT_FOUND: &str = "DBInstanceNotFound";
const DB_INSTANCE_NOT_FOUND_LEGACY: &str = "DBInstanceNotFoundFault";

/// Maps a provider fault code to its disposition for one operation.
///
/// Restore and instance creation have no ignorable subset: every
/// documented fault (capacity, quota, invalid state, missing
/// subnet/KMS/domain, ...) halts the run, as does any error carrying no
/// fault code at all (transport failures and the like).
pub fn classify_fault(operation: Operation, code: Option<&str>) -> FaultDisposition {
    let Some(code) = code else {
        return FaultDisposition::Fatal;
    };
    match (operation, code) {
        (Operation::DescribeCluster, DB_CLUSTER_NOT_FOUND) => FaultDisposition::NotFound,
        (Operation::DescribeInstance, DB_INSTANCE_NOT_FOUND | DB_INSTANCE_NOT_FOUND_LEGACY) => {
            FaultDisposition::NotFound
        }
        (Operation::DeleteCluster, DB_CLUSTER_NOT_FOUND) => FaultDisposition::Ignorable,
        (Operation::DeleteInstance, DB_INSTANCE_NOT_FOUND | DB_INSTANCE_NOT_FOUND_LEGACY) => {
            FaultDisposition::Ignorable
        }
        _ => FaultDisposition::Fatal,
    }
}

/// A failure reported by the remote control plane.
#[derive(Debug, Error)]
pub enum ControlPlaneFault {
    /// The API rejected the call with a documented fault code.
    #[error("{code}: {message}")]
    Api { code: String, message: String },

    /// The call never produced an API-level answer (connection,
    /// credential resolution, response parsing).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ControlPlaneFault {
    pub fn code(&self) -> Option<&str> {
        match self {
            ControlPlaneFault::Api { code, .. } => Some(code),
            ControlPlaneFault::Transport(_) => None,
        }
    }
}

/// Outcome taxonomy of the restore orchestration. The first non-success
/// outcome terminates the run.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// A resource was absent where the flow required it to be present.
    #[error("{operation}: [{resource}] not found")]
    NotFound {
        operation: &'static str,
        resource: String,
    },

    /// A remote fault or transport error. Never retried: re-issuing a call
    /// against a resource in an ambiguous state risks "already exists"
    /// faults.
    #[error("{operation} failed for [{resource}]: {source}")]
    Fatal {
        operation: &'static str,
        resource: String,
        source: ControlPlaneFault,
    },

    /// A wait loop exhausted its attempt budget. The remote operation may
    /// still be in progress, so this is kept distinct from `Fatal`; a
    /// caller could in principle resume polling. This tool does not.
    #[error(
        "timed out waiting for [{resource}] to become {target} after {attempts} attempts ({waited_secs}s)"
    )]
    Timeout {
        resource: String,
        target: &'static str,
        attempts: u32,
        waited_secs: u64,
    },

    /// The operator aborted the run.
    #[error("operation cancelled")]
    Cancelled,
}

impl RestoreError {
    pub(crate) fn fatal(operation: Operation, resource: &str, fault: ControlPlaneFault) -> Self {
        RestoreError::Fatal {
            operation: operation.as_str(),
            resource: resource.to_string(),
            source: fault,
        }
    }
}
