// rdsrestoretool/src/restore/provision.rs
use crate::config::RestoreRequest;
use crate::errors::{Operation, RestoreError};
use crate::rds::{ControlPlane, ResourceRef};

/// Creates the restored cluster's single compute instance. The restored
/// cluster itself serves no connections until an instance is attached.
pub async fn create_instance<C: ControlPlane>(
    rds: &C,
    request: &RestoreRequest,
) -> Result<(), RestoreError> {
    let instance = ResourceRef::primary_instance(&request.destination_cluster_id);

    println!(
        "Creating RDS instance [{}] in RDS cluster [{}]",
        instance.id, request.destination_cluster_id
    );

    rds.create_instance(
        &request.destination_cluster_id,
        &instance.id,
        &request.instance_class,
        &request.engine,
    )
    .await
    .map_err(|fault| RestoreError::fatal(Operation::CreateInstance, &instance.id, fault))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ControlPlaneFault;
    use crate::rds::testkit::ScriptedControlPlane;

    fn request() -> RestoreRequest {
        RestoreRequest {
            region: "eu-west-1".to_string(),
            source_cluster_id: "orders-db".to_string(),
            destination_cluster_id: "orders-restore-db".to_string(),
            subnet_group: None,
            security_group_id: None,
            restore_to_time: None,
            instance_class: "db.t3.small".to_string(),
            engine: "aurora-mysql".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_the_primary_instance_in_the_destination_cluster() -> anyhow::Result<()> {
        let rds = ScriptedControlPlane::new();
        create_instance(&rds, &request()).await?;

        assert_eq!(
            rds.calls(),
            vec!["create_instance orders-restore-db-0 in orders-restore-db"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn a_quota_fault_is_fatal() {
        let rds = ScriptedControlPlane::new();
        rds.script_create_instance_result(Err(ControlPlaneFault::Api {
            code: "InstanceQuotaExceededFault".to_string(),
            message: "instance quota exceeded".to_string(),
        }));

        let err = create_instance(&rds, &request()).await.unwrap_err();
        assert!(matches!(err, RestoreError::Fatal { .. }));
        assert!(err.to_string().contains("[orders-restore-db-0]"));
    }
}
