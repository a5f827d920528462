// rdsrestoretool/src/rds/mod.rs
#[cfg(test)]
pub(crate) mod testkit;

use aws_sdk_rds::Client;
use aws_sdk_rds::config::{BehaviorVersion, Region};
use aws_sdk_rds::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_rds::types::Tag;
use chrono::{DateTime, Utc};

use crate::config::RestoreRequest;
use crate::errors::{classify_fault, ControlPlaneFault, FaultDisposition, Operation};

/// Suffix appended to a cluster identifier to name its only instance.
/// Exactly one instance per cluster is managed here; enumerating
/// additional members is out of scope.
const PRIMARY_INSTANCE_SUFFIX: &str = "-0";

/// Tag marking restored clusters as machine-managed.
const MANAGED_BY_TAG: (&str, &str) = ("ManagedBy", "rdsrestoretool");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cluster,
    Instance,
}

/// Names a cluster or an instance at the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceRef {
    pub fn cluster(cluster_id: &str) -> Self {
        ResourceRef {
            kind: ResourceKind::Cluster,
            id: cluster_id.to_string(),
        }
    }

    /// Derives the identifier of the cluster's single instance from the
    /// cluster identifier.
    pub fn primary_instance(cluster_id: &str) -> Self {
        ResourceRef {
            kind: ResourceKind::Instance,
            id: format!("{cluster_id}{PRIMARY_INSTANCE_SUFFIX}"),
        }
    }
}

/// Wire-level shape of a restore-to-point-in-time request. Time selection
/// is mutually exclusive at the protocol level: either
/// `use_latest_restorable_time` is set, or `restore_to_time` carries an
/// explicit instant — never both.
#[derive(Debug, Clone, PartialEq)]
pub struct PointInTimeSpec {
    pub source_cluster_id: String,
    pub destination_cluster_id: String,
    pub use_latest_restorable_time: bool,
    pub restore_to_time: Option<DateTime<Utc>>,
    pub subnet_group: Option<String>,
    pub security_group_id: Option<String>,
    pub tags: Vec<(String, String)>,
}

impl PointInTimeSpec {
    pub fn from_request(request: &RestoreRequest) -> Self {
        // The provenance tag rides along with the optional network
        // parameters.
        let tags = if request.subnet_group.is_some() || request.security_group_id.is_some() {
            vec![(MANAGED_BY_TAG.0.to_string(), MANAGED_BY_TAG.1.to_string())]
        } else {
            Vec::new()
        };

        PointInTimeSpec {
            source_cluster_id: request.source_cluster_id.clone(),
            destination_cluster_id: request.destination_cluster_id.clone(),
            use_latest_restorable_time: request.restore_to_time.is_none(),
            restore_to_time: request.restore_to_time,
            subnet_group: request.subnet_group.clone(),
            security_group_id: request.security_group_id.clone(),
            tags,
        }
    }
}

/// The subset of the RDS control plane this tool drives. Every mutation is
/// asynchronous at the provider: an accepted call transitions the
/// resource's status but does not complete synchronously.
///
/// Contract, shared by the AWS implementation and the test double:
/// - `describe_*` return `Ok(None)` when the resource does not exist;
///   absence is data here, not an error.
/// - `delete_*` return `Ok(())` when the resource is already gone.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    async fn describe_cluster(&self, cluster_id: &str)
    -> Result<Option<String>, ControlPlaneFault>;

    async fn describe_instance(
        &self,
        instance_id: &str,
    ) -> Result<Option<String>, ControlPlaneFault>;

    async fn delete_cluster(&self, cluster_id: &str) -> Result<(), ControlPlaneFault>;

    async fn delete_instance(&self, instance_id: &str) -> Result<(), ControlPlaneFault>;

    async fn restore_cluster(&self, spec: &PointInTimeSpec) -> Result<(), ControlPlaneFault>;

    async fn create_instance(
        &self,
        cluster_id: &str,
        instance_id: &str,
        instance_class: &str,
        engine: &str,
    ) -> Result<(), ControlPlaneFault>;
}

/// Builds an RDS client from the default credential chain and the
/// configured region.
pub async fn init_rds_client(region: &str) -> Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    let client = Client::new(&sdk_config);
    println!("AWS RDS client initialized for region [{region}]");
    client
}

fn into_fault<E>(err: SdkError<E>) -> ControlPlaneFault
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err.code() {
        Some(code) => ControlPlaneFault::Api {
            code: code.to_string(),
            message: err.message().unwrap_or("no message").to_string(),
        },
        None => ControlPlaneFault::Transport(DisplayErrorContext(&err).to_string()),
    }
}

impl ControlPlane for Client {
    async fn describe_cluster(
        &self,
        cluster_id: &str,
    ) -> Result<Option<String>, ControlPlaneFault> {
        match self
            .describe_db_clusters()
            .db_cluster_identifier(cluster_id)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .db_clusters()
                .first()
                .map(|cluster| cluster.status().unwrap_or("unknown").to_string())),
            Err(err) => {
                let fault = into_fault(err);
                match classify_fault(Operation::DescribeCluster, fault.code()) {
                    FaultDisposition::NotFound => Ok(None),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn describe_instance(
        &self,
        instance_id: &str,
    ) -> Result<Option<String>, ControlPlaneFault> {
        match self
            .describe_db_instances()
            .db_instance_identifier(instance_id)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .db_instances()
                .first()
                .map(|instance| instance.db_instance_status().unwrap_or("unknown").to_string())),
            Err(err) => {
                let fault = into_fault(err);
                match classify_fault(Operation::DescribeInstance, fault.code()) {
                    FaultDisposition::NotFound => Ok(None),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn delete_cluster(&self, cluster_id: &str) -> Result<(), ControlPlaneFault> {
        // The destination is disposable; never leave a final snapshot
        // behind.
        match self
            .delete_db_cluster()
            .db_cluster_identifier(cluster_id)
            .skip_final_snapshot(true)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                let fault = into_fault(err);
                match classify_fault(Operation::DeleteCluster, fault.code()) {
                    FaultDisposition::Ignorable => Ok(()),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<(), ControlPlaneFault> {
        match self
            .delete_db_instance()
            .db_instance_identifier(instance_id)
            .skip_final_snapshot(true)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                let fault = into_fault(err);
                match classify_fault(Operation::DeleteInstance, fault.code()) {
                    FaultDisposition::Ignorable => Ok(()),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn restore_cluster(&self, spec: &PointInTimeSpec) -> Result<(), ControlPlaneFault> {
        let mut request = self
            .restore_db_cluster_to_point_in_time()
            .db_cluster_identifier(&spec.destination_cluster_id)
            .source_db_cluster_identifier(&spec.source_cluster_id)
            .use_latest_restorable_time(spec.use_latest_restorable_time);

        if let Some(restore_to) = spec.restore_to_time {
            request = request
                .restore_to_time(aws_sdk_rds::primitives::DateTime::from_secs(
                    restore_to.timestamp(),
                ));
        }
        if let Some(subnet_group) = &spec.subnet_group {
            request = request.db_subnet_group_name(subnet_group);
        }
        if let Some(security_group_id) = &spec.security_group_id {
            request = request.vpc_security_group_ids(security_group_id);
        }
        for (key, value) in &spec.tags {
            request = request.tags(Tag::builder().key(key).value(value).build());
        }

        // Every documented fault is fatal at this call site.
        request.send().await.map(|_| ()).map_err(into_fault)
    }

    async fn create_instance(
        &self,
        cluster_id: &str,
        instance_id: &str,
        instance_class: &str,
        engine: &str,
    ) -> Result<(), ControlPlaneFault> {
        self.create_db_instance()
            .db_cluster_identifier(cluster_id)
            .db_instance_identifier(instance_id)
            .db_instance_class(instance_class)
            .engine(engine)
            .send()
            .await
            .map(|_| ())
            .map_err(into_fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

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

    #[test]
    fn primary_instance_name_derives_from_the_cluster_name() {
        let instance = ResourceRef::primary_instance("orders-restore-db");
        assert_eq!(instance.id, "orders-restore-db-0");
        assert_eq!(instance.kind, ResourceKind::Instance);
    }

    #[test]
    fn latest_restorable_time_is_the_default_selection() {
        let spec = PointInTimeSpec::from_request(&request());
        assert!(spec.use_latest_restorable_time);
        assert!(spec.restore_to_time.is_none());
    }

    #[test]
    fn an_explicit_restore_time_disables_use_latest() {
        let mut request = request();
        request.restore_to_time = Some(Utc.with_ymd_and_hms(2024, 5, 17, 1, 0, 0).unwrap());

        let spec = PointInTimeSpec::from_request(&request);
        assert!(!spec.use_latest_restorable_time);
        assert_eq!(spec.restore_to_time, request.restore_to_time);
    }

    #[test]
    fn the_provenance_tag_rides_with_the_network_parameters() {
        let mut with_subnet = request();
        with_subnet.subnet_group = Some("restore-subnets".to_string());
        let spec = PointInTimeSpec::from_request(&with_subnet);
        assert_eq!(
            spec.tags,
            vec![("ManagedBy".to_string(), "rdsrestoretool".to_string())]
        );

        let bare = PointInTimeSpec::from_request(&request());
        assert!(bare.tags.is_empty());
    }
}
