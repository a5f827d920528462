// rdsrestoretool/src/rds/testkit.rs
//! Scripted stand-in for the RDS control plane, used by the waiter and
//! orchestration tests. Responses are queued per operation and consumed in
//! call order; once a queue is drained, describes report not-found and
//! mutations succeed, which matches a control plane that has settled.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ControlPlane, PointInTimeSpec};
use crate::errors::ControlPlaneFault;

type DescribeScript = Result<Option<String>, ControlPlaneFault>;
type CallScript = Result<(), ControlPlaneFault>;

#[derive(Default)]
pub struct ScriptedControlPlane {
    cluster_describes: Mutex<VecDeque<DescribeScript>>,
    instance_describes: Mutex<VecDeque<DescribeScript>>,
    delete_cluster_results: Mutex<VecDeque<CallScript>>,
    delete_instance_results: Mutex<VecDeque<CallScript>>,
    restore_results: Mutex<VecDeque<CallScript>>,
    create_instance_results: Mutex<VecDeque<CallScript>>,
    restored_specs: Mutex<Vec<PointInTimeSpec>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_cluster_describe(&self, result: DescribeScript) {
        self.cluster_describes.lock().unwrap().push_back(result);
    }

    pub fn script_instance_describe(&self, result: DescribeScript) {
        self.instance_describes.lock().unwrap().push_back(result);
    }

    /// Queues `n` consecutive identical status reports for the cluster.
    pub fn script_cluster_status_times(&self, status: &str, n: usize) {
        for _ in 0..n {
            self.script_cluster_describe(Ok(Some(status.to_string())));
        }
    }

    /// Queues `n` consecutive identical status reports for the instance.
    pub fn script_instance_status_times(&self, status: &str, n: usize) {
        for _ in 0..n {
            self.script_instance_describe(Ok(Some(status.to_string())));
        }
    }

    pub fn script_delete_cluster_result(&self, result: CallScript) {
        self.delete_cluster_results.lock().unwrap().push_back(result);
    }

    pub fn script_delete_instance_result(&self, result: CallScript) {
        self.delete_instance_results
            .lock()
            .unwrap()
            .push_back(result);
    }

    pub fn script_restore_result(&self, result: CallScript) {
        self.restore_results.lock().unwrap().push_back(result);
    }

    pub fn script_create_instance_result(&self, result: CallScript) {
        self.create_instance_results
            .lock()
            .unwrap()
            .push_back(result);
    }

    /// Every operation observed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Mutating operations observed so far, in call order. Describes are
    /// polling noise as far as sequence assertions are concerned.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("describe"))
            .collect()
    }

    /// Restore requests as they crossed the seam.
    pub fn restored_specs(&self) -> Vec<PointInTimeSpec> {
        self.restored_specs.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_describe(queue: &Mutex<VecDeque<DescribeScript>>) -> DescribeScript {
        queue.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn next_call(queue: &Mutex<VecDeque<CallScript>>) -> CallScript {
        queue.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

impl ControlPlane for ScriptedControlPlane {
    async fn describe_cluster(
        &self,
        cluster_id: &str,
    ) -> Result<Option<String>, ControlPlaneFault> {
        self.record(format!("describe_cluster {cluster_id}"));
        Self::next_describe(&self.cluster_describes)
    }

    async fn describe_instance(
        &self,
        instance_id: &str,
    ) -> Result<Option<String>, ControlPlaneFault> {
        self.record(format!("describe_instance {instance_id}"));
        Self::next_describe(&self.instance_describes)
    }

    async fn delete_cluster(&self, cluster_id: &str) -> Result<(), ControlPlaneFault> {
        self.record(format!("delete_cluster {cluster_id}"));
        Self::next_call(&self.delete_cluster_results)
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<(), ControlPlaneFault> {
        self.record(format!("delete_instance {instance_id}"));
        Self::next_call(&self.delete_instance_results)
    }

    async fn restore_cluster(&self, spec: &PointInTimeSpec) -> Result<(), ControlPlaneFault> {
        self.record(format!(
            "restore_cluster {} -> {}",
            spec.source_cluster_id, spec.destination_cluster_id
        ));
        self.restored_specs.lock().unwrap().push(spec.clone());
        Self::next_call(&self.restore_results)
    }

    async fn create_instance(
        &self,
        cluster_id: &str,
        instance_id: &str,
        _instance_class: &str,
        _engine: &str,
    ) -> Result<(), ControlPlaneFault> {
        self.record(format!("create_instance {instance_id} in {cluster_id}"));
        Self::next_call(&self.create_instance_results)
    }
}
