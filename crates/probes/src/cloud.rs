//! Cloud API abstraction.
//!
//! Every probe queries its subsystem through [`CloudApi`], so probes never
//! depend on a concrete SDK. The records returned here mirror what the cloud
//! control plane reports; probes fold them into `Details` payloads and a
//! severity.
//!
//! ```text
//!   ┌──────────────┐
//!   │  CloudApi    │  (trait)
//!   └──────┬───────┘
//!          │
//!    ┌─────┴──────┐
//!    │            │
//! ┌──▼──────────┐ ┌▼────────────┐
//! │SnapshotCloud│ │ test fakes  │
//! └─────────────┘ └─────────────┘
//! ```
//!
//! # Implementations
//!
//! - [`SnapshotCloud`](crate::snapshot::SnapshotCloud): reads an inventory
//!   document exported from the cloud account.
//! - Test fakes build records in memory.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

// ─── Records ─────────────────────────────────────────────────────────

/// Container cluster as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub running_tasks: u32,
    #[serde(default)]
    pub pending_tasks: u32,
}

/// Long-running service inside a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub cluster: String,
    pub name: String,
    pub status: String,
    pub desired_count: u32,
    pub running_count: u32,
    #[serde(default)]
    pub pending_count: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Task instance of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Full task ARN or bare id.
    pub arn: String,
    pub last_status: String,
    #[serde(default)]
    pub health_status: Option<String>,
}

impl Task {
    /// Short task id (last path segment of the ARN).
    pub fn id(&self) -> &str {
        self.arn.rsplit('/').next().unwrap_or(&self.arn)
    }
}

/// Application load balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub name: String,
    pub dns_name: String,
    pub state: String,
    pub scheme: String,
}

/// Target group attached to a load balancer, with per-target health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Registered target and its health state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub state: String,
}

impl Target {
    pub fn is_healthy(&self) -> bool {
        self.state.eq_ignore_ascii_case("healthy")
    }
}

/// Serverless function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
}

/// Key-value table description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub item_count: u64,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub billing_mode: Option<String>,
}

/// Object storage bucket listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Result of inspecting an accessible bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketInspection {
    /// `Enabled`, `Suspended` or `Disabled`.
    pub versioning: String,
    pub size_bytes: u64,
}

/// API gateway protocol family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiProtocol {
    Rest,
    Http,
}

impl std::fmt::Display for ApiProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "REST"),
            Self::Http => write!(f, "HTTP"),
        }
    }
}

/// Deployed gateway API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayApi {
    pub protocol: ApiProtocol,
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// User identity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPool {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_users: u64,
    #[serde(default)]
    pub mfa: Option<String>,
}

/// Alarm state as reported by the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Ok,
    Alarm,
    InsufficientData,
}

/// Metric alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub name: String,
    pub state: AlarmState,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Secret metadata (never the secret value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    #[serde(default)]
    pub rotation_enabled: bool,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_changed: Option<DateTime<Utc>>,
}

/// Virtual private network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    pub id: String,
    pub cidr: String,
    pub state: String,
    /// Value of the `Name` tag.
    #[serde(default)]
    pub name: Option<String>,
}

/// Subnet inside a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub vpc_id: String,
    pub cidr: String,
    pub availability_zone: String,
    pub available_ips: u32,
}

/// Security group with rule counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    /// Value of the `Name` tag.
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub ingress_rules: usize,
    #[serde(default)]
    pub egress_rules: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────

/// Cloud control-plane queries used by the probes.
///
/// The trait is `Send + Sync + 'static` so implementations can be shared
/// across probe tasks behind an `Arc`.
///
/// # Error Handling
///
/// - Missing named resources: `CloudError::NotFound`
/// - Rejected calls: `CloudError::Api` / `CloudError::Throttled`
/// - Service or data source unreachable: `CloudError::Unavailable`
pub trait CloudApi: Send + Sync + 'static {
    /// Describes a cluster by exact name.
    fn describe_cluster(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Cluster, CloudError>> + Send;

    /// Describes a service inside a cluster.
    fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> impl Future<Output = Result<Service, CloudError>> + Send;

    /// Finds a load balancer by exact name.
    fn find_load_balancer(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<LoadBalancer, CloudError>> + Send;

    /// Lists target groups (with target health) attached to a load balancer.
    fn target_groups(
        &self,
        load_balancer: &str,
    ) -> impl Future<Output = Result<Vec<TargetGroup>, CloudError>> + Send;

    /// Lists every function in the region.
    fn list_functions(&self) -> impl Future<Output = Result<Vec<Function>, CloudError>> + Send;

    /// Counts `ERROR` log events for a function since `since`.
    ///
    /// Returns `CloudError::NotFound` when the function has no log group.
    fn recent_function_errors(
        &self,
        function: &str,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<u32, CloudError>> + Send;

    /// Lists table names.
    fn list_tables(&self) -> impl Future<Output = Result<Vec<String>, CloudError>> + Send;

    /// Describes a table.
    fn describe_table(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Table, CloudError>> + Send;

    /// Lists buckets.
    fn list_buckets(&self) -> impl Future<Output = Result<Vec<Bucket>, CloudError>> + Send;

    /// Checks access to a bucket and reads versioning and size.
    fn inspect_bucket(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<BucketInspection, CloudError>> + Send;

    /// Lists REST and HTTP gateway APIs.
    fn list_gateway_apis(&self)
    -> impl Future<Output = Result<Vec<GatewayApi>, CloudError>> + Send;

    /// Lists user pools with their details.
    fn list_user_pools(&self) -> impl Future<Output = Result<Vec<UserPool>, CloudError>> + Send;

    /// Lists metric alarms.
    fn list_alarms(&self) -> impl Future<Output = Result<Vec<Alarm>, CloudError>> + Send;

    /// Lists secret metadata.
    fn list_secrets(&self) -> impl Future<Output = Result<Vec<Secret>, CloudError>> + Send;

    /// Lists VPCs whose `Name` tag contains `name_filter`.
    fn list_vpcs(
        &self,
        name_filter: &str,
    ) -> impl Future<Output = Result<Vec<Vpc>, CloudError>> + Send;

    /// Lists subnets of a VPC.
    fn list_subnets(
        &self,
        vpc_id: &str,
    ) -> impl Future<Output = Result<Vec<Subnet>, CloudError>> + Send;

    /// Lists security groups whose `Name` tag contains `name_filter`.
    fn list_security_groups(
        &self,
        name_filter: &str,
    ) -> impl Future<Output = Result<Vec<SecurityGroup>, CloudError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_strips_arn_prefix() {
        let task = Task {
            arn: "arn:aws:ecs:us-east-1:123:task/dev-amplify-cluster/abc123".to_owned(),
            last_status: "RUNNING".to_owned(),
            health_status: None,
        };
        assert_eq!(task.id(), "abc123");

        let bare = Task {
            arn: "abc".to_owned(),
            last_status: "RUNNING".to_owned(),
            health_status: None,
        };
        assert_eq!(bare.id(), "abc");
    }

    #[test]
    fn target_health_is_case_insensitive() {
        let target = Target {
            id: "i-1".to_owned(),
            state: "Healthy".to_owned(),
        };
        assert!(target.is_healthy());
        let target = Target {
            id: "i-2".to_owned(),
            state: "draining".to_owned(),
        };
        assert!(!target.is_healthy());
    }

    #[test]
    fn alarm_state_uses_control_plane_names() {
        let state: AlarmState = serde_json::from_str("\"INSUFFICIENT_DATA\"").unwrap();
        assert_eq!(state, AlarmState::InsufficientData);
        let state: AlarmState = serde_json::from_str("\"ALARM\"").unwrap();
        assert_eq!(state, AlarmState::Alarm);
    }

    #[test]
    fn api_protocol_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ApiProtocol::Rest).unwrap(), "\"REST\"");
        assert_eq!(ApiProtocol::Http.to_string(), "HTTP");
    }
}
