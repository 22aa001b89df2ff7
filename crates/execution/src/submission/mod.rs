//! Submission of operation plans to the ledger.

use crate::error::ExecutionError;
use async_trait::async_trait;
use clmm_rebalancer_protocols::plan::Plan;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An object the ledger created while executing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedObject {
    /// Id of the created object.
    pub object_id: String,
    /// Full Move type of the created object.
    pub object_type: String,
}

/// Outcome of a successfully executed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Transaction digest.
    pub digest: String,
    /// Objects created by the transaction.
    pub created: Vec<CreatedObject>,
}

impl SubmissionReceipt {
    /// Id of the first created object of `object_type`.
    pub fn created_of_type(&self, object_type: &str) -> Option<&str> {
        self.created
            .iter()
            .find(|object| object.object_type == object_type)
            .map(|object| object.object_id.as_str())
    }
}

/// Signs and executes plans.
///
/// Implementations return [`ExecutionError::ExecutionFailed`] when the ledger
/// rejects or reverts the plan.
#[async_trait]
pub trait PlanSubmitter: Send + Sync {
    async fn submit(&self, plan: &Plan) -> Result<SubmissionReceipt, ExecutionError>;
}

/// Logs plans instead of executing them.
#[derive(Debug, Clone, Default)]
pub struct DryRunSubmitter;

#[async_trait]
impl PlanSubmitter for DryRunSubmitter {
    async fn submit(&self, plan: &Plan) -> Result<SubmissionReceipt, ExecutionError> {
        let json = serde_json::to_string(plan)
            .map_err(|e| ExecutionError::ExecutionFailed(format!("plan serialization: {e}")))?;
        info!(steps = plan.len(), "Dry run, plan not submitted");
        debug!(plan = %json, "Dry run plan");
        Ok(SubmissionReceipt {
            digest: format!("dry-run-{}", uuid::Uuid::new_v4()),
            created: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_rebalancer_protocols::plan::Argument;

    #[tokio::test]
    async fn test_dry_run_succeeds_without_created_objects() {
        let mut plan = Plan::new();
        plan.transfer_objects(vec![Argument::object("0xb1")], "0xa11ce");

        let receipt = DryRunSubmitter.submit(&plan).await.unwrap();
        assert!(receipt.digest.starts_with("dry-run-"));
        assert!(receipt.created.is_empty());
    }

    #[test]
    fn test_created_of_type() {
        let receipt = SubmissionReceipt {
            digest: "9xQ".to_string(),
            created: vec![
                CreatedObject {
                    object_id: "0xc0".to_string(),
                    object_type: "0x2::coin::Coin<0x2::sui::SUI>".to_string(),
                },
                CreatedObject {
                    object_id: "0xc1".to_string(),
                    object_type: "0xpkg::position::Position".to_string(),
                },
            ],
        };
        assert_eq!(receipt.created_of_type("0xpkg::position::Position"), Some("0xc1"));
        assert_eq!(receipt.created_of_type("0xpkg::pool::Pool"), None);
    }
}
