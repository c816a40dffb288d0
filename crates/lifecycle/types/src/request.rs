//! The immutable input to one orchestration run

use crate::{
    ActorId, EmployeeId, LifecycleOperation, LifecycleStage, PositionChangeProposal,
    PositionChangeRequest, TenantId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a lifecycle run needs to start.
///
/// The stage is carried separately from the operation so that a mismatch
/// (an operation submitted under the wrong stage) can be rejected at
/// dispatch, before any activity is invoked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LifecycleRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub stage: LifecycleStage,
    pub operation: LifecycleOperation,
    pub requested_by: ActorId,
    /// Earliest time the run should start, when deferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl LifecycleRequest {
    pub fn new(
        tenant_id: TenantId,
        employee_id: EmployeeId,
        operation: LifecycleOperation,
        requested_by: ActorId,
    ) -> Self {
        let stage = operation.stage();
        Self {
            tenant_id,
            employee_id,
            stage,
            operation,
            requested_by,
            scheduled_time: None,
        }
    }

    /// Override the stage, e.g. when replaying an externally supplied request
    pub fn with_stage(mut self, stage: LifecycleStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_scheduled_time(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(at);
        self
    }

    /// Whether the operation actually belongs to the requested stage
    pub fn is_stage_consistent(&self) -> bool {
        self.operation.stage() == self.stage
    }
}

impl From<PositionChangeRequest> for LifecycleRequest {
    fn from(req: PositionChangeRequest) -> Self {
        Self::new(
            req.tenant_id,
            req.employee_id,
            LifecycleOperation::PositionChange(PositionChangeProposal {
                new_position: req.new_position,
                effective_date: req.effective_date,
                change_reason: req.change_reason,
            }),
            req.requested_by,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArchivalDirective, ArchiveKind, RetentionDirective, RetentionKind};

    fn archive_op() -> LifecycleOperation {
        LifecycleOperation::ArchiveRecords(ArchivalDirective {
            archive_type: ArchiveKind::ColdStorage,
        })
    }

    #[test]
    fn test_new_infers_stage() {
        let req = LifecycleRequest::new(
            TenantId::generate(),
            EmployeeId::generate(),
            archive_op(),
            ActorId::generate(),
        );
        assert_eq!(req.stage, LifecycleStage::Terminated);
        assert!(req.is_stage_consistent());
    }

    #[test]
    fn test_position_change_request_conversion() {
        use crate::{EmploymentType, PositionSnapshot};
        use chrono::Utc;

        let req = PositionChangeRequest {
            tenant_id: TenantId::generate(),
            employee_id: EmployeeId::generate(),
            new_position: PositionSnapshot::new("Lead", "Platform", EmploymentType::FullTime),
            effective_date: Utc::now(),
            change_reason: "promotion".into(),
            requested_by: ActorId::generate(),
        };
        let request = LifecycleRequest::from(req.clone());
        assert_eq!(request.stage, LifecycleStage::Active);
        assert_eq!(request.tenant_id, req.tenant_id);
        assert!(matches!(
            request.operation,
            LifecycleOperation::PositionChange(_)
        ));
    }

    #[test]
    fn test_stage_mismatch_detected() {
        let req = LifecycleRequest::new(
            TenantId::generate(),
            EmployeeId::generate(),
            LifecycleOperation::DataRetention(RetentionDirective {
                retention_type: RetentionKind::Purge,
            }),
            ActorId::generate(),
        )
        .with_stage(LifecycleStage::Active);
        assert!(!req.is_stage_consistent());
    }
}
