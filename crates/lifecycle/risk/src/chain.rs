//! Approval chain construction per risk level

use crate::{policy, RiskLevel};
use lifecycle_types::{ActorId, ApprovalStep, ApproverRole};

/// Build the approval chain a risk level demands.
///
/// LOW yields an empty chain (no approval). The direct-manager step carries
/// no approver; the caller resolves it against the employee's reporting
/// line before execution. All steps are required: a timeout on any of them
/// fails the chain.
pub fn approval_chain_for(level: RiskLevel) -> Vec<ApprovalStep> {
    match level {
        RiskLevel::Low => Vec::new(),
        RiskLevel::Medium => vec![
            ApprovalStep::required(ApproverRole::DirectManager, policy::DIRECT_MANAGER_TIMEOUT),
            ApprovalStep::required(ApproverRole::HrManager, policy::HR_MANAGER_TIMEOUT)
                .with_approver(ActorId::from(policy::HR_MANAGER_APPROVER)),
        ],
        RiskLevel::High => vec![
            ApprovalStep::required(ApproverRole::HrManager, policy::HR_MANAGER_TIMEOUT)
                .with_approver(ActorId::from(policy::HR_MANAGER_APPROVER)),
            ApprovalStep::required(ApproverRole::HrDirector, policy::HR_DIRECTOR_TIMEOUT)
                .with_approver(ActorId::from(policy::HR_DIRECTOR_APPROVER)),
        ],
        RiskLevel::Critical => vec![
            ApprovalStep::required(ApproverRole::HrDirector, policy::HR_DIRECTOR_TIMEOUT)
                .with_approver(ActorId::from(policy::HR_DIRECTOR_APPROVER)),
            ApprovalStep::required(
                ApproverRole::ChiefExecutive,
                policy::CHIEF_EXECUTIVE_TIMEOUT,
            )
            .with_approver(ActorId::from(policy::CHIEF_EXECUTIVE_APPROVER)),
        ],
    }
}

/// The chain a hire approval runs before onboarding can start.
///
/// Hiring manager first when known, then HR.
pub fn hire_approval_chain(hiring_manager: Option<ActorId>) -> Vec<ApprovalStep> {
    let mut manager_step =
        ApprovalStep::required(ApproverRole::DirectManager, policy::DIRECT_MANAGER_TIMEOUT);
    if let Some(manager) = hiring_manager {
        manager_step = manager_step.with_approver(manager);
    }
    vec![
        manager_step,
        ApprovalStep::required(ApproverRole::HrManager, policy::HR_MANAGER_TIMEOUT)
            .with_approver(ActorId::from(policy::HR_MANAGER_APPROVER)),
    ]
}
