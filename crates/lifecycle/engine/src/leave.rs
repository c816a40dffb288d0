//! Leave request sub-orchestration
//!
//! Validate, notify the manager, wait for their decision, then tell the
//! employee. An invalid request or a denial is a business outcome; only a
//! decision timeout fails the run.

use crate::chains::{resolve_chain, ChainVerdict};
use crate::run::Run;
use lifecycle_activities::{LeaveDecisionNotice, NotifyManagerRequest, ValidateLeaveRequest};
use lifecycle_types::{
    ActorId, ApprovalStep, ApproverRole, LeaveRequestDetails, OrchestrationResult,
};
use std::time::Duration;

/// How long the manager has to decide before the run fails
const DECISION_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 3600);

const DECISION_STEP_ID: &str = "leave-decision";

pub(crate) async fn run(run: &mut Run, details: LeaveRequestDetails) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("validation", 0.2);

    if run.needs("leave_validated") && run.needs("leave_rejected") {
        let req = ValidateLeaveRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            details: details.clone(),
        };
        let validation = run
            .activity("validate_leave_request", || {
                run.activities.validate_leave_request(req.clone())
            })
            .await?;
        if !validation.valid {
            run.result.set_outcome(&serde_json::json!({
                "approved": false,
                "reason": validation.rejection_reason,
            }));
            run.done("leave_rejected");
            return Ok(());
        }
        run.done("leave_validated");
    }
    if run.result.has_step("leave_rejected") {
        return Ok(());
    }

    run.wait_if_paused().await?;
    run.checkpoint("manager_notification", 0.4);
    if run.needs("manager_notified") {
        let req = NotifyManagerRequest {
            manager_id: details.manager_id,
            employee_id: run.request.employee_id,
            message: format!(
                "Leave request ({:?}) from {} to {} awaiting your decision [{}]",
                details.leave_type,
                details.start_date.date_naive(),
                details.end_date.date_naive(),
                DECISION_STEP_ID
            ),
        };
        run.activity("notify_manager_for_approval", || {
            run.activities.notify_manager_for_approval(req.clone())
        })
        .await?;
        run.done("manager_notified");
    }

    run.wait_if_paused().await?;
    run.checkpoint("decision_wait", 0.6);
    if run.needs("leave_approved") && run.needs("leave_denied") {
        let step = ApprovalStep::required(ApproverRole::DirectManager, DECISION_TIMEOUT)
            .with_step_id(DECISION_STEP_ID)
            .with_approver(ActorId::from(details.manager_id.as_uuid()));
        match resolve_chain(run, &[step]).await? {
            ChainVerdict::Approved(_) => {
                run.result
                    .set_outcome(&serde_json::json!({ "approved": true }));
                run.done("leave_approved");
            }
            ChainVerdict::Rejected { comments } => {
                run.result.set_outcome(&serde_json::json!({
                    "approved": false,
                    "comments": comments,
                }));
                run.done("leave_denied");
            }
        }
    }

    let approved = run.result.has_step("leave_approved");
    run.checkpoint("decision_notification", 0.9);
    if run.needs("decision_notification_sent") {
        let notice = LeaveDecisionNotice {
            employee_id: run.request.employee_id,
            manager_id: details.manager_id,
            approved,
            comments: None,
        };
        if run
            .best_effort("send_leave_decision_notification", || {
                run.activities
                    .send_leave_decision_notification(notice.clone())
            })
            .await
            .is_some()
        {
            run.done("decision_notification_sent");
        }
    }
    Ok(())
}
