//! Position change orchestration
//!
//! The gated pipeline behind the ACTIVE stage's POSITION_CHANGE operation:
//!
//! 1. temporal validation (overlap with existing history is fatal)
//! 2. position context fetch (read-only, repeated freely)
//! 3. risk assessment (pure, clock injected)
//! 4. approval chain when the assessment demands one
//! 5. retroactive impact, publishing a payroll recalculation trigger
//! 6. history write (close the old record, create the new one; both
//!    required, so a failure never leaves two open intervals)
//! 7. change event and notifications
//!
//! A rejected approval yields a successful run whose outcome says
//! `success = false`; nothing is written to history in that case.

use crate::chains::{resolve_chain, ChainVerdict};
use crate::retro::assess_impact;
use crate::run::Run;
use lifecycle_activities::{
    CreatePositionHistoryRequest, EndCurrentPositionRequest, EventEnvelope, NotificationBatch,
    PositionContext, PositionContextRequest, TemporalValidationRequest,
};
use lifecycle_risk::{approval_chain_for, assess, CurrentState, RiskLevel};
use lifecycle_types::{
    ActorId, ApprovalStatus, ApproverRole, LifecycleError, OrchestrationResult,
    PositionChangeProposal, PositionChangeResult,
};
use uuid::Uuid;

pub(crate) async fn run(
    run: &mut Run,
    proposal: PositionChangeProposal,
) -> OrchestrationResult<()> {
    // 1. Temporal validation
    run.wait_if_paused().await?;
    run.checkpoint("temporal_validation", 0.1);
    if run.needs("temporal_validation") {
        let req = TemporalValidationRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            effective_date: proposal.effective_date,
        };
        let validation = run
            .activity("validate_temporal_consistency", || {
                run.activities.validate_temporal_consistency(req.clone())
            })
            .await?;
        if !validation.valid {
            return Err(LifecycleError::Validation(format!(
                "effective date conflicts with position history: {}",
                validation.conflicts.join("; ")
            )));
        }
        run.done("temporal_validation");
    }

    // 2. Context fetch. Read-only, so a resumed run repeats it freely.
    run.wait_if_paused().await?;
    run.checkpoint("context_fetch", 0.25);
    let context_req = PositionContextRequest {
        tenant_id: run.request.tenant_id,
        employee_id: run.request.employee_id,
    };
    let context = run
        .activity("fetch_position_context", || {
            run.activities.fetch_position_context(context_req.clone())
        })
        .await?;

    // 3. Risk assessment. Deterministic for the same context, so repeating
    // it on resume reproduces the original classification.
    run.checkpoint("risk_assessment", 0.4);
    let now = run.clock.now();
    let current = CurrentState {
        position: context.current_position.as_ref(),
        salary: context.current_salary,
        recent_change_count: context.recent_change_count,
    };
    let assessment = assess(&current, &proposal.new_position, proposal.effective_date, now);
    tracing::info!(
        run_id = %run.run_id.short(),
        employee_id = %run.request.employee_id,
        risk = %assessment.level,
        factors = assessment.factors.len(),
        "position change risk assessed"
    );
    run.done("risk_assessed");

    // 4. Approval chain
    run.wait_if_paused().await?;
    run.checkpoint("approval", 0.55);
    let mut approved_by: Option<ActorId> = None;
    if assessment.requires_approval
        && run.needs("approval_resolved")
        && run.needs("change_rejected")
    {
        let chain = resolved_chain_for(assessment.level, &context);
        match resolve_chain(run, &chain).await? {
            ChainVerdict::Rejected { comments } => {
                let outcome = PositionChangeResult {
                    success: false,
                    position_history_id: None,
                    effective_date: proposal.effective_date,
                    is_retroactive: proposal.effective_date < now,
                    processed_at: run.clock.now(),
                    approval_status: ApprovalStatus::Rejected,
                    error: comments,
                };
                run.result.set_outcome(&outcome);
                run.done("change_rejected");
                return Ok(());
            }
            ChainVerdict::Approved(events) => {
                approved_by = events.last().and_then(|e| e.approver);
                run.done("approval_resolved");
            }
        }
    }
    if run.result.has_step("change_rejected") {
        return Ok(());
    }

    // 5. Retroactive impact, settled before any history is written
    run.checkpoint("retroactive_processing", 0.7);
    let is_retroactive = proposal.effective_date < now;
    if is_retroactive && run.needs("retroactive_processed") {
        let impact = assess_impact(proposal.effective_date, now);
        if impact.requires_recalculation {
            let event = EventEnvelope {
                tenant_id: run.request.tenant_id,
                employee_id: run.request.employee_id,
                event_type: "payroll.recalculation".into(),
                occurred_at: run.clock.now(),
                payload: serde_json::json!({
                    "affected_periods": impact.affected_periods,
                    "effective_date": proposal.effective_date,
                }),
            };
            // Advisory trigger; payroll reconciles on its own schedule
            run.best_effort("publish_event", || {
                run.activities.publish_event(event.clone())
            })
            .await;
        }
        run.done("retroactive_processed");
    }

    // 6. History write. The close-out and the new record stand or fall
    // together; a swallowed close-out failure would leave two open
    // intervals, so both are required.
    run.wait_if_paused().await?;
    run.checkpoint("history_write", 0.85);
    if run.needs("current_position_ended") && context.current_position.is_some() {
        let req = EndCurrentPositionRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            end_date: proposal.effective_date,
        };
        run.activity("end_current_position", || {
            run.activities.end_current_position(req.clone())
        })
        .await?;
        run.done("current_position_ended");
    }

    let mut history_id: Option<Uuid> = prior_history_id(run);
    let mut previous_title: Option<String> = None;
    if run.needs("position_changed") {
        let req = CreatePositionHistoryRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            position: proposal.new_position.clone(),
            effective_date: proposal.effective_date,
            end_date: None,
            change_reason: proposal.change_reason.clone(),
            is_retroactive,
            approved_by,
        };
        let record = run
            .activity("create_position_history", || {
                run.activities.create_position_history(req.clone())
            })
            .await?;
        history_id = Some(record.history_id);
        previous_title = record.previous_position.map(|p| p.title);
        run.done("position_changed");
    }

    // 7. Events and notifications
    run.checkpoint("events", 0.95);
    if run.needs("events_published") {
        let event = EventEnvelope {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            event_type: "employee.position.changed".into(),
            occurred_at: run.clock.now(),
            payload: serde_json::json!({
                "new_title": proposal.new_position.title,
                "new_department": proposal.new_position.department,
                "previous_title": previous_title,
                "effective_date": proposal.effective_date,
            }),
        };
        if run
            .best_effort("publish_event", || {
                run.activities.publish_event(event.clone())
            })
            .await
            .is_some()
        {
            run.done("events_published");
        }
    }
    if run.needs("notifications_sent") {
        let batch = NotificationBatch {
            tenant_id: run.request.tenant_id,
            recipients: vec![run.request.requested_by],
            subject: "Position change processed".into(),
            body: format!(
                "Position change to {} effective {}",
                proposal.new_position.title,
                proposal.effective_date.date_naive()
            ),
            history_id,
            change_type: run.request.operation.name().to_string(),
            is_retroactive,
        };
        if run
            .best_effort("send_notifications", || {
                run.activities.send_notifications(batch.clone())
            })
            .await
            .is_some()
        {
            run.done("notifications_sent");
        }
    }

    let outcome = PositionChangeResult {
        success: true,
        position_history_id: history_id,
        effective_date: proposal.effective_date,
        is_retroactive,
        processed_at: run.clock.now(),
        approval_status: if run.result.has_step("approval_resolved") {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::NotRequired
        },
        error: None,
    };
    run.result.set_outcome(&outcome);
    Ok(())
}

/// Build the chain for a risk level and resolve the direct-manager step
/// against the employee's reporting line.
fn resolved_chain_for(
    level: RiskLevel,
    context: &PositionContext,
) -> Vec<lifecycle_types::ApprovalStep> {
    let mut chain = approval_chain_for(level);
    if let Some(manager) = context
        .current_position
        .as_ref()
        .and_then(|p| p.reports_to)
    {
        for step in &mut chain {
            if step.role == ApproverRole::DirectManager && step.approver_id.is_none() {
                step.approver_id = Some(ActorId::from(manager.as_uuid()));
            }
        }
    }
    chain
}

/// Recover the history id from a prior run's outcome when the write step
/// was already recorded.
fn prior_history_id(run: &Run) -> Option<Uuid> {
    run.result
        .outcome
        .as_ref()
        .and_then(|o| o.get("position_history_id"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
}
