//! Stage handlers for the single-activity operations
//!
//! Each handler follows the same discipline: suspension point first, then a
//! status checkpoint, then the activity guarded by its step label so a
//! resumed run never re-executes recorded work. Best-effort follow-ups
//! (events, history seeding, close-outs) log and continue on failure.

use crate::chains::{resolve_chain, ChainVerdict};
use crate::run::Run;
use lifecycle_activities::{
    ArchiveRecordsRequest, CompleteStepRequest, CreateCandidateRequest,
    CreatePositionHistoryRequest, DataRetentionRequest, EndCurrentPositionRequest, EventEnvelope,
    FinalizeOnboardingRequest, FinalizeTerminationRequest, InitializeOffboardingRequest,
    PerformanceReviewRequest, UpdateInformationRequest,
};
use lifecycle_risk::hire_approval_chain;
use lifecycle_types::{
    ArchivalDirective, CandidateProfile, HireProposal, InformationUpdate, OffboardingKickoff,
    OnboardingFinalization, OrchestrationResult, RetentionDirective, ReviewCycle, StepCompletion,
    TerminationFinalization,
};

// ── Pre-hire ─────────────────────────────────────────────────────────

pub(crate) async fn create_candidate(
    run: &mut Run,
    profile: CandidateProfile,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("candidate_creation", 0.5);

    if run.needs("candidate_created") {
        let req = CreateCandidateRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            profile,
        };
        let record = run
            .activity("create_candidate", || {
                run.activities.create_candidate(req.clone())
            })
            .await?;
        run.result.set_outcome(&record);
        run.done("candidate_created");
    }
    Ok(())
}

pub(crate) async fn update_candidate(
    run: &mut Run,
    update: InformationUpdate,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("candidate_update", 0.5);

    if run.needs("candidate_updated") {
        let req = UpdateInformationRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            update,
        };
        let outcome = run
            .activity("update_candidate", || {
                run.activities.update_candidate(req.clone())
            })
            .await?;
        run.result.set_outcome(&outcome);
        run.done("candidate_updated");
    }
    Ok(())
}

pub(crate) async fn approve_hire(
    run: &mut Run,
    proposal: HireProposal,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("hire_approval", 0.3);

    if run.needs("hire_approved") && run.needs("hire_rejected") {
        let chain = hire_approval_chain(None);
        match resolve_chain(run, &chain).await? {
            ChainVerdict::Rejected { comments } => {
                run.result.set_outcome(&serde_json::json!({
                    "approved": false,
                    "comments": comments,
                }));
                run.done("hire_rejected");
                // A rejected hire is a business outcome, not a failure
                return Ok(());
            }
            ChainVerdict::Approved(_) => {
                run.result.set_outcome(&serde_json::json!({
                    "approved": true,
                    "position_title": proposal.position_title,
                    "department": proposal.department,
                    "proposed_start_date": proposal.proposed_start_date,
                }));
                run.done("hire_approved");
            }
        }
    }

    if run.result.has_step("hire_rejected") {
        return Ok(());
    }

    run.wait_if_paused().await?;
    run.checkpoint("hire_event", 0.8);
    if run.needs("hire_event_published") {
        let event = EventEnvelope {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            event_type: "employee.hire.approved".into(),
            occurred_at: run.clock.now(),
            payload: serde_json::json!({ "department": proposal.department }),
        };
        if run
            .best_effort("publish_event", || {
                run.activities.publish_event(event.clone())
            })
            .await
            .is_some()
        {
            run.done("hire_event_published");
        }
    }
    Ok(())
}

// ── Onboarding (single-step operations) ──────────────────────────────

pub(crate) async fn complete_onboarding_step(
    run: &mut Run,
    step: StepCompletion,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("step_completion", 0.5);

    let label = format!("onboarding_step_{}", step.step_id);
    if run.needs(&label) {
        let req = CompleteStepRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            step,
        };
        run.activity("complete_onboarding_step", || {
            run.activities.complete_onboarding_step(req.clone())
        })
        .await?;
        run.done(&label);
    }
    Ok(())
}

pub(crate) async fn finalize_onboarding(
    run: &mut Run,
    finalization: OnboardingFinalization,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("finalization", 0.4);

    if run.needs("onboarding_finalized") {
        let req = FinalizeOnboardingRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            start_date: finalization.start_date,
        };
        run.activity("finalize_onboarding", || {
            run.activities.finalize_onboarding(req.clone())
        })
        .await?;
        run.done("onboarding_finalized");
    }

    // Seed the first position history record; the employee is already
    // active even if this write fails.
    run.wait_if_paused().await?;
    run.checkpoint("initial_position_record", 0.7);
    if run.needs("initial_position_recorded") {
        let req = CreatePositionHistoryRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            position: finalization.initial_position.clone(),
            effective_date: finalization.start_date,
            end_date: None,
            change_reason: "initial position".into(),
            is_retroactive: false,
            approved_by: None,
        };
        if run
            .best_effort("create_position_history", || {
                run.activities.create_position_history(req.clone())
            })
            .await
            .is_some()
        {
            run.done("initial_position_recorded");
        }
    }

    run.checkpoint("completion_event", 0.9);
    if run.needs("completion_event_published") {
        let event = EventEnvelope {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            event_type: "employee.onboarding.completed".into(),
            occurred_at: run.clock.now(),
            payload: serde_json::json!({ "start_date": finalization.start_date }),
        };
        if run
            .best_effort("publish_event", || {
                run.activities.publish_event(event.clone())
            })
            .await
            .is_some()
        {
            run.done("completion_event_published");
        }
    }
    Ok(())
}

// ── Active (single-step operations) ──────────────────────────────────

pub(crate) async fn update_information(
    run: &mut Run,
    update: InformationUpdate,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("information_update", 0.5);

    if run.needs("information_updated") {
        let req = UpdateInformationRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            update,
        };
        let outcome = run
            .activity("update_employee_information", || {
                run.activities.update_employee_information(req.clone())
            })
            .await?;
        run.result.set_outcome(&outcome);
        run.done("information_updated");
    }
    Ok(())
}

pub(crate) async fn performance_review(
    run: &mut Run,
    cycle: ReviewCycle,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("review_processing", 0.5);

    if run.needs("review_processed") {
        let req = PerformanceReviewRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            cycle,
        };
        let record = run
            .activity("process_performance_review", || {
                run.activities.process_performance_review(req.clone())
            })
            .await?;
        run.result.set_outcome(&record);
        run.done("review_processed");
    }
    Ok(())
}

// ── Offboarding ──────────────────────────────────────────────────────

pub(crate) async fn start_offboarding(
    run: &mut Run,
    kickoff: OffboardingKickoff,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("offboarding_initialization", 0.4);

    if run.needs("offboarding_initialized") {
        let req = InitializeOffboardingRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            kickoff: kickoff.clone(),
        };
        let plan = run
            .activity("initialize_offboarding", || {
                run.activities.initialize_offboarding(req.clone())
            })
            .await?;
        run.result.set_outcome(&plan);
        run.done("offboarding_initialized");
    }

    run.checkpoint("offboarding_event", 0.8);
    if run.needs("offboarding_event_published") {
        let event = EventEnvelope {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            event_type: "employee.offboarding.started".into(),
            occurred_at: run.clock.now(),
            payload: serde_json::json!({
                "termination_type": kickoff.termination_type,
                "termination_date": kickoff.termination_date,
            }),
        };
        if run
            .best_effort("publish_event", || {
                run.activities.publish_event(event.clone())
            })
            .await
            .is_some()
        {
            run.done("offboarding_event_published");
        }
    }
    Ok(())
}

pub(crate) async fn complete_offboarding_step(
    run: &mut Run,
    step: StepCompletion,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("step_completion", 0.5);

    let label = format!("offboarding_step_{}", step.step_id);
    if run.needs(&label) {
        let req = CompleteStepRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            step,
        };
        run.activity("complete_offboarding_step", || {
            run.activities.complete_offboarding_step(req.clone())
        })
        .await?;
        run.done(&label);
    }
    Ok(())
}

pub(crate) async fn finalize_termination(
    run: &mut Run,
    finalization: TerminationFinalization,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("termination", 0.3);

    if run.needs("termination_finalized") {
        let req = FinalizeTerminationRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            termination_date: finalization.termination_date,
        };
        run.activity("finalize_termination", || {
            run.activities.finalize_termination(req.clone())
        })
        .await?;
        run.done("termination_finalized");
    }

    // Close the open position record; termination stands even if this fails
    run.wait_if_paused().await?;
    run.checkpoint("position_closeout", 0.6);
    if run.needs("position_ended") {
        let req = EndCurrentPositionRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            end_date: finalization.termination_date,
        };
        if run
            .best_effort("end_current_position", || {
                run.activities.end_current_position(req.clone())
            })
            .await
            .is_some()
        {
            run.done("position_ended");
        }
    }

    run.checkpoint("termination_event", 0.9);
    if run.needs("termination_event_published") {
        let event = EventEnvelope {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            event_type: "employee.terminated".into(),
            occurred_at: run.clock.now(),
            payload: serde_json::json!({ "termination_date": finalization.termination_date }),
        };
        if run
            .best_effort("publish_event", || {
                run.activities.publish_event(event.clone())
            })
            .await
            .is_some()
        {
            run.done("termination_event_published");
        }
    }
    Ok(())
}

// ── Terminated ───────────────────────────────────────────────────────

pub(crate) async fn archive_records(
    run: &mut Run,
    directive: ArchivalDirective,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("archival", 0.5);

    if run.needs("records_archived") {
        let req = ArchiveRecordsRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            archive_type: directive.archive_type,
        };
        let receipt = run
            .activity("archive_records", || {
                run.activities.archive_records(req.clone())
            })
            .await?;
        run.result.set_outcome(&receipt);
        run.done("records_archived");
    }
    Ok(())
}

pub(crate) async fn data_retention(
    run: &mut Run,
    directive: RetentionDirective,
) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("retention", 0.5);

    if run.needs("retention_processed") {
        let req = DataRetentionRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            retention_type: directive.retention_type,
        };
        let outcome = run
            .activity("process_data_retention", || {
                run.activities.process_data_retention(req.clone())
            })
            .await?;
        run.result.set_outcome(&outcome);
        run.done("retention_processed");
    }
    Ok(())
}
