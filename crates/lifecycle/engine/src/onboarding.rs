//! Onboarding sub-orchestration
//!
//! Kicks off onboarding for a confirmed hire: plan initialization and
//! account creation must succeed; equipment, welcome email, and manager
//! notification are best-effort and never fail the run.

use crate::run::Run;
use lifecycle_activities::{
    AssignEquipmentRequest, CreateAccountRequest, InitializeOnboardingRequest,
    NotifyManagerRequest, SendWelcomeEmailRequest,
};
use lifecycle_types::{OnboardingKickoff, OrchestrationResult};

pub(crate) async fn run(run: &mut Run, kickoff: OnboardingKickoff) -> OrchestrationResult<()> {
    run.wait_if_paused().await?;
    run.checkpoint("initialization", 0.2);

    if run.needs("onboarding_initialized") {
        let req = InitializeOnboardingRequest {
            tenant_id: run.request.tenant_id,
            employee_id: run.request.employee_id,
            kickoff: kickoff.clone(),
        };
        let plan = run
            .activity("initialize_onboarding", || {
                run.activities.initialize_onboarding(req.clone())
            })
            .await?;
        run.result.set_outcome(&plan);
        run.done("onboarding_initialized");
    }

    run.wait_if_paused().await?;
    run.checkpoint("account_creation", 0.4);
    if run.needs("account_created") {
        let req = CreateAccountRequest {
            employee_id: run.request.employee_id,
            email: kickoff.email.clone(),
        };
        run.activity("create_account", || {
            run.activities.create_account(req.clone())
        })
        .await?;
        run.done("account_created");
    }

    run.wait_if_paused().await?;
    run.checkpoint("equipment_assignment", 0.6);
    if run.needs("equipment_assigned") {
        let req = AssignEquipmentRequest {
            employee_id: run.request.employee_id,
            department: kickoff.department.clone(),
        };
        if run
            .best_effort("assign_equipment", || {
                run.activities.assign_equipment(req.clone())
            })
            .await
            .is_some()
        {
            run.done("equipment_assigned");
        }
    }

    run.checkpoint("welcome_email", 0.75);
    if run.needs("welcome_email_sent") {
        let req = SendWelcomeEmailRequest {
            employee_id: run.request.employee_id,
            email: kickoff.email.clone(),
            first_name: kickoff.first_name.clone(),
        };
        if run
            .best_effort("send_welcome_email", || {
                run.activities.send_welcome_email(req.clone())
            })
            .await
            .is_some()
        {
            run.done("welcome_email_sent");
        }
    }

    run.checkpoint("manager_notification", 0.9);
    if let Some(manager_id) = kickoff.manager_id {
        if run.needs("manager_notified") {
            let req = NotifyManagerRequest {
                manager_id,
                employee_id: run.request.employee_id,
                message: format!(
                    "{} {} starts in {} on {}",
                    kickoff.first_name,
                    kickoff.last_name,
                    kickoff.department,
                    kickoff.start_date.date_naive()
                ),
            };
            if run
                .best_effort("notify_manager", || {
                    run.activities.notify_manager(req.clone())
                })
                .await
                .is_some()
            {
                run.done("manager_notified");
            }
        }
    }
    Ok(())
}
