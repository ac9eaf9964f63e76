use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use risk_calculator::calculator::{
    risk_matrix, risk_trends, CalculatorService, CalculatorState, Criterion, Evaluation,
    EvaluationFilter, NewAppRequest, NewCriterion, NewCriterionOption, OptionId, PlatformType,
    Selections,
};
use risk_calculator::error::AppError;

use crate::commands::render_breakdown;
use crate::infra::{find_platform, InMemoryStateRepository};

const MANAGER_CRITERION: &str = "Approved by user's manager";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the website whitelisting walkthrough.
    #[arg(long)]
    pub(crate) skip_whitelisting: bool,
    /// Number of days covered by the closing trend summary.
    #[arg(long, default_value_t = 30)]
    pub(crate) trend_days: u32,
}

/// Demo answer strategy applied to every criterion of a platform type.
#[derive(Debug, Clone, Copy)]
enum Posture {
    Strongest,
    Middle,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = CalculatorService::with_state(
        Arc::new(InMemoryStateRepository::default()),
        CalculatorState::with_defaults(),
    );
    let state = service.snapshot();

    println!("Security priority calculator demo");
    println!("Loaded {} platform types", state.platform_types.len());

    let oauth = find_platform(&state, "OAuth")?.clone();
    evaluate_and_print(&service, &oauth, "Calendly", "p.lee", Posture::Strongest)?;

    let saas = find_platform(&state, "SaaS")?.clone();
    evaluate_and_print(&service, &saas, "Miro", "k.osei", Posture::Middle)?;

    if !args.skip_whitelisting {
        whitelisting_walkthrough(&service)?;
    }

    let state = service.snapshot();
    let matrix = risk_matrix(
        &state.app_requests,
        &state.platform_types,
        &EvaluationFilter::default(),
    );
    println!("\nRisk matrix");
    for point in &matrix.points {
        println!(
            "- {} ({}): risk {:.0}, impact {:.0}, {}",
            point.name,
            point.platform_type,
            point.risk_level,
            point.business_impact,
            point.recommendation
        );
    }
    println!(
        "Approved {} | Conditional {} | Rejected {}",
        matrix.approved, matrix.conditional, matrix.rejected
    );

    let trends = risk_trends(
        &state.app_requests,
        &EvaluationFilter::default(),
        args.trend_days,
        Utc::now(),
    );
    for point in &trends.points {
        println!(
            "{}: {} evaluations, average score {:.1}",
            point.date, point.total_evaluations, point.average_score
        );
    }

    Ok(())
}

fn evaluate_and_print(
    service: &CalculatorService<InMemoryStateRepository>,
    platform_type: &PlatformType,
    name: &str,
    requestor: &str,
    posture: Posture,
) -> Result<(), AppError> {
    let request = service.add_app_request(NewAppRequest {
        name: name.to_string(),
        description: format!("{} request raised from the demo", platform_type.name),
        platform_type_id: platform_type.id.clone(),
        requestor: requestor.to_string(),
    })?;

    println!();
    match service.evaluate(&request.id, &answers(platform_type, posture))? {
        Evaluation::Scored(result) => render_breakdown(&request, &result),
        Evaluation::Blocked(blocked) => {
            println!("{}: evaluation blocked by '{}'", name, blocked.criterion_name);
            println!("  {}", blocked.message);
        }
    }
    Ok(())
}

/// Adds the manager approval question and shows it withholding a score.
fn whitelisting_walkthrough(
    service: &CalculatorService<InMemoryStateRepository>,
) -> Result<(), AppError> {
    let state = service.snapshot();
    let whitelisting = find_platform(&state, "Whitelisting websites")?.clone();

    let (manager_id, _) = service.add_criterion(
        &whitelisting.id,
        NewCriterion {
            name: MANAGER_CRITERION.to_string(),
            description: "The requestor's line manager confirmed the need".to_string(),
            weight: 20.0,
            gate: None,
        },
    )?;
    for (label, value) in [("Yes", 100.0), ("No", 0.0)] {
        service.add_criterion_option(
            &whitelisting.id,
            &manager_id,
            NewCriterionOption {
                label: label.to_string(),
                value,
                description: None,
            },
        )?;
    }

    let whitelisting = service.platform_type(&whitelisting.id)?;
    println!("\n{} now asks '{}'", whitelisting.name, MANAGER_CRITERION);

    let request = service.add_app_request(NewAppRequest {
        name: "status.vendor.example".to_string(),
        description: "Vendor status page".to_string(),
        platform_type_id: whitelisting.id.clone(),
        requestor: "r.patel".to_string(),
    })?;

    let mut selections = answers(&whitelisting, Posture::Strongest);
    if let Some(refusal) = whitelisting
        .criterion(&manager_id)
        .and_then(|criterion| criterion.options.iter().find(|option| option.value == 0.0))
    {
        selections.insert(manager_id.clone(), refusal.id.clone());
    }

    match service.evaluate(&request.id, &selections)? {
        Evaluation::Blocked(blocked) => {
            println!("- Manager declined: {}", blocked.message);
        }
        Evaluation::Scored(result) => render_breakdown(&request, &result),
    }

    let approved = answers(&whitelisting, Posture::Strongest);
    if let Evaluation::Scored(result) = service.evaluate(&request.id, &approved)? {
        println!("- Manager approved:");
        render_breakdown(&request, &result);
    }
    Ok(())
}

fn answers(platform_type: &PlatformType, posture: Posture) -> Selections {
    platform_type
        .criteria
        .iter()
        .filter_map(|criterion| {
            pick(criterion, posture).map(|option_id| (criterion.id.clone(), option_id))
        })
        .collect()
}

fn pick(criterion: &Criterion, posture: Posture) -> Option<OptionId> {
    match posture {
        Posture::Strongest => criterion.preferred_option().map(|option| option.id.clone()),
        Posture::Middle => criterion
            .options
            .get(criterion.options.len() / 2)
            .map(|option| option.id.clone()),
    }
}
