use std::fs;
use std::sync::Arc;

use risk_calculator::calculator::export::{
    all_criteria_reference_csv, calculation_breakdown_csv, criteria_reference_csv,
};
use risk_calculator::calculator::scoring::format_score;
use risk_calculator::calculator::{
    AppRequest, CalculationResult, CalculatorService, Evaluation, NewAppRequest, PlatformType,
};
use risk_calculator::error::AppError;
use tracing::info;

use crate::cli::{CatalogExportArgs, CatalogListArgs, ScoreArgs};
use crate::infra::{find_platform, load_state, resolve_selections, InMemoryStateRepository};

pub(crate) fn run_catalog_list(args: CatalogListArgs) -> Result<(), AppError> {
    let state = load_state(&args.storage)?;

    match args.platform {
        Some(name) => render_platform(find_platform(&state, &name)?),
        None => {
            println!("Platform types");
            for platform_type in &state.platform_types {
                println!(
                    "- {}: {} criteria, total weight {}",
                    platform_type.name,
                    platform_type.criteria.len(),
                    format_score(platform_type.total_weight())
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn run_catalog_export(args: CatalogExportArgs) -> Result<(), AppError> {
    let state = load_state(&args.storage)?;
    let csv = match &args.platform {
        Some(name) => criteria_reference_csv(find_platform(&state, name)?)?,
        None => all_criteria_reference_csv(&state.platform_types)?,
    };

    match args.output {
        Some(path) => {
            fs::write(&path, csv)?;
            info!(path = %path.display(), "wrote criteria reference");
            println!("Criteria reference written to {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

/// Scores against a throwaway copy of the catalog; nothing is persisted.
pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let state = load_state(&args.storage)?;
    let platform_type = find_platform(&state, &args.platform)?.clone();
    let selections = resolve_selections(&platform_type, &args.selections)?;

    let service =
        CalculatorService::with_state(Arc::new(InMemoryStateRepository::default()), state);
    let request = service.add_app_request(NewAppRequest {
        name: args.name,
        description: String::new(),
        platform_type_id: platform_type.id.clone(),
        requestor: args.requestor,
    })?;

    match service.evaluate(&request.id, &selections)? {
        Evaluation::Blocked(blocked) => {
            println!("{} ({})", request.name, platform_type.name);
            println!("Evaluation blocked by '{}'", blocked.criterion_name);
            println!("{}", blocked.message);
        }
        Evaluation::Scored(result) => {
            render_breakdown(&request, &result);
            if let Some(path) = args.csv {
                fs::write(&path, calculation_breakdown_csv(&request, &result)?)?;
                println!("\nBreakdown written to {}", path.display());
            }
        }
    }
    Ok(())
}

pub(crate) fn render_platform(platform_type: &PlatformType) {
    println!("{}: {}", platform_type.name, platform_type.description);
    for criterion in &platform_type.criteria {
        println!(
            "\n{} ({}%)",
            criterion.name,
            format_score(criterion.weight)
        );
        for option in &criterion.options {
            println!("  - {}: {}", option.label, format_score(option.value));
        }
    }
}

pub(crate) fn render_breakdown(request: &AppRequest, result: &CalculationResult) {
    println!("{} ({})", request.name, result.platform_type.name);
    for score in &result.criteria_scores {
        println!(
            "- {} [{}%]: {} ({}/100) -> {} pts",
            score.criterion_name,
            format_score(score.weight),
            score.selected_option.label,
            format_score(score.selected_option.value),
            format_score(score.weighted_score)
        );
    }
    println!(
        "Total score: {}/100 -> {}",
        format_score(result.total_score),
        result.recommendation
    );
    println!(
        "The application {}.",
        result.recommendation.summary()
    );
}
