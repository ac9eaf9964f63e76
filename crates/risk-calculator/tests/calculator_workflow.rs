use std::sync::Arc;

use risk_calculator::calculator::export::calculation_breakdown_csv;
use risk_calculator::calculator::{
    CalculatorService, CriterionId, Evaluation, JsonFileRepository, NewAppRequest, NewCriterion,
    NewCriterionOption, NewPlatformType, PlatformType, Recommendation, Selections, StateRepository,
};

fn best_options(platform_type: &PlatformType) -> Selections {
    platform_type
        .criteria
        .iter()
        .filter_map(|criterion| {
            criterion
                .preferred_option()
                .map(|option| (criterion.id.clone(), option.id.clone()))
        })
        .collect()
}

#[test]
fn tiny_criterion_weight_normalizes_and_survives_reload() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = CalculatorService::open(Arc::new(JsonFileRepository::in_dir(dir.path())))
        .expect("service opens");

    let platform = service
        .add_platform_type(NewPlatformType {
            name: "Browser extensions".to_string(),
            description: String::new(),
        })
        .expect("platform type added");
    let (criterion_id, platform) = service
        .add_criterion(
            &platform.id,
            NewCriterion {
                name: "Store listing".to_string(),
                description: String::new(),
                weight: 5e-324,
                gate: None,
            },
        )
        .expect("criterion added");

    let criterion = platform.criterion(&criterion_id).expect("criterion exists");
    assert_eq!(criterion.weight, 100.0);

    let reopened = CalculatorService::open(Arc::new(JsonFileRepository::in_dir(dir.path())))
        .expect("stored state reloads");
    assert_eq!(reopened.snapshot(), service.snapshot());
}

#[test]
fn oauth_request_is_scored_persisted_and_reloaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repository = Arc::new(JsonFileRepository::in_dir(dir.path()));
    let service = CalculatorService::open(repository.clone()).expect("service opens");

    let oauth = service
        .platform_types()
        .into_iter()
        .find(|platform_type| platform_type.name == "OAuth")
        .expect("default OAuth platform");
    let weights: Vec<f64> = oauth.criteria.iter().map(|criterion| criterion.weight).collect();
    assert_eq!(weights, vec![20.0, 24.0, 20.0, 16.0, 20.0]);

    let request = service
        .add_app_request(NewAppRequest {
            name: "Zoom Scheduler".to_string(),
            description: "Calendar integration".to_string(),
            platform_type_id: oauth.id.clone(),
            requestor: "m.garcia".to_string(),
        })
        .expect("request added");

    let result = service
        .calculate_score(&request.id, &best_options(&oauth))
        .expect("complete selections score");
    assert_eq!(result.total_score, 100.0);
    assert_eq!(result.recommendation, Recommendation::Approve);

    let reopened = CalculatorService::open(Arc::new(JsonFileRepository::in_dir(dir.path())))
        .expect("service reopens");
    let stored = reopened.app_request(&request.id).expect("request persisted");
    assert_eq!(stored.calculation_result.as_ref(), Some(&result));
    assert_eq!(reopened.snapshot(), service.snapshot());
    assert!(repository.load().expect("loads").is_some());

    let csv = calculation_breakdown_csv(&stored, &result).expect("csv renders");
    assert!(csv.contains("\"Application\",\"Zoom Scheduler\""));
}

#[test]
fn whitelisting_request_is_blocked_until_manager_approves() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = CalculatorService::open(Arc::new(JsonFileRepository::in_dir(dir.path())))
        .expect("service opens");

    let whitelisting = service
        .platform_types()
        .into_iter()
        .find(|platform_type| platform_type.name == "Whitelisting websites")
        .expect("default whitelisting platform");

    let (manager_id, _) = service
        .add_criterion(
            &whitelisting.id,
            NewCriterion {
                name: "Approved by user's manager".to_string(),
                description: "Line manager confirmed the business need".to_string(),
                weight: 25.0,
                gate: None,
            },
        )
        .expect("criterion added");
    for (label, value) in [("Yes", 100.0), ("No", 0.0)] {
        service
            .add_criterion_option(
                &whitelisting.id,
                &manager_id,
                NewCriterionOption {
                    label: label.to_string(),
                    value,
                    description: None,
                },
            )
            .expect("option added");
    }
    let whitelisting = service
        .platform_type(&whitelisting.id)
        .expect("platform type exists");
    // 35, 40, 25, 25 rescaled to 100.
    let weights: Vec<f64> = whitelisting.criteria.iter().map(|c| c.weight).collect();
    assert_eq!(weights, vec![28.0, 32.0, 20.0, 20.0]);

    let request = service
        .add_app_request(NewAppRequest {
            name: "docs.example.org".to_string(),
            description: String::new(),
            platform_type_id: whitelisting.id.clone(),
            requestor: "t.nguyen".to_string(),
        })
        .expect("request added");

    let manager: CriterionId = manager_id;
    let mut selections = best_options(&whitelisting);
    let refusal = whitelisting
        .criterion(&manager)
        .and_then(|criterion| criterion.options.iter().find(|option| option.value == 0.0))
        .expect("refusal option");
    selections.insert(manager.clone(), refusal.id.clone());

    let evaluation = service
        .evaluate(&request.id, &selections)
        .expect("evaluation runs");
    assert!(matches!(evaluation, Evaluation::Blocked(_)));
    assert!(service
        .app_request(&request.id)
        .expect("request exists")
        .calculation_result
        .is_none());

    let evaluation = service
        .evaluate(&request.id, &best_options(&whitelisting))
        .expect("evaluation runs");
    let result = evaluation.result().expect("scored once the manager approves");
    assert_eq!(result.total_score, 100.0);
    assert_eq!(result.recommendation, Recommendation::Approve);
}
