//! Portfolio views over completed evaluations: the risk matrix and daily trends.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AppRequest, AppRequestId, PlatformType, PlatformTypeId};
use super::scoring::Recommendation;

const SCORE_TREND_BAND: f64 = 2.0;
const APPROVAL_TREND_BAND: f64 = 5.0;

/// Filters shared by the matrix and trend views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationFilter {
    #[serde(default)]
    pub platform_type_id: Option<PlatformTypeId>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

impl EvaluationFilter {
    fn matches(&self, request: &AppRequest) -> bool {
        let Some(result) = &request.calculation_result else {
            return false;
        };
        if let Some(platform_type_id) = &self.platform_type_id {
            if &request.platform_type_id != platform_type_id {
                return false;
            }
        }
        if let Some(recommendation) = self.recommendation {
            if result.recommendation != recommendation {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixPoint {
    pub app_request_id: AppRequestId,
    pub name: String,
    pub requestor: String,
    pub platform_type: String,
    pub request_date: DateTime<Utc>,
    pub score: f64,
    pub recommendation: Recommendation,
    /// 0-100, higher is riskier.
    pub risk_level: f64,
    /// 0-100 impact bucket derived from the platform type.
    pub business_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMatrix {
    pub points: Vec<MatrixPoint>,
    pub approved: usize,
    pub conditional: usize,
    pub rejected: usize,
    pub average_score: Option<f64>,
}

/// Places every scored request on the risk/impact grid.
pub fn risk_matrix(
    requests: &[AppRequest],
    platform_types: &[PlatformType],
    filter: &EvaluationFilter,
) -> RiskMatrix {
    let points: Vec<MatrixPoint> = requests
        .iter()
        .filter(|request| filter.matches(request))
        .filter_map(|request| {
            let result = request.calculation_result.as_ref()?;
            let platform_name = platform_types
                .iter()
                .find(|platform_type| platform_type.id == request.platform_type_id)
                .map(|platform_type| platform_type.name.clone())
                .unwrap_or_else(|| "Unknown".to_string());

            Some(MatrixPoint {
                app_request_id: request.id.clone(),
                name: request.name.clone(),
                requestor: request.requestor.clone(),
                business_impact: business_impact(&platform_name),
                platform_type: platform_name,
                request_date: request.request_date,
                score: result.total_score,
                recommendation: result.recommendation,
                risk_level: (100.0 - result.total_score).clamp(0.0, 100.0),
            })
        })
        .collect();

    let count = |tier: Recommendation| {
        points
            .iter()
            .filter(|point| point.recommendation == tier)
            .count()
    };
    let average_score = (!points.is_empty())
        .then(|| points.iter().map(|point| point.score).sum::<f64>() / points.len() as f64);

    RiskMatrix {
        approved: count(Recommendation::Approve),
        conditional: count(Recommendation::ApproveWithConditions),
        rejected: count(Recommendation::Reject),
        average_score,
        points,
    }
}

fn business_impact(platform_name: &str) -> f64 {
    match platform_name {
        "SaaS" => 70.0,
        "OAuth" => 60.0,
        "Locally Installed" => 40.0,
        _ => 50.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub average_score: f64,
    pub total_evaluations: usize,
    pub approved: usize,
    pub conditional: usize,
    pub rejected: usize,
    pub approved_percentage: f64,
    pub conditional_percentage: f64,
    pub rejected_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendIndicator {
    pub value: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendIndicators {
    pub score: TrendIndicator,
    pub volume: TrendIndicator,
    pub approval: TrendIndicator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub days: u32,
    pub points: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<TrendIndicators>,
}

/// Daily aggregation of scored requests submitted within `days` of `now`.
///
/// A window reaching past the earliest representable timestamp covers all history.
pub fn risk_trends(
    requests: &[AppRequest],
    filter: &EvaluationFilter,
    days: u32,
    now: DateTime<Utc>,
) -> TrendReport {
    let cutoff = Duration::try_days(i64::from(days)).and_then(|span| now.checked_sub_signed(span));

    let mut by_day: BTreeMap<NaiveDate, Vec<(f64, Recommendation)>> = BTreeMap::new();
    for request in requests
        .iter()
        .filter(|request| {
            filter.matches(request) && cutoff.map_or(true, |cutoff| request.request_date >= cutoff)
        })
    {
        if let Some(result) = &request.calculation_result {
            by_day
                .entry(request.request_date.date_naive())
                .or_default()
                .push((result.total_score, result.recommendation));
        }
    }

    let points: Vec<TrendPoint> = by_day
        .into_iter()
        .map(|(date, entries)| trend_point(date, &entries))
        .collect();
    let indicators = trend_indicators(&points);

    TrendReport {
        days,
        points,
        indicators,
    }
}

fn trend_point(date: NaiveDate, entries: &[(f64, Recommendation)]) -> TrendPoint {
    let total = entries.len();
    let average = entries.iter().map(|(score, _)| score).sum::<f64>() / total as f64;
    let count = |tier: Recommendation| entries.iter().filter(|(_, r)| *r == tier).count();
    let percentage = |part: usize| (part as f64 / total as f64 * 100.0).round();

    let approved = count(Recommendation::Approve);
    let conditional = count(Recommendation::ApproveWithConditions);
    let rejected = count(Recommendation::Reject);

    TrendPoint {
        date,
        average_score: (average * 10.0).round() / 10.0,
        total_evaluations: total,
        approved,
        conditional,
        rejected,
        approved_percentage: percentage(approved),
        conditional_percentage: percentage(conditional),
        rejected_percentage: percentage(rejected),
    }
}

fn trend_indicators(points: &[TrendPoint]) -> Option<TrendIndicators> {
    let (first, last) = match points {
        [first, .., last] => (first, last),
        _ => return None,
    };

    let score = last.average_score - first.average_score;
    let volume = last.total_evaluations as f64 - first.total_evaluations as f64;
    let approval = last.approved_percentage - first.approved_percentage;

    Some(TrendIndicators {
        score: indicator(score, SCORE_TREND_BAND),
        volume: indicator(volume, 0.0),
        approval: indicator(approval, APPROVAL_TREND_BAND),
    })
}

fn indicator(value: f64, band: f64) -> TrendIndicator {
    let direction = if value > band {
        TrendDirection::Up
    } else if value < -band {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };
    TrendIndicator { value, direction }
}
