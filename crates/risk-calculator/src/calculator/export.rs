//! Flat CSV renderings of the criteria catalog and of calculation results.

use chrono::NaiveDate;
use csv::{QuoteStyle, Writer, WriterBuilder};

use super::domain::{AppRequest, Criterion, PlatformType};
use super::scoring::{format_score, CalculationResult};

const REFERENCE_HEADERS: [&str; 6] = [
    "Criterion",
    "Description",
    "Weight (%)",
    "Preferred Option",
    "Preferred Score",
    "All Options (Option: Score)",
];

const BREAKDOWN_HEADERS: [&str; 6] = [
    "#",
    "Criterion",
    "Weight",
    "Selected Option",
    "Score",
    "Points",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Criteria reference sheet for one platform type.
pub fn criteria_reference_csv(platform_type: &PlatformType) -> Result<String, ExportError> {
    let mut writer = writer();
    writer.write_record(REFERENCE_HEADERS)?;
    for criterion in &platform_type.criteria {
        writer.write_record(reference_row(criterion))?;
    }
    finish(writer)
}

/// Criteria reference sheet covering every platform type.
pub fn all_criteria_reference_csv(platform_types: &[PlatformType]) -> Result<String, ExportError> {
    let mut writer = writer();
    writer.write_record(std::iter::once("Platform Type").chain(REFERENCE_HEADERS))?;
    for platform_type in platform_types {
        for criterion in &platform_type.criteria {
            let row = std::iter::once(platform_type.name.clone()).chain(reference_row(criterion));
            writer.write_record(row)?;
        }
    }
    finish(writer)
}

/// Per-criterion breakdown of a calculation followed by request metadata and totals.
pub fn calculation_breakdown_csv(
    request: &AppRequest,
    result: &CalculationResult,
) -> Result<String, ExportError> {
    let mut writer = writer();
    writer.write_record(BREAKDOWN_HEADERS)?;
    for (index, score) in result.criteria_scores.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            score.criterion_name.clone(),
            format!("{}%", format_score(score.weight)),
            score.selected_option.label.clone(),
            format!("{}/100", format_score(score.selected_option.value)),
            format_score(score.weighted_score),
        ])?;
    }

    writer.write_record(["Application", request.name.as_str()])?;
    writer.write_record(["Requestor", request.requestor.as_str()])?;
    writer.write_record(["Platform Type", result.platform_type.name.as_str()])?;
    writer.write_record([
        "Total Score".to_string(),
        format!("{}/100", format_score(result.total_score)),
    ])?;
    writer.write_record(["Recommendation", result.recommendation.label()])?;
    finish(writer)
}

/// `SaaS_Security_Criteria_2025-01-31.csv`
pub fn criteria_file_name(platform_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_Security_Criteria_{}.csv",
        sanitize(platform_name),
        date.format("%Y-%m-%d")
    )
}

/// `Security_Evaluation_Slack_2025-01-31.csv`
pub fn evaluation_file_name(app_name: &str, date: NaiveDate) -> String {
    format!(
        "Security_Evaluation_{}_{}.csv",
        sanitize(app_name),
        date.format("%Y-%m-%d")
    )
}

fn reference_row(criterion: &Criterion) -> [String; 6] {
    let (preferred_label, preferred_score) = criterion
        .preferred_option()
        .map(|option| (option.label.clone(), format_score(option.value)))
        .unwrap_or_default();
    let all_options = criterion
        .options
        .iter()
        .map(|option| format!("{}: {}", option.label, format_score(option.value)))
        .collect::<Vec<_>>()
        .join(" | ");

    [
        criterion.name.clone(),
        criterion.description.clone(),
        format_score(criterion.weight),
        preferred_label,
        preferred_score,
        all_options,
    ]
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::defaults::default_platform_types;

    fn parse(csv: &str) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv.as_bytes())
            .records()
            .map(|record| {
                record
                    .expect("valid record")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn reference_sheet_lists_preferred_option_and_all_options() {
        let oauth = default_platform_types().remove(2);
        let rows = parse(&criteria_reference_csv(&oauth).expect("csv renders"));

        assert_eq!(rows[0], REFERENCE_HEADERS.map(str::to_string).to_vec());
        assert_eq!(rows.len(), oauth.criteria.len() + 1);

        let permissions = rows
            .iter()
            .find(|row| row[0] == "Permissions Scope")
            .expect("permissions row");
        assert_eq!(permissions[2], "24");
        assert_eq!(permissions[3], "Read-only");
        assert_eq!(permissions[4], "100");
        assert_eq!(
            permissions[5],
            "Read-only: 100 | Limited write: 65 | Full access: 0"
        );
    }

    #[test]
    fn every_cell_is_quoted() {
        let oauth = default_platform_types().remove(2);
        let csv = criteria_reference_csv(&oauth).expect("csv renders");
        assert!(csv.starts_with("\"Criterion\",\"Description\""));
    }

    #[test]
    fn combined_sheet_prefixes_platform_names() {
        let platform_types = default_platform_types();
        let rows = parse(&all_criteria_reference_csv(&platform_types).expect("csv renders"));
        let criteria: usize = platform_types
            .iter()
            .map(|platform_type| platform_type.criteria.len())
            .sum();

        assert_eq!(rows[0][0], "Platform Type");
        assert_eq!(rows.len(), criteria + 1);
        assert_eq!(rows.last().expect("rows")[0], "Whitelisting websites");
    }

    #[test]
    fn file_names_replace_non_alphanumeric_characters() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date");
        assert_eq!(
            criteria_file_name("Locally Installed", date),
            "Locally_Installed_Security_Criteria_2025-03-14.csv"
        );
        assert_eq!(
            evaluation_file_name("Slack (EU)", date),
            "Security_Evaluation_Slack__EU__2025-03-14.csv"
        );
    }
}
