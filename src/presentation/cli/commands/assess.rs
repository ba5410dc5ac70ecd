use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use crate::application::services::assessment::{AssessmentOutcome, AssessmentService};
use crate::domain::advice::{safety_advice, SafetyAdvice};
use crate::presentation::cli::formatters::assessment_fmt::{
    format_advice, format_risk, format_weather, print_section_header,
};

#[derive(Serialize)]
struct AssessOutput<'a> {
    #[serde(flatten)]
    outcome: &'a AssessmentOutcome,
    advice: SafetyAdvice,
}

/// Assess one locality, record it to history, and print the result.
///
/// # Errors
///
/// Returns an error if the weather cannot be fetched or JSON serialization fails.
pub async fn run_assess(
    service: &AssessmentService,
    locality: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut outcome = service
        .assess(locality)
        .await
        .with_context(|| format!("Cannot assess flood risk for '{locality}'"))?;

    if !outcome.persisted {
        retry_persist(service, &mut outcome);
    }

    let advice = safety_advice(outcome.assessment.level, &outcome.assessment.factors);

    if json {
        let output = AssessOutput {
            outcome: &outcome,
            advice,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_human(&outcome, &advice);
    }
    Ok(())
}

/// One more attempt at writing an unsaved history record.
fn retry_persist(service: &AssessmentService, outcome: &mut AssessmentOutcome) {
    match service.persist(&outcome.record) {
        Ok(saved) => {
            outcome.record = saved;
            outcome.persisted = true;
        }
        Err(e) => tracing::warn!("History not saved for {}: {e}", outcome.record.locality),
    }
}

fn print_human(outcome: &AssessmentOutcome, advice: &SafetyAdvice) {
    println!();
    print_section_header(&format!("🌧  Flood risk: {}", outcome.assessment.locality));

    println!("{}", "Weather".bold().underline());
    for line in format_weather(&outcome.snapshot) {
        println!("{line}");
    }

    println!();
    println!("{}", "Risk".bold().underline());
    for line in format_risk(&outcome.assessment) {
        println!("{line}");
    }

    println!();
    println!("{}", "Safety advice".bold().underline());
    for line in format_advice(advice) {
        println!("{line}");
    }

    if !outcome.persisted {
        println!();
        println!("{}", "⚠ This assessment could not be saved to history".yellow());
    }
    println!();
}
