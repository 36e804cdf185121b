use std::path::Path;

use bookly_core::{CatalogWarning, ServiceConfig, ServicePricing};
use serde::Serialize;
use tracing::warn;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ServiceSummary {
    id: String,
    name: String,
    pricing_mode: String,
    discount_rules: usize,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    services: Vec<ServiceSummary>,
    warnings: Vec<CatalogWarning>,
}

pub fn run(services_path: &Path, json: bool) -> CommandResult {
    match build_report(services_path) {
        Ok(report) => {
            let output = if json {
                serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|error| format!("serialization failed: {error}"))
            } else {
                render_text(&report)
            };
            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult::failure("validate", "catalog", format!("{error:#}"), 1),
    }
}

fn build_report(services_path: &Path) -> anyhow::Result<ValidationReport> {
    let (services, warnings) = super::load_services(services_path)?;
    for warning in &warnings {
        warn!(code = %warning.code, field = %warning.field, "{}", warning.message);
    }

    let summaries = services.iter().map(summarize).collect();
    Ok(ValidationReport { services: summaries, warnings })
}

fn summarize(service: &ServiceConfig) -> ServiceSummary {
    let pricing_mode = match &service.pricing {
        ServicePricing::PerGuestTier { rules } => format!("per_guest_tier({} tiers)", rules.len()),
        ServicePricing::PerTable { hourly_rate } => format!("per_table({hourly_rate}/hr)"),
    };

    let discounts = &service.discounts;
    let discount_rules = usize::from(discounts.overall_discount_percent > rust_decimal::Decimal::ZERO)
        + usize::from(discounts.free_hours.is_some())
        + discounts.group_tiers.len()
        + discounts.timeslot_windows.len();

    ServiceSummary {
        id: service.id.to_string(),
        name: service.name.clone(),
        pricing_mode,
        discount_rules,
    }
}

fn render_text(report: &ValidationReport) -> String {
    let mut lines = vec![format!(
        "validated {} service(s), {} warning(s)",
        report.services.len(),
        report.warnings.len()
    )];

    for service in &report.services {
        lines.push(format!(
            "- {} ({}): {}, {} discount rule(s)",
            service.id, service.name, service.pricing_mode, service.discount_rules
        ));
    }

    if !report.warnings.is_empty() {
        lines.push("warnings:".to_string());
        for warning in &report.warnings {
            lines.push(format!("- {} {}: {}", warning.field, warning.code, warning.message));
        }
    }

    lines.join("\n")
}
