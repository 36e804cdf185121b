use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use bookly_core::config::{AppConfig, LoadOptions};
use bookly_core::{
    parse_time_of_day, BookingLine, BookingPricer, BookingTotal, ServiceId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::CommandResult;

/// Booking-request file shape: dates and times arrive as the strings the
/// booking UI sends, and are validated here before any pricing runs.
#[derive(Debug, Deserialize)]
struct BookingLineFile {
    service_id: String,
    guest_count: u32,
    date: String,
    arrival: String,
    departure: String,
}

impl BookingLineFile {
    fn into_line(self) -> anyhow::Result<BookingLine> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid booking date `{}`", self.date))?;
        let arrival = parse_time_of_day(&self.arrival)
            .ok_or_else(|| anyhow!("invalid arrival time `{}`", self.arrival))?;
        let departure = parse_time_of_day(&self.departure)
            .ok_or_else(|| anyhow!("invalid departure time `{}`", self.departure))?;

        Ok(BookingLine {
            service_id: ServiceId(self.service_id),
            guest_count: self.guest_count,
            date,
            arrival,
            departure,
        })
    }
}

#[derive(Debug, Serialize)]
struct LineReport {
    service: String,
    guest_count: u32,
    arrival: String,
    departure: String,
    original_price: Decimal,
    final_price: Decimal,
    savings: Decimal,
    applied_discounts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    currency: String,
    lines: Vec<LineReport>,
    totals: BookingTotal,
    /// Rounded exactly once; this is the amount payment capture receives.
    charge_total: Decimal,
    catalog_warnings: usize,
}

pub fn run(services_path: &Path, booking_path: &Path, json: bool) -> CommandResult {
    match build_report(services_path, booking_path) {
        Ok(report) => {
            let output = if json {
                serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|error| format!("serialization failed: {error}"))
            } else {
                render_text(&report)
            };
            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult::failure("quote", "pricing", format!("{error:#}"), 1),
    }
}

fn build_report(services_path: &Path, booking_path: &Path) -> anyhow::Result<QuoteReport> {
    let config = AppConfig::load(LoadOptions::default()).context("loading configuration")?;

    let (services, warnings) = super::load_services(services_path)?;
    for warning in &warnings {
        warn!(code = %warning.code, field = %warning.field, "{}", warning.message);
    }

    let lines = load_booking(booking_path)?;
    let quote = BookingPricer::default().quote_booking(&services, &lines)?;

    let line_reports = quote
        .lines
        .iter()
        .zip(&lines)
        .map(|(quoted, line)| LineReport {
            service: quoted.service_name.clone(),
            guest_count: line.guest_count,
            arrival: line.arrival.format("%H:%M").to_string(),
            departure: line.departure.format("%H:%M").to_string(),
            original_price: quoted.result.original_price,
            final_price: quoted.result.final_price,
            savings: quoted.result.savings,
            applied_discounts: quoted
                .result
                .applied_labels()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        })
        .collect();

    let charge_total = quote.totals.charge_total(config.pricing.charge_decimals);
    Ok(QuoteReport {
        currency: config.pricing.currency,
        lines: line_reports,
        totals: quote.totals,
        charge_total,
        catalog_warnings: warnings.len(),
    })
}

fn load_booking(path: &Path) -> anyhow::Result<Vec<BookingLine>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let requests: Vec<BookingLineFile> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing booking request {}", path.display()))?;

    requests.into_iter().map(BookingLineFile::into_line).collect()
}

fn render_text(report: &QuoteReport) -> String {
    let mut lines = vec![format!("quote for {} line(s):", report.lines.len())];
    for line in &report.lines {
        lines.push(format!(
            "- {} ({} guests, {}-{}): {} -> {} {} (saved {})",
            line.service,
            line.guest_count,
            line.arrival,
            line.departure,
            line.original_price,
            line.final_price,
            report.currency,
            line.savings
        ));
        for label in &line.applied_discounts {
            lines.push(format!("    applied: {label}"));
        }
    }
    lines.push(format!(
        "total: {} {} (was {}, saved {})",
        report.charge_total, report.currency, report.totals.original_total, report.totals.total_savings
    ));
    if report.catalog_warnings > 0 {
        lines.push(format!("{} catalog warning(s) logged", report.catalog_warnings));
    }
    lines.join("\n")
}
