pub mod config;
pub mod quote;
pub mod validate;

use std::fs;
use std::path::Path;

use anyhow::Context;
use bookly_core::{parse_service_record, parse_service_records, CatalogWarning, ServiceConfig};
use serde::Serialize;
use serde_json::Value;

/// Loads a `venue_services` export: either a full array dump or a single
/// record.
pub(crate) fn load_services(
    path: &Path,
) -> anyhow::Result<(Vec<ServiceConfig>, Vec<CatalogWarning>)> {
    let raw = read_json(path)?;
    if raw.is_array() {
        Ok(parse_service_records(&raw))
    } else {
        let parsed = parse_service_record(&raw)
            .with_context(|| format!("unusable service record in {}", path.display()))?;
        Ok((vec![parsed.service], parsed.warnings))
    }
}

pub(crate) fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing JSON in {}", path.display()))
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
