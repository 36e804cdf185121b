use std::fs;
use std::path::PathBuf;

use bookly_cli::commands::{quote, validate};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, contents: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(contents).expect("serialize fixture"))
        .expect("write fixture");
    path
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|error| {
        panic!("expected JSON output but got error {error}: {output}");
    })
}

#[test]
fn quote_prices_a_booking_from_fixture_files() {
    let dir = TempDir::new().expect("tempdir");
    let services = write_fixture(
        &dir,
        "services.json",
        &json!([{
            "id": "svc-pc-gaming",
            "name": "PC Gaming",
            "price_per_hour": 50,
            "overall_discount_percent": 10
        }]),
    );
    let booking = write_fixture(
        &dir,
        "booking.json",
        &json!([{
            "service_id": "svc-pc-gaming",
            "guest_count": 2,
            "date": "2026-03-14",
            "arrival": "12:00",
            "departure": "16:00"
        }]),
    );

    let result = quote::run(&services, &booking, true);
    assert_eq!(result.exit_code, 0, "quote should succeed: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["totals"]["original_total"], "200");
    assert_eq!(payload["totals"]["discounted_total"], "180");
    assert_eq!(payload["charge_total"], "180");
    assert_eq!(payload["lines"][0]["applied_discounts"].as_array().map(Vec::len), Some(1));
}

#[test]
fn quote_renders_a_text_summary_by_default() {
    let dir = TempDir::new().expect("tempdir");
    let services = write_fixture(
        &dir,
        "services.json",
        &json!([{"id": "svc-billiards", "name": "Billiards", "price_per_hour": 30}]),
    );
    let booking = write_fixture(
        &dir,
        "booking.json",
        &json!([{
            "service_id": "svc-billiards",
            "guest_count": 4,
            "date": "2026-03-14",
            "arrival": "18:00",
            "departure": "20:00"
        }]),
    );

    let result = quote::run(&services, &booking, false);
    assert_eq!(result.exit_code, 0, "quote should succeed: {}", result.output);
    assert!(result.output.contains("quote for 1 line(s):"));
    assert!(result.output.contains("total:"));
}

#[test]
fn quote_fails_cleanly_when_the_booking_file_is_missing() {
    let dir = TempDir::new().expect("tempdir");
    let services = write_fixture(
        &dir,
        "services.json",
        &json!([{"id": "svc-billiards", "name": "Billiards", "price_per_hour": 30}]),
    );

    let result = quote::run(&services, &dir.path().join("absent.json"), false);
    assert_eq!(result.exit_code, 1);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "quote");
    assert_eq!(payload["status"], "error");
}

#[test]
fn quote_fails_on_a_booking_for_an_unknown_service() {
    let dir = TempDir::new().expect("tempdir");
    let services = write_fixture(
        &dir,
        "services.json",
        &json!([{"id": "svc-billiards", "name": "Billiards", "price_per_hour": 30}]),
    );
    let booking = write_fixture(
        &dir,
        "booking.json",
        &json!([{
            "service_id": "svc-darts",
            "guest_count": 2,
            "date": "2026-03-14",
            "arrival": "18:00",
            "departure": "20:00"
        }]),
    );

    let result = quote::run(&services, &booking, false);
    assert_eq!(result.exit_code, 1);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert!(
        payload["message"].as_str().is_some_and(|message| message.contains("svc-darts")),
        "error should name the unknown service: {}",
        result.output
    );
}

#[test]
fn validate_reports_degraded_rules_without_failing() {
    let dir = TempDir::new().expect("tempdir");
    let services = write_fixture(
        &dir,
        "services.json",
        &json!([{
            "id": "svc-pc-gaming",
            "name": "PC Gaming",
            "price_per_hour": 25,
            "group_discounts": [
                {"min_guests": 6, "discount_percent": 20},
                {"min_guests": 0, "discount_percent": 50}
            ],
            "timeslot_discounts": [
                {"start": "10:00", "end": "14:00", "discount_percent": 5},
                {"start": "12:00", "end": "18:00", "discount_percent": 25}
            ]
        }]),
    );

    let result = validate::run(&services, true);
    assert_eq!(result.exit_code, 0, "degraded rules must not fail validation: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["services"].as_array().map(Vec::len), Some(1));

    let warnings = payload["warnings"].as_array().expect("warnings array");
    let codes: Vec<&str> =
        warnings.iter().filter_map(|warning| warning["code"].as_str()).collect();
    assert!(codes.contains(&"MALFORMED_GROUP_TIER"), "codes: {codes:?}");
    assert!(codes.contains(&"OVERLAPPING_TIMESLOT_WINDOWS"), "codes: {codes:?}");
}

#[test]
fn validate_accepts_a_single_record_export() {
    let dir = TempDir::new().expect("tempdir");
    let services = write_fixture(
        &dir,
        "service.json",
        &json!({"id": "svc-billiards", "name": "Billiards", "price_per_hour": 30}),
    );

    let result = validate::run(&services, true);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["services"][0]["id"], "svc-billiards");
}
