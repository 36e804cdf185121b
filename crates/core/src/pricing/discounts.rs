use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingLine;
use crate::domain::service::{DiscountConfig, GroupDiscountTier, TimeslotWindow};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Overall,
    FreeHours,
    Group,
    Timeslot,
}

/// One discount rule that fired, with the amount it contributed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub kind: DiscountKind,
    pub label: String,
    pub amount: Decimal,
}

/// Price of a single booking line. Invariants: `final_price ≥ 0`,
/// `savings ≥ 0`, and `original_price = final_price + savings` exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub original_price: Decimal,
    pub final_price: Decimal,
    pub savings: Decimal,
    /// Rules that contributed a non-zero amount, in evaluation order:
    /// overall, free-hour, group, timeslot.
    pub applied: Vec<AppliedDiscount>,
}

impl PricingResult {
    /// All-zero result, used when the selection is still incomplete.
    pub fn zero() -> Self {
        Self::full_price(Decimal::ZERO)
    }

    pub fn full_price(original_price: Decimal) -> Self {
        Self {
            original_price,
            final_price: original_price,
            savings: Decimal::ZERO,
            applied: Vec::new(),
        }
    }

    pub fn applied_labels(&self) -> Vec<&str> {
        self.applied.iter().map(|discount| discount.label.as_str()).collect()
    }

    /// Label → contributed amount. Contributions are pre-clamp: when the
    /// summed amounts exceed the original price, `savings` is capped but the
    /// breakdown keeps each rule's own amount.
    pub fn breakdown(&self) -> BTreeMap<String, Decimal> {
        self.applied
            .iter()
            .map(|discount| (discount.label.clone(), discount.amount))
            .collect()
    }
}

pub trait DiscountEngine: Send + Sync {
    fn evaluate(
        &self,
        config: &DiscountConfig,
        line: &BookingLine,
        base_hourly_rate: Decimal,
    ) -> PricingResult;
}

#[derive(Default)]
pub struct DeterministicDiscountEngine;

impl DiscountEngine for DeterministicDiscountEngine {
    fn evaluate(
        &self,
        config: &DiscountConfig,
        line: &BookingLine,
        base_hourly_rate: Decimal,
    ) -> PricingResult {
        evaluate_line(config, line, base_hourly_rate)
    }
}

/// Evaluates every configured discount against one booking line.
///
/// Each rule is computed independently as an amount off the *original*
/// price and the amounts are summed, then clamped so the final price cannot
/// go negative. Discounts are additive, never compounded on an
/// already-discounted amount: stacking a 10% and a 20% rule on 200 saves
/// 60, not 56.
///
/// A non-positive duration yields an all-zero result instead of an error so
/// that live price previews survive half-edited time selections; callers
/// treat it as "selection incomplete", not as a free booking.
pub fn evaluate_line(
    config: &DiscountConfig,
    line: &BookingLine,
    base_hourly_rate: Decimal,
) -> PricingResult {
    let duration = line.duration_hours();
    if duration <= Decimal::ZERO {
        return PricingResult::zero();
    }

    let original_price = base_hourly_rate * duration;
    let mut applied = Vec::new();

    let overall = config.overall_discount_percent;
    if overall > Decimal::ZERO {
        push_applied(
            &mut applied,
            DiscountKind::Overall,
            format!("{}% off every booking", overall.normalize()),
            percent_of(original_price, overall),
        );
    }

    if let Some(rule) = config.free_hours {
        if rule.threshold_hours > 0 && duration >= Decimal::from(rule.threshold_hours) {
            let free = Decimal::from(rule.free_hours).min(duration);
            push_applied(
                &mut applied,
                DiscountKind::FreeHours,
                format!(
                    "{} free {} for bookings of {}+ hours",
                    rule.free_hours,
                    if rule.free_hours == 1 { "hour" } else { "hours" },
                    rule.threshold_hours
                ),
                base_hourly_rate * free,
            );
        }
    }

    if let Some(tier) = best_group_tier(&config.group_tiers, line.guest_count) {
        push_applied(
            &mut applied,
            DiscountKind::Group,
            format!(
                "{}% off for groups of {}+",
                tier.discount_percent.normalize(),
                tier.min_guests
            ),
            percent_of(original_price, tier.discount_percent),
        );
    }

    if let Some(window) = first_matching_window(&config.timeslot_windows, line) {
        push_applied(
            &mut applied,
            DiscountKind::Timeslot,
            format!(
                "{}% off between {} and {}",
                window.discount_percent.normalize(),
                window.start.format("%H:%M"),
                window.end.format("%H:%M")
            ),
            percent_of(original_price, window.discount_percent),
        );
    }

    let requested: Decimal = applied.iter().map(|discount| discount.amount).sum();
    let savings = requested.min(original_price);

    PricingResult { original_price, final_price: original_price - savings, savings, applied }
}

/// The single most specific qualifying tier: largest `min_guests` that the
/// party still satisfies. Smaller tiers do not stack on top of it.
fn best_group_tier(tiers: &[GroupDiscountTier], guest_count: u32) -> Option<&GroupDiscountTier> {
    tiers
        .iter()
        .filter(|tier| guest_count >= tier.min_guests)
        .max_by_key(|tier| tier.min_guests)
}

/// First window (declaration order) containing the arrival time.
fn first_matching_window<'a>(
    windows: &'a [TimeslotWindow],
    line: &BookingLine,
) -> Option<&'a TimeslotWindow> {
    windows.iter().find(|window| window.contains(line.arrival))
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

fn push_applied(
    applied: &mut Vec<AppliedDiscount>,
    kind: DiscountKind,
    label: String,
    amount: Decimal,
) {
    if amount > Decimal::ZERO {
        applied.push(AppliedDiscount { kind, label, amount });
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use crate::domain::booking::BookingLine;
    use crate::domain::service::{
        DiscountConfig, FreeHourRule, GroupDiscountTier, ServiceId, TimeslotWindow,
    };

    use super::{evaluate_line, DiscountKind};

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid wall-clock time")
    }

    fn line(guest_count: u32, arrival: NaiveTime, departure: NaiveTime) -> BookingLine {
        BookingLine {
            service_id: ServiceId("svc-pc-gaming".to_owned()),
            guest_count,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"),
            arrival,
            departure,
        }
    }

    fn three_hours(guest_count: u32) -> BookingLine {
        line(guest_count, time(12, 0), time(15, 0))
    }

    #[test]
    fn no_discounts_charges_full_price() {
        // Scenario: 50 GEL/hr for 3 hours, nothing configured.
        let result = evaluate_line(&DiscountConfig::default(), &three_hours(2), Decimal::from(50));

        assert_eq!(result.original_price, Decimal::from(150));
        assert_eq!(result.final_price, Decimal::from(150));
        assert_eq!(result.savings, Decimal::ZERO);
        assert!(result.applied.is_empty());
    }

    #[test]
    fn overall_discount_applies_unconditionally() {
        // Scenario: 50 GEL/hr for 4 hours with 10% off everything.
        let config = DiscountConfig {
            overall_discount_percent: Decimal::from(10),
            ..DiscountConfig::default()
        };
        let result =
            evaluate_line(&config, &line(2, time(12, 0), time(16, 0)), Decimal::from(50));

        assert_eq!(result.original_price, Decimal::from(200));
        assert_eq!(result.savings, Decimal::from(20));
        assert_eq!(result.final_price, Decimal::from(180));
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].kind, DiscountKind::Overall);
    }

    #[test]
    fn free_hours_charge_only_the_billable_remainder() {
        // Scenario: 40 GEL/hr for 5 hours, book 4 get 1 free.
        let config = DiscountConfig {
            free_hours: Some(FreeHourRule { threshold_hours: 4, free_hours: 1 }),
            ..DiscountConfig::default()
        };
        let result =
            evaluate_line(&config, &line(2, time(12, 0), time(17, 0)), Decimal::from(40));

        assert_eq!(result.original_price, Decimal::from(200));
        assert_eq!(result.savings, Decimal::from(40));
        assert_eq!(result.final_price, Decimal::from(160));
    }

    #[test]
    fn free_hour_threshold_is_inclusive() {
        // Exactly at the threshold still qualifies: 3h booked, 1 free -> 2 billable.
        let config = DiscountConfig {
            free_hours: Some(FreeHourRule { threshold_hours: 3, free_hours: 1 }),
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &three_hours(2), Decimal::from(50));

        assert_eq!(result.final_price, Decimal::from(100));

        let below = evaluate_line(
            &config,
            &line(2, time(12, 0), time(14, 59)),
            Decimal::from(50),
        );
        assert!(below.applied.is_empty(), "below the threshold no hours are free");
    }

    #[test]
    fn free_hours_never_exceed_the_booked_duration() {
        let config = DiscountConfig {
            free_hours: Some(FreeHourRule { threshold_hours: 2, free_hours: 5 }),
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &three_hours(2), Decimal::from(50));

        assert_eq!(result.savings, Decimal::from(150), "at most the whole booking is free");
        assert_eq!(result.final_price, Decimal::ZERO);
    }

    #[test]
    fn largest_qualifying_group_tier_wins_alone() {
        let config = DiscountConfig {
            group_tiers: vec![
                GroupDiscountTier { min_guests: 3, discount_percent: Decimal::from(10) },
                GroupDiscountTier { min_guests: 6, discount_percent: Decimal::from(20) },
            ],
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &three_hours(7), Decimal::from(50));

        // 20% of 150, not 30%.
        assert_eq!(result.savings, Decimal::from(30));
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].kind, DiscountKind::Group);

        let smaller_party = evaluate_line(&config, &three_hours(4), Decimal::from(50));
        assert_eq!(smaller_party.savings, Decimal::new(15, 0));
    }

    #[test]
    fn timeslot_window_end_is_exclusive() {
        let config = DiscountConfig {
            timeslot_windows: vec![TimeslotWindow {
                start: time(11, 0),
                end: time(16, 0),
                discount_percent: Decimal::from(15),
            }],
            ..DiscountConfig::default()
        };

        let at_end = evaluate_line(&config, &line(2, time(16, 0), time(18, 0)), Decimal::from(50));
        assert!(at_end.applied.is_empty(), "arrival at the window end does not qualify");

        let before_end =
            evaluate_line(&config, &line(2, time(15, 59), time(18, 0)), Decimal::from(50));
        assert_eq!(before_end.applied.len(), 1);
        assert_eq!(before_end.applied[0].kind, DiscountKind::Timeslot);
    }

    #[test]
    fn overlapping_windows_resolve_by_declaration_order() {
        let config = DiscountConfig {
            timeslot_windows: vec![
                TimeslotWindow {
                    start: time(10, 0),
                    end: time(14, 0),
                    discount_percent: Decimal::from(5),
                },
                TimeslotWindow {
                    start: time(12, 0),
                    end: time(18, 0),
                    discount_percent: Decimal::from(25),
                },
            ],
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &line(2, time(13, 0), time(15, 0)), Decimal::from(50));

        // First declared window wins even though both contain 13:00.
        assert_eq!(result.savings, Decimal::from(5));
    }

    #[test]
    fn discounts_stack_additively_on_the_original_price() {
        // 10% overall + 20% group on 200 saves 60; compounding would save 56.
        let config = DiscountConfig {
            overall_discount_percent: Decimal::from(10),
            group_tiers: vec![GroupDiscountTier {
                min_guests: 6,
                discount_percent: Decimal::from(20),
            }],
            ..DiscountConfig::default()
        };
        let result =
            evaluate_line(&config, &line(6, time(12, 0), time(16, 0)), Decimal::from(50));

        assert_eq!(result.original_price, Decimal::from(200));
        assert_eq!(result.savings, Decimal::from(60));
        assert_eq!(result.final_price, Decimal::from(140));
        assert_eq!(
            result.applied.iter().map(|d| d.kind).collect::<Vec<_>>(),
            vec![DiscountKind::Overall, DiscountKind::Group]
        );
    }

    #[test]
    fn savings_clamp_at_the_original_price() {
        let config = DiscountConfig {
            overall_discount_percent: Decimal::from(80),
            free_hours: Some(FreeHourRule { threshold_hours: 2, free_hours: 2 }),
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &three_hours(2), Decimal::from(50));

        // 80% of 150 plus 2 free hours would exceed the booking itself.
        assert_eq!(result.savings, result.original_price);
        assert_eq!(result.final_price, Decimal::ZERO);
    }

    #[test]
    fn non_positive_duration_yields_a_zero_result() {
        let config = DiscountConfig {
            overall_discount_percent: Decimal::from(10),
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &line(2, time(15, 0), time(13, 0)), Decimal::from(50));

        assert_eq!(result.original_price, Decimal::ZERO);
        assert_eq!(result.final_price, Decimal::ZERO);
        assert_eq!(result.savings, Decimal::ZERO);
        assert!(result.applied.is_empty());
    }

    #[test]
    fn evaluation_is_idempotent_and_exactly_additive() {
        let config = DiscountConfig {
            overall_discount_percent: Decimal::from(7),
            free_hours: Some(FreeHourRule { threshold_hours: 2, free_hours: 1 }),
            group_tiers: vec![GroupDiscountTier {
                min_guests: 4,
                discount_percent: Decimal::from(12),
            }],
            timeslot_windows: vec![TimeslotWindow {
                start: time(11, 0),
                end: time(16, 0),
                discount_percent: Decimal::from(9),
            }],
            ..DiscountConfig::default()
        };
        let booking = line(5, time(12, 30), time(15, 0));

        let first = evaluate_line(&config, &booking, Decimal::new(455, 1));
        let second = evaluate_line(&config, &booking, Decimal::new(455, 1));

        assert_eq!(first, second);
        assert_eq!(first.original_price, first.final_price + first.savings);
        assert!(first.final_price >= Decimal::ZERO);
        assert!(first.savings >= Decimal::ZERO);
        assert!(first.final_price <= first.original_price);
    }

    #[test]
    fn breakdown_maps_every_applied_label_to_its_amount() {
        let config = DiscountConfig {
            overall_discount_percent: Decimal::from(10),
            group_tiers: vec![GroupDiscountTier {
                min_guests: 4,
                discount_percent: Decimal::from(20),
            }],
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &three_hours(4), Decimal::from(50));

        let breakdown = result.breakdown();
        assert_eq!(breakdown.len(), result.applied.len());
        for discount in &result.applied {
            assert_eq!(breakdown.get(&discount.label), Some(&discount.amount));
        }
        assert_eq!(result.applied_labels().len(), 2);
    }

    #[test]
    fn zero_percent_rules_do_not_appear_as_applied() {
        let config = DiscountConfig {
            overall_discount_percent: Decimal::ZERO,
            group_tiers: vec![GroupDiscountTier {
                min_guests: 2,
                discount_percent: Decimal::ZERO,
            }],
            ..DiscountConfig::default()
        };
        let result = evaluate_line(&config, &three_hours(4), Decimal::from(50));

        assert!(result.applied.is_empty());
        assert_eq!(result.final_price, result.original_price);
    }
}
