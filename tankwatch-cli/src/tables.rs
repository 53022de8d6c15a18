use std::fmt::Display;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;
use tankwatch_quantities::Days;

use crate::{
    analytics::{ConsumptionProfile, Trend},
    fleet::{FleetReport, FleetSummary},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Right-aligned value, or a dimmed placeholder for a missing one.
fn optional_cell<T: Display>(value: Option<T>) -> Cell {
    value
        .map_or_else(|| Cell::new("n/a").add_attribute(Attribute::Dim), Cell::new)
        .set_alignment(CellAlignment::Right)
}

const fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Increasing => Color::Red,
        Trend::Decreasing => Color::Green,
        Trend::Stable => Color::Reset,
    }
}

fn days_remaining_cell(days_remaining: Option<Days>, alert_days: Days) -> Cell {
    let color = match days_remaining {
        Some(days) if days <= alert_days => Color::Red,
        Some(days) if days <= alert_days * 2.0 => Color::DarkYellow,
        Some(_) => Color::Green,
        None => Color::Reset,
    };
    optional_cell(days_remaining).fg(color)
}

pub fn build_rates_table(profile: &ConsumptionProfile) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Window", "Rate", "Litres", "Refills", "Readings"]);
    for rate in &profile.rates {
        table.add_row(vec![
            Cell::new(format!("{} d", rate.window_days)).add_attribute(Attribute::Dim),
            optional_cell(rate.percent_per_day),
            optional_cell(rate.litres_per_day),
            Cell::new(rate.refill_events_excluded)
                .set_alignment(CellAlignment::Right)
                .fg(if rate.refill_events_excluded == 0 { Color::Reset } else { Color::Cyan }),
            Cell::new(rate.n_readings)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_daily_table(profile: &ConsumptionProfile) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "", "Consumed", "Litres"]);
    for day in &profile.daily {
        table.add_row(vec![
            Cell::new(day.date.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(day.date.format("%a")),
            optional_cell(day.percent),
            optional_cell(day.litres),
        ]);
    }
    table
}

pub fn build_profile_table(profile: &ConsumptionProfile, alert_days: Days) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Level", "Volume", "Weekly", "Trend", "Days left", "Refill by"]);
    table.add_row(vec![
        optional_cell(profile.current_level),
        optional_cell(profile.current_litres),
        optional_cell(profile.weekly_total_litres()),
        Cell::new(profile.trend).fg(trend_color(profile.trend)),
        days_remaining_cell(profile.forecast.days_remaining, alert_days),
        optional_cell(profile.forecast.estimated_refill_date),
    ]);
    table
}

pub fn build_fleet_table(report: &FleetReport, alert_days: Days) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Asset", "Name", "Level", "Rate", "Litres", "Trend", "Days left"]);
    for entry in &report.entries {
        let mut row = vec![
            Cell::new(&entry.asset.id).add_attribute(Attribute::Dim),
            Cell::new(entry.asset.display_name()),
        ];
        match &entry.outcome {
            Ok(profile) => {
                let rate = profile.headline_rate();
                row.extend([
                    optional_cell(profile.current_level),
                    optional_cell(rate.and_then(|rate| rate.percent_per_day)),
                    optional_cell(rate.and_then(|rate| rate.litres_per_day)),
                    Cell::new(profile.trend).fg(trend_color(profile.trend)),
                    days_remaining_cell(profile.forecast.days_remaining, alert_days),
                ]);
            }
            Err(error) => {
                row.push(Cell::new(error).fg(Color::Red));
            }
        }
        table.add_row(row);
    }
    table
}

pub fn build_summary_table(summary: &FleetSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Assets", "Failed", "No data", "Total", "Alerts"]);
    table.add_row(vec![
        Cell::new(summary.n_assets).set_alignment(CellAlignment::Right),
        Cell::new(summary.n_failed)
            .set_alignment(CellAlignment::Right)
            .fg(if summary.n_failed == 0 { Color::Green } else { Color::Red }),
        Cell::new(summary.n_insufficient)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
        Cell::new(summary.total_litres_per_day).set_alignment(CellAlignment::Right),
        Cell::new(
            summary
                .alerts
                .iter()
                .map(|alert| format!("{} ({})", alert.asset.display_name(), alert.days_remaining))
                .join("\n"),
        )
        .fg(Color::Red),
    ]);
    table
}
