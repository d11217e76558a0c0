use std::collections::BTreeMap;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use ordered_float::OrderedFloat;

use crate::{
    api::{Batch, models::User},
    core::{DailyBucket, MeterGroup, MonthlyBucket},
    quantity::volume::CubicMeters,
};

const BAR_WIDTH: usize = 30;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Per-meter readings with usage and cost totals. Deltas above the
/// highlight threshold are rendered red, as in the mobile client.
pub fn build_meter_groups_table(
    groups: &BTreeMap<String, MeterGroup>,
    batch: &Batch,
    highlight_threshold: CubicMeters,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Meter", "Name", "Address", "Time", "Register", "Δ", "Total", "Cost"]);
    for group in groups.values() {
        let info = batch.info_for(&group.meter_id);
        let name = info.and_then(|info| info.name.as_deref()).unwrap_or("—");
        let address = info.and_then(|info| info.address.as_deref()).unwrap_or("—");
        for record in &group.records {
            let usage_cell = match record.usage {
                Some(usage) if usage > highlight_threshold => {
                    Cell::new(usage).set_alignment(CellAlignment::Right).fg(Color::Red)
                }
                Some(usage) => Cell::new(usage).set_alignment(CellAlignment::Right),
                None => Cell::new("—").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            };
            table.add_row(vec![
                Cell::new(&group.meter_id),
                Cell::new(name),
                Cell::new(address),
                Cell::new(record.reading.timestamp.format("%d.%m %H:%M")),
                Cell::new(record.reading.cumulative).set_alignment(CellAlignment::Right),
                usage_cell,
                Cell::new(group.total_usage).set_alignment(CellAlignment::Right),
                Cell::new(group.total_cost).set_alignment(CellAlignment::Right),
            ]);
        }
    }
    table
}

/// Daily consumption chart: one bar per calendar day, scaled to the
/// busiest day, with an average/total footer.
pub fn build_daily_chart_table(buckets: &[DailyBucket]) -> Table {
    chart_table(
        buckets
            .iter()
            .map(|bucket| (bucket.date.format("%a %d.%m").to_string(), bucket.value))
            .collect(),
    )
}

/// The coarser variant: one bar per calendar month.
pub fn build_monthly_chart_table(buckets: &[MonthlyBucket]) -> Table {
    chart_table(
        buckets
            .iter()
            .map(|bucket| (bucket.month.format("%m.%Y").to_string(), bucket.value))
            .collect(),
    )
}

fn chart_table(rows: Vec<(String, CubicMeters)>) -> Table {
    let total = rows.iter().map(|(_, value)| *value).sum::<CubicMeters>();
    #[allow(clippy::cast_precision_loss)]
    let average = (!rows.is_empty()).then(|| total / rows.len() as f64);
    let max = rows
        .iter()
        .map(|(_, value)| *value)
        .max_by_key(|value| OrderedFloat(value.0))
        .unwrap_or(CubicMeters::ZERO);

    let mut table = new_table();
    table.set_header(vec!["Date", "Volume", ""]);
    for (label, value) in rows {
        let above_average = average.is_some_and(|average| value > average);
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
            Cell::new(bar(value, max)).fg(if above_average {
                Color::Blue
            } else {
                Color::DarkBlue
            }),
        ]);
    }
    if let Some(average) = average {
        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(total).set_alignment(CellAlignment::Right),
            Cell::new(format!("average {average}")).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_users_table(users: &[User]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Name", "Email", "Job title", "Phone", "Company"]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.name.as_deref().unwrap_or("—")),
            Cell::new(user.email.as_deref().unwrap_or("—")),
            Cell::new(user.job_title.as_deref().unwrap_or("—")),
            Cell::new(user.phone_number.as_deref().unwrap_or("—")),
            Cell::new(user.company_title.as_deref().unwrap_or("—")),
        ]);
    }
    table
}

fn bar(value: CubicMeters, max: CubicMeters) -> String {
    if max <= CubicMeters::ZERO {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let length = ((value.0 / max.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(length.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(CubicMeters::from(5.0), CubicMeters::from(10.0)).chars().count(), 15);
        assert_eq!(bar(CubicMeters::from(10.0), CubicMeters::from(10.0)).chars().count(), 30);
        assert_eq!(bar(CubicMeters::from(0.0), CubicMeters::from(10.0)), "");
        assert_eq!(bar(CubicMeters::from(1.0), CubicMeters::ZERO), "");
    }
}
