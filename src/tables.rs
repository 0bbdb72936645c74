use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{record::HourRecord, system::Summary, window::WindowKind},
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn price_cell(price: KilowattHourRate) -> Cell {
    Cell::new(price).set_alignment(CellAlignment::Right).fg(if price.is_non_negative() {
        Color::Reset
    } else {
        Color::Green
    })
}

fn balance_cell(balance: KilowattHours) -> Cell {
    Cell::new(balance).set_alignment(CellAlignment::Right).fg(if balance.is_positive() {
        Color::Green
    } else if balance.is_negative() {
        Color::Red
    } else {
        Color::Reset
    })
}

fn cost_cell(cost: Cost) -> Cell {
    Cell::new(cost).set_alignment(CellAlignment::Right).fg(if cost >= Cost::ONE_CENT {
        Color::Red
    } else if cost <= -Cost::ONE_CENT {
        Color::Green
    } else {
        Color::Reset
    })
}

/// One window: forecast balances next to the planned ones and the resulting levels.
pub fn build_plan_table(
    kind: WindowKind,
    prices: &[KilowattHourRate],
    balances: &[KilowattHours],
    plan: &[KilowattHours],
    levels: &[KilowattHours],
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Window", "Hour", "Price", "Forecast", "Plan", "Level"]);
    for (index, (((price, balance), planned), level)) in
        prices.iter().zip(balances).zip(plan).zip(levels).enumerate()
    {
        table.add_row(vec![
            Cell::new(kind).fg(kind.color()),
            Cell::new(index).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            price_cell(*price),
            Cell::new(balance).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            balance_cell(*planned),
            Cell::new(level).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_records_table(records: &[HourRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Time",
        "Price",
        "Consumption",
        "Production",
        "Level",
        "Cost",
        "Total",
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.time.format("%b %d %H:%M")),
            price_cell(record.price),
            Cell::new(record.consumption).set_alignment(CellAlignment::Right),
            Cell::new(record.production).set_alignment(CellAlignment::Right),
            Cell::new(record.storage_level).set_alignment(CellAlignment::Right),
            cost_cell(record.cost),
            Cell::new(record.cumulative_cost)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_summary_table(summaries: &[Summary]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["System", "Hours", "Total cost", "Final level"]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(summary.kind).fg(summary.kind.color()),
            Cell::new(summary.n_hours).set_alignment(CellAlignment::Right),
            cost_cell(summary.total_cost),
            Cell::new(summary.final_level).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
