//! Renders aggregated usage as the plain-text report and as terminal tables.

use crate::{
    grand_total,
    OrganizationTotals,
    UsageByOrganization,
    VmRecord,
    VpgInventory,
};
use chrono::NaiveDate;
use comfy_table::{
    presets,
    Attribute,
    Cell,
    Color,
    ContentArrangement,
    Table,
};
use std::{
    collections::BTreeMap,
    fmt,
};

/// Capacities above this many GB are shown in TB.
pub const TB_THRESHOLD_GB: f64 = 2000.0;

const GB_PER_TB: f64 = 1024.0;
const SEPARATOR: &str = "----------------------------------";

/// A memory or storage amount in the unit it is displayed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capacity {
    Gigabytes(f64),
    Terabytes(f64),
}

impl Capacity {
    /// Switches to TB strictly above [`TB_THRESHOLD_GB`].
    pub fn from_gb(gb: f64) -> Self {
        if gb > TB_THRESHOLD_GB {
            Capacity::Terabytes(gb / GB_PER_TB)
        } else {
            Capacity::Gigabytes(gb)
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Capacity::Gigabytes(_) => "GB",
            Capacity::Terabytes(_) => "TB",
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Gigabytes(value) => f.write_str(&format_decimal(*value, 2)),
            Capacity::Terabytes(value) => f.write_str(&format_decimal(*value, 3)),
        }
    }
}

/// Rounds to `precision` digits and drops trailing zeros, keeping at least one fractional digit: `160.0`, `12.35`.
pub fn format_decimal(value: f64, precision: usize) -> String {
    let rounded = format!("{value:.precision$}");
    match rounded.find('.') {
        Some(dot) => {
            let trimmed = rounded.trim_end_matches('0');
            if trimmed.len() == dot + 1 {
                format!("{trimmed}0")
            } else {
                trimmed.to_string()
            }
        }
        None => rounded,
    }
}

/// `<label> (GB): <value>` or `<label> (TB): <value>`.
pub fn capacity_line(label: &str, gb: f64) -> String {
    let capacity = Capacity::from_gb(gb);
    format!("{label} ({}): {capacity}", capacity.unit())
}

fn push_totals(report: &mut String, totals: &OrganizationTotals) {
    report.push_str(&format!("Total VMs: {}\n", totals.vms));
    report.push_str(&format!("Total vCPU: {}\n", totals.vcpus));
    report.push_str(&capacity_line("Total Provisioned Memory", totals.provisioned_memory_gb));
    report.push('\n');
    report.push_str(&capacity_line("Total Provisioned Storage", totals.provisioned_storage_gb));
    report.push('\n');
    report.push_str(&capacity_line("Total Used Storage", totals.used_storage_gb));
    report.push('\n');
    report.push_str(&format!("\n{SEPARATOR}\n\n"));
}

/// The email-style report: one section per organization in name order, then the grand total.
pub fn format_report(title: &str, usage: &UsageByOrganization) -> String {
    let mut report = format!("{title}\n\n");

    if usage.is_empty() {
        report.push_str("No organization has protected workloads.\n");
        return report;
    }

    for (organization, totals) in usage {
        report.push_str(&format!("Zorg Name: {organization}\n"));
        push_totals(&mut report, totals);
    }

    report.push_str("Grand Total\n");
    report.push_str(&format!("Total Zorgs: {}\n", usage.len()));
    push_totals(&mut report, &grand_total(usage));

    report
}

fn capacity_cell(gb: f64) -> Cell {
    let capacity = Capacity::from_gb(gb);
    Cell::new(format!("{capacity} {}", capacity.unit()))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

/// One row per organization with every metric, closed by a total row.
pub fn overview_table(usage: &UsageByOrganization) -> Table {
    let mut table = new_table(vec![
        "Zorg",
        "VMs",
        "vCPU",
        "CPU (MHz)",
        "Active Memory",
        "Consumed Memory",
        "Provisioned Memory",
        "Provisioned Storage",
        "Used Storage",
    ]);

    let row = |name: Cell, totals: &OrganizationTotals| {
        vec![
            name,
            Cell::new(totals.vms),
            Cell::new(totals.vcpus),
            Cell::new(format!("{:.0}", totals.cpu_used_mhz)),
            capacity_cell(totals.active_memory_gb),
            capacity_cell(totals.consumed_memory_gb),
            capacity_cell(totals.provisioned_memory_gb),
            capacity_cell(totals.provisioned_storage_gb),
            capacity_cell(totals.used_storage_gb),
        ]
    };

    for (organization, totals) in usage {
        table.add_row(row(Cell::new(organization), totals));
    }
    table.add_row(row(
        Cell::new("Total").add_attribute(Attribute::Bold),
        &grand_total(usage),
    ));
    table
}

/// The flattened per-VM rows, stamped with the report date.
pub fn vm_table(date: NaiveDate, vms: &[VmRecord]) -> Table {
    let mut table = new_table(vec![
        "Date",
        "Zorg",
        "VPG",
        "VM",
        "vCPUs",
        "CPU Used (MHz)",
        "Active Guest Memory (MB)",
        "Consumed Host Memory (MB)",
        "Total Memory (MB)",
        "Provisioned Storage (GB)",
        "Used Storage (GB)",
    ]);
    let date = date.format("%Y-%m-%d").to_string();
    for vm in vms {
        table.add_row(vec![
            Cell::new(&date),
            Cell::new(&vm.organization),
            Cell::new(&vm.vpg_name),
            Cell::new(&vm.vm_name),
            Cell::new(vm.vcpus),
            Cell::new(vm.cpu_used_mhz),
            Cell::new(vm.active_memory_mb),
            Cell::new(vm.consumed_memory_mb),
            Cell::new(vm.provisioned_memory_mb),
            Cell::new(vm.provisioned_storage_gb),
            Cell::new(vm.used_storage_gb),
        ]);
    }
    table
}

/// VPGs with their member VMs, one VM per line.
pub fn inventory_table(inventory: &[VpgInventory]) -> Table {
    let mut table = new_table(vec!["VPG", "VMs"]);
    for entry in inventory {
        table.add_row(vec![
            Cell::new(&entry.vpg_name).add_attribute(Attribute::Bold),
            Cell::new(entry.vm_names.join("\n")),
        ]);
    }
    table
}

/// Summed VPG throughput per protected site.
pub fn throughput_table(throughput: &BTreeMap<String, f64>) -> Table {
    let mut table = new_table(vec!["Site", "Throughput (MB)"]);
    for (site, mb) in throughput {
        table.add_row(vec![Cell::new(site), Cell::new(format_decimal(*mb, 2))]);
    }
    table
}
