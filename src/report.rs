use std::fmt::Write;

use log::{info, warn};
use resource_table::{ResourceError, Residency, TableKind};

use crate::Table;

/// Logs a failed step and hands back the value of a successful one.
pub fn report<T>(
    kind: TableKind,
    id: u32,
    action: &str,
    result: Result<T, ResourceError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{} {}: {} skipped: {}", kind.noun(), id, action, err);
            None
        }
    }
}

/// One line per memory: total, available and percent used.
pub fn format_usage(table: &Table) -> String {
    let mut out = format!("memory: {}", table.memory_usage());
    if let Some(swap) = table.swap_usage() {
        let _ = write!(out, "\nswap area: {}", swap);
    }
    out
}

pub fn log_usage(table: &Table) {
    for line in format_usage(table).lines() {
        info!("{}", line);
    }
}

/// Renders every entry of the table, one per line.
pub fn format_table(table: &Table) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} table, {} entries", table.kind(), table.capacity());
    for entry in table.iter() {
        let state = match entry.residency() {
            Residency::Empty => "empty",
            Residency::Resident => "resident",
            Residency::Swapped => "swapped",
            Residency::ResidentWithSwapCopy => "resident+swap",
        };
        let primary = entry.primary().map(|a| a.to_string());
        let secondary = entry.secondary().map(|a| a.to_string());
        let _ = writeln!(
            out,
            "{:>4} {:<14} {:>6} {:<24} {}",
            entry.id(),
            state,
            entry.size(),
            primary.as_deref().unwrap_or("-"),
            secondary.as_deref().unwrap_or("-"),
        );
    }
    let _ = writeln!(out, "{}", format_usage(table));
    out
}
