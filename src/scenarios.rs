//! The classic demonstrations: paged memory, segmented memory and swapping.
use log::info;
use resource_table::TableKind;

use crate::{
    report::{log_usage, report},
    Table, NUM_PAGES, NUM_PROCESSES, NUM_SEGMENTS, PAGE_SIZE,
};

/// Size of the swapped process.
const PROCESS_SIZE: usize = 1024;
const PROCESS_ID: u32 = 1;
const PATTERN: u8 = 0xAA;

fn access(table: &Table, id: u32, what: &str) {
    if let Ok(entry) = table.entry(id) {
        if let Some(address) = entry.primary() {
            info!("Accessing {} {} at {}", what, id, address);
        }
    }
}

/// Loads pages 0 and 1, touches them and releases them again.
pub fn paging() -> Table {
    let kind = TableKind::Paging {
        page_size: PAGE_SIZE,
    };
    let mut table = Table::init(kind, NUM_PAGES);
    for id in 0..2 {
        report(kind, id, "load", table.load(id, PAGE_SIZE));
    }
    access(&table, 0, "page");
    access(&table, 1, "page");
    for id in 0..2 {
        report(kind, id, "release", table.release(id));
    }
    table
}

/// Code, data and stack segments of different sizes.
pub fn segmentation() -> Table {
    let kind = TableKind::Segmentation;
    let mut table = Table::init(kind, NUM_SEGMENTS);
    let segments = [(0, 1024, "code"), (1, 2048, "data"), (2, 512, "stack")];
    for (id, size, _) in segments {
        report(kind, id, "load", table.load(id, size));
    }
    for (id, _, name) in &segments[..2] {
        access(&table, *id, &format!("{} segment", name));
    }
    for (id, _, _) in segments {
        report(kind, id, "release", table.release(id));
    }
    table
}

/// Moves one process out to the swap area and back, checking its contents survive.
///
/// Returns the table and whether the contents came back intact.
pub fn swapping() -> (Table, bool) {
    let kind = TableKind::Swapping;
    let mut table = Table::init(kind, NUM_PROCESSES);
    let id = PROCESS_ID;
    if report(kind, id, "load", table.load(id, PROCESS_SIZE)).is_none() {
        return (table, false);
    }
    report(kind, id, "fill", table.fill(id, PATTERN));
    access(&table, id, "process");
    report(kind, id, "swap out", table.swap_out(id));
    let intact = match report(kind, id, "swap in", table.swap_in(id)) {
        Some(_) => table
            .read(id)
            .map(|bytes| bytes.iter().all(|b| *b == PATTERN))
            .unwrap_or(false),
        None => false,
    };
    info!("Process {} contents intact after swap: {}", id, intact);
    report(kind, id, "release", table.release(id));
    report(kind, id, "discard", table.discard(id));
    (table, intact)
}

pub fn run_all() {
    println!("---- Paging ----");
    log_usage(&paging());
    println!("---- Segmentation ----");
    log_usage(&segmentation());
    println!("---- Swapping ----");
    log_usage(&swapping().0);
    println!("---- Done ----");
}
