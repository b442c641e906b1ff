use resource_table::TableKind;

use crate::{report::format_table, Table, MAX_ENTRIES, PAGE_SIZE};

#[derive(Debug, PartialEq)]
pub enum MetaCommandError {
    UnrecognizedCommand,
    InvalidArgument(String),
}

pub enum MetaCommandResult {
    Exit,
    Output(String),
}

pub const HELP: &str = "\
load <id> <size>   bind a fresh block to an entry
release <id>       free the entry's block
swap-out <id>      move the entry to the swap area
swap-in <id>       bring the entry back from the swap area
discard <id>       free the entry's swap copy
fill <id> <byte>   fill the resident block with a byte
.use paging|segmentation|swapping [entries]
.tables            show the current table
.help              show this text
.exit              leave";

fn parse_kind(name: &str) -> Result<TableKind, MetaCommandError> {
    match name {
        "paging" => Ok(TableKind::Paging {
            page_size: PAGE_SIZE,
        }),
        "segmentation" => Ok(TableKind::Segmentation),
        "swapping" => Ok(TableKind::Swapping),
        other => Err(MetaCommandError::InvalidArgument(other.to_string())),
    }
}

pub fn handle_meta_command(
    input: &str,
    table: &mut Table,
) -> Result<MetaCommandResult, MetaCommandError> {
    let mut words = input.split_whitespace();
    match words.next() {
        Some(".exit") => Ok(MetaCommandResult::Exit),
        Some(".help") => Ok(MetaCommandResult::Output(HELP.to_string())),
        Some(".tables") => Ok(MetaCommandResult::Output(format_table(table))),
        Some(".use") => {
            let kind = parse_kind(words.next().unwrap_or_default())?;
            let capacity = match words.next() {
                Some(n) => n
                    .parse()
                    .map_err(|_| MetaCommandError::InvalidArgument(n.to_string()))?,
                None => table.capacity(),
            };
            if capacity > MAX_ENTRIES {
                return Err(MetaCommandError::InvalidArgument(format!(
                    "{} entries (at most {})",
                    capacity, MAX_ENTRIES
                )));
            }
            *table = Table::init(kind, capacity);
            Ok(MetaCommandResult::Output(format!(
                "using a {} table with {} entries",
                kind, capacity
            )))
        }
        _ => Err(MetaCommandError::UnrecognizedCommand),
    }
}
