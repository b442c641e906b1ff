use resource_table::ResourceTable;

pub mod meta_commands;
pub mod repl;
pub mod report;
pub mod scenarios;

pub const FRAME_SIZE: usize = 512;
pub const MEMORY_CAPACITY: usize = 512 * 64;
pub const SWAP_CAPACITY: usize = 512 * 32;

/// Page size of the paging demonstration.
pub const PAGE_SIZE: usize = 1024;
pub const NUM_PAGES: u32 = 4;
pub const NUM_SEGMENTS: u32 = 3;
pub const NUM_PROCESSES: u32 = 2;
/// Upper bound on the entries of a table built from user input.
pub const MAX_ENTRIES: u32 = 1024;

pub type Table = ResourceTable<FRAME_SIZE, MEMORY_CAPACITY, SWAP_CAPACITY>;
