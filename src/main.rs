use std::{env, io, process::ExitCode};

use env_logger::{Builder, Env};
use log::error;
use memsim::{repl::REPL, scenarios, Table, NUM_PAGES, PAGE_SIZE};
use resource_table::TableKind;

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_module_path(false)
        .init();

    match env::args().nth(1).as_deref() {
        None => {
            scenarios::run_all();
            ExitCode::SUCCESS
        }
        Some("repl") => {
            let mut table = Table::init(
                TableKind::Paging {
                    page_size: PAGE_SIZE,
                },
                NUM_PAGES,
            );
            let stdin = io::stdin();
            let mut repl = REPL::new(stdin.lock());
            match repl.run(&mut table, &mut io::stdout()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!("Cannot read commands: {}", err);
                    ExitCode::FAILURE
                }
            }
        }
        Some(other) => {
            eprintln!("Usage: memsim [repl] (unknown argument '{}')", other);
            ExitCode::FAILURE
        }
    }
}
