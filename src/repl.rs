use std::io::{self, BufRead, Write};

use log::warn;
use resource_table::ResourceError;

use crate::{
    meta_commands::{handle_meta_command, MetaCommandError, MetaCommandResult},
    Table,
};

#[derive(Debug, PartialEq)]
pub enum Command {
    Load { id: u32, size: usize },
    Release(u32),
    SwapOut(u32),
    SwapIn(u32),
    Discard(u32),
    Fill { id: u32, byte: u8 },
}

#[derive(Debug, PartialEq)]
pub enum CommandError {
    UnrecognizedCommand(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
}

fn number<T: std::str::FromStr>(
    word: Option<&str>,
    name: &'static str,
) -> Result<T, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(name))?;
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

fn byte(word: Option<&str>) -> Result<u8, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument("byte"))?;
    let parsed = match word.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => word.parse(),
    };
    parsed.map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

impl Command {
    pub fn parse(input: &str) -> Result<Command, CommandError> {
        let mut words = input.split_whitespace();
        let name = words.next().unwrap_or_default();
        let command = match name {
            "load" => Command::Load {
                id: number(words.next(), "id")?,
                size: number(words.next(), "size")?,
            },
            "release" => Command::Release(number(words.next(), "id")?),
            "swap-out" => Command::SwapOut(number(words.next(), "id")?),
            "swap-in" => Command::SwapIn(number(words.next(), "id")?),
            "discard" => Command::Discard(number(words.next(), "id")?),
            "fill" => Command::Fill {
                id: number(words.next(), "id")?,
                byte: byte(words.next())?,
            },
            other => return Err(CommandError::UnrecognizedCommand(other.to_string())),
        };
        Ok(command)
    }

    /// Runs the command against the table and describes the outcome.
    pub fn execute(&self, table: &mut Table) -> Result<String, ResourceError> {
        let noun = table.kind().noun();
        let line = match *self {
            Command::Load { id, size } => {
                let address = table.load(id, size)?;
                format!("{} {} loaded at {}", noun, id, address)
            }
            Command::Release(id) => {
                table.release(id)?;
                format!("{} {} released", noun, id)
            }
            Command::SwapOut(id) => {
                table.swap_out(id)?;
                format!("{} {} moved to the swap area", noun, id)
            }
            Command::SwapIn(id) => {
                let address = table.swap_in(id)?;
                format!("{} {} moved to memory at {}", noun, id, address)
            }
            Command::Discard(id) => {
                table.discard(id)?;
                format!("{} {} swap copy discarded", noun, id)
            }
            Command::Fill { id, byte } => {
                table.fill(id, byte)?;
                format!("{} {} filled with {:#04x}", noun, id, byte)
            }
        };
        Ok(line)
    }
}

pub struct REPL<R: BufRead> {
    input: R,
}

impl<R: BufRead> REPL<R> {
    pub fn new(input: R) -> Self {
        REPL { input }
    }

    /// Next trimmed line, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>, io::Error> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim().to_string()))
    }

    /// Reads commands until `.exit` or end of input. Failed commands are reported and skipped.
    pub fn run<W: Write>(&mut self, table: &mut Table, output: &mut W) -> Result<(), io::Error> {
        loop {
            write!(output, "memsim> ")?;
            output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(()),
            };
            if line.is_empty() {
                continue;
            }
            if line.starts_with('.') {
                match handle_meta_command(&line, table) {
                    Ok(MetaCommandResult::Exit) => return Ok(()),
                    Ok(MetaCommandResult::Output(text)) => writeln!(output, "{}", text.trim_end())?,
                    Err(MetaCommandError::UnrecognizedCommand) => {
                        writeln!(output, "Unrecognized command '{}'", line)?
                    }
                    Err(MetaCommandError::InvalidArgument(arg)) => {
                        writeln!(output, "Invalid argument '{}'", arg)?
                    }
                }
                continue;
            }
            match Command::parse(&line) {
                Ok(command) => match command.execute(table) {
                    Ok(text) => writeln!(output, "{}", text)?,
                    Err(err) => {
                        warn!("{:?} failed: {}", command, err);
                        writeln!(output, "Error: {}", err)?
                    }
                },
                Err(err) => writeln!(output, "Error: {:?}", err)?,
            }
        }
    }
}
