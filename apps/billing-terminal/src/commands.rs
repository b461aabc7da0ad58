//! # Terminal Commands
//!
//! One line of input becomes one [`Command`]. Form commands map straight onto
//! [`Action`]s; rows are numbered from 1 as they are on screen.
//!
//! ```text
//!   add                    AddRow
//!   remove <row>           RemoveRow(row - 1)
//!   code <row> [text]      FieldChanged { ProductCode }
//!   qty <row> [text]       FieldChanged { Quantity }
//!   email [text]           EmailChanged
//!   denom <value> [count]  DenomChanged
//!   calc                   CalculateRequested
//!   bill                   GenerateRequested
//!   show | help | quit
//! ```

use billing_core::{Action, Field};
use thiserror::Error;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Form(Action),
    Show,
    Help,
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the command list.")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{value}' is not a valid {argument}")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },
}

/// Parses one line; blank lines redraw the form.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" | "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "add" => Command::Form(Action::AddRow),
        "remove" | "rm" => {
            let (row, _) = row_argument("remove", rest)?;
            Command::Form(Action::RemoveRow(row))
        }
        "code" => {
            let (row, value) = row_argument("code", rest)?;
            Command::Form(Action::FieldChanged {
                row,
                field: Field::ProductCode,
                value: value.to_string(),
            })
        }
        "qty" => {
            let (row, value) = row_argument("qty", rest)?;
            Command::Form(Action::FieldChanged {
                row,
                field: Field::Quantity,
                value: value.to_string(),
            })
        }
        "email" => Command::Form(Action::EmailChanged(rest.to_string())),
        "denom" => {
            let (value, count) = split_first(rest);
            if value.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "denom",
                    argument: "a face value",
                });
            }
            let value = value.parse::<i64>().map_err(|_| CommandError::InvalidNumber {
                argument: "face value",
                value: value.to_string(),
            })?;
            Command::Form(Action::DenomChanged {
                value,
                count: count.to_string(),
            })
        }
        "calc" | "calculate" => Command::Form(Action::CalculateRequested),
        "bill" | "generate" => Command::Form(Action::GenerateRequested),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(command)
}

/// Splits `<row> rest` and converts the 1-based row to an index.
fn row_argument<'a>(
    command: &'static str,
    args: &'a str,
) -> Result<(usize, &'a str), CommandError> {
    let (row, rest) = split_first(args);
    if row.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a row number",
        });
    }

    match row.parse::<usize>() {
        Ok(number) if number >= 1 => Ok((number - 1, rest)),
        _ => Err(CommandError::InvalidNumber {
            argument: "row number",
            value: row.to_string(),
        }),
    }
}

fn split_first(args: &str) -> (&str, &str) {
    match args.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (args, ""),
    }
}

/// Command reference shown by `help`.
pub const HELP_TEXT: &str = "\
Commands:
  add                     add a product row
  remove <row>            remove a product row
  code <row> <code>       set a row's product code
  qty <row> <quantity>    set a row's quantity
  email <address>         set the customer email
  calc                    calculate the total
  denom <value> <count>   set how many notes/coins of a value were tendered
  bill                    generate the bill
  show                    redraw the form
  quit                    leave without billing
";
