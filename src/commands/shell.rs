//! An interactive session. Unlike the one-shot commands, the filter and sort state lives for the
//! whole session, so toggling a sort twice flips its direction just like clicking a column
//! header twice would.

use crate::commands::{open, Out};
use crate::controller::{Controller, RenderState};
use crate::model::{TransactionForm, TransactionId};
use crate::pipeline::{CategoryFilter, SortKey, TypeFilter};
use crate::storage::Storage;
use crate::{render, Config, Result};
use anyhow::Context;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  add <title> <amount> <income|expense> <date> <category>   record a transaction
  delete <id>                                               delete a transaction
  type <all|income|expense>                                 filter by type
  category <name|all>                                       filter by category
  sort <date|amount>                                        sort, again to reverse
  show                                                      show the current view
  categories                                                list the categories
  help                                                      show this help
  quit                                                      leave the shell
Use double quotes around values that contain spaces.
";

/// A parsed line of shell input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ShellCommand {
    Add(TransactionForm),
    Delete(TransactionId),
    Type(TypeFilter),
    Category(CategoryFilter),
    Sort(SortKey),
    Show,
    Categories,
    Help,
    Quit,
    Empty,
}

/// Runs the shell on stdin and stdout until `quit` or end of input.
pub async fn shell(config: Config) -> Result<Out<()>> {
    let mut controller = open(&config).await?;
    let count = run_shell(
        &mut controller,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;
    Ok(format!("Processed {count} command(s)").into())
}

/// Reads commands from `input` and writes each resulting frame to `output`. Returns the number
/// of commands processed, not counting blank lines.
pub async fn run_shell<S, R, W>(
    controller: &mut Controller<S>,
    input: R,
    mut output: W,
) -> Result<usize>
where
    S: Storage,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut count = 0;
    write(&mut output, &render::state(&controller.render())).await?;
    while let Some(line) = lines.next_line().await.context("Unable to read input")? {
        let command = match parse_line(&line) {
            Ok(ShellCommand::Empty) => continue,
            Ok(command) => command,
            Err(message) => {
                write(&mut output, &format!("Error: {message}\n")).await?;
                continue;
            }
        };
        count += 1;
        debug!("Shell command {command:?}");
        let text = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Categories => render::categories(controller.categories()),
            other => render::state(&dispatch(controller, other).await),
        };
        write(&mut output, &text).await?;
    }
    Ok(count)
}

async fn dispatch<S>(controller: &mut Controller<S>, command: ShellCommand) -> RenderState
where
    S: Storage,
{
    match command {
        ShellCommand::Add(form) => controller.submit_transaction(&form).await,
        ShellCommand::Delete(id) => controller.request_delete(id).await,
        ShellCommand::Type(type_filter) => controller.set_type_filter(type_filter),
        ShellCommand::Category(category) => controller.set_category_filter(category),
        ShellCommand::Sort(key) => controller.toggle_sort(key),
        _ => controller.render(),
    }
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("Unable to write output")?;
    output.flush().await.context("Unable to flush output")
}

/// Parses one line of shell input. The error is a message for the user.
pub fn parse_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let words = split_words(line)?;
    let (name, rest) = match words.split_first() {
        Some((name, rest)) => (name.as_str(), rest),
        None => return Ok(ShellCommand::Empty),
    };
    let arity = |n: usize| {
        if rest.len() == n {
            Ok(())
        } else {
            Err(format!("'{name}' takes {n} argument(s), got {}", rest.len()))
        }
    };
    match name {
        "add" => {
            arity(5)?;
            Ok(ShellCommand::Add(TransactionForm::new(
                rest[0].as_str(),
                rest[1].as_str(),
                rest[2].as_str(),
                rest[3].as_str(),
                rest[4].as_str(),
            )))
        }
        "delete" => {
            arity(1)?;
            TransactionId::from_str(&rest[0])
                .map(ShellCommand::Delete)
                .map_err(|_| format!("'{}' is not a transaction ID", rest[0]))
        }
        "type" => {
            arity(1)?;
            TypeFilter::from_str(&rest[0])
                .map(ShellCommand::Type)
                .map_err(|_| format!("'{}' is not one of all, income, expense", rest[0]))
        }
        "category" => {
            arity(1)?;
            Ok(ShellCommand::Category(CategoryFilter::parse(&rest[0])))
        }
        "sort" => {
            arity(1)?;
            SortKey::from_str(&rest[0])
                .map(ShellCommand::Sort)
                .map_err(|_| format!("'{}' is not one of date, amount", rest[0]))
        }
        "show" => arity(0).map(|_| ShellCommand::Show),
        "categories" => arity(0).map(|_| ShellCommand::Categories),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        unknown => Err(format!("Unknown command '{unknown}', type 'help'")),
    }
}

/// Splits on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
