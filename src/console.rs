//! Interactive console loop.
//!
//! A line-oriented menu over the facade. Input values are typed by parsing:
//! integers first, then decimals, then booleans, with anything else kept as a
//! string. Validation failures are printed and the loop continues.

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::app::GroceryApp;
use crate::core::GroceryList;
use crate::error::Result;

const MENU: &str = "\
|------------------------------------|
| (R)ead                             |
| (A)dd                              |
| (U)pdate an item                   |
| (D)elete an item                   |
| (C)heck off an item                |
| (q)uit                             |
|------------------------------------|
";

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Read,
    Add,
    Update,
    Delete,
    CheckOff,
    Quit,
}

impl Command {
    /// Parse a menu line by its first letter, case-insensitive.
    ///
    /// Anything unrecognized quits, like an explicit `q`.
    pub fn parse(line: &str) -> Self {
        match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('r') => Self::Read,
            Some('a') => Self::Add,
            Some('u') => Self::Update,
            Some('d') => Self::Delete,
            Some('c') => Self::CheckOff,
            _ => Self::Quit,
        }
    }
}

/// Type a raw input value: integer, then decimal, then boolean, then string.
pub fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::from(f);
    }
    if let Ok(b) = trimmed.parse::<bool>() {
        return Value::from(b);
    }
    Value::from(trimmed)
}

/// Run the console loop on stdin and stdout.
pub fn run(app: &GroceryApp) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_with(app, &mut input, &mut output)
}

/// Run the console loop over explicit streams.
pub fn run_with<R, W>(app: &GroceryApp, input: &mut R, output: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{}\n> ", MENU)?;
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => break,
        };

        match Command::parse(&line) {
            Command::Read => {
                let list = GroceryList::from(app.items()?);
                writeln!(output, "{}", list.render())?;
            }
            Command::Add => {
                let name = prompt(input, output, "Name: ")?;
                let quantity = prompt(input, output, "Quantity: ")?;
                let price = prompt(input, output, "price: ")?;

                let payload = json!({
                    "name": name,
                    "quantity": parse_value(&quantity),
                    "price": parse_value(&price),
                });
                match app.create(&payload) {
                    Ok(item) => writeln!(output, "\nAdded {}\n", item.name)?,
                    Err(err) => writeln!(output, "{}", err)?,
                }
            }
            Command::Update => {
                let name = prompt(input, output, "Item name: ")?;
                if let Some(item) = app.items()?.iter().find(|item| item.name == name) {
                    writeln!(output, "{}", item.render())?;
                }
                let property = prompt(input, output, "What would you like to update? ")?;
                let value = prompt(input, output, "What is the new value? ")?;

                let payload = json!({
                    "property": property,
                    "value": parse_value(&value),
                });
                match app.update(&name, &payload) {
                    Ok(()) => writeln!(
                        output,
                        "Updated {}: '{}' to '{}'",
                        name,
                        property,
                        value.trim()
                    )?,
                    Err(err) => writeln!(output, "{}", err)?,
                }
            }
            Command::Delete => {
                let name = prompt(input, output, "Item name: ")?;
                match app.delete(&name) {
                    Ok(()) => writeln!(output, "Deleted {}", name)?,
                    Err(err) => writeln!(output, "{}", err)?,
                }
            }
            Command::CheckOff => {
                let name = prompt(input, output, "Item name: ")?;
                match app.check_off(&name) {
                    Ok(_) => writeln!(output, "Checked Off {}", name)?,
                    Err(err) => writeln!(output, "{}", err)?,
                }
            }
            Command::Quit => break,
        }
    }

    writeln!(output)?;
    Ok(())
}

/// Read one line, returning `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Print a prompt and read the answer.
fn prompt<R, W>(input: &mut R, output: &mut W, text: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", text)?;
    output.flush()?;
    Ok(read_line(input)?.unwrap_or_default())
}
