//! Interactive console over a quadratic probing table.
//!
//! Usage: `probing_console [initial-capacity]`

use std::{env, io};

use anyhow::{Context, Result};
use quadtable::{CONSOLE_CAPACITY, ProbingTable, console::Console};

fn main() -> Result<()> {
    let capacity = match env::args().nth(1) {
        Some(arg) => {
            arg.parse().with_context(|| format!("invalid initial capacity '{arg}'"))?
        }
        None => CONSOLE_CAPACITY,
    };

    let table = ProbingTable::with_capacity(capacity)
        .with_context(|| format!("cannot create a table of {capacity} slots"))?;

    let stdout = io::stdout();
    let mut console = Console::new(table, stdout.lock());
    console.run(io::stdin().lock()).context("console I/O failed")?;

    Ok(())
}
