//! Line-oriented console driving a string-keyed [`ProbingTable`].
//!
//! Input and output are passed in explicitly, so the console runs the same
//! against a terminal, a file, or an in-memory buffer.

use std::{
    io::{self, BufRead, Write},
    ops::ControlFlow,
};

use crate::{ProbingError, ProbingTable};

/// Commands listed by the banner and after an unknown command
const COMMANDS: [(&str, &str); 5] = [
    ("insert <key> <value>", "Add/update an entry"),
    ("search <key>", "Search for an entry"),
    ("delete <key>", "Delete an entry"),
    ("print", "Display the hash table"),
    ("exit", "Quit the program"),
];

/// One parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `insert <key> <value>`, the value being the rest of the line
    Insert {
        /// Key to store, missing if the line stopped early
        key: Option<&'a str>,
        /// Value to store, missing if the line stopped early
        value: Option<&'a str>,
    },
    /// `search <key>`
    Search {
        /// Key to look up
        key: Option<&'a str>,
    },
    /// `delete <key>`
    Delete {
        /// Key to remove
        key: Option<&'a str>,
    },
    /// `print`
    Print,
    /// `exit`
    Exit,
    /// Anything else
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a line, returning `None` for a blank one.
    ///
    /// The command word is case-insensitive. For `insert`, everything after
    /// the key is the value.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = split_word(line)?;
        let (key, rest) = split_word(rest).unzip();
        let rest = rest.map(str::trim).filter(|rest| !rest.is_empty());

        let command = match word.to_ascii_lowercase().as_str() {
            "insert" => Self::Insert { key, value: rest },
            "search" => Self::Search { key },
            "delete" => Self::Delete { key },
            "print" => Self::Print,
            "exit" => Self::Exit,
            _ => Self::Unknown(word),
        };
        Some(command)
    }
}

/// Splits off the first whitespace-separated word of `text`
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(text.split_once(char::is_whitespace).unwrap_or((text, "")))
}

/// Console session over a table of string keys and values
#[derive(Debug)]
pub struct Console<W> {
    /// The table the commands operate on
    table: ProbingTable<String, String>,
    /// Where every message goes
    output: W,
}

impl<W: Write> Console<W> {
    /// Creates a session over `table` writing to `output`
    pub fn new(table: ProbingTable<String, String>, output: W) -> Self {
        Self { table, output }
    }

    /// Returns the table of the session
    pub fn table(&self) -> &ProbingTable<String, String> {
        &self.table
    }

    /// Ends the session, returning the table and the output
    pub fn into_parts(self) -> (ProbingTable<String, String>, W) {
        (self.table, self.output)
    }

    /// Reads commands from `input` until `exit` or the end of input.
    ///
    /// # Errors
    ///
    /// Any error reading `input` or writing the output.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        self.banner()?;

        let mut line = String::new();
        loop {
            write!(self.output, "\n> ")?;
            self.output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                return self.execute(Command::Exit).map(|_| ());
            }

            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if self.execute(command)?.is_break() {
                return Ok(());
            }
        }
    }

    /// Runs one command, breaking on `exit`.
    ///
    /// # Errors
    ///
    /// Any error writing the output.
    pub fn execute(&mut self, command: Command<'_>) -> io::Result<ControlFlow<()>> {
        match command {
            Command::Insert { key, value: Some(value) } => {
                match self.table.try_insert(key.map(str::to_string), value.to_string()) {
                    Ok(_) => writeln!(
                        self.output,
                        "Inserted/updated entry with key '{}'",
                        key.unwrap_or_default()
                    )?,
                    Err(ProbingError::InvalidArgument(_)) => self.usage("insert <key> <value>")?,
                    Err(error) => self.error(&error)?,
                }
            }
            Command::Insert { value: None, .. } => self.usage("insert <key> <value>")?,
            Command::Search { key } => match self.table.try_get(key) {
                Ok(Some(value)) => writeln!(self.output, "Found: {value}")?,
                Ok(None) => self.not_found(key.unwrap_or_default())?,
                Err(ProbingError::InvalidArgument(_)) => self.usage("search <key>")?,
                Err(error) => self.error(&error)?,
            },
            Command::Delete { key } => match self.table.try_remove(key) {
                Ok(Some(_)) => writeln!(
                    self.output,
                    "Deleted entry with key '{}'",
                    key.unwrap_or_default()
                )?,
                Ok(None) => self.not_found(key.unwrap_or_default())?,
                Err(ProbingError::InvalidArgument(_)) => self.usage("delete <key>")?,
                Err(error) => self.error(&error)?,
            },
            Command::Print => write!(self.output, "\n{}", self.table.slot_table())?,
            Command::Exit => {
                writeln!(self.output, "Exiting program...")?;
                return Ok(ControlFlow::Break(()));
            }
            Command::Unknown(_) => {
                writeln!(self.output, "Unknown command. Available commands:")?;
                for (syntax, _) in COMMANDS {
                    writeln!(self.output, "  {syntax}")?;
                }
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Prints the greeting and the command list
    fn banner(&mut self) -> io::Result<()> {
        writeln!(self.output, "Hash Table CRUD Operations Console")?;
        writeln!(self.output, "Available commands:")?;
        for (syntax, description) in COMMANDS {
            writeln!(self.output, "  {syntax:<20} - {description}")?;
        }
        Ok(())
    }

    /// Reports a malformed command
    fn usage(&mut self, syntax: &str) -> io::Result<()> {
        writeln!(self.output, "Usage: {syntax}")
    }

    /// Reports a key with no live entry
    fn not_found(&mut self, key: &str) -> io::Result<()> {
        writeln!(self.output, "Key '{key}' not found")
    }

    /// Reports a table error
    fn error(&mut self, error: &ProbingError) -> io::Result<()> {
        writeln!(self.output, "Error: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> String {
        let table = ProbingTable::with_capacity(8).unwrap();
        let mut console = Console::new(table, Vec::new());
        console.run(input.as_bytes()).unwrap();
        let (_, output) = console.into_parts();
        String::from_utf8(output).unwrap()
    }

    /// Asserts that `parts` appear in `output` in the given order
    fn assert_in_order(output: &str, parts: &[&str]) {
        let mut rest = output;
        for part in parts {
            let Some(position) = rest.find(part) else {
                panic!("{part:?} missing or out of order in:\n{output}");
            };
            rest = &rest[position + part.len()..];
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(
            Command::parse("INSERT apple red fruit"),
            Some(Command::Insert { key: Some("apple"), value: Some("red fruit") })
        );
        assert_eq!(
            Command::parse("insert apple"),
            Some(Command::Insert { key: Some("apple"), value: None })
        );
        assert_eq!(Command::parse("search"), Some(Command::Search { key: None }));
        assert_eq!(Command::parse(" delete  pear "), Some(Command::Delete { key: Some("pear") }));
        assert_eq!(Command::parse("print"), Some(Command::Print));
        assert_eq!(Command::parse("Exit"), Some(Command::Exit));
        assert_eq!(Command::parse("invalid command"), Some(Command::Unknown("invalid")));
    }

    #[test]
    fn test_banner() {
        let output = run("exit\n");
        assert_in_order(
            &output,
            &["Hash Table CRUD Operations Console", "insert <key> <value> - Add/update", "> "],
        );
    }

    #[test]
    fn test_insert_and_print() {
        let output = run("insert apple fruit\nprint\nexit\n");
        assert_in_order(
            &output,
            &[
                "Inserted/updated entry with key 'apple'",
                "Hash Table Contents:",
                "apple",
                "fruit",
                "Exiting program...",
            ],
        );
    }

    #[test]
    fn test_search() {
        let output = run("insert apple fruit\nsearch apple\nsearch pear\nexit\n");
        assert_in_order(
            &output,
            &["Inserted/updated entry with key 'apple'", "Found: fruit", "Key 'pear' not found"],
        );
    }

    #[test]
    fn test_delete() {
        let output = run("insert apple fruit\ndelete apple\nsearch apple\ndelete apple\nexit\n");
        assert_in_order(
            &output,
            &[
                "Deleted entry with key 'apple'",
                "Key 'apple' not found",
                "Key 'apple' not found",
            ],
        );
    }

    #[test]
    fn test_unknown_command() {
        let output = run("invalid command\nexit\n");
        assert_in_order(&output, &["Unknown command. Available commands:", "  print\n"]);
    }

    #[test]
    fn test_missing_arguments() {
        let output = run("insert apple\nsearch\ndelete\nexit\n");
        assert_in_order(
            &output,
            &["Usage: insert <key> <value>", "Usage: search <key>", "Usage: delete <key>"],
        );
    }

    #[test]
    fn test_end_of_input_exits() {
        let table = ProbingTable::new();
        let mut console = Console::new(table, Vec::new());
        console.run("insert a 1\n\ninsert b 2".as_bytes()).unwrap();

        assert_eq!(console.table().len(), 2);
        assert_eq!(console.table().get("b").map(String::as_str), Some("2"));
        let (_, output) = console.into_parts();
        assert!(String::from_utf8(output).unwrap().ends_with("Exiting program...\n"));
    }

    #[test]
    fn test_exit_stops_reading() {
        let table = ProbingTable::new();
        let mut console = Console::new(table, Vec::new());
        console.run("exit\ninsert a 1\n".as_bytes()).unwrap();

        assert!(console.table().is_empty());
    }
}
