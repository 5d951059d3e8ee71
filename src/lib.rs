//! # Quadratic Probing Table
//!
//! A Rust implementation of an open-addressed hash table resolving collisions
//! with quadratic probing and deleting entries lazily with tombstones.
//!
//! - Keys start at their home slot `hash(key) mod capacity` and probe
//!   `home + 1`, `home + 4`, `home + 9`, ... modulo the capacity.
//! - Removing a key leaves a tombstone, so entries further down the same probe
//!   chain stay reachable. Insertions reuse the first tombstone they meet.
//! - The table doubles when three quarters of its slots hold live entries, or
//!   when an insertion runs out of probes, dropping every tombstone on the way.
//!
//! ## Basic Usage
//!
//! ```rust
//! use quadtable::ProbingTable;
//!
//! // Create a new table with 4 slots
//! let mut table = ProbingTable::new();
//!
//! // Insert values
//! table.insert("apple".to_string(), 1)?;
//! table.insert("banana".to_string(), 2)?;
//!
//! // Retrieve values
//! assert_eq!(table.get("apple"), Some(&1));
//!
//! // Update values
//! assert_eq!(table.insert("apple".to_string(), 10)?, Some(1));
//! assert_eq!(table.get("apple"), Some(&10));
//!
//! // Remove values
//! assert_eq!(table.remove("apple"), Some(10));
//! assert_eq!(table.get("apple"), None);
//! assert!(!table.contains_key("apple"));
//! # Ok::<(), quadtable::ProbingError>(())
//! ```
//!
//! ## Inspecting Slots
//!
//! ```rust
//! use quadtable::{ProbingTable, SlotState};
//!
//! let mut table = ProbingTable::with_capacity(8)?;
//! table.insert("a", 1)?;
//! table.insert("b", 2)?;
//! table.remove("a");
//!
//! let retired = table.slots().filter(|(view, _)| view.state == SlotState::Tombstone).count();
//! assert_eq!(retired, 1);
//! assert_eq!(table.to_string(), "{b=2}");
//! # Ok::<(), quadtable::ProbingError>(())
//! ```

/// Line-oriented console over a string table
pub mod console;
/// Error and Result types of the crate
mod error;
/// Quadratic probe sequence
mod probe;
/// The quadratic probing hash table
mod probing_table;
/// Slots and their diagnostic views
mod slot;

pub use error::{ProbingError, Result};
pub use probing_table::{
    CONSOLE_CAPACITY, DEFAULT_CAPACITY, DefaultBuildHasher, Iter, LOAD_FACTOR_PERCENT,
    ProbingTable,
};
pub use slot::{SlotState, SlotTable, SlotView};
