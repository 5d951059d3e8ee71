//! Slots of the table and their diagnostic views

use std::fmt::{self, Display};

/// What a slot currently holds
#[derive(Debug, Clone)]
pub(crate) enum Content<K, V> {
    /// Never written since the slot array was allocated
    Empty,
    /// Holds a live entry
    Live(K, V),
    /// Held an entry that was removed, probes must walk past it
    Tombstone,
}

/// One cell of the slot array
#[derive(Debug, Clone)]
pub(crate) struct Slot<K, V> {
    /// The entry, if any
    pub(crate) content: Content<K, V>,
    /// Set when the current entry was placed after stepping over a non-empty slot.
    /// Only reported through [`SlotView`], never read by lookups.
    pub(crate) collided: bool,
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Self { content: Content::Empty, collided: false }
    }
}

impl<K, V> Slot<K, V> {
    /// True once an entry has been written here, tombstones included
    pub(crate) fn is_occupied(&self) -> bool {
        !matches!(self.content, Content::Empty)
    }

    /// True if the slot was retired by a removal
    pub(crate) fn is_tombstone(&self) -> bool {
        matches!(self.content, Content::Tombstone)
    }

    /// The live entry of the slot
    pub(crate) fn live(&self) -> Option<(&K, &V)> {
        match &self.content {
            Content::Live(key, value) => Some((key, value)),
            Content::Empty | Content::Tombstone => None,
        }
    }

    /// The state of the slot without its payload
    pub(crate) fn state(&self) -> SlotState {
        match self.content {
            Content::Empty => SlotState::Empty,
            Content::Live(..) => SlotState::Live,
            Content::Tombstone => SlotState::Tombstone,
        }
    }
}

/// Lifecycle state of a slot: `Empty -> Live -> Tombstone -> Live -> ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Never written
    Empty,
    /// Holding a live entry
    Live,
    /// Logically removed, still traversed by probes
    Tombstone,
}

/// Diagnostic view of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotView {
    /// Position of the slot in the slot array
    pub index: usize,
    /// What the slot currently holds
    pub state: SlotState,
    /// Whether the entry landed here after stepping over a non-empty slot
    pub collided: bool,
}

impl SlotView {
    /// True once any entry has been written to the slot
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.state != SlotState::Empty
    }

    /// True if the entry of the slot was removed
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.state == SlotState::Tombstone
    }

    /// True if the slot holds a live entry
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state == SlotState::Live
    }
}

/// Per-slot dump of a table, one line per slot including empty ones.
///
/// Columns are the slot index, the key, the occupied (`U`), collided (`C`)
/// and deleted (`D`) flags, and the value.
#[derive(Debug)]
pub struct SlotTable<'a, K, V> {
    /// The slots to render
    slots: &'a [Slot<K, V>],
}

impl<'a, K, V> SlotTable<'a, K, V> {
    /// Wraps the slot array of a table
    pub(crate) fn new(slots: &'a [Slot<K, V>]) -> Self {
        Self { slots }
    }
}

/// Renders a flag the way the dump header names it
fn flag(set: bool) -> char {
    if set { 'T' } else { 'F' }
}

impl<K: Display, V: Display> Display for SlotTable<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash Table Contents:")?;
        writeln!(f, "Index | Key   | U | C | D | Value")?;
        for (index, slot) in self.slots.iter().enumerate() {
            let (key, value) = match slot.live() {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => ("-".to_string(), "-".to_string()),
            };
            writeln!(
                f,
                "{index:>5} | {key:<5} | {} | {} | {} | {value}",
                flag(slot.is_occupied()),
                flag(slot.collided),
                flag(slot.is_tombstone()),
            )?;
        }
        Ok(())
    }
}
