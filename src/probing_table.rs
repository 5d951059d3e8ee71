use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, BuildHasherDefault, Hash},
    iter, mem, slice,
};

use crate::{
    error::{ProbingError, Result},
    probe::ProbeSeq,
    slot::{Content, Slot, SlotTable, SlotView},
};

/// Initial number of slots of [`ProbingTable::new`]
pub const DEFAULT_CAPACITY: usize = 4;
/// Initial number of slots used by the console front end
pub const CONSOLE_CAPACITY: usize = 16;
/// Maximum share of live entries, in percent, before the table doubles
pub const LOAD_FACTOR_PERCENT: usize = 75;

/// Message of the error returned when a checked operation gets no key
const MISSING_KEY: &str = "Key cannot be null";

/// Deterministic hasher used unless another one is supplied.
///
/// Slot placement only depends on the keys and the insertion history.
pub type DefaultBuildHasher = BuildHasherDefault<DefaultHasher>;

/// An open-addressed hash table using quadratic probing and tombstone deletion.
///
/// A key lives in the first suitable slot of the sequence
/// `(home + i * i) mod capacity`, where `home = hash(key) mod capacity`.
/// Removed entries leave a tombstone so that keys placed further down the
/// same probe chain stay reachable. The table doubles once the number of live
/// entries reaches three quarters of its capacity, and also whenever an
/// insertion walks a full probe sequence without finding room. Doubling is the
/// only operation that reclaims tombstones.
///
/// Note: This implementation is not thread-safe. Callers sharing a table
/// between threads must serialize access to it.
#[derive(Debug, Clone)]
pub struct ProbingTable<K, V, S = DefaultBuildHasher> {
    /// The slot array, its length is the capacity
    slots: Vec<Slot<K, V>>,
    /// Number of live entries
    size: usize,
    /// Number of tombstoned slots
    tombstones: usize,
    /// Live entry count that triggers doubling on the next insertion
    threshold: usize,
    /// Builds the hasher for every key
    hash_builder: S,
}

/// Where an insertion goes
enum Placement {
    /// Slot holding the key already, or the slot to write a new entry into
    At {
        /// Index of the slot
        index: usize,
        /// Whether a non-empty slot was stepped over to get there
        collided: bool,
    },
    /// The whole probe sequence was walked without finding room
    Exhausted,
}

/// `floor(capacity * LOAD_FACTOR_PERCENT / 100)` without overflowing
#[allow(clippy::arithmetic_side_effects)]
const fn threshold_for(capacity: usize) -> usize {
    capacity / 100 * LOAD_FACTOR_PERCENT + capacity % 100 * LOAD_FACTOR_PERCENT / 100
}

/// Allocates `capacity` empty slots, reporting allocation failure
fn try_empty_slots<K, V>(capacity: usize) -> Result<Vec<Slot<K, V>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| ProbingError::CapacityExhausted { requested: capacity })?;
    slots.extend(iter::repeat_with(Slot::default).take(capacity));
    Ok(slots)
}

impl<K, V> ProbingTable<K, V, DefaultBuildHasher> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultBuildHasher::default())
    }

    /// Creates an empty table with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `capacity` is zero, `CapacityExhausted` if the
    /// slots cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, DefaultBuildHasher::default())
    }
}

impl<K, V, S: Default> Default for ProbingTable<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ProbingTable<K, V, S> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots hashing keys with `hash_builder`
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            slots: iter::repeat_with(Slot::default).take(DEFAULT_CAPACITY).collect(),
            size: 0,
            tombstones: 0,
            threshold: threshold_for(DEFAULT_CAPACITY),
            hash_builder,
        }
    }

    /// Creates an empty table with exactly `capacity` slots hashing keys with `hash_builder`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `capacity` is zero, `CapacityExhausted` if the
    /// slots cannot be allocated.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self> {
        if capacity == 0 {
            return Err(ProbingError::InvalidArgument("Capacity must be positive"));
        }

        Ok(Self {
            slots: try_empty_slots(capacity)?,
            size: 0,
            tombstones: 0,
            threshold: threshold_for(capacity),
            hash_builder,
        })
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no live entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the live entry count at which the next insertion doubles the table
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the number of slots retired by removals and not reused yet
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the ratio of live entries to slots
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Returns a reference to the hasher builder of the table
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns an iterator over the live entries in slot order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { slots: self.slots.iter() }
    }

    /// Returns an iterator over the live keys in slot order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the live values in slot order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns every slot with its live entry, empty and retired slots included
    pub fn slots(&self) -> impl Iterator<Item = (SlotView, Option<(&K, &V)>)> {
        self.slots.iter().enumerate().map(|(index, slot)| (Self::view(index, slot), slot.live()))
    }

    /// Returns a renderer listing every slot with its flags
    pub fn slot_table(&self) -> SlotTable<'_, K, V> {
        SlotTable::new(&self.slots)
    }

    /// Removes every entry and tombstone, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::default();
        }
        self.size = 0;
        self.tombstones = 0;
    }

    /// Builds the diagnostic view of a slot
    fn view(index: usize, slot: &Slot<K, V>) -> SlotView {
        SlotView { index, state: slot.state(), collided: slot.collided }
    }
}

impl<K, V, S> ProbingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Index of the home slot of a key
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn home<Q: ?Sized + Hash>(&self, key: &Q) -> usize {
        let hash = self.hash_builder.hash_one(key);
        // The remainder is below the capacity, so it fits back into a usize.
        (hash % self.slots.len() as u64) as usize
    }

    /// Walks the probe sequence of `key` looking for its slot or a free one.
    ///
    /// The first tombstone met is remembered and preferred over a later empty
    /// slot, or used when the sequence runs out.
    fn find_slot_for_insert(&self, key: &K) -> Placement {
        let mut first_tombstone = None;
        let mut stepped_over = false;

        for index in ProbeSeq::new(self.home(key), self.slots.len()) {
            let Some(slot) = self.slots.get(index) else {
                break;
            };

            match &slot.content {
                Content::Empty => {
                    return first_tombstone
                        .unwrap_or(Placement::At { index, collided: stepped_over });
                }
                Content::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(Placement::At { index, collided: stepped_over });
                    }
                }
                Content::Live(existing, _) if existing == key => {
                    return Placement::At { index, collided: slot.collided };
                }
                Content::Live(..) => {}
            }

            stepped_over = true;
        }

        first_tombstone.unwrap_or(Placement::Exhausted)
    }

    /// Finds the slot of a live key, with the number of slots inspected to get there.
    ///
    /// Tombstones are walked past, an empty slot ends the search.
    #[allow(clippy::arithmetic_side_effects)]
    fn find<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        for (step, index) in ProbeSeq::new(self.home(key), self.slots.len()).enumerate() {
            match self.slots.get(index).map(|slot| &slot.content) {
                None | Some(Content::Empty) => return None,
                Some(Content::Live(existing, _)) if existing.borrow() == key => {
                    return Some((index, step + 1));
                }
                Some(Content::Live(..) | Content::Tombstone) => {}
            }
        }

        None
    }

    /// Inserts a key-value pair, returning the previous value of the key.
    ///
    /// The table doubles first if it holds `threshold()` live entries, and
    /// again whenever the probe sequence of the key has no room left.
    ///
    /// # Errors
    ///
    /// `CapacityExhausted` if the table needed to grow and could not.
    /// Entries not yet moved to the new slot array are lost in that case.
    #[allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if self.size >= self.threshold {
            self.grow()?;
        }

        loop {
            match self.find_slot_for_insert(&key) {
                Placement::At { index, collided } => {
                    // Probe indices are always below the capacity.
                    let slot = &mut self.slots[index];
                    match mem::replace(&mut slot.content, Content::Live(key, value)) {
                        Content::Live(_, previous) => return Ok(Some(previous)),
                        Content::Tombstone => self.tombstones -= 1,
                        Content::Empty => {}
                    }
                    slot.collided = collided;
                    self.size += 1;
                    return Ok(None);
                }
                Placement::Exhausted => self.grow()?,
            }
        }
    }

    /// Same as [`insert`](Self::insert) for a key that may be missing.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is `None`, without touching the table.
    /// Otherwise the errors of [`insert`](Self::insert).
    pub fn try_insert(&mut self, key: Option<K>, value: V) -> Result<Option<V>> {
        let key = key.ok_or(ProbingError::InvalidArgument(MISSING_KEY))?;
        self.insert(key, value)
    }

    /// Inserts every pair of `iter` in order.
    ///
    /// # Errors
    ///
    /// The first `CapacityExhausted` returned by [`insert`](Self::insert).
    /// Pairs before it stay inserted, the rest of `iter` is not consumed.
    pub fn try_extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) -> Result<()> {
        for (key, value) in iter {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Doubles the slot array and moves the live entries over in slot order
    fn grow(&mut self) -> Result<()> {
        let requested = self
            .slots
            .len()
            .checked_mul(2)
            .ok_or(ProbingError::CapacityExhausted { requested: usize::MAX })?;
        let old = mem::replace(&mut self.slots, try_empty_slots(requested)?);

        self.size = 0;
        self.tombstones = 0;
        self.threshold = threshold_for(requested);

        for slot in old {
            if let Content::Live(key, value) = slot.content {
                self.insert(key, value)?;
            }
        }

        Ok(())
    }

    /// Retrieves the value of a key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find(key)?;
        self.slots.get(index).and_then(Slot::live).map(|(_, value)| value)
    }

    /// Same as [`get`](Self::get) for a key that may be missing.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is `None`.
    pub fn try_get<Q>(&self, key: Option<&Q>) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let key = key.ok_or(ProbingError::InvalidArgument(MISSING_KEY))?;
        Ok(self.get(key))
    }

    /// Retrieves a mutable reference to the value of a key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find(key)?;
        match self.slots.get_mut(index) {
            Some(Slot { content: Content::Live(_, value), .. }) => Some(value),
            _ => None,
        }
    }

    /// Removes a key, returning its value.
    ///
    /// The slot becomes a tombstone: it stays occupied for later probes and
    /// can be reused by a later insertion.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find(key)?;
        let slot = self.slots.get_mut(index)?;

        match mem::replace(&mut slot.content, Content::Tombstone) {
            Content::Live(_, value) => {
                self.size -= 1;
                self.tombstones += 1;
                Some(value)
            }
            other => {
                slot.content = other;
                None
            }
        }
    }

    /// Same as [`remove`](Self::remove) for a key that may be missing.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is `None`, without touching the table.
    pub fn try_remove<Q>(&mut self, key: Option<&Q>) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let key = key.ok_or(ProbingError::InvalidArgument(MISSING_KEY))?;
        Ok(self.remove(key))
    }

    /// Returns true if the table holds a live entry for the key
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the view of the slot holding a live key
    pub fn slot_of<Q>(&self, key: &Q) -> Option<SlotView>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find(key)?;
        self.slots.get(index).map(|slot| Self::view(index, slot))
    }

    /// Returns how many slots a lookup of the key inspects, 1 meaning its home slot
    pub fn probe_length<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|(_, probes)| probes)
    }
}

impl<K, V, S> Extend<(K, V)> for ProbingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts every pair, stopping at the first one the table cannot grow for.
    ///
    /// `Extend` has no way to report the failure: the `CapacityExhausted`
    /// error is discarded along with the remaining pairs. Use
    /// [`ProbingTable::try_extend`] to observe it.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let _ = self.try_extend(iter);
    }
}

impl<K, V, S> FromIterator<(K, V)> for ProbingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

/// Renders the live entries as `{k1=v1, k2=v2}` in slot order
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for ProbingTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

/// Iterator over the live entries of a table, in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Remaining slots
    slots: slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(Slot::live)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ProbingTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
