//! Light unit repository.
//!
//! Units are kept sorted by id in a fixed-capacity vector. Traversal runs from
//! the highest id down, so explicitly addressed units paint over anonymous
//! ones when they target the same pixel in the same tick.

use core::fmt;

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::random::RandomSource;
use crate::unit::{LightUnit, LightUnitId, MAX_DYNAMIC_ID, MIN_DYNAMIC_ID};

/// How many random ids `add` tries before giving up.
const MAX_ID_ATTEMPTS: usize = 1024;

/// Errors returned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Id `0` was used to set a unit.
    ReservedId,
    /// No unused anonymous id could be found.
    IdSpaceExhausted,
    /// The repository has no room for another unit.
    Full,
}

impl StoreError {
    /// Returns true if normal operation cannot continue.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::ReservedId | Self::IdSpaceExhausted)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedId => f.write_str("0 is a reserved light unit id"),
            Self::IdSpaceExhausted => f.write_str("unable to generate id for light unit"),
            Self::Full => f.write_str("light unit store is full"),
        }
    }
}

/// Renders the terminal pass of a unit leaving the store.
pub trait UnitFinalizer {
    fn finalize(&mut self, unit: &mut LightUnit);
}

/// Ordered repository of light units.
///
/// N is the maximum number of units.
#[derive(Debug, Default)]
pub struct LightUnitStore<const N: usize> {
    units: Vec<LightUnit, N>,
}

impl<const N: usize> LightUnitStore<N> {
    pub const fn new() -> Self {
        Self { units: Vec::new() }
    }

    fn position(&self, id: LightUnitId) -> Result<usize, usize> {
        self.units.binary_search_by_key(&id, |unit| unit.id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, id: LightUnitId) -> bool {
        self.position(id).is_ok()
    }

    /// Get a stored unit.
    pub fn get(&self, id: LightUnitId) -> Option<&LightUnit> {
        self.position(id).ok().map(|index| &self.units[index])
    }

    pub(crate) fn get_mut(&mut self, id: LightUnitId) -> Option<&mut LightUnit> {
        self.position(id).ok().map(|index| &mut self.units[index])
    }

    /// Highest stored id.
    pub fn first(&self) -> Option<LightUnitId> {
        self.units.last().map(|unit| unit.id)
    }

    /// Highest stored id below `id`.
    ///
    /// `id` itself does not need to be stored, so traversal survives the
    /// removal of the current unit.
    pub fn next(&self, id: LightUnitId) -> Option<LightUnitId> {
        let index = match self.position(id) {
            Ok(index) | Err(index) => index,
        };
        index.checked_sub(1).map(|index| self.units[index].id)
    }

    /// Iterate over units in traversal order (highest id first).
    pub fn iter(&self) -> impl Iterator<Item = &LightUnit> {
        self.units.iter().rev()
    }

    /// Store a unit under a freshly generated anonymous id.
    pub fn add<R: RandomSource>(
        &mut self,
        unit: LightUnit,
        rng: &mut R,
    ) -> Result<LightUnitId, StoreError> {
        if self.units.is_full() {
            return Err(StoreError::Full);
        }
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = rng.random_range(MIN_DYNAMIC_ID + 1, MAX_DYNAMIC_ID);
            if let Err(index) = self.position(id) {
                self.insert_at(index, id, unit)?;
                #[cfg(feature = "esp32-log")]
                println!(
                    "[LightUnitStore.add] added light unit {}. There are now {} entries",
                    id,
                    self.units.len()
                );
                return Ok(id);
            }
        }

        #[cfg(feature = "esp32-log")]
        println!("[LightUnitStore.add] fatal: unable to generate id for light unit");
        Err(StoreError::IdSpaceExhausted)
    }

    /// Store a unit under `id`.
    ///
    /// With `replace_first` an existing unit is removed first (terminal pass,
    /// done callback, dependents). Otherwise an existing unit gets its terminal
    /// pass in place and is overwritten.
    pub fn set<F: UnitFinalizer>(
        &mut self,
        id: LightUnitId,
        unit: LightUnit,
        replace_first: bool,
        quiet: bool,
        finalizer: &mut F,
    ) -> Result<(), StoreError> {
        if id == 0 {
            #[cfg(feature = "esp32-log")]
            println!("[LightUnitStore.set] fatal: 0 is a reserved light unit id");
            return Err(StoreError::ReservedId);
        }

        let exists = self.contains(id);
        if !exists && self.units.is_full() {
            return Err(StoreError::Full);
        }

        if replace_first {
            self.remove(id, finalizer);
        } else if let Some(current) = self.get_mut(id) {
            finalizer.finalize(current);
        }

        match self.position(id) {
            Ok(index) => self.units[index] = unit.normalized_with_id(id),
            Err(index) => self.insert_at(index, id, unit)?,
        }

        if !quiet || !exists {
            #[cfg(feature = "esp32-log")]
            println!(
                "[LightUnitStore.set] {} light unit {}. There are now {} entries",
                match (exists, replace_first) {
                    (false, _) => "Adding",
                    (true, true) => "Replaced",
                    (true, false) => "Setting",
                },
                id,
                self.units.len()
            );
        }

        Ok(())
    }

    fn insert_at(
        &mut self,
        index: usize,
        id: LightUnitId,
        unit: LightUnit,
    ) -> Result<(), StoreError> {
        self.units
            .insert(index, unit.normalized_with_id(id))
            .map_err(|_| StoreError::Full)
    }

    /// Remove a unit and, transitively, every unit depending on it.
    ///
    /// Each removed unit gets its terminal pass, then its done callback.
    /// Absent ids are ignored.
    pub fn remove<F: UnitFinalizer>(&mut self, id: LightUnitId, finalizer: &mut F) {
        let mut pending: Vec<LightUnitId, N> = Vec::new();
        if pending.push(id).is_err() {
            return;
        }

        while let Some(id) = pending.pop() {
            let Ok(index) = self.position(id) else {
                continue;
            };
            let mut unit = self.units.remove(index);
            finalizer.finalize(&mut unit);
            if let Some(on_done) = unit.on_done {
                on_done(&unit);
            }

            #[cfg(feature = "esp32-log")]
            println!(
                "[LightUnitStore.remove] removed light unit {}. There are now {} entries",
                id,
                self.units.len()
            );

            for dependent in &self.units {
                if dependent.animation.depends_on == id {
                    // Every unit is pushed at most once
                    let pushed = pending.push(dependent.id);
                    debug_assert!(pushed.is_ok(), "removal worklist overflow");
                }
            }
        }
    }

    /// Remove every unit, highest id first.
    pub fn remove_all<F: UnitFinalizer>(&mut self, finalizer: &mut F) {
        #[cfg(feature = "esp32-log")]
        println!(
            "[LightUnitStore.remove_all] removing {} light units",
            self.units.len()
        );

        while let Some(id) = self.first() {
            self.remove(id, finalizer);
        }
    }

    /// Restart the expiration countdown of a unit.
    pub fn reset_age(&mut self, id: LightUnitId) {
        if let Some(unit) = self.get_mut(id) {
            unit.state.age = 0;
        }
    }
}
