//! The apartment arena and its reference accounting.
//!
//! Counts are path counts: an apartment's count is the number of ownership
//! paths from bindings down to it. Binding a root adds one to every
//! apartment reachable from it; installing a child under a parent adds the
//! parent's current count to every apartment reachable from the child.
//! Releases mirror this exactly, so a count reaches zero precisely when no
//! binding can still see the apartment. Adjustments walk the subgraph with an
//! explicit work list and are all-or-nothing.
//!
//! Reclamation is deferred: `collect` sweeps every zero-count slot into the
//! free list, and `maybe_collect` only sweeps once enough allocations have
//! happened since the previous sweep.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::value::Children;
use crate::{Apartment, ApartmentId, RuntimeError, RuntimeResult, Value};

/// Sizing knobs for the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Slots reserved up front.
    pub initial_capacity: usize,
    /// Allocations between two automatic sweeps.
    pub collect_threshold: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            initial_capacity: 64,
            collect_threshold: 256,
        }
    }
}

impl CollectorConfig {
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    #[must_use]
    pub fn with_collect_threshold(mut self, collect_threshold: usize) -> Self {
        self.collect_threshold = collect_threshold;
        self
    }
}

/// Lifetime counters of one collector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    pub allocated: usize,
    pub reclaimed: usize,
    pub sweeps: usize,
}

/// Owner of every apartment.
#[derive(Debug)]
pub struct GarbageCollector {
    slots: Vec<Option<Apartment>>,
    free: Vec<ApartmentId>,
    config: CollectorConfig,
    since_sweep: usize,
    stats: GcStats,
}

impl Default for GarbageCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a slot index to an id.
///
/// # Panics
/// If the arena grows past `u32::MAX` slots.
#[inline]
fn slot_id(index: usize) -> ApartmentId {
    ApartmentId::new(u32::try_from(index).unwrap_or_else(|_| {
        panic!("apartment arena exceeded u32::MAX slots (index {index})")
    }))
}

impl GarbageCollector {
    pub fn new() -> Self {
        Self::with_config(CollectorConfig::default())
    }

    pub fn with_config(config: CollectorConfig) -> Self {
        GarbageCollector {
            slots: Vec::with_capacity(config.initial_capacity),
            free: Vec::new(),
            config,
            since_sweep: 0,
            stats: GcStats::default(),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn stats(&self) -> GcStats {
        self.stats
    }

    /// Allocate an unreferenced apartment holding `value`.
    ///
    /// Reuses a reclaimed slot when one is available.
    pub fn new_apartment(&mut self, value: Value) -> ApartmentId {
        self.new_linked(value, None)
    }

    /// Allocate an unreferenced apartment already chained to `next`.
    ///
    /// The fresh apartment holds no references, so the link moves no counts.
    pub(crate) fn new_linked(&mut self, value: Value, next: Option<ApartmentId>) -> ApartmentId {
        let mut apartment = Apartment::new(value);
        apartment.next = next;
        let id = if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(apartment);
            id
        } else {
            let id = slot_id(self.slots.len());
            self.slots.push(Some(apartment));
            id
        };
        self.stats.allocated += 1;
        self.since_sweep += 1;
        tracing::debug!(apartment = ?id, "allocated apartment");
        id
    }

    /// Whether `id` names a live apartment.
    pub fn is_live(&self, id: ApartmentId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    pub fn get(&self, id: ApartmentId) -> RuntimeResult<&Apartment> {
        match self.slots.get(id.index()) {
            Some(Some(apartment)) => Ok(apartment),
            _ => Err(dangling(id)),
        }
    }

    fn get_mut(&mut self, id: ApartmentId) -> RuntimeResult<&mut Apartment> {
        match self.slots.get_mut(id.index()) {
            Some(Some(apartment)) => Ok(apartment),
            _ => Err(dangling(id)),
        }
    }

    pub fn value(&self, id: ApartmentId) -> RuntimeResult<&Value> {
        self.get(id).map(Apartment::value)
    }

    pub fn references(&self, id: ApartmentId) -> RuntimeResult<u32> {
        self.get(id).map(Apartment::references)
    }

    pub fn can_delete(&self, id: ApartmentId) -> RuntimeResult<bool> {
        self.get(id).map(Apartment::can_delete)
    }

    /// Direct children of `id`: its chain successor, then what its value
    /// references.
    pub fn get_children(&self, id: ApartmentId) -> RuntimeResult<Children> {
        self.get(id).map(Apartment::children)
    }

    /// Overwrite the value without touching any count.
    ///
    /// Only sound when neither the old nor the new value references
    /// apartments whose counts depend on this one.
    pub fn set_value(&mut self, id: ApartmentId, value: Value) -> RuntimeResult<()> {
        self.get_mut(id)?.value = value;
        Ok(())
    }

    /// Overwrite the value, moving this apartment's count from the old
    /// value's children to the new value's children.
    pub fn replace_value(&mut self, id: ApartmentId, value: Value) -> RuntimeResult<()> {
        let held = self.references(id)?;
        for child in value.children() {
            self.check_acyclic(id, child)?;
        }
        let old = std::mem::replace(&mut self.get_mut(id)?.value, value);
        let new_children = self.value(id)?.children();

        for child in old.children() {
            self.release(child, held)?;
        }
        for child in new_children {
            self.retain(child, held)?;
        }
        Ok(())
    }

    /// Relink the chain successor of `id`, with the same accounting as
    /// `replace_value`.
    pub(crate) fn set_next(
        &mut self,
        id: ApartmentId,
        next: Option<ApartmentId>,
    ) -> RuntimeResult<()> {
        let held = self.references(id)?;
        if let Some(child) = next {
            self.check_acyclic(id, child)?;
        }
        let old = std::mem::replace(&mut self.get_mut(id)?.next, next);

        if let Some(child) = old {
            self.release(child, held)?;
        }
        if let Some(child) = next {
            self.retain(child, held)?;
        }
        Ok(())
    }

    /// A binding now owns `id`.
    pub fn add_reference(&mut self, id: ApartmentId) -> RuntimeResult<()> {
        self.retain(id, 1)
    }

    /// `id` was installed as a child of `parent`.
    pub fn add_reference_from(&mut self, id: ApartmentId, parent: ApartmentId) -> RuntimeResult<()> {
        self.check_acyclic(parent, id)?;
        let held = self.references(parent)?;
        self.retain(id, held)
    }

    /// A binding released `id`.
    pub fn remove_reference(&mut self, id: ApartmentId) -> RuntimeResult<()> {
        self.release(id, 1)
    }

    /// `id` was removed from under `parent`.
    pub fn remove_reference_from(
        &mut self,
        id: ApartmentId,
        parent: ApartmentId,
    ) -> RuntimeResult<()> {
        let held = self.references(parent)?;
        self.release(id, held)
    }

    /// Add `amount` to `id` and everything reachable from it.
    fn retain(&mut self, id: ApartmentId, amount: u32) -> RuntimeResult<()> {
        self.adjust(id, amount, Adjustment::Retain)
    }

    /// Subtract `amount` from `id` and everything reachable from it.
    fn release(&mut self, id: ApartmentId, amount: u32) -> RuntimeResult<()> {
        self.adjust(id, amount, Adjustment::Release)
    }

    /// Move every count under `id` by `amount` once per path to it.
    ///
    /// All new counts are computed before any is written, so an overflow or
    /// underflow anywhere in the subgraph leaves the heap unchanged.
    fn adjust(
        &mut self,
        id: ApartmentId,
        amount: u32,
        adjustment: Adjustment,
    ) -> RuntimeResult<()> {
        if amount == 0 {
            return Ok(());
        }
        let mut updates = Vec::new();
        for (apartment, paths) in self.path_counts(id)? {
            let held = self.get(apartment)?.references;
            let delta = paths.saturating_mul(u64::from(amount));
            updates.push((apartment, adjustment.apply(apartment, held, delta)?));
        }
        for (apartment, now) in updates {
            self.get_mut(apartment)?.references = now;
            tracing::trace!(?apartment, ?adjustment, amount, now, "adjusted references");
        }
        Ok(())
    }

    /// How many distinct paths lead from `root` to each apartment under it.
    fn path_counts(&self, root: ApartmentId) -> RuntimeResult<FxHashMap<ApartmentId, u64>> {
        let mut paths = FxHashMap::default();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            *paths.entry(id).or_insert(0u64) += 1;
            pending.extend(self.get_children(id)?);
        }
        Ok(paths)
    }

    /// Fail if `child` is `parent` or already reaches it.
    fn check_acyclic(&self, parent: ApartmentId, child: ApartmentId) -> RuntimeResult<()> {
        if self.reaches(child, parent)? {
            tracing::error!(?parent, ?child, "ownership cycle");
            return Err(RuntimeError::CycleDetected { parent, child });
        }
        Ok(())
    }

    /// Whether `target` is `from` or one of its descendants.
    fn reaches(&self, from: ApartmentId, target: ApartmentId) -> RuntimeResult<bool> {
        let mut seen = FxHashSet::default();
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if id == target {
                return Ok(true);
            }
            if seen.insert(id) {
                pending.extend(self.get_children(id)?);
            }
        }
        Ok(false)
    }

    /// Reclaim every apartment no owner holds. Returns how many were freed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn collect(&mut self) -> usize {
        let mut reclaimed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(Apartment::can_delete) {
                *slot = None;
                self.free.push(slot_id(index));
                reclaimed += 1;
            }
        }
        self.since_sweep = 0;
        self.stats.sweeps += 1;
        self.stats.reclaimed += reclaimed;
        tracing::debug!(reclaimed, live = self.live_count(), "sweep finished");
        reclaimed
    }

    /// Sweep if the allocation threshold has been reached since the last
    /// sweep.
    pub fn maybe_collect(&mut self) -> Option<usize> {
        if self.since_sweep >= self.config.collect_threshold {
            Some(self.collect())
        } else {
            None
        }
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[derive(Copy, Clone, Debug)]
enum Adjustment {
    Retain,
    Release,
}

impl Adjustment {
    /// The count `held` moves to, or the violation it would cause.
    fn apply(self, apartment: ApartmentId, held: u32, delta: u64) -> RuntimeResult<u32> {
        let moved = u32::try_from(delta).ok();
        match self {
            Adjustment::Retain => moved.and_then(|added| held.checked_add(added)).ok_or_else(|| {
                tracing::error!(?apartment, held, added = delta, "reference overflow");
                RuntimeError::ReferenceOverflow {
                    apartment,
                    held,
                    added: delta,
                }
            }),
            Adjustment::Release => {
                moved.and_then(|released| held.checked_sub(released)).ok_or_else(|| {
                    tracing::error!(?apartment, held, released = delta, "reference underflow");
                    RuntimeError::ReferenceUnderflow {
                        apartment,
                        held,
                        released: delta,
                    }
                })
            }
        }
    }
}

fn dangling(id: ApartmentId) -> RuntimeError {
    tracing::error!(apartment = ?id, "dangling apartment id");
    RuntimeError::DanglingApartment { apartment: id }
}

#[cfg(test)]
mod tests;
