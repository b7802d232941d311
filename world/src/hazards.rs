//! Pooled, time-limited hazards that cost the snake a life on contact.

use std::{collections::HashSet, time::Duration};

use rand::Rng;
use snake_arcade_core::{Cell, GridGeometry, HazardId, HazardSnapshot, HazardSpawnError};

use crate::placement::random_playable_cell;

/// A single hazard slot.
#[derive(Clone, Debug)]
pub struct Hazard {
    id: HazardId,
    cell: Cell,
    active: bool,
    spawned_at: Duration,
}

impl Hazard {
    fn dormant(id: HazardId) -> Self {
        Self {
            id,
            cell: Cell::new(0, 0),
            active: false,
            spawned_at: Duration::ZERO,
        }
    }

    /// Identifier of the slot.
    #[must_use]
    pub const fn id(&self) -> HazardId {
        self.id
    }

    /// Cell the hazard occupies while active.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Reports whether the hazard is on the board.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Activates the hazard at `cell`.
    pub fn spawn(&mut self, cell: Cell, now: Duration) {
        self.cell = cell;
        self.active = true;
        self.spawned_at = now;
    }

    /// Reports whether the hazard is active and within its time-to-live.
    #[must_use]
    pub fn is_live(&self, now: Duration, ttl: Duration) -> bool {
        self.active && now.saturating_sub(self.spawned_at) <= ttl
    }

    /// Deactivates the hazard once it outlived `ttl`. Returns whether it expired.
    pub fn tick(&mut self, now: Duration, ttl: Duration) -> bool {
        if self.active && !self.is_live(now, ttl) {
            self.active = false;
            return true;
        }
        false
    }

    fn snapshot(&self, now: Duration) -> HazardSnapshot {
        HazardSnapshot {
            id: self.id,
            cell: self.cell,
            age: now.saturating_sub(self.spawned_at),
        }
    }
}

/// Fixed-size pool of hazards sharing a time-to-live.
#[derive(Clone, Debug)]
pub struct HazardPool {
    slots: Vec<Hazard>,
    ttl: Duration,
}

impl HazardPool {
    /// Creates a pool of `size` dormant hazards.
    #[must_use]
    pub fn new(size: u32, ttl: Duration) -> Self {
        Self {
            slots: (0..size).map(|index| Hazard::dormant(HazardId::new(index))).collect(),
            ttl,
        }
    }

    /// Iterator over the active hazards in slot order.
    pub fn active(&self) -> impl Iterator<Item = &Hazard> + '_ {
        self.slots.iter().filter(|hazard| hazard.active)
    }

    /// Activates the lowest inactive slot on a random cell not in `excluding`.
    pub fn spawn<R>(
        &mut self,
        now: Duration,
        geometry: &GridGeometry,
        rng: &mut R,
        excluding: &HashSet<Cell>,
    ) -> Result<(HazardId, Cell), HazardSpawnError>
    where
        R: Rng + ?Sized,
    {
        let slot = self
            .slots
            .iter_mut()
            .find(|hazard| !hazard.active)
            .ok_or(HazardSpawnError::PoolExhausted)?;

        let cell = random_playable_cell(geometry, rng, excluding)?;
        slot.spawn(cell, now);
        Ok((slot.id, cell))
    }

    /// Claims the live hazard at `cell`, deactivating it.
    pub fn strike(&mut self, cell: Cell, now: Duration) -> Option<HazardId> {
        let ttl = self.ttl;
        let hazard = self
            .slots
            .iter_mut()
            .find(|hazard| hazard.cell == cell && hazard.is_live(now, ttl))?;
        hazard.active = false;
        Some(hazard.id)
    }

    /// Deactivates every hazard that outlived the time-to-live.
    pub fn expire(&mut self, now: Duration, expired: &mut Vec<HazardId>) {
        let ttl = self.ttl;
        for hazard in &mut self.slots {
            if hazard.tick(now, ttl) {
                expired.push(hazard.id);
            }
        }
    }

    #[cfg(any(test, feature = "scenario_scaffolding"))]
    pub(crate) fn place(&mut self, cell: Cell, now: Duration) -> Option<HazardId> {
        let slot = self.slots.iter_mut().find(|hazard| !hazard.active)?;
        slot.spawn(cell, now);
        Some(slot.id)
    }

    pub(crate) fn snapshots(&self, now: Duration) -> Vec<HazardSnapshot> {
        self.active().map(|hazard| hazard.snapshot(now)).collect()
    }
}
