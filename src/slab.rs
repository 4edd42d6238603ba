//! Fixed-capacity instance table for the NIF layer
//!
//! Holds the stateful PWM modules (enhanced and complementary) between NIF
//! calls; the stateless basic module never needs a slot. Handles are stable,
//! never reused, and O(1) to resolve, so a stale handle from a destroyed
//! instance reports not-found instead of stepping a newer one. Each slot has
//! its own lock so different PWM stages can be stepped from different
//! scheduler threads at the same time, while one stage is only ever advanced
//! by one caller.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// Slot holding one instance behind its own lock
struct Slot<T> {
    data: Mutex<Option<T>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            data: Mutex::new(None),
        }
    }
}

/// Handle allocation state, guarded by one RwLock
struct SlabMeta {
    /// Indices of free slots
    free: Vec<usize>,
    /// Next handle to hand out (monotonically increasing)
    next_handle: u64,
    handle_to_slot: HashMap<u64, usize>,
}

/// Slab of PWM instances addressed by `u64` handles
///
/// A poisoned slot or metadata lock (a panic while stepping) makes the
/// affected calls return None, which the NIF layer maps to an error term
/// rather than propagating the panic into the VM.
///
/// Insert and remove take the metadata write lock. Access through
/// [`with`](Self::with) / [`with_mut`](Self::with_mut) takes the metadata
/// read lock only long enough to resolve the slot, then locks that slot.
pub struct InstanceSlab<T> {
    slots: Vec<Slot<T>>,
    meta: RwLock<SlabMeta>,
}

impl<T> InstanceSlab<T> {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| Slot::empty()).collect();
        let free = (0..capacity).rev().collect();

        Self {
            slots,
            meta: RwLock::new(SlabMeta {
                free,
                next_handle: 0,
                handle_to_slot: HashMap::new(),
            }),
        }
    }

    /// Store an instance, returning its handle, or None when full
    pub fn insert(&self, item: T) -> Option<u64> {
        let mut meta = self.meta.write().ok()?;
        let slot_idx = meta.free.pop()?;

        let handle = meta.next_handle;
        meta.next_handle += 1;

        match self.slots[slot_idx].data.lock() {
            Ok(mut data) => *data = Some(item),
            Err(_) => {
                meta.free.push(slot_idx);
                return None;
            }
        }

        meta.handle_to_slot.insert(handle, slot_idx);
        Some(handle)
    }

    fn slot_index(&self, handle: u64) -> Option<usize> {
        let meta = self.meta.read().ok()?;
        meta.handle_to_slot.get(&handle).copied()
    }

    /// Run `f` with exclusive access to one instance
    pub fn with_mut<F, R>(&self, handle: u64, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let slot_idx = self.slot_index(handle)?;
        let mut data = self.slots[slot_idx].data.lock().ok()?;
        data.as_mut().map(f)
    }

    /// Run `f` with shared access to one instance
    pub fn with<F, R>(&self, handle: u64, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let slot_idx = self.slot_index(handle)?;
        let data = self.slots[slot_idx].data.lock().ok()?;
        data.as_ref().map(f)
    }

    /// Remove an instance; its handle becomes invalid
    pub fn remove(&self, handle: u64) -> Option<T> {
        let mut meta = self.meta.write().ok()?;
        let slot_idx = meta.handle_to_slot.remove(&handle)?;

        let item = self.slots[slot_idx].data.lock().ok()?.take();
        meta.free.push(slot_idx);
        item
    }

    /// Number of live instances
    pub fn count(&self) -> usize {
        self.meta.read().map(|m| m.handle_to_slot.len()).unwrap_or(0)
    }
}
