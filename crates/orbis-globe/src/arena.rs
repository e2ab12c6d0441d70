//! Stable-handle storage for markers, keyed by item id.
//!
//! Slots are reused after removal; the generation counter makes stale
//! handles fail lookups instead of aliasing a newer marker.

use rustc_hash::FxHashMap;

use crate::collab::ItemId;
use crate::marker::Marker;

/// Handle to a marker slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    marker: Option<Marker>,
}

#[derive(Debug, Default)]
pub struct MarkerArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_id: FxHashMap<ItemId, MarkerHandle>,
}

impl MarkerArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a marker, replacing any marker with the same id.
    pub fn insert(&mut self, marker: Marker) -> MarkerHandle {
        if let Some(old) = self.by_id.get(marker.id()).copied() {
            self.remove(old);
        }
        let id = marker.id().clone();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.marker = Some(marker);
                MarkerHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    marker: Some(marker),
                });
                MarkerHandle {
                    index,
                    generation: 0,
                }
            }
        };
        self.by_id.insert(id, handle);
        handle
    }

    pub fn remove(&mut self, handle: MarkerHandle) -> Option<Marker> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let marker = slot.marker.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.by_id.remove(marker.id());
        Some(marker)
    }

    pub fn remove_id(&mut self, id: &ItemId) -> Option<Marker> {
        let handle = self.by_id.get(id).copied()?;
        self.remove(handle)
    }

    pub fn handle(&self, id: &ItemId) -> Option<MarkerHandle> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.marker.as_ref())
    }

    pub fn get_mut(&mut self, handle: MarkerHandle) -> Option<&mut Marker> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.marker.as_mut())
    }

    pub fn get_by_id(&self, id: &ItemId) -> Option<&Marker> {
        self.handle(id).and_then(|h| self.get(h))
    }

    pub fn get_by_id_mut(&mut self, id: &ItemId) -> Option<&mut Marker> {
        let handle = self.handle(id)?;
        self.get_mut(handle)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Live markers in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerHandle, &Marker)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.marker.as_ref().map(|m| {
                (
                    MarkerHandle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    m,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Marker> {
        self.slots.iter_mut().filter_map(|s| s.marker.as_mut())
    }

    /// Remove every marker whose id fails `keep`. Works slot by slot in
    /// place, so no scratch storage is needed.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) -> usize {
        let mut removed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(marker) = slot.marker.take_if(|m| !keep(m.id())) else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index as u32);
            self.by_id.remove(marker.id());
            removed += 1;
        }
        removed
    }
}
