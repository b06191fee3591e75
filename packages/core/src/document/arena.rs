//! Node Arena
//!
//! Slab storage for node payloads, addressed by generation-checked
//! [`NodeId`] handles. Freed slots are recycled; their generation is bumped
//! so stale handles can never alias a newer node.

use crate::models::{NodeData, NodeId};

#[derive(Debug)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// Per-document node storage.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        NodeArena::default()
    }

    pub(crate) fn insert(&mut self, data: NodeData) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(data);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                data: Some(data),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation || slot.data.is_none() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        slot.data.take()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&NodeData> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.data.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.data.as_mut()
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
