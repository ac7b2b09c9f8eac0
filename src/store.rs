//! Central arena for vertex handles.
//!
//! All placed points live here; shape entities hold ids, never the handles
//! themselves. The registry owns the store and threads `&mut` references
//! into entity operations.

use std::collections::HashMap;

use glam::DVec3;

use crate::errors::EngineError;
use crate::types::{HandleState, VertexId, VertexTag};

/// A grabbable vertex handle
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: DVec3,
    pub tag: VertexTag,
    /// Uniform display scale of the handle marker
    pub scale: f64,
    pub state: HandleState,
    /// Whether raycasts may hit this handle (off while it is being moved)
    pub pickable: bool,
}

#[derive(Debug, Default)]
pub struct VertexStore {
    next_id: u64,
    vertices: HashMap<VertexId, Vertex>,
}

impl VertexStore {
    pub fn new() -> VertexStore {
        VertexStore::default()
    }

    /// Mint a new untagged handle at `position`
    pub fn spawn(&mut self, position: DVec3, scale: f64) -> VertexId {
        let id = VertexId(self.next_id);
        self.next_id += 1;
        self.vertices.insert(
            id,
            Vertex {
                position,
                tag: VertexTag::Unassigned,
                scale,
                state: HandleState::Idle,
                pickable: true,
            },
        );
        id
    }

    pub fn remove(&mut self, id: VertexId) -> Option<Vertex> {
        self.vertices.remove(&id)
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn get(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn get_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(&id)
    }

    pub fn position(&self, id: VertexId) -> Result<DVec3, EngineError> {
        self.get(id)
            .map(|v| v.position)
            .ok_or(EngineError::UnknownVertex(id))
    }

    pub fn set_position(&mut self, id: VertexId, position: DVec3) -> Result<(), EngineError> {
        self.get_mut(id)
            .map(|v| v.position = position)
            .ok_or(EngineError::UnknownVertex(id))
    }

    pub fn tag(&self, id: VertexId) -> Result<VertexTag, EngineError> {
        self.get(id)
            .map(|v| v.tag)
            .ok_or(EngineError::UnknownVertex(id))
    }

    pub fn set_tag(&mut self, id: VertexId, tag: VertexTag) -> Result<(), EngineError> {
        self.get_mut(id)
            .map(|v| v.tag = tag)
            .ok_or(EngineError::UnknownVertex(id))
    }

    pub fn set_scale(&mut self, id: VertexId, scale: f64) -> Result<(), EngineError> {
        self.get_mut(id)
            .map(|v| v.scale = scale)
            .ok_or(EngineError::UnknownVertex(id))
    }

    /// Rigidly translate a group of handles (center-anchor drags)
    pub fn translate(&mut self, ids: &[VertexId], delta: DVec3) -> Result<(), EngineError> {
        for &id in ids {
            let vertex = self.get_mut(id).ok_or(EngineError::UnknownVertex(id))?;
            vertex.position += delta;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().map(|(&id, vertex)| (id, vertex))
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
