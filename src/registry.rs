//! The shape registry: single entry point the embedding app drives.
//!
//! Owns the vertex store and every live shape entity, tracks which kind the
//! user wants to draw next, and runs the build session that turns placed
//! points into entities. Vertex operations dispatch on the vertex's tag:
//! the tag names a kind, the owning entity of that kind handles the rest.

use std::collections::BTreeMap;
use std::mem;

use glam::DVec3;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::label::{LabelRenderer, NullLabelRenderer};
use crate::log::{debug, warn};
use crate::shapes::{
    BoxShape, CircleShape, LineShape, PolygonShape, ShapeBehavior, ShapeEntity, SquareShape,
    TriangleShape, VertexRemoval,
};
use crate::store::VertexStore;
use crate::types::{HandleState, ShapeId, ShapeKind, VertexId, VertexTag};

/// Where the registry stands between a first placed point and a finished
/// shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSession {
    Idle,
    /// Points placed but not yet enough for the wanted kind.
    Accumulating(Vec<VertexId>),
    /// A growable entity is live and swallows every further placement.
    Growing(ShapeId),
}

pub struct ShapeRegistry {
    store: VertexStore,
    entities: BTreeMap<ShapeId, ShapeEntity>,
    next_shape: u64,
    wanted: ShapeKind,
    session: BuildSession,
    labels: Box<dyn LabelRenderer>,
    config: EngineConfig,
}

impl ShapeRegistry {
    /// A registry without a display: labels are tracked but drawn nowhere.
    pub fn new(config: EngineConfig) -> ShapeRegistry {
        ShapeRegistry::with_renderer(config, Box::new(NullLabelRenderer::default()))
    }

    pub fn with_renderer(config: EngineConfig, labels: Box<dyn LabelRenderer>) -> ShapeRegistry {
        ShapeRegistry {
            store: VertexStore::new(),
            entities: BTreeMap::new(),
            next_shape: 0,
            wanted: ShapeKind::Line,
            session: BuildSession::Idle,
            labels,
            config,
        }
    }

    pub fn store(&self) -> &VertexStore {
        &self.store
    }

    pub fn wanted_kind(&self) -> ShapeKind {
        self.wanted
    }

    pub fn session(&self) -> &BuildSession {
        &self.session
    }

    pub fn shape(&self, id: ShapeId) -> Option<&ShapeEntity> {
        self.entities.get(&id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &ShapeEntity)> {
        self.entities.iter().map(|(&id, entity)| (id, entity))
    }

    pub fn shape_count(&self) -> usize {
        self.entities.len()
    }

    /// Place a vertex at `position` and advance the build session.
    ///
    /// The first point of a session stays untagged; from the second point
    /// on, all session points carry the wanted kind. The moment the session
    /// holds the kind's minimum anchor count the entity is built: fixed
    /// kinds clear the session, growable kinds keep it open and every
    /// further placement grows the live entity.
    pub fn place_vertex(&mut self, position: DVec3) -> Result<VertexId, EngineError> {
        if !position.is_finite() {
            let err = EngineError::NonFinitePosition(position);
            warn!("{err}");
            return Err(err);
        }

        if let BuildSession::Growing(shape_id) = self.session {
            let id = self.store.spawn(position, self.config.handle_scale);
            match self.entities.get_mut(&shape_id) {
                Some(entity) => {
                    if let Err(err) = entity.add_vertex(&mut self.store, id) {
                        self.store.remove(id);
                        return Err(err);
                    }
                    debug!("grew {shape_id} with {id}");
                    return Ok(id);
                }
                None => {
                    self.session = BuildSession::Idle;
                    self.store.remove(id);
                    let err = EngineError::UnknownShapeForVertex {
                        id,
                        tag: self.wanted.into(),
                    };
                    warn!("{err}");
                    return Err(err);
                }
            }
        }

        let id = self.store.spawn(position, self.config.handle_scale);
        debug!("placed {id} at {position} toward a {}", self.wanted);

        let mut pending = match mem::replace(&mut self.session, BuildSession::Idle) {
            BuildSession::Accumulating(pending) => pending,
            _ => Vec::new(),
        };
        pending.push(id);
        if pending.len() > 1 {
            for &v in &pending {
                self.store.set_tag(v, self.wanted.into())?;
            }
        }
        if pending.len() < self.wanted.min_anchors() {
            self.session = BuildSession::Accumulating(pending);
            return Ok(id);
        }

        match self.instantiate(&pending) {
            Ok(shape_id) => {
                if self.wanted.growable() {
                    self.session = BuildSession::Growing(shape_id);
                }
                Ok(id)
            }
            Err(err) => {
                // Refuse the whole placement: despawn the point that broke
                // the shape and put the session back the way it was.
                pending.pop();
                self.store.remove(id);
                for &v in &pending {
                    self.store.set_tag(v, VertexTag::Unassigned)?;
                }
                self.session = BuildSession::Accumulating(pending);
                Err(err)
            }
        }
    }

    fn instantiate(&mut self, pending: &[VertexId]) -> Result<ShapeId, EngineError> {
        let config = self.config;
        let entity: ShapeEntity = match (self.wanted, pending) {
            (ShapeKind::Line, ids) => {
                LineShape::create(&mut self.store, ids.to_vec(), config)?.into()
            }
            (ShapeKind::Polygon, ids) => {
                PolygonShape::create(&mut self.store, ids.to_vec(), config)?.into()
            }
            (ShapeKind::Circle, &[center, rim]) => {
                CircleShape::create(&mut self.store, [center, rim], config)?.into()
            }
            (ShapeKind::Triangle, &[a, b, c]) => {
                TriangleShape::create(&mut self.store, [a, b, c], config)?.into()
            }
            (ShapeKind::Square, &[center, side]) => {
                SquareShape::create(&mut self.store, [center, side], config)?.into()
            }
            (ShapeKind::Box, &[center, width]) => {
                BoxShape::create(&mut self.store, center, width, config)?.into()
            }
            (kind, _) => {
                warn!("{kind} session holds the wrong number of points");
                return Err(EngineError::FinalizeRefused);
            }
        };

        let shape_id = ShapeId(self.next_shape);
        self.next_shape += 1;
        debug!("created {} as {shape_id}", entity.kind());
        self.entities.insert(shape_id, entity);
        Ok(shape_id)
    }

    /// Move a vertex. Untagged handles move freely; tagged handles are
    /// forwarded to their owning entity, which may move companion anchors
    /// with it.
    pub fn move_vertex(
        &mut self,
        id: VertexId,
        target: DVec3,
        camera: &Camera,
    ) -> Result<(), EngineError> {
        if !target.is_finite() {
            let err = EngineError::NonFinitePosition(target);
            warn!("{err}");
            return Err(err);
        }
        let tag = self.known(id)?;
        match tag.kind() {
            None => self.store.set_position(id, target),
            Some(kind) => {
                for (_, entity) in self.entities.iter_mut() {
                    if entity.kind() == kind && entity.owns(id) {
                        return entity.move_vertex(&mut self.store, id, target, camera);
                    }
                }
                let err = EngineError::UnknownShapeForVertex { id, tag };
                warn!("{err}");
                Err(err)
            }
        }
    }

    /// Delete a vertex. Untagged handles just despawn (and leave the
    /// session); tagged handles are forwarded, and an entity that cannot
    /// survive the removal is torn down whole.
    pub fn delete_vertex(&mut self, id: VertexId) -> Result<(), EngineError> {
        let tag = self.known(id)?;
        match tag.kind() {
            None => {
                if let BuildSession::Accumulating(pending) = &mut self.session {
                    pending.retain(|&v| v != id);
                    if pending.is_empty() {
                        self.session = BuildSession::Idle;
                    }
                }
                self.store.remove(id);
                debug!("despawned free handle {id}");
                Ok(())
            }
            Some(kind) => {
                let mut outcome = None;
                for (&shape_id, entity) in self.entities.iter_mut() {
                    if entity.kind() == kind && entity.owns(id) {
                        outcome = Some((shape_id, entity.delete_vertex(&mut self.store, id)?));
                        break;
                    }
                }
                match outcome {
                    Some((shape_id, VertexRemoval::TornDown)) => {
                        self.remove_entity(shape_id);
                        Ok(())
                    }
                    Some((_, VertexRemoval::Kept)) => Ok(()),
                    None => {
                        let err = EngineError::UnknownShapeForVertex { id, tag };
                        warn!("{err}");
                        Err(err)
                    }
                }
            }
        }
    }

    /// Switch the kind the next placements will build. Discards the
    /// in-progress session: pending points despawn and a growing,
    /// not-yet-finalized line or polygon is torn down. Completed shapes are
    /// untouched.
    pub fn change_wanted_shape(&mut self, kind: ShapeKind) {
        debug!("wanted shape -> {kind}");
        self.wanted = kind;
        match mem::replace(&mut self.session, BuildSession::Idle) {
            BuildSession::Idle => {}
            BuildSession::Accumulating(pending) => {
                for id in pending {
                    self.store.remove(id);
                }
            }
            BuildSession::Growing(shape_id) => {
                self.remove_entity(shape_id);
            }
        }
    }

    /// Whether [`end_line`](Self::end_line) would succeed right now.
    pub fn can_end_line(&self) -> bool {
        self.wanted.growable() && matches!(self.session, BuildSession::Growing(_))
    }

    /// Finish the growing line or polygon (a polygon closes its boundary)
    /// and clear the session.
    pub fn end_line(&mut self) -> Result<(), EngineError> {
        let shape_id = match self.session {
            BuildSession::Growing(shape_id) if self.wanted.growable() => shape_id,
            _ => {
                let err = EngineError::FinalizeRefused;
                warn!("{err}");
                return Err(err);
            }
        };
        match self.entities.get_mut(&shape_id) {
            Some(entity) => {
                entity.finalize(&mut self.store)?;
                debug!("finalized {shape_id}");
                self.session = BuildSession::Idle;
                Ok(())
            }
            None => {
                self.session = BuildSession::Idle;
                let err = EngineError::FinalizeRefused;
                warn!("{err}");
                Err(err)
            }
        }
    }

    /// Begin a grab: the handle stops being pickable and any stale drag
    /// state on its entity is forgotten.
    pub fn start_move(&mut self, id: VertexId) -> Result<(), EngineError> {
        let tag = self.known(id)?;
        if let Some(vertex) = self.store.get_mut(id) {
            vertex.state = HandleState::Moving;
            vertex.pickable = false;
        }
        self.reset_drag_for(id, tag);
        Ok(())
    }

    /// End a grab: the handle is pickable again.
    pub fn stop_move(&mut self, id: VertexId) -> Result<(), EngineError> {
        let tag = self.known(id)?;
        if let Some(vertex) = self.store.get_mut(id) {
            vertex.state = HandleState::Idle;
            vertex.pickable = true;
        }
        self.reset_drag_for(id, tag);
        Ok(())
    }

    /// Hover feedback. A handle that is currently being moved keeps its
    /// moving state.
    pub fn hover(&mut self, id: VertexId, hovered: bool) -> Result<(), EngineError> {
        self.known(id)?;
        if let Some(vertex) = self.store.get_mut(id) {
            if vertex.state != HandleState::Moving {
                vertex.state = if hovered {
                    HandleState::Hovered
                } else {
                    HandleState::Idle
                };
            }
        }
        Ok(())
    }

    /// Push every live entity's annotations out to the label renderer.
    /// Called once per frame after mutations.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        for (_, entity) in self.entities.iter_mut() {
            entity.sync_labels(&self.store, self.labels.as_mut(), self.config.label_precision)?;
        }
        Ok(())
    }

    fn known(&self, id: VertexId) -> Result<VertexTag, EngineError> {
        match self.store.tag(id) {
            Ok(tag) => Ok(tag),
            Err(err) => {
                warn!("{err}");
                Err(err)
            }
        }
    }

    fn reset_drag_for(&mut self, id: VertexId, tag: VertexTag) {
        if let Some(kind) = tag.kind() {
            for (_, entity) in self.entities.iter_mut() {
                if entity.kind() == kind && entity.owns(id) {
                    entity.reset_drag();
                    return;
                }
            }
        }
    }

    fn remove_entity(&mut self, shape_id: ShapeId) {
        if let Some(mut entity) = self.entities.remove(&shape_id) {
            entity.teardown(&mut self.store, self.labels.as_mut());
            debug!("tore down {shape_id}");
        }
        if self.session == BuildSession::Growing(shape_id) {
            self.session = BuildSession::Idle;
        }
    }
}
