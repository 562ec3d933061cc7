// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering-engine seam.
//!
//! The actual scene graph, GPU resources and camera animation belong to an
//! external rendering engine. [`RenderEngine`] is the stable boundary the
//! viewer talks through; [`NullEngine`] is a headless implementation that
//! keeps scene state in memory, used by the shell and by tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Handle to a model inserted into the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneModelId(pub u64);

/// Axis-aligned model bounds in f64 precision.
///
/// Serves as the camera framing target: the flight animation centers on the
/// box and backs off far enough to contain its extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
    /// Number of points sampled into the box.
    pub sample_count: usize,
}

impl Bounds {
    /// Create new bounds initialized to the invalid (empty) state.
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            max_z: f64::MIN,
            sample_count: 0,
        }
    }

    /// True once at least one point has been added.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand the box to include a point.
    #[inline]
    pub fn expand(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.min_z = self.min_z.min(z);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.max_z = self.max_z.max(z);
        self.sample_count += 1;
    }

    /// Center of the box, or the origin for empty bounds.
    #[inline]
    pub fn centroid(&self) -> (f64, f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0, 0.0);
        }
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Edge lengths of the box, or zero for empty bounds.
    #[inline]
    pub fn extent(&self) -> (f64, f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0, 0.0);
        }
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Binding of the viewer to a display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceBinding {
    /// Identifier of the surface to render into.
    pub surface_id: String,
    /// Render with a transparent background.
    pub transparent: bool,
    /// Enable the double-precision optimized geometry path.
    pub high_precision: bool,
}

/// Render quality settings the fast-nav plugin toggles during interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub edges: bool,
    pub sao: bool,
    pub pbr: bool,
    pub transparent_objects: bool,
    /// Canvas resolution scale, 1.0 = full resolution.
    pub resolution_scale: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            edges: true,
            sao: true,
            pbr: true,
            transparent_objects: true,
            resolution_scale: 1.0,
        }
    }
}

/// A model as handed to the engine for scene insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneModel {
    pub name: String,
    pub entity_count: usize,
    pub bounds: Bounds,
    /// Render edge lines for this model.
    pub edges: bool,
}

/// Boundary to the external rendering engine.
///
/// Implementations own the scene graph and the camera; the viewer host only
/// ever drives them through this trait.
pub trait RenderEngine: Send {
    /// Bind the rendering context to a display surface. Fails if the surface
    /// identifier cannot be resolved.
    fn attach(&mut self, binding: SurfaceBinding) -> Result<()>;

    /// Whether the engine can resolve the given surface identifier.
    fn has_surface(&self, surface_id: &str) -> bool;

    /// Insert a model into the scene, returning its scene handle.
    fn insert_model(&mut self, model: SceneModel) -> SceneModelId;

    /// Destroy a model's scene resources.
    fn remove_model(&mut self, id: SceneModelId) -> Result<SceneModel>;

    /// Apply render quality settings.
    fn apply_settings(&mut self, settings: RenderSettings);

    /// Current render quality settings.
    fn settings(&self) -> RenderSettings;

    /// Animate the camera into a framing position for the given bounds.
    fn fly_to(&mut self, target: Bounds, duration: Duration);
}

#[derive(Debug, Default)]
struct NullEngineState {
    surfaces: HashSet<String>,
    attached: Option<SurfaceBinding>,
    next_id: u64,
    scene: HashMap<SceneModelId, SceneModel>,
    settings: RenderSettings,
    camera_target: Option<Bounds>,
}

/// Headless reference engine.
///
/// Keeps the scene as plain data and records camera flights instead of
/// animating them. Handles are cheap clones over shared state, so a test can
/// keep one handle for inspection while the viewer owns another.
#[derive(Debug, Clone, Default)]
pub struct NullEngine {
    inner: Arc<Mutex<NullEngineState>>,
}

impl NullEngine {
    /// Engine with no resolvable surfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that can resolve the given surface identifiers.
    pub fn with_surfaces<I, S>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engine = Self::default();
        engine.lock().surfaces = surfaces.into_iter().map(Into::into).collect();
        engine
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NullEngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of models currently in the scene.
    pub fn model_count(&self) -> usize {
        self.lock().scene.len()
    }

    /// Whether a model with the given name is in the scene.
    pub fn contains_model(&self, name: &str) -> bool {
        self.lock().scene.values().any(|m| m.name == name)
    }

    /// Bounds of the most recent camera flight, if any.
    pub fn camera_target(&self) -> Option<Bounds> {
        self.lock().camera_target
    }

    /// Surface binding of the attached viewer, if any.
    pub fn attached_surface(&self) -> Option<SurfaceBinding> {
        self.lock().attached.clone()
    }

    /// Current render quality settings.
    pub fn current_settings(&self) -> RenderSettings {
        self.lock().settings
    }
}

impl RenderEngine for NullEngine {
    fn attach(&mut self, binding: SurfaceBinding) -> Result<()> {
        let mut state = self.lock();
        if !state.surfaces.contains(&binding.surface_id) {
            return Err(Error::SurfaceNotFound(binding.surface_id));
        }
        tracing::debug!(surface = %binding.surface_id, "engine attached to surface");
        state.attached = Some(binding);
        Ok(())
    }

    fn has_surface(&self, surface_id: &str) -> bool {
        self.lock().surfaces.contains(surface_id)
    }

    fn insert_model(&mut self, model: SceneModel) -> SceneModelId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = SceneModelId(state.next_id);
        tracing::debug!(
            model = %model.name,
            entities = model.entity_count,
            scene_id = id.0,
            "model inserted into scene"
        );
        state.scene.insert(id, model);
        id
    }

    fn remove_model(&mut self, id: SceneModelId) -> Result<SceneModel> {
        let mut state = self.lock();
        let model = state.scene.remove(&id).ok_or(Error::UnknownSceneModel(id.0))?;
        tracing::debug!(model = %model.name, scene_id = id.0, "model removed from scene");
        Ok(model)
    }

    fn apply_settings(&mut self, settings: RenderSettings) {
        self.lock().settings = settings;
    }

    fn settings(&self) -> RenderSettings {
        self.lock().settings
    }

    fn fly_to(&mut self, target: Bounds, duration: Duration) {
        let (cx, cy, cz) = target.centroid();
        tracing::debug!(
            cx,
            cy,
            cz,
            duration_ms = duration.as_millis() as u64,
            "camera flight"
        );
        self.lock().camera_target = Some(target);
    }
}
