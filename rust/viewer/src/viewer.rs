// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The viewer instance: one rendering engine bound to one display surface.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::engine::{
    Bounds, RenderEngine, RenderSettings, SceneModel, SceneModelId, SurfaceBinding,
};
use crate::error::Result;

/// Fixed duration of the camera framing animation.
const CAMERA_FLIGHT: Duration = Duration::from_millis(500);

/// Viewer construction options.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub surface_id: String,
    pub transparent: bool,
    pub high_precision: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_id: "viewer-canvas".into(),
            transparent: true,
            high_precision: true,
        }
    }
}

/// Handle to the viewer instance.
///
/// Created once per session by attaching an engine to a display surface.
/// Clones share the same underlying engine; the engine lock is only held for
/// the duration of a single call, never across an await point.
#[derive(Clone)]
pub struct Viewer {
    engine: Arc<Mutex<Box<dyn RenderEngine>>>,
}

impl Viewer {
    /// Attach an engine to the configured display surface.
    ///
    /// Fails without creating a viewer when the surface cannot be resolved.
    pub fn attach<E: RenderEngine + 'static>(mut engine: E, config: ViewerConfig) -> Result<Self> {
        engine.attach(SurfaceBinding {
            surface_id: config.surface_id.clone(),
            transparent: config.transparent,
            high_precision: config.high_precision,
        })?;
        tracing::info!(
            surface = %config.surface_id,
            transparent = config.transparent,
            high_precision = config.high_precision,
            "viewer attached"
        );
        Ok(Self {
            engine: Arc::new(Mutex::new(Box::new(engine))),
        })
    }

    fn engine(&self) -> MutexGuard<'_, Box<dyn RenderEngine>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the engine can resolve the given surface identifier.
    pub fn has_surface(&self, surface_id: &str) -> bool {
        self.engine().has_surface(surface_id)
    }

    pub(crate) fn insert_model(&self, model: SceneModel) -> SceneModelId {
        self.engine().insert_model(model)
    }

    pub(crate) fn remove_model(&self, id: SceneModelId) -> Result<SceneModel> {
        self.engine().remove_model(id)
    }

    /// Apply render quality settings.
    pub fn apply_settings(&self, settings: RenderSettings) {
        self.engine().apply_settings(settings);
    }

    /// Current render quality settings.
    pub fn settings(&self) -> RenderSettings {
        self.engine().settings()
    }

    /// Animate the camera into a framing position for the given bounds.
    pub fn fly_to(&self, target: Bounds) {
        self.engine().fly_to(target, CAMERA_FLIGHT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullEngine;

    #[test]
    fn attach_binds_surface() {
        let engine = NullEngine::with_surfaces(["viewer-canvas"]);
        let probe = engine.clone();

        let viewer = Viewer::attach(engine, ViewerConfig::default()).unwrap();
        let binding = probe.attached_surface().unwrap();
        assert_eq!(binding.surface_id, "viewer-canvas");
        assert!(binding.transparent);
        assert!(binding.high_precision);
        assert!(viewer.has_surface("viewer-canvas"));
        assert!(!viewer.has_surface("tree-panel"));
    }

    #[test]
    fn attach_propagates_missing_surface() {
        let engine = NullEngine::new();
        assert!(Viewer::attach(engine, ViewerConfig::default()).is_err());
    }

    #[test]
    fn fly_to_records_target() {
        let engine = NullEngine::with_surfaces(["viewer-canvas"]);
        let probe = engine.clone();
        let viewer = Viewer::attach(engine, ViewerConfig::default()).unwrap();

        let mut bounds = Bounds::new();
        bounds.expand(1.0, 2.0, 3.0);
        viewer.fly_to(bounds);
        assert_eq!(probe.camera_target(), Some(bounds));
    }
}
