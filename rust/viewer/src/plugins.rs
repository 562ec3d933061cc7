// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer plugins: fast navigation and tree view.
//!
//! Fast navigation degrades render quality while the user interacts with the
//! camera and restores it after a short idle delay. The tree view keeps a
//! per-model structural summary in a side panel.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::decode::{DecodedModel, IfcSchema};
use crate::engine::RenderSettings;
use crate::error::{Error, Result};
use crate::viewer::Viewer;

/// Fast navigation configuration.
#[derive(Debug, Clone)]
pub struct FastNavConfig {
    /// Hide edge lines during interaction.
    pub hide_edges: bool,
    /// Hide shadows / ambient occlusion during interaction.
    pub hide_sao: bool,
    /// Hide physically-based shading during interaction.
    pub hide_pbr: bool,
    /// Hide transparent objects during interaction.
    pub hide_transparent_objects: bool,
    /// Scale canvas resolution down during interaction.
    pub scale_canvas_resolution: bool,
    /// Resolution scale factor applied during interaction.
    pub scale_canvas_resolution_factor: f32,
    /// Wait before restoring full quality after interaction stops.
    pub delay_before_restore: bool,
    /// Idle delay before full quality is restored.
    pub delay_before_restore_secs: f32,
}

impl Default for FastNavConfig {
    fn default() -> Self {
        Self {
            hide_edges: true,
            hide_sao: true,
            hide_pbr: true,
            hide_transparent_objects: true,
            scale_canvas_resolution: true,
            scale_canvas_resolution_factor: 0.7,
            delay_before_restore: true,
            delay_before_restore_secs: 0.3,
        }
    }
}

/// Fast navigation plugin.
///
/// `interaction_started` applies the degraded settings immediately;
/// `interaction_stopped` schedules the restore after the configured delay.
/// A new interaction cancels any pending restore.
#[derive(Clone)]
pub struct FastNavPlugin {
    viewer: Viewer,
    config: FastNavConfig,
    /// Settings captured before the first degrade, restored afterwards.
    baseline: Arc<Mutex<Option<RenderSettings>>>,
    /// Bumped on every interaction start; a stale generation means the
    /// scheduled restore lost the race and must not fire.
    generation: Arc<AtomicU64>,
}

impl FastNavPlugin {
    /// Install the plugin on a viewer.
    pub fn install(viewer: &Viewer, config: FastNavConfig) -> Self {
        tracing::debug!(
            factor = config.scale_canvas_resolution_factor,
            delay_secs = config.delay_before_restore_secs,
            "fast-nav plugin installed"
        );
        Self {
            viewer: viewer.clone(),
            config,
            baseline: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Camera interaction began: degrade render quality.
    pub fn interaction_started(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut baseline = self.baseline.lock().unwrap_or_else(PoisonError::into_inner);
        let base = *baseline.get_or_insert_with(|| self.viewer.settings());
        self.viewer.apply_settings(self.degraded(base));
    }

    /// Camera interaction ended: restore full quality after the idle delay.
    pub fn interaction_stopped(&self) {
        if !self.config.delay_before_restore {
            self.restore();
            return;
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let delay = Duration::from_secs_f32(self.config.delay_before_restore_secs);
        let plugin = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if plugin.generation.load(Ordering::SeqCst) == generation {
                plugin.restore();
            }
        });
    }

    fn restore(&self) {
        let baseline = self
            .baseline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(settings) = baseline {
            self.viewer.apply_settings(settings);
            tracing::debug!("full render quality restored");
        }
    }

    fn degraded(&self, base: RenderSettings) -> RenderSettings {
        RenderSettings {
            edges: base.edges && !self.config.hide_edges,
            sao: base.sao && !self.config.hide_sao,
            pbr: base.pbr && !self.config.hide_pbr,
            transparent_objects: base.transparent_objects
                && !self.config.hide_transparent_objects,
            resolution_scale: if self.config.scale_canvas_resolution {
                base.resolution_scale * self.config.scale_canvas_resolution_factor
            } else {
                base.resolution_scale
            },
        }
    }
}

/// Tree view configuration.
#[derive(Debug, Clone)]
pub struct TreeViewConfig {
    /// Identifier of the panel the tree renders into.
    pub container_id: String,
}

/// One entry in the tree panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub model: String,
    pub schema: IfcSchema,
    pub entity_count: usize,
}

/// Tree view plugin: one node per loaded model, keyed by model name.
#[derive(Clone)]
pub struct TreeViewPlugin {
    container_id: String,
    nodes: Arc<Mutex<BTreeMap<String, TreeNode>>>,
}

impl TreeViewPlugin {
    /// Install the plugin into the named panel.
    ///
    /// Fails when the panel identifier cannot be resolved.
    pub fn install(viewer: &Viewer, config: TreeViewConfig) -> Result<Self> {
        if !viewer.has_surface(&config.container_id) {
            return Err(Error::SurfaceNotFound(config.container_id));
        }
        tracing::debug!(container = %config.container_id, "tree-view plugin installed");
        Ok(Self {
            container_id: config.container_id,
            nodes: Arc::new(Mutex::new(BTreeMap::new())),
        })
    }

    /// Panel identifier the tree renders into.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// A model finished loading; add its node.
    pub fn model_loaded(&self, model: &DecodedModel) {
        let node = TreeNode {
            model: model.name.clone(),
            schema: model.schema,
            entity_count: model.entity_count,
        };
        self.nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model.name.clone(), node);
    }

    /// A model was unloaded; drop its node.
    pub fn model_unloaded(&self, name: &str) {
        self.nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    /// Snapshot of the current tree, ordered by model name.
    pub fn nodes(&self) -> Vec<TreeNode> {
        self.nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}
