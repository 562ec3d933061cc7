// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The viewer host: owns the viewer, the plugins, the decoder and the model
//! registry, and translates toggle events into load/unload requests.
//!
//! The host has an explicit two-phase lifecycle: [`ViewerHost::initialize`]
//! creates the viewer and plugins, [`ViewerHost::initialize_decoder`] brings
//! up the decoding engine and constructs the model loader. Until the second
//! phase resolves, every load request is a logged no-op.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::HostConfig;
use crate::decode::{DecodedModel, DecoderEngine};
use crate::engine::RenderEngine;
use crate::error::Result;
use crate::loader::{LoadRequest, ModelLoader};
use crate::plugins::{FastNavConfig, FastNavPlugin, TreeViewConfig, TreeViewPlugin};
use crate::registry::{ModelRegistry, UnloadOutcome};
use crate::viewer::{Viewer, ViewerConfig};

/// Owner of the viewer lifecycle and the load/unload state machine.
pub struct ViewerHost {
    viewer: Viewer,
    fast_nav: FastNavPlugin,
    tree_view: Option<TreeViewPlugin>,
    loader: Option<ModelLoader>,
    registry: ModelRegistry,
    asset_base: PathBuf,
}

impl ViewerHost {
    /// Construct the viewer bound to the configured display surface and
    /// install the plugins.
    ///
    /// Fails without creating anything when the display surface is absent.
    /// A missing tree panel only disables the tree view.
    pub fn initialize<E: RenderEngine + 'static>(engine: E, config: &HostConfig) -> Result<Self> {
        let viewer = Viewer::attach(
            engine,
            ViewerConfig {
                surface_id: config.surface_id.clone(),
                transparent: config.transparent,
                high_precision: config.high_precision,
            },
        )?;

        let fast_nav = FastNavPlugin::install(&viewer, FastNavConfig::default());
        let tree_view = match TreeViewPlugin::install(
            &viewer,
            TreeViewConfig {
                container_id: config.tree_panel_id.clone(),
            },
        ) {
            Ok(plugin) => Some(plugin),
            Err(e) => {
                tracing::warn!(error = %e, "tree view disabled");
                None
            }
        };

        Ok(Self {
            viewer,
            fast_nav,
            tree_view,
            loader: None,
            registry: ModelRegistry::new(),
            asset_base: config.asset_base.clone(),
        })
    }

    /// Initialize the decoding engine and construct the model loader.
    ///
    /// Model loads are no-ops until this resolves. A missing decoder payload
    /// is a fatal configuration error propagated to the caller; the host
    /// stays safe but non-functional.
    pub async fn initialize_decoder(&mut self, data_dir: impl Into<PathBuf>) -> Result<()> {
        let decoder = DecoderEngine::initialize(data_dir).await?;
        self.loader = Some(ModelLoader::new(self.viewer.clone(), Arc::new(decoder)));
        Ok(())
    }

    /// Whether the decoder is ready and loads will be attempted.
    pub fn is_ready(&self) -> bool {
        self.loader.is_some()
    }

    /// Translate a toggle event into a load or unload request.
    pub async fn on_toggle(&mut self, name: &str, checked: bool) {
        if checked {
            if let Err(e) = self.load(name).await {
                tracing::error!(model = %name, error = %e, "model load failed");
            }
        } else {
            self.unload(name);
        }
    }

    /// Load the named model and fly the camera to it.
    ///
    /// No-op when the decoder is not ready or the name already has an entry.
    /// On failure the optimistic registry entry is rolled back so the name
    /// returns to absent and may be retried.
    pub async fn load(&mut self, name: &str) -> Result<()> {
        let Some(loader) = &self.loader else {
            tracing::warn!(model = %name, "load ignored: decoder not ready");
            return Ok(());
        };
        if !self.registry.begin_load(name) {
            tracing::debug!(model = %name, "load ignored: already loading or loaded");
            return Ok(());
        }

        let source = self.asset_base.join(format!("{name}.ifc"));
        match loader
            .load(
                name,
                LoadRequest {
                    source,
                    edges: true,
                },
            )
            .await
        {
            Ok(model) => {
                // Scene insertion has completed; framing comes strictly after.
                self.viewer.fly_to(model.model.bounds);
                if let Some(tree) = &self.tree_view {
                    tree.model_loaded(&model.model);
                }
                self.registry.complete_load(name, model);
                Ok(())
            }
            Err(e) => {
                self.registry.abort_load(name);
                Err(e)
            }
        }
    }

    /// Unload the named model, destroying its scene resources.
    ///
    /// No-op when the name is absent. Rejected while a load for the name is
    /// still in flight; toggle again once it settles.
    pub fn unload(&mut self, name: &str) {
        match self.registry.remove(name) {
            UnloadOutcome::Removed(model) => {
                if let Err(e) = self.viewer.remove_model(model.scene_id) {
                    tracing::warn!(model = %name, error = %e, "scene removal failed");
                }
                if let Some(tree) = &self.tree_view {
                    tree.model_unloaded(name);
                }
                tracing::info!(model = %name, "model unloaded");
            }
            UnloadOutcome::InFlight => {
                tracing::warn!(model = %name, "unload rejected: load still in flight");
            }
            UnloadOutcome::Absent => {
                tracing::debug!(model = %name, "unload ignored: model not loaded");
            }
        }
    }

    /// Summaries of all fully loaded models, ordered by name.
    pub fn loaded_models(&self) -> Vec<DecodedModel> {
        self.registry
            .names()
            .iter()
            .filter_map(|name| self.registry.loaded(name))
            .map(|loaded| loaded.model.clone())
            .collect()
    }

    /// Number of registry entries, loading or loaded.
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// The viewer instance.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// The fast navigation plugin.
    pub fn fast_nav(&self) -> &FastNavPlugin {
        &self.fast_nav
    }

    /// The tree view plugin, if its panel was present at initialization.
    pub fn tree_view(&self) -> Option<&TreeViewPlugin> {
        self.tree_view.as_ref()
    }
}
