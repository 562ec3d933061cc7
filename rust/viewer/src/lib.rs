// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # bimview viewer
//!
//! Embeddable IFC model viewer host. The rendering engine and the heavy IFC
//! geometry pipeline live behind seams; this crate owns the lifecycle around
//! them: viewer construction, plugin wiring, decoder initialization and the
//! per-model load/unload state machine.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bimview_viewer::{HostConfig, NullEngine, ViewerHost};
//!
//! let config = HostConfig::from_env();
//! let engine = NullEngine::with_surfaces([
//!     config.surface_id.clone(),
//!     config.tree_panel_id.clone(),
//! ]);
//!
//! let mut host = ViewerHost::initialize(engine, &config)?;
//! host.initialize_decoder(&config.decoder_data_dir).await?;
//!
//! // UI toggle events
//! host.on_toggle("house", true).await;   // load + camera fly-to
//! host.on_toggle("house", false).await;  // unload
//! ```
//!
//! ## Lifecycle
//!
//! A model name moves `absent → loading → loaded → absent`. The registry
//! entry inserted at load start is the gate against re-entrant duplicate
//! loads; redundant toggles in either direction are silently ignored.

pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod host;
pub mod loader;
pub mod plugins;
pub mod registry;
pub mod viewer;

pub use config::HostConfig;
pub use decode::{DecodedModel, DecoderEngine, IfcSchema};
pub use engine::{
    Bounds, NullEngine, RenderEngine, RenderSettings, SceneModel, SceneModelId, SurfaceBinding,
};
pub use error::{Error, Result};
pub use host::ViewerHost;
pub use loader::{LoadRequest, LoadedModel, ModelLoader};
pub use plugins::{FastNavConfig, FastNavPlugin, TreeNode, TreeViewConfig, TreeViewPlugin};
pub use registry::{ModelEntry, ModelRegistry, UnloadOutcome};
pub use viewer::{Viewer, ViewerConfig};
