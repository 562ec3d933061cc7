// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model loader: reads a model source, decodes it and inserts it into the
//! scene. Bound at construction to one viewer and one decoder engine.

use std::path::PathBuf;
use std::sync::Arc;

use crate::decode::{DecodedModel, DecoderEngine};
use crate::engine::{SceneModel, SceneModelId};
use crate::error::{Error, Result};
use crate::viewer::Viewer;

/// One load request.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Path of the model file to read.
    pub source: PathBuf,
    /// Render edge lines for this model.
    pub edges: bool,
}

/// A model currently present in the scene.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Scene handle owned until explicitly destroyed.
    pub scene_id: SceneModelId,
    /// Decoded model summary.
    pub model: DecodedModel,
}

/// Loader bound to one viewer and one decoder engine.
pub struct ModelLoader {
    viewer: Viewer,
    decoder: Arc<DecoderEngine>,
}

impl ModelLoader {
    pub fn new(viewer: Viewer, decoder: Arc<DecoderEngine>) -> Self {
        Self { viewer, decoder }
    }

    /// Load a model: read, decode, insert into the scene.
    ///
    /// Returns only after scene insertion has completed, so a continuation
    /// such as the camera framing flight is ordered after insertion.
    pub async fn load(&self, name: &str, request: LoadRequest) -> Result<LoadedModel> {
        let bytes = tokio::fs::read(&request.source)
            .await
            .map_err(|source| Error::ModelRead {
                path: request.source.display().to_string(),
                source,
            })?;
        let content = String::from_utf8(bytes).map_err(|_| Error::InvalidModel {
            name: name.to_string(),
            reason: "not valid UTF-8 text".into(),
        })?;

        let decoded = self.decoder.decode(name, &content)?;
        let scene_id = self.viewer.insert_model(SceneModel {
            name: decoded.name.clone(),
            entity_count: decoded.entity_count,
            bounds: decoded.bounds,
            edges: request.edges,
        });

        tracing::info!(
            model = %name,
            source = %request.source.display(),
            schema = %decoded.schema,
            entities = decoded.entity_count,
            "model loaded"
        );

        Ok(LoadedModel {
            scene_id,
            model: decoded,
        })
    }
}
