// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the viewer host.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Viewer host error types.
#[derive(Debug, Error)]
pub enum Error {
    #[error("display surface not found: {0}")]
    SurfaceNotFound(String),

    #[error("decoder data directory not usable: {path}")]
    DecoderDataMissing { path: String },

    #[error("model source not readable: {path}")]
    ModelRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid IFC model '{name}': {reason}")]
    InvalidModel { name: String, reason: String },

    #[error("model not present in scene: #{0}")]
    UnknownSceneModel(u64),
}
