// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host configuration loaded from environment variables.

use std::path::PathBuf;

/// Viewer host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Identifier of the display surface the viewer renders into.
    pub surface_id: String,
    /// Identifier of the panel the tree view populates.
    pub tree_panel_id: String,
    /// Base directory for model assets; models resolve as `<asset_base>/<name>.ifc`.
    pub asset_base: PathBuf,
    /// Directory holding the decoder's support data.
    pub decoder_data_dir: PathBuf,
    /// Render with a transparent background.
    pub transparent: bool,
    /// Enable the double-precision optimized geometry path.
    pub high_precision: bool,
}

impl HostConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            surface_id: std::env::var("BIMVIEW_SURFACE").unwrap_or_else(|_| "viewer-canvas".into()),
            tree_panel_id: std::env::var("BIMVIEW_TREE_PANEL")
                .unwrap_or_else(|_| "tree-panel".into()),
            asset_base: std::env::var("BIMVIEW_ASSET_BASE")
                .unwrap_or_else(|_| "./assets".into())
                .into(),
            decoder_data_dir: std::env::var("BIMVIEW_DECODER_DATA")
                .unwrap_or_else(|_| "./assets".into())
                .into(),
            transparent: std::env::var("BIMVIEW_TRANSPARENT")
                .map(|v| v != "0" && v != "false")
                .unwrap_or(true),
            high_precision: std::env::var("BIMVIEW_HIGH_PRECISION")
                .map(|v| v != "0" && v != "false")
                .unwrap_or(true),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
