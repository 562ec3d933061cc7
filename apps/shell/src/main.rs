// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bimview shell - interactive host for the viewer.
//!
//! Stands in for a UI surface with toggle controls: each line on stdin is one
//! toggle event against the viewer host.
//!
//! # Commands
//!
//! - `on <name>` - load `<asset_base>/<name>.ifc` and fly the camera to it
//! - `off <name>` - unload the model
//! - `list` - print summaries of the loaded models as JSON
//! - `quit` - exit

use bimview_viewer::{HostConfig, NullEngine, ViewerHost};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,bimview_viewer=debug".into()),
        )
        .init();

    let config = HostConfig::from_env();
    tracing::info!(
        surface = %config.surface_id,
        tree_panel = %config.tree_panel_id,
        asset_base = %config.asset_base.display(),
        decoder_data = %config.decoder_data_dir.display(),
        "Starting bimview shell"
    );

    let engine =
        NullEngine::with_surfaces([config.surface_id.clone(), config.tree_panel_id.clone()]);

    let mut host = match ViewerHost::initialize(engine, &config) {
        Ok(host) => host,
        Err(e) => {
            tracing::error!(error = %e, "viewer initialization failed");
            return;
        }
    };

    // A missing decoder payload leaves the host running but inert: every
    // load becomes a logged no-op, unloads still work.
    if let Err(e) = host.initialize_decoder(&config.decoder_data_dir).await {
        tracing::error!(error = %e, "decoder initialization failed; loads disabled");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("on"), Some(name)) => host.on_toggle(name, true).await,
            (Some("off"), Some(name)) => host.on_toggle(name, false).await,
            (Some("list"), None) => match serde_json::to_string_pretty(&host.loaded_models()) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!(error = %e, "failed to serialize model list"),
            },
            (Some("quit"), None) => break,
            (None, _) => {}
            _ => eprintln!("commands: on <name> | off <name> | list | quit"),
        }
    }

    tracing::info!("bimview shell exiting");
}
