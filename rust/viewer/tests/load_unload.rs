// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end toggle behavior against the headless engine.

use std::path::PathBuf;

use bimview_viewer::{HostConfig, NullEngine, ViewerHost};

const HOUSE_IFC: &str = "\
ISO-10303-21;
HEADER;
FILE_DESCRIPTION((''),'2;1');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('2O2Fr$t4X7Zf8NOew3FLOH',$,'house',$,$,$,$,$,$);
#2=IFCCARTESIANPOINT((0.,0.,0.));
#3=IFCCARTESIANPOINT((10.,5.,3.));
#4=IFCWALL('3ZYW59sxj8lei475l7EhLU',$,$,$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
";

/// Fresh per-test asset directory with `house.ifc` in place.
fn asset_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bimview-tests-{}-{tag}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("house.ifc"), HOUSE_IFC).unwrap();
    dir
}

fn config(assets: &PathBuf) -> HostConfig {
    HostConfig {
        surface_id: "viewer-canvas".into(),
        tree_panel_id: "tree-panel".into(),
        asset_base: assets.clone(),
        decoder_data_dir: assets.clone(),
        transparent: true,
        high_precision: true,
    }
}

async fn ready_host(tag: &str) -> (ViewerHost, NullEngine) {
    let assets = asset_dir(tag);
    let engine = NullEngine::with_surfaces(["viewer-canvas", "tree-panel"]);
    let probe = engine.clone();
    let mut host = ViewerHost::initialize(engine, &config(&assets)).unwrap();
    host.initialize_decoder(&assets).await.unwrap();
    (host, probe)
}

#[tokio::test]
async fn toggle_on_loads_and_frames_model() {
    let (mut host, probe) = ready_host("toggle-on").await;

    host.on_toggle("house", true).await;

    assert_eq!(probe.model_count(), 1);
    assert!(probe.contains_model("house"));

    let loaded = host.loaded_models();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].entity_count, 4);

    // Camera flight targeted the decoded bounds, strictly after insertion.
    let target = probe.camera_target().expect("camera flight recorded");
    assert_eq!(target.centroid(), (5.0, 2.5, 1.5));

    // Tree view picked up the model.
    let nodes = host.tree_view().unwrap().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].model, "house");
}

#[tokio::test]
async fn repeated_load_keeps_single_entry() {
    let (mut host, probe) = ready_host("repeat-load").await;

    host.load("house").await.unwrap();
    host.load("house").await.unwrap();

    assert_eq!(host.registry_len(), 1);
    assert_eq!(probe.model_count(), 1);
}

#[tokio::test]
async fn unload_of_absent_model_is_noop() {
    let (mut host, probe) = ready_host("unload-absent").await;

    host.on_toggle("house", false).await;

    assert_eq!(host.registry_len(), 0);
    assert_eq!(probe.model_count(), 0);
}

#[tokio::test]
async fn load_unload_roundtrip_leaves_no_entries() {
    let (mut host, probe) = ready_host("roundtrip").await;

    host.on_toggle("house", true).await;
    host.on_toggle("house", false).await;

    assert_eq!(host.registry_len(), 0);
    assert_eq!(probe.model_count(), 0);
    assert!(host.tree_view().unwrap().nodes().is_empty());

    // The name is free again after the roundtrip.
    host.on_toggle("house", true).await;
    assert_eq!(probe.model_count(), 1);
}

#[tokio::test]
async fn load_before_decoder_ready_is_noop() {
    let assets = asset_dir("not-ready");
    let engine = NullEngine::with_surfaces(["viewer-canvas", "tree-panel"]);
    let probe = engine.clone();
    let mut host = ViewerHost::initialize(engine, &config(&assets)).unwrap();

    assert!(!host.is_ready());
    host.on_toggle("house", true).await;

    assert_eq!(host.registry_len(), 0);
    assert_eq!(probe.model_count(), 0);
}

#[tokio::test]
async fn failed_load_rolls_back_and_allows_retry() {
    let (mut host, probe) = ready_host("rollback").await;

    // No such asset file.
    assert!(host.load("tower").await.is_err());
    assert_eq!(host.registry_len(), 0);
    assert_eq!(probe.model_count(), 0);

    // A later toggle for a valid model is unaffected.
    host.on_toggle("house", true).await;
    assert_eq!(probe.model_count(), 1);
}

#[tokio::test]
async fn malformed_model_is_rejected() {
    let assets = asset_dir("malformed");
    std::fs::write(assets.join("garbage.ifc"), "<html>nope</html>").unwrap();

    let engine = NullEngine::with_surfaces(["viewer-canvas", "tree-panel"]);
    let probe = engine.clone();
    let mut host = ViewerHost::initialize(engine, &config(&assets)).unwrap();
    host.initialize_decoder(&assets).await.unwrap();

    assert!(host.load("garbage").await.is_err());
    assert_eq!(host.registry_len(), 0);
    assert_eq!(probe.model_count(), 0);
}

#[tokio::test]
async fn missing_display_surface_fails_initialization() {
    let assets = asset_dir("no-surface");
    let engine = NullEngine::with_surfaces(["tree-panel"]);
    assert!(ViewerHost::initialize(engine, &config(&assets)).is_err());
}

#[tokio::test]
async fn missing_tree_panel_only_disables_tree_view() {
    let assets = asset_dir("no-panel");
    let engine = NullEngine::with_surfaces(["viewer-canvas"]);
    let probe = engine.clone();
    let mut host = ViewerHost::initialize(engine, &config(&assets)).unwrap();
    host.initialize_decoder(&assets).await.unwrap();

    assert!(host.tree_view().is_none());
    host.on_toggle("house", true).await;
    assert_eq!(probe.model_count(), 1);
}

#[tokio::test]
async fn missing_decoder_payload_keeps_host_inert() {
    let assets = asset_dir("no-decoder");
    let engine = NullEngine::with_surfaces(["viewer-canvas", "tree-panel"]);
    let probe = engine.clone();
    let mut host = ViewerHost::initialize(engine, &config(&assets)).unwrap();

    let missing = assets.join("does-not-exist");
    assert!(host.initialize_decoder(&missing).await.is_err());
    assert!(!host.is_ready());

    host.on_toggle("house", true).await;
    assert_eq!(probe.model_count(), 0);
}
