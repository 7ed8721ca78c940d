//! Drives a root space flow through the facade the way an app would:
//! one shared wake signal, a driver task, and screen input from outside.

use spaceflow::prelude::*;
use spaceflow_test::{
    RecordingIndicators, RecordingNavigationStack, RecordingSink, ScriptedSpaceService,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_root_flow_runs_until_user_leaves() {
    let nav = Arc::new(RecordingNavigationStack::new());
    let outward = Arc::new(RecordingSink::new());
    let env = FlowEnvironment::new(
        nav.clone(),
        Arc::new(ScriptedSpaceService::new()),
        Arc::new(RecordingIndicators::new()),
        FlowConfig::default(),
    );
    let space = SpaceHandle::new("!home:example.org", "Home");
    let mut flow = SpaceFlowCoordinator::new(
        env,
        SpaceEntryPoint::Space(space.clone()),
        Presentation::Root,
        outward.clone(),
    );
    flow.start(false);

    nav.send_to_top(ScreenAction::SelectRoom(RoomId::new("!lobby:example.org")));
    nav.send_to_root(ScreenAction::Leave);

    tokio::time::timeout(Duration::from_secs(2), flow.run())
        .await
        .expect("flow should finish after leaving");

    assert_eq!(*flow.state(), SpaceFlowState::LeftSpace);
    assert_eq!(outward.actions(), vec![FlowAction::Finished]);
    assert_eq!(nav.root_kind(), None);
    assert_eq!(
        flow.timeline().path(),
        vec!["space", "roomFlow", "space", "leftSpace"]
    );
}

#[test]
fn test_schematic_exports_as_json() {
    let json = serde_json::to_value(SpaceFlowCoordinator::schematic()).unwrap();

    assert_eq!(json["name"], "SpaceFlow");
    let rows: Vec<&str> = json["edges"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|edge| edge["row"].as_str())
        .collect();
    assert!(rows.contains(&"startRoomFlow"));
    assert!(rows.contains(&"dismiss"));
}
