//! End-to-end driving scenarios through the public session API.

use speedcam_domain::{AlertState, CameraRecord, GeoPoint};
use speedcam_simulator::geodesy::{destination_point, distance_meters};
use speedcam_simulator::{EngineConfig, InputFlags, SimulationSession};

fn camera(position: GeoPoint, direction: &str, address: &str) -> CameraRecord {
    CameraRecord {
        city_name: "花蓮縣".to_string(),
        address: address.to_string(),
        latitude: format!("{:.7}", position.latitude),
        longitude: format!("{:.7}", position.longitude),
        direction: direction.to_string(),
        speed_limit: "60".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_passing_a_camera() {
    let mut session = SimulationSession::new(EngineConfig::default());
    let start = session.pose().position;
    session.load_cameras(vec![camera(destination_point(start, 300.0, 0.0), "南向北", "台9線")]);
    assert_eq!(session.snapshot().alert, AlertState::DirectionMatch);

    let forward = InputFlags::from_keys("w");
    let mut states = vec![session.snapshot().alert];
    for _ in 0..100 {
        session.step(forward);
        let alert = session.snapshot().alert;
        if states.last() != Some(&alert) {
            states.push(alert);
        }
    }

    assert_eq!(states, vec![AlertState::DirectionMatch, AlertState::None]);
    let snapshot = session.snapshot();
    let shown = snapshot.display.expect("camera behind is still the nearest");
    assert_eq!(shown.camera.address, "台9線");
    assert!(!shown.in_cone);
}

#[test]
fn test_wrong_way_camera_is_green() {
    let mut session = SimulationSession::new(EngineConfig::default());
    let start = session.pose().position;
    session.load_cameras(vec![camera(destination_point(start, 500.0, 5.0), "往南", "")]);

    session.step(InputFlags::from_keys("w"));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.alert, AlertState::DirectionMismatch);
    assert_eq!(snapshot.alert.as_str(), "GREEN");
}

#[test]
fn test_turning_away_clears_alert() {
    let mut session = SimulationSession::new(EngineConfig::default());
    let start = session.pose().position;
    session.load_cameras(vec![camera(destination_point(start, 400.0, 0.0), "", "")]);
    assert!(session.snapshot().alert.is_alert());

    // eight right turns put the camera 32 degrees to the left
    let right = InputFlags::from_keys("d");
    for _ in 0..8 {
        session.step(right);
    }
    assert_eq!(session.pose().heading_deg, 32.0);
    assert_eq!(session.snapshot().alert, AlertState::None);
}

#[test]
fn test_teleport_far_away_drops_alert() {
    let mut session = SimulationSession::new(EngineConfig::default());
    let start = session.pose().position;
    let spot = destination_point(start, 200.0, 0.0);
    session.load_cameras(vec![camera(spot, "", "")]);
    assert!(session.snapshot().alert.is_alert());

    session.teleport("22.6502", "120.3275").unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.alert, AlertState::None);
    assert!(snapshot.display.is_none());
    assert!(distance_meters(snapshot.position, spot) > 2000.0);
}
