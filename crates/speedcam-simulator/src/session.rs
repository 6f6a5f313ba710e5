//! Simulation session: the single owner of all mutable driving state.

use serde::Serialize;
use speedcam_domain::{AlertState, CameraRecord, Cardinal, GeoPoint};

use crate::alert::{AlertResolver, CameraSet, RelativePosition, Resolution, ThreatCandidate};
use crate::config::EngineConfig;
use crate::cone::DetectionCone;
use crate::geocode::LOCATING;
use crate::kinematics::{self, InputFlags, Motion, VehiclePose};
use crate::teleport::{TeleportError, TeleportOutcome, resolve_teleport};

/// Read-only view handed to the render layer once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub position: GeoPoint,
    pub heading_deg: f64,
    pub cardinal: Cardinal,
    pub moving: bool,
    pub alert: AlertState,
    pub display: Option<ThreatCandidate>,
    pub relative_position: Option<RelativePosition>,
    pub address: String,
    pub message: Option<String>,
    pub camera_count: usize,
}

/// Pose, cameras and derived alert for one driver.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    config: EngineConfig,
    resolver: AlertResolver,
    pose: VehiclePose,
    moving: bool,
    cameras: CameraSet,
    resolution: Resolution,
    address: String,
    message: Option<String>,
    tick: u64,
}

impl SimulationSession {
    /// Session at the configured start point, heading north, no cameras.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let pose = VehiclePose::new(config.start, 0.0);
        let resolver = AlertResolver::from_config(&config);
        let cameras = CameraSet::default();
        let resolution = resolver.resolve(&pose, &cameras);

        Self {
            config,
            resolver,
            pose,
            moving: false,
            cameras,
            resolution,
            address: LOCATING.to_string(),
            message: None,
            tick: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pose(&self) -> VehiclePose {
        self.pose
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn cameras(&self) -> &CameraSet {
        &self.cameras
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    fn reevaluate(&mut self) {
        self.resolution = self.resolver.resolve(&self.pose, &self.cameras);
    }

    /// Advance one tick with the input snapshot taken at tick start.
    pub fn step(&mut self, input: InputFlags) -> Motion {
        self.tick += 1;
        let motion = kinematics::step(&mut self.pose, input, &self.config);
        self.moving = motion == Motion::Moved;
        if self.moving {
            self.reevaluate();
        }
        motion
    }

    /// Replace the camera set and re-run the resolver.
    pub fn load_cameras(&mut self, records: Vec<CameraRecord>) {
        self.cameras = CameraSet::new(records);
        self.reevaluate();
    }

    /// Move the vehicle to raw coordinates entered by the operator.
    ///
    /// Heading is kept. Unreadable input leaves the pose alone and sets the
    /// error as the session message.
    ///
    /// # Errors
    ///
    /// Returns the [`TeleportError`] that was also stored as the message.
    pub fn teleport(&mut self, lat: &str, lon: &str) -> Result<TeleportOutcome, TeleportError> {
        match resolve_teleport(lat, lon, &self.config) {
            Ok(outcome) => {
                self.pose.position = outcome.destination();
                self.message = outcome.message();
                self.reevaluate();
                Ok(outcome)
            }
            Err(err) => {
                self.message = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let display = self.resolution.display.clone();
        SessionSnapshot {
            tick: self.tick,
            position: self.pose.position,
            heading_deg: self.pose.heading_deg,
            cardinal: self.resolution.vehicle_cardinal,
            moving: self.moving,
            alert: self.resolution.state,
            relative_position: display.as_ref().map(ThreatCandidate::relative_position),
            display,
            address: self.address.clone(),
            message: self.message.clone(),
            camera_count: self.cameras.len(),
        }
    }

    /// Detection sector for the current pose.
    #[must_use]
    pub fn cone(&self) -> DetectionCone {
        DetectionCone::new(
            &self.pose,
            self.config.alert_range_m,
            self.config.cone_half_angle_deg,
            self.config.cone_arc_step_deg,
        )
    }

    /// Cameras inside the marker window around the vehicle.
    pub fn visible_cameras(&self) -> impl Iterator<Item = (&CameraRecord, GeoPoint)> {
        self.cameras
            .within_window(self.pose.position, self.config.marker_window_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::destination_point;

    fn record(position: GeoPoint, direction: &str) -> CameraRecord {
        CameraRecord {
            city_name: "花蓮縣".to_string(),
            latitude: position.latitude.to_string(),
            longitude: position.longitude.to_string(),
            direction: direction.to_string(),
            speed_limit: "60".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session() {
        let session = SimulationSession::new(EngineConfig::default());
        let snap = session.snapshot();
        assert_eq!(snap.position, EngineConfig::default().start);
        assert_eq!(snap.heading_deg, 0.0);
        assert_eq!(snap.alert, AlertState::None);
        assert_eq!(snap.address, LOCATING);
        assert_eq!(snap.camera_count, 0);
        assert!(!snap.moving);
    }

    #[test]
    fn test_loading_cameras_resolves_immediately() {
        let mut session = SimulationSession::new(EngineConfig::default());
        let start = session.pose().position;
        session.load_cameras(vec![record(destination_point(start, 400.0, 0.0), "往北")]);
        assert_eq!(session.resolution().state, AlertState::DirectionMatch);
    }

    #[test]
    fn test_driving_into_range() {
        let mut session = SimulationSession::new(EngineConfig::default());
        let start = session.pose().position;
        session.load_cameras(vec![record(destination_point(start, 720.0, 0.0), "")]);
        assert_eq!(session.resolution().state, AlertState::None);

        let forward = InputFlags::from_keys("w");
        // 0.00006 deg of latitude is about 6.7 m
        for _ in 0..10 {
            session.step(forward);
        }
        let snap = session.snapshot();
        assert!(snap.moving);
        assert_eq!(snap.tick, 10);
        assert_eq!(snap.alert, AlertState::DirectionMatch);
        assert_eq!(snap.relative_position, Some(RelativePosition::Ahead));

        session.step(InputFlags::default());
        assert!(!session.snapshot().moving);
        assert_eq!(session.snapshot().alert, AlertState::DirectionMatch);
    }

    #[test]
    fn test_teleport_keeps_heading() {
        let mut session = SimulationSession::new(EngineConfig::default());
        session.step(InputFlags::from_keys("d"));
        let heading = session.pose().heading_deg;

        session.teleport("23.5", "121.0").unwrap();
        assert_eq!(session.pose().position, GeoPoint::new(23.5, 121.0));
        assert_eq!(session.pose().heading_deg, heading);
        assert!(session.message().is_none());
    }

    #[test]
    fn test_teleport_format_error_leaves_pose() {
        let mut session = SimulationSession::new(EngineConfig::default());
        let before = session.pose();
        assert!(session.teleport("north", "121").is_err());
        assert_eq!(session.pose(), before);
        assert!(session.message().unwrap().starts_with("format error"));
    }

    #[test]
    fn test_teleport_outside_uses_fallback() {
        let mut session = SimulationSession::new(EngineConfig::default());
        session.teleport("35.0", "139.0").unwrap();
        assert_eq!(session.pose().position, GeoPoint::new(22.6502, 120.3275));
        assert!(session.message().is_some());

        session.teleport("23.0", "121.0").unwrap();
        assert!(session.message().is_none());
    }

    #[test]
    fn test_visible_cameras_window() {
        let mut session = SimulationSession::new(EngineConfig::default());
        let start = session.pose().position;
        session.load_cameras(vec![
            record(destination_point(start, 1000.0, 45.0), ""),
            record(GeoPoint::new(start.latitude + 0.2, start.longitude), ""),
        ]);
        assert_eq!(session.visible_cameras().count(), 1);
    }

    #[test]
    fn test_cone_follows_pose() {
        let mut session = SimulationSession::new(EngineConfig::default());
        session.step(InputFlags::from_keys("w"));
        assert_eq!(session.cone().apex(), session.pose().position);
    }
}
