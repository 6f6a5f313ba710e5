//! Proximity and forward-cone alert resolution.
//!
//! Every evaluation is a pure function of the vehicle pose and the camera
//! set. Cameras are scanned in load order and a later camera only replaces
//! a running minimum when strictly closer, so ties go to the camera loaded
//! first.

use serde::Serialize;
use speedcam_domain::{AlertState, CameraRecord, Cardinal, GeoPoint};

use crate::config::EngineConfig;
use crate::direction::DirectionLabel;
use crate::geodesy::{distance_meters, initial_bearing_degrees, normalize_relative};
use crate::kinematics::VehiclePose;

/// Relative angle, in degrees, inside which a camera counts as dead ahead.
const AHEAD_TOLERANCE_DEG: f64 = 5.0;

/// Camera with its coordinates parsed once at load time.
#[derive(Debug, Clone)]
struct LoadedCamera {
    record: CameraRecord,
    position: Option<GeoPoint>,
}

/// Immutable camera collection for one session.
#[derive(Debug, Clone, Default)]
pub struct CameraSet {
    cameras: Vec<LoadedCamera>,
}

impl CameraSet {
    #[must_use]
    pub fn new(records: Vec<CameraRecord>) -> Self {
        let cameras = records
            .into_iter()
            .map(|record| {
                let position = record.position().filter(GeoPoint::is_finite);
                LoadedCamera { record, position }
            })
            .collect();
        Self { cameras }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Cameras with usable coordinates.
    #[must_use]
    pub fn located_count(&self) -> usize {
        self.cameras.iter().filter(|c| c.position.is_some()).count()
    }

    /// Located cameras within `half_deg` degrees of `center` on both axes.
    pub fn within_window(
        &self,
        center: GeoPoint,
        half_deg: f64,
    ) -> impl Iterator<Item = (&CameraRecord, GeoPoint)> {
        self.cameras.iter().filter_map(move |c| {
            c.position
                .filter(|p| p.within_window(&center, half_deg))
                .map(|p| (&c.record, p))
        })
    }
}

/// Where a candidate sits relative to the nose of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelativePosition {
    Ahead,
    LeftFront,
    RightFront,
}

/// Camera measured against the current pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatCandidate {
    /// Position in the camera set
    pub index: usize,
    pub camera: CameraRecord,
    pub position: GeoPoint,
    pub distance_m: f64,
    /// Bearing to the camera minus vehicle heading, in `(-180, 180]`
    pub relative_bearing_deg: f64,
    pub in_cone: bool,
    pub in_range: bool,
}

impl ThreatCandidate {
    #[must_use]
    pub fn relative_position(&self) -> RelativePosition {
        if self.relative_bearing_deg > AHEAD_TOLERANCE_DEG {
            RelativePosition::RightFront
        } else if self.relative_bearing_deg < -AHEAD_TOLERANCE_DEG {
            RelativePosition::LeftFront
        } else {
            RelativePosition::Ahead
        }
    }
}

/// Output of one resolver pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub state: AlertState,
    /// Candidate to show: the threat when alerting, otherwise the nearest camera
    pub display: Option<ThreatCandidate>,
    /// Nearest camera within the cutoff regardless of cone or range
    pub nearest_any: Option<ThreatCandidate>,
    pub vehicle_cardinal: Cardinal,
    /// Parsed label of the threat, when there is one
    pub threat_direction: Option<DirectionLabel>,
}

impl Resolution {
    fn idle(cardinal: Cardinal) -> Self {
        Self {
            state: AlertState::None,
            display: None,
            nearest_any: None,
            vehicle_cardinal: cardinal,
            threat_direction: None,
        }
    }
}

/// Scan-time measurement, materialized into a candidate only for winners.
#[derive(Debug, Clone, Copy)]
struct Measurement {
    index: usize,
    position: GeoPoint,
    distance_m: f64,
    relative_bearing_deg: f64,
    in_cone: bool,
    in_range: bool,
}

/// Alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertResolver {
    pub alert_range_m: f64,
    pub cone_half_angle_deg: f64,
    pub cutoff_m: f64,
}

impl Default for AlertResolver {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl AlertResolver {
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            alert_range_m: config.alert_range_m,
            cone_half_angle_deg: config.cone_half_angle_deg,
            cutoff_m: config.cutoff_m,
        }
    }

    fn measure(&self, pose: &VehiclePose, index: usize, position: GeoPoint) -> Option<Measurement> {
        let distance_m = distance_meters(pose.position, position);
        // also rejects NaN
        if !(distance_m <= self.cutoff_m) {
            return None;
        }

        let bearing = initial_bearing_degrees(pose.position, position);
        let relative_bearing_deg = normalize_relative(bearing - pose.heading_deg);

        Some(Measurement {
            index,
            position,
            distance_m,
            relative_bearing_deg,
            in_cone: relative_bearing_deg.abs() <= self.cone_half_angle_deg,
            in_range: distance_m < self.alert_range_m,
        })
    }

    fn candidate(cameras: &CameraSet, m: Measurement) -> ThreatCandidate {
        ThreatCandidate {
            index: m.index,
            camera: cameras.cameras[m.index].record.clone(),
            position: m.position,
            distance_m: m.distance_m,
            relative_bearing_deg: m.relative_bearing_deg,
            in_cone: m.in_cone,
            in_range: m.in_range,
        }
    }

    /// Evaluate `pose` against every camera.
    #[must_use]
    pub fn resolve(&self, pose: &VehiclePose, cameras: &CameraSet) -> Resolution {
        let cardinal = pose.cardinal();
        let mut nearest_any: Option<Measurement> = None;
        let mut best_threat: Option<Measurement> = None;

        for (index, camera) in cameras.cameras.iter().enumerate() {
            let Some(position) = camera.position else {
                continue;
            };
            let Some(m) = self.measure(pose, index, position) else {
                continue;
            };

            if nearest_any.is_none_or(|best| m.distance_m < best.distance_m) {
                nearest_any = Some(m);
            }
            if m.in_range
                && m.in_cone
                && best_threat.is_none_or(|best| m.distance_m < best.distance_m)
            {
                best_threat = Some(m);
            }
        }

        let mut resolution = Resolution::idle(cardinal);
        resolution.nearest_any = nearest_any.map(|m| Self::candidate(cameras, m));

        match best_threat {
            Some(threat) => {
                let label = DirectionLabel::parse(&cameras.cameras[threat.index].record.direction);
                resolution.state = if label.matches(cardinal) {
                    AlertState::DirectionMatch
                } else {
                    AlertState::DirectionMismatch
                };
                resolution.display = Some(Self::candidate(cameras, threat));
                resolution.threat_direction = Some(label);
            }
            None => {
                resolution.display.clone_from(&resolution.nearest_any);
            }
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::destination_point;

    const ORIGIN: GeoPoint = GeoPoint::new(23.0, 121.0);

    fn camera_at(position: GeoPoint, direction: &str, address: &str) -> CameraRecord {
        CameraRecord {
            city_name: "花蓮縣".to_string(),
            address: address.to_string(),
            latitude: position.latitude.to_string(),
            longitude: position.longitude.to_string(),
            direction: direction.to_string(),
            speed_limit: "70".to_string(),
            ..Default::default()
        }
    }

    fn camera(distance: f64, bearing: f64, direction: &str) -> CameraRecord {
        camera_at(destination_point(ORIGIN, distance, bearing), direction, "")
    }

    fn resolve(heading: f64, records: Vec<CameraRecord>) -> Resolution {
        AlertResolver::default().resolve(&VehiclePose::new(ORIGIN, heading), &CameraSet::new(records))
    }

    #[test]
    fn test_bidirectional_camera_ahead_alerts() {
        let r = resolve(0.0, vec![camera(500.0, 10.0, "bidirectional")]);
        assert_eq!(r.state, AlertState::DirectionMatch);
        let display = r.display.unwrap();
        assert!((display.distance_m - 500.0).abs() < 0.5);
        assert!((display.relative_bearing_deg - 10.0).abs() < 0.01);
        assert_eq!(display.relative_position(), RelativePosition::RightFront);
        assert_eq!(r.threat_direction, Some(DirectionLabel::Bidirectional));
    }

    #[test]
    fn test_direction_mismatch() {
        // heading south, camera 10 degrees right of the nose, enforcing northbound
        let r = resolve(180.0, vec![camera(500.0, 190.0, "North")]);
        assert_eq!(r.vehicle_cardinal, Cardinal::South);
        assert_eq!(r.state, AlertState::DirectionMismatch);
        assert!(r.display.is_some());
    }

    #[test]
    fn test_matching_glyph() {
        let r = resolve(180.0, vec![camera(300.0, 175.0, "往南")]);
        assert_eq!(r.state, AlertState::DirectionMatch);
        assert_eq!(r.display.unwrap().relative_position(), RelativePosition::Ahead);
    }

    #[test]
    fn test_unlabelled_camera_always_alerts() {
        let r = resolve(90.0, vec![camera(200.0, 80.0, "")]);
        assert_eq!(r.state, AlertState::DirectionMatch);
    }

    #[test]
    fn test_out_of_range_only_nearest() {
        let r = resolve(0.0, vec![camera(1500.0, 0.0, "bidirectional")]);
        assert_eq!(r.state, AlertState::None);
        let nearest = r.nearest_any.unwrap();
        assert!(nearest.in_cone);
        assert!(!nearest.in_range);
        assert_eq!(r.display.unwrap().index, 0);
    }

    #[test]
    fn test_beyond_cutoff_excluded() {
        let r = resolve(0.0, vec![camera(2500.0, 0.0, "bidirectional")]);
        assert_eq!(r.state, AlertState::None);
        assert!(r.nearest_any.is_none());
        assert!(r.display.is_none());
    }

    #[test]
    fn test_outside_cone_not_a_threat() {
        let r = resolve(0.0, vec![camera(100.0, 45.0, "")]);
        assert_eq!(r.state, AlertState::None);
        let display = r.display.unwrap();
        assert!(!display.in_cone);
        assert_eq!(display.relative_position(), RelativePosition::RightFront);
    }

    #[test]
    fn test_behind_is_not_a_threat() {
        let r = resolve(0.0, vec![camera(100.0, 180.0, "")]);
        assert_eq!(r.state, AlertState::None);
        assert!((r.display.unwrap().relative_bearing_deg.abs() - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_threat_preferred_over_closer_non_threat() {
        let r = resolve(
            0.0,
            vec![camera(100.0, 90.0, "西"), camera(400.0, 0.0, "北")],
        );
        assert_eq!(r.state, AlertState::DirectionMatch);
        assert_eq!(r.display.unwrap().index, 1);
        assert_eq!(r.nearest_any.unwrap().index, 0);
    }

    #[test]
    fn test_ties_keep_first_loaded() {
        let spot = destination_point(ORIGIN, 300.0, 0.0);
        let r = resolve(
            0.0,
            vec![camera_at(spot, "", "first"), camera_at(spot, "", "second")],
        );
        let display = r.display.unwrap();
        assert_eq!(display.index, 0);
        assert_eq!(display.camera.address, "first");
        assert_eq!(r.nearest_any.unwrap().index, 0);
    }

    #[test]
    fn test_malformed_coordinates_skipped() {
        let mut bad = camera(100.0, 0.0, "");
        bad.latitude = "n/a".to_string();
        let good = camera(600.0, 0.0, "");
        let r = resolve(0.0, vec![bad, good]);
        assert_eq!(r.display.unwrap().index, 1);
    }

    #[test]
    fn test_empty_set() {
        let r = resolve(0.0, vec![]);
        assert_eq!(r.state, AlertState::None);
        assert!(r.display.is_none());
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            camera(500.0, 10.0, "North"),
            camera(650.0, -20.0, ""),
            camera(1800.0, 120.0, ""),
        ];
        let set = CameraSet::new(records);
        let pose = VehiclePose::new(ORIGIN, 0.0);
        let resolver = AlertResolver::default();
        assert_eq!(resolver.resolve(&pose, &set), resolver.resolve(&pose, &set));
    }

    #[test]
    fn test_window() {
        let set = CameraSet::new(vec![
            camera(1000.0, 0.0, ""),
            camera_at(GeoPoint::new(23.2, 121.0), "", ""),
        ]);
        assert_eq!(set.within_window(ORIGIN, 0.05).count(), 1);
        assert_eq!(set.located_count(), 2);
    }
}
