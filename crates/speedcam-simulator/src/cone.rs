//! Forward detection sector.

use geo::{Contains, LineString, Point, Polygon};
use serde::Serialize;
use speedcam_domain::GeoPoint;

use crate::geodesy::destination_point;
use crate::kinematics::VehiclePose;

/// Tolerance on the arc loop bound so accumulated float error does not drop
/// the last regular vertex.
const ARC_EPSILON_DEG: f64 = 1e-9;

/// Polygon approximating the sector ahead of the vehicle.
///
/// Vertices start at the apex (vehicle position), sweep the arc from the
/// left edge to the right edge, and close implicitly back at the apex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionCone {
    pub vertices: Vec<GeoPoint>,
}

impl DetectionCone {
    /// Build the sector for `pose` with the given radius, half-angle and
    /// arc vertex spacing.
    #[must_use]
    pub fn new(pose: &VehiclePose, range_m: f64, half_angle_deg: f64, arc_step_deg: f64) -> Self {
        let apex = pose.position;
        let start = pose.heading_deg - half_angle_deg;
        let end = pose.heading_deg + half_angle_deg;

        let mut vertices = vec![apex];
        if arc_step_deg > 0.0 {
            let mut i = 0u32;
            loop {
                let bearing = start + f64::from(i) * arc_step_deg;
                if bearing > end + ARC_EPSILON_DEG {
                    break;
                }
                vertices.push(destination_point(apex, range_m, bearing));
                i += 1;
            }
        }
        // exact right edge, even when the span is a multiple of the step
        vertices.push(destination_point(apex, range_m, end));

        Self { vertices }
    }

    #[must_use]
    pub fn apex(&self) -> GeoPoint {
        self.vertices[0]
    }

    /// Closed `geo` polygon in (longitude, latitude) order.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring: LineString<f64> = self
            .vertices
            .iter()
            .map(|p| (p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .into();
        Polygon::new(ring, vec![])
    }

    /// Whether `point` lies strictly inside the sector polygon.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.to_polygon()
            .contains(&Point::new(point.longitude, point.latitude))
    }
}
