//! Engine tuning constants.

use std::time::Duration;

use speedcam_domain::GeoPoint;

/// Latitude/longitude box, exclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Rough outline of Taiwan and its outlying islands.
    pub const TAIWAN: Self = Self {
        min_lat: 21.5,
        max_lat: 26.5,
        min_lon: 119.0,
        max_lon: 123.0,
    };

    #[must_use]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.latitude > self.min_lat
            && p.latitude < self.max_lat
            && p.longitude > self.min_lon
            && p.longitude < self.max_lon
    }
}

/// Simulation and alert parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Physics tick period
    pub tick: Duration,
    /// Heading change per tick per held turn key, degrees
    pub turn_rate_deg: f64,
    /// Position change per tick while driving, degrees of lat/lon
    pub step_deg: f64,
    /// Cameras closer than this can raise an alert
    pub alert_range_m: f64,
    /// Half-width of the forward detection cone
    pub cone_half_angle_deg: f64,
    /// Bearing spacing of cone arc vertices
    pub cone_arc_step_deg: f64,
    /// Cameras beyond this are ignored entirely
    pub cutoff_m: f64,
    /// Initial vehicle position
    pub start: GeoPoint,
    /// Teleport destination for out-of-bounds requests
    pub fallback: GeoPoint,
    /// Accepted teleport area
    pub teleport_bounds: Bounds,
    /// Quiet period before a reverse-geocode lookup fires
    pub geocode_debounce: Duration,
    /// Half-size of the visible camera marker window, degrees
    pub marker_window_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(33),
            turn_rate_deg: 4.0,
            step_deg: 0.000_06,
            alert_range_m: 700.0,
            cone_half_angle_deg: 30.0,
            cone_arc_step_deg: 6.0,
            cutoff_m: 2000.0,
            // Hualien, Provincial Highway 9
            start: GeoPoint::new(24.002_083, 121.599_724),
            // National Kaohsiung University of Science and Technology
            fallback: GeoPoint::new(22.6502, 120.3275),
            teleport_bounds: Bounds::TAIWAN,
            geocode_debounce: Duration::from_millis(1000),
            marker_window_deg: 0.05,
        }
    }
}
