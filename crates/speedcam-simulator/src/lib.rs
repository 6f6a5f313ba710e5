//! # Speed Camera Simulator
//!
//! Drive a virtual vehicle over a camera map and raise proximity alerts.
//!
//! ## Pipeline per tick
//!
//! 1. Sample the held controls ([`InputFlags`])
//! 2. Integrate heading and position ([`kinematics::step`])
//! 3. Measure every camera against the pose and pick the nearest threat
//!    inside the forward cone ([`AlertResolver`])
//! 4. Publish a [`SessionSnapshot`]
//!
//! Reverse geocoding of the position runs beside the loop, debounced.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod alert;
pub mod cone;
pub mod config;
pub mod debounce;
pub mod direction;
pub mod error;
pub mod geocode;
pub mod geodesy;
pub mod input;
pub mod kinematics;
pub mod runtime;
pub mod session;
pub mod source;
pub mod teleport;

pub use alert::{AlertResolver, CameraSet, RelativePosition, Resolution, ThreatCandidate};
pub use cone::DetectionCone;
pub use config::{Bounds, EngineConfig};
pub use direction::DirectionLabel;
pub use error::{Result, SimulatorError};
pub use geocode::{FixedGeocoder, NominatimGeocoder, ReverseGeocoder, SharedGeocoder};
pub use input::{Command, parse_command};
pub use kinematics::{InputFlags, Motion, VehiclePose};
pub use runtime::{Control, Runtime, RuntimeOptions};
pub use session::{SessionSnapshot, SimulationSession};
pub use source::CameraFeed;
pub use teleport::{TeleportError, TeleportOutcome, resolve_teleport};
