//! Tick loop driving a [`SimulationSession`].
//!
//! One task owns the session. Held controls arrive through a `watch`
//! channel and are sampled once at the start of every tick; discrete
//! commands (teleport, status, quit) arrive through an `mpsc` channel.
//! Camera loading and reverse geocoding run as side tasks whose results are
//! folded back in by the same loop.

use std::future::Future;

use serde::Serialize;
use speedcam_domain::{AlertState, GeoPoint};
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::geocode::{GEOCODING_DISABLED, SharedGeocoder, describe};
use crate::kinematics::InputFlags;
use crate::session::{SessionSnapshot, SimulationSession};
use crate::source::CameraFeed;

/// Discrete operator commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Jump { lat: String, lon: String },
    Status,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Log a snapshot every N ticks; 0 disables periodic reports
    pub report_every: u64,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

/// Alert identity used to detect transitions between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AlertKey {
    state: AlertState,
    camera: Option<usize>,
}

impl AlertKey {
    fn of(snapshot: &SessionSnapshot) -> Self {
        let camera = snapshot
            .display
            .as_ref()
            .filter(|_| snapshot.alert.is_alert())
            .map(|c| c.index);
        Self {
            state: snapshot.alert,
            camera,
        }
    }
}

pub struct Runtime {
    session: SimulationSession,
    feed: CameraFeed,
    geocoder: Option<SharedGeocoder>,
    options: RuntimeOptions,
}

impl Runtime {
    #[must_use]
    pub fn new(session: SimulationSession, feed: CameraFeed) -> Self {
        Self {
            session,
            feed,
            geocoder: None,
            options: RuntimeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_geocoder(mut self, geocoder: SharedGeocoder) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    /// Run until `shutdown` resolves, a quit command arrives or the tick
    /// limit is reached. Returns the final session.
    pub async fn run(
        self,
        input: watch::Receiver<InputFlags>,
        mut control: mpsc::Receiver<Control>,
        shutdown: impl Future<Output = ()>,
    ) -> SimulationSession {
        let Self {
            mut session,
            feed,
            geocoder,
            options,
        } = self;

        let mut ticker = interval(session.config().tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let (address_tx, mut address_rx) = mpsc::channel::<String>(4);
        let mut debouncer = Debouncer::new(session.config().geocode_debounce, address_tx);
        let geocode = |debouncer: &mut Debouncer<String>, point: GeoPoint| {
            if let Some(geocoder) = geocoder.clone() {
                debouncer.schedule(async move { describe(geocoder.as_ref(), point).await });
            }
        };

        if geocoder.is_none() {
            session.set_address(GEOCODING_DISABLED);
        }
        geocode(&mut debouncer, session.pose().position);

        let mut loading = tokio::spawn(async move { feed.load().await });
        let mut cameras_pending = true;
        let mut control_open = true;

        let mut last_alert = AlertKey::of(&session.snapshot());
        tokio::pin!(shutdown);

        info!(
            start = %session.pose().position,
            tick = ?session.config().tick,
            "Simulation started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let flags = *input.borrow();
                    let before = session.pose().position;
                    session.step(flags);
                    if session.pose().position != before {
                        geocode(&mut debouncer, session.pose().position);
                    }

                    let snapshot = session.snapshot();
                    if options.report_every > 0 && snapshot.tick % options.report_every == 0 {
                        log_snapshot(&snapshot);
                    }
                    if options.max_ticks.is_some_and(|max| snapshot.tick >= max) {
                        debug!(tick = snapshot.tick, "Tick limit reached");
                        break;
                    }
                }

                joined = &mut loading, if cameras_pending => {
                    cameras_pending = false;
                    match joined {
                        Ok(Ok(records)) => {
                            session.load_cameras(records);
                            info!(
                                total = session.cameras().len(),
                                located = session.cameras().located_count(),
                                "Camera set ready"
                            );
                        }
                        Ok(Err(err)) => warn!(error = %err, "Camera load failed; running without cameras"),
                        Err(err) => warn!(error = %err, "Camera load task failed"),
                    }
                }

                Some(address) = address_rx.recv() => {
                    debug!(%address, "Address updated");
                    session.set_address(address);
                }

                command = control.recv(), if control_open => match command {
                    Some(Control::Jump { lat, lon }) => match session.teleport(&lat, &lon) {
                        Ok(outcome) => {
                            info!(to = %outcome.destination(), message = ?session.message(), "Teleported");
                            geocode(&mut debouncer, session.pose().position);
                        }
                        Err(err) => warn!(error = %err, "Teleport rejected"),
                    },
                    Some(Control::Status) => log_snapshot(&session.snapshot()),
                    Some(Control::Quit) => break,
                    None => control_open = false,
                },

                () = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }

            let current = AlertKey::of(&session.snapshot());
            if current != last_alert {
                log_transition(&session.snapshot());
                last_alert = current;
            }
        }

        debouncer.cancel();
        if cameras_pending {
            loading.abort();
        }
        info!(ticks = session.tick_count(), "Simulation stopped");
        session
    }
}

fn log_transition(snapshot: &SessionSnapshot) {
    match (&snapshot.display, snapshot.alert) {
        (Some(camera), AlertState::DirectionMatch | AlertState::DirectionMismatch) => warn!(
            alert = snapshot.alert.as_str(),
            distance_m = camera.distance_m.round(),
            relative_bearing_deg = %format!("{:.1}", camera.relative_bearing_deg),
            side = ?camera.relative_position(),
            address = %camera.camera.address,
            direction = %camera.camera.direction,
            limit = %camera.camera.speed_limit,
            "Speed camera ahead"
        ),
        _ => info!(alert = snapshot.alert.as_str(), "Alert cleared"),
    }
}

fn log_snapshot(snapshot: &SessionSnapshot) {
    info!(
        tick = snapshot.tick,
        position = %snapshot.position,
        heading = %format!("{:.0}", snapshot.heading_deg),
        cardinal = snapshot.cardinal.as_str(),
        alert = snapshot.alert.as_str(),
        address = %snapshot.address,
        "Status"
    );
    if let Ok(json) = serde_json::to_string(&SnapshotLine::from(snapshot)) {
        debug!(snapshot = %json);
    }
}

/// Compact snapshot for machine-readable debug output.
#[derive(Serialize)]
struct SnapshotLine<'a> {
    tick: u64,
    lat: f64,
    lon: f64,
    heading: f64,
    alert: &'static str,
    distance_m: Option<f64>,
    address: &'a str,
}

impl<'a> From<&'a SessionSnapshot> for SnapshotLine<'a> {
    fn from(s: &'a SessionSnapshot) -> Self {
        Self {
            tick: s.tick,
            lat: s.position.latitude,
            lon: s.position.longitude,
            heading: s.heading_deg,
            alert: s.alert.as_str(),
            distance_m: s.display.as_ref().map(|c| c.distance_m),
            address: &s.address,
        }
    }
}
