// src/fix.rs
//! Fix accumulation state machine
//!
//! Position and timing arrive in separate sentences at independent
//! cadences, with no cross-sentence sequence numbers in the protocol.
//! The assembler correlates them by "most recent value of each kind
//! since the last flush" and emits a snapshot once both halves are
//! present.

use crate::nmea::units;

/// In-progress accumulator; owned exclusively by the assembler, one
/// instance live per ingestion session.
#[derive(Debug, Clone, Default)]
struct PartialFix {
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude_meters: Option<f64>,
    timestamp: Option<String>,
}

impl PartialFix {
    fn is_complete(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some() && self.timestamp.is_some()
    }
}

/// Observable assembler state. `Complete` is transient: the snapshot
/// is emitted and the accumulator reset in the same step, so callers
/// only ever observe `Empty` or `Partial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixState {
    Empty,
    Partial,
}

/// An immutable snapshot of an accumulator at the moment it became
/// complete. Consumed exactly once by the persistence sink.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedFix {
    /// Local time, fixed format (see `nmea::time`)
    pub timestamp: String,
    /// Signed decimal degrees, six fractional digits
    pub latitude: String,
    pub longitude: String,
    /// Feet with two fractional digits, or the unavailable marker
    pub altitude: String,
}

/// Marker recorded when a fix completed without an altitude. Absence
/// of altitude never blocks completion.
pub const ALTITUDE_UNAVAILABLE: &str = "N/A";

/// Correlates position and timing halves into completed fixes.
#[derive(Debug, Default)]
pub struct FixAssembler {
    partial: PartialFix,
}

impl FixAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FixState {
        let p = &self.partial;
        if p.latitude.is_none()
            && p.longitude.is_none()
            && p.altitude_meters.is_none()
            && p.timestamp.is_none()
        {
            FixState::Empty
        } else {
            FixState::Partial
        }
    }

    /// Record the position half of a fix, overwriting any previous
    /// values from this cycle. Returns the completed fix if the
    /// timestamp was already present.
    pub fn apply_position(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude_meters: Option<f64>,
    ) -> Option<CompletedFix> {
        self.partial.latitude = Some(latitude);
        self.partial.longitude = Some(longitude);
        self.partial.altitude_meters = altitude_meters;
        self.try_complete()
    }

    /// Record the timing half of a fix. Returns the completed fix if
    /// latitude and longitude were already present.
    pub fn apply_time(&mut self, timestamp: String) -> Option<CompletedFix> {
        self.partial.timestamp = Some(timestamp);
        self.try_complete()
    }

    /// Snapshot and reset once all of latitude, longitude and timestamp
    /// are populated. The reset is unconditional: persistence failure
    /// downstream never replays a fix.
    fn try_complete(&mut self) -> Option<CompletedFix> {
        if !self.partial.is_complete() {
            return None;
        }

        let partial = std::mem::take(&mut self.partial);
        Some(CompletedFix {
            timestamp: partial.timestamp.unwrap_or_default(),
            latitude: units::format_degrees(partial.latitude.unwrap_or_default()),
            longitude: units::format_degrees(partial.longitude.unwrap_or_default()),
            altitude: partial
                .altitude_meters
                .map(units::to_feet)
                .unwrap_or_else(|| ALTITUDE_UNAVAILABLE.to_string()),
        })
    }
}
