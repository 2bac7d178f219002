//! Fix reports built from GPSD poll replies
//!
//! A [`FixReport`] is a snapshot of the newest TPV and SKY samples in one
//! `POLL` reply. Fields are filled progressively with the fix mode: nothing
//! positional below a 2D fix, no altitude or climb below a 3D fix. The
//! accessors check the mode before answering and return [`NoFixError`]
//! rather than the zero placeholders.

use chrono::{DateTime, Utc};

use crate::protocol::v3::{response::Poll, types::FixMode};

/// Zoom level used by [`FixReport::map_url`]
pub const MAP_ZOOM: u8 = 15;

/// The current fix mode is too weak to answer the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("needs at least a {required}, current mode is {actual}")]
pub struct NoFixError {
    pub required: FixMode,
    pub actual: FixMode,
}

/// Error estimates reported alongside a fix, 95% confidence
///
/// All zero below a 2D fix; `climb` and `vertical` stay zero below a 3D fix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixErrors {
    /// Climb (vertical speed) error in meters/second, from `epc`
    pub climb: f64,
    /// Horizontal speed error in meters/second, from `eps`
    pub speed: f64,
    /// Time error in seconds, from `ept`
    pub time: f64,
    /// Altitude error in meters, from `epv`
    pub vertical: f64,
    /// Longitude error in meters, from `epx`
    pub x: f64,
    /// Latitude error in meters, from `epy`
    pub y: f64,
}

/// Horizontal and vertical motion of a 3D fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// Speed over ground in meters/second
    pub speed: f64,
    /// Course over ground in degrees from true north
    pub track: f64,
    /// Vertical speed in meters/second, positive upwards
    pub climb: f64,
}

/// Result of one poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixReport {
    mode: FixMode,
    time: Option<DateTime<Utc>>,
    device: Option<String>,
    satellites_in_view: usize,
    satellites_used: usize,
    lat: f64,
    lon: f64,
    alt: f64,
    track: f64,
    speed: f64,
    climb: f64,
    errors: FixErrors,
}

impl FixReport {
    /// Builds a report from the newest samples of a poll reply
    ///
    /// Only the last TPV and the last SKY entry are used; earlier entries are
    /// older samples batched by the daemon. A reply without any TPV sample
    /// yields a report in [`FixMode::NotSeen`], and one without a sky view
    /// reports zero satellites. Fields missing from the TPV sample at a mode
    /// that should carry them are left at zero.
    pub fn from_poll(poll: &Poll) -> Self {
        let mut report = FixReport::default();

        if let Some(sky) = poll.latest_sky() {
            report.satellites_in_view = sky.satellites.len();
            report.satellites_used = sky.satellites.iter().filter(|sat| sat.used).count();
        }

        let Some(tpv) = poll.latest_tpv() else {
            return report;
        };

        report.mode = tpv.mode;
        report.time = tpv.time;
        report.device = tpv.device.clone();

        if tpv.mode >= FixMode::Fix2D {
            report.lat = tpv.lat.unwrap_or_default();
            report.lon = tpv.lon.unwrap_or_default();
            report.track = tpv.track.unwrap_or_default();
            report.speed = tpv.speed.unwrap_or_default();
            report.errors.speed = tpv.eps.unwrap_or_default();
            report.errors.time = tpv.ept.unwrap_or_default();
            report.errors.x = tpv.epx.unwrap_or_default();
            report.errors.y = tpv.epy.unwrap_or_default();
        }

        if tpv.mode >= FixMode::Fix3D {
            report.alt = tpv.alt.or(tpv.alt_msl).unwrap_or_default();
            report.climb = tpv.climb.unwrap_or_default();
            report.errors.climb = tpv.epc.unwrap_or_default();
            report.errors.vertical = tpv.epv.unwrap_or_default();
        }

        report
    }

    fn require(&self, required: FixMode) -> Result<(), NoFixError> {
        if self.mode >= required {
            Ok(())
        } else {
            Err(NoFixError {
                required,
                actual: self.mode,
            })
        }
    }

    pub fn mode(&self) -> FixMode {
        self.mode
    }

    /// GPS time of the selected TPV sample
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Device path that produced the selected TPV sample
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Number of satellites in the newest sky view
    pub fn satellites_in_view(&self) -> usize {
        self.satellites_in_view
    }

    /// Number of satellites in the newest sky view used for the solution
    pub fn satellites_used(&self) -> usize {
        self.satellites_used
    }

    /// Raw error estimates; zero where the mode provides none
    pub fn errors(&self) -> &FixErrors {
        &self.errors
    }

    /// Latitude and longitude in degrees
    pub fn position(&self) -> Result<(f64, f64), NoFixError> {
        self.require(FixMode::Fix2D)?;
        Ok((self.lat, self.lon))
    }

    /// Altitude in meters
    pub fn altitude(&self) -> Result<f64, NoFixError> {
        self.require(FixMode::Fix3D)?;
        Ok(self.alt)
    }

    /// Unfiltered speed, track and climb
    pub fn movement(&self) -> Result<Movement, NoFixError> {
        self.require(FixMode::Fix3D)?;
        Ok(Movement {
            speed: self.speed,
            track: self.track,
            climb: self.climb,
        })
    }

    /// Horizontal speed with movement below the speed error reported as 0
    pub fn speed(&self) -> Result<f64, NoFixError> {
        self.require(FixMode::Fix2D)?;
        if self.speed.abs() < self.errors.speed {
            Ok(0.0)
        } else {
            Ok(self.speed)
        }
    }

    /// Vertical speed with movement below the climb error reported as 0
    ///
    /// Does not check the mode. Below a 3D fix both the climb and its error
    /// are zero, so this returns 0 and cannot tell "no data" from "not
    /// moving". Check [`FixReport::mode`] first if that matters.
    pub fn vertical_speed_filtered(&self) -> f64 {
        if self.climb.abs() < self.errors.climb {
            0.0
        } else {
            self.climb
        }
    }

    /// Error margin in meters as (horizontal, vertical)
    ///
    /// The horizontal margin is the larger of the x and y errors. The
    /// vertical margin is 0 for a 2D fix.
    pub fn position_precision(&self) -> Result<(f64, f64), NoFixError> {
        self.require(FixMode::Fix2D)?;
        Ok((self.errors.x.max(self.errors.y), self.errors.vertical))
    }

    /// OpenStreetMap link centered on the current position
    pub fn map_url(&self) -> Result<String, NoFixError> {
        let (lat, lon) = self.position()?;
        Ok(format!(
            "http://www.openstreetmap.org/?mlat={lat}&mlon={lon}&zoom={MAP_ZOOM}"
        ))
    }
}

impl From<&Poll> for FixReport {
    fn from(poll: &Poll) -> Self {
        FixReport::from_poll(poll)
    }
}

impl core::fmt::Display for FixReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.mode {
            FixMode::NotSeen | FixMode::NoFix => write!(f, "{}", self.mode),
            FixMode::Fix2D => write!(f, "{} ({}, {})", self.mode, self.lat, self.lon),
            FixMode::Fix3D => write!(
                f,
                "{} ({}, {}) at {} m",
                self.mode, self.lat, self.lon, self.alt
            ),
        }
    }
}
