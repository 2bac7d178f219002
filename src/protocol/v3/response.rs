//! GPSD Protocol v3 response payloads
//!
//! Payloads of the message classes this client reads. Each is decoded from
//! a [`Frame`](crate::protocol::Frame) once its class has been checked, so
//! the `"class"` field itself is ignored here.
//!
//! Reports nested inside a `POLL` reply (`TPV`, `SKY`) carry their own class
//! field and are decoded as plain structs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::types::*;

/// List of GPS devices known to GPSD
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceList {
    pub devices: Vec<Device>,
}

impl<'de> Deserialize<'de> for DeviceList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawSubDevice {
            pub path: Option<String>,
            pub activated: Option<serde_json::Value>,
            pub flags: Option<PropertyFlags>,
            pub driver: Option<String>,
            pub subtype: Option<String>,
            pub native: Option<i32>,
            pub bps: Option<u32>,
            pub cycle: Option<f64>,
        }

        #[derive(Deserialize)]
        struct RawDeviceList {
            #[serde(default)]
            pub devices: Vec<RawSubDevice>,
        }

        let raw = RawDeviceList::deserialize(deserializer)?;

        let mut devices = Vec::with_capacity(raw.devices.len());
        for raw_device in raw.devices {
            // Older daemons report activation as a Unix timestamp, newer ones as ISO 8601
            let activated = match raw_device.activated {
                Some(serde_json::Value::String(iso_time)) => DateTime::parse_from_rfc3339(&iso_time)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
                Some(serde_json::Value::Number(unix_time)) => {
                    unix_time.as_f64().and_then(f64_to_datetime)
                }
                Some(_) => {
                    return Err(serde::de::Error::custom(
                        "Invalid type for 'activated' field",
                    ));
                }
                None => None,
            };

            devices.push(Device {
                path: raw_device.path,
                activated,
                flags: raw_device.flags,
                driver: raw_device.driver,
                subtype: raw_device.subtype,
                native: raw_device.native,
                bps: raw_device.bps,
                cycle: raw_device.cycle,
            });
        }

        Ok(DeviceList { devices })
    }
}

/// Time-Position-Velocity (TPV) report
///
/// Which fields are present depends on the fix mode: horizontal fields from
/// 2D upward, vertical fields only with a 3D fix.
///
/// Reference: [json_tpv_read](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/libgps_json.c?ref_type=heads#L34)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tpv {
    /// Device path that provided this data
    pub device: Option<String>,
    /// GPS fix mode
    pub mode: FixMode,
    /// GPS time of fix
    pub time: Option<DateTime<Utc>>,
    /// Latitude in degrees (positive = North)
    pub lat: Option<f64>,
    /// Longitude in degrees (positive = East)
    pub lon: Option<f64>,
    /// Altitude in meters (deprecated by gpsd in favour of altMSL/altHAE)
    pub alt: Option<f64>,
    /// Altitude, MSL (mean sea level) in meters
    #[serde(rename = "altMSL")]
    pub alt_msl: Option<f64>,
    /// True track (course over ground) in degrees
    pub track: Option<f64>,
    /// Speed over ground in meters/second
    pub speed: Option<f64>,
    /// Climb/sink rate in meters per second
    pub climb: Option<f64>,
    /// Estimated climb error in meters/second
    pub epc: Option<f64>,
    /// Estimated speed error in meters/second
    pub eps: Option<f64>,
    /// Estimated time error in seconds
    pub ept: Option<f64>,
    /// Estimated vertical error in meters
    pub epv: Option<f64>,
    /// Longitude error estimate in meters
    pub epx: Option<f64>,
    /// Latitude error estimate in meters
    pub epy: Option<f64>,
}

/// Satellite Sky View (SKY) report
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sky {
    /// Device path that provided this data
    pub device: Option<String>,
    /// GPS time of this sky view
    pub time: Option<DateTime<Utc>>,
    /// List of visible satellites with their properties
    #[serde(default)]
    pub satellites: Vec<Satellite>,
}

/// Poll response with the daemon's cached reports
///
/// `tpv` and `sky` are ordered oldest first; gpsd may batch several
/// samples into one reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Poll {
    /// Number of active devices
    pub active: Option<i32>,
    /// Timestamp of this poll
    pub time: Option<DateTime<Utc>>,
    /// TPV reports from active devices
    #[serde(default)]
    pub tpv: Vec<Tpv>,
    /// Sky views from active devices
    #[serde(default)]
    pub sky: Vec<Sky>,
}

impl Poll {
    /// The most recent TPV sample, i.e. the last entry
    pub fn latest_tpv(&self) -> Option<&Tpv> {
        self.tpv.last()
    }

    /// The most recent sky view, i.e. the last entry
    pub fn latest_sky(&self) -> Option<&Sky> {
        self.sky.last()
    }
}

/// Converts floating-point seconds since the Unix epoch to a DateTime
fn f64_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs.trunc() as i64, (secs.fract() * 1e9) as u32)
}
