use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::Deserialize_repr;
use serde_with::skip_serializing_none;

/// Quality of a position fix, ordered from worst to best
///
/// * [gps_fix_t.mode](https://gitlab.com/gpsd/gpsd/-/blob/release-3.25/include/gps.h?ref_type=tags#L181)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize_repr)]
#[repr(i32)]
pub enum FixMode {
    /// Mode not seen yet
    #[default]
    NotSeen = 0,
    NoFix = 1,
    /// Horizontal position only
    Fix2D = 2,
    /// Horizontal position and altitude
    Fix3D = 3,
}

impl core::fmt::Display for FixMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            FixMode::NotSeen => "No mode",
            FixMode::NoFix => "No fix",
            FixMode::Fix2D => "2D fix",
            FixMode::Fix3D => "3D fix",
        };
        f.write_str(s)
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u32 {
        /// GPS data has been seen on this device
        const SEEN_GPS = 0x01;
        /// RTCM2 data has been seen on this device
        const SEEN_RTCM2 = 0x02;
        /// RTCM3 data has been seen on this device
        const SEEN_RTCM3 = 0x04;
        /// AIS data has been seen on this device
        const SEEN_AIS = 0x08;
    }
}

impl<'de> Deserialize<'de> for PropertyFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(PropertyFlags::from_bits_truncate(bits))
    }
}

/// - [json_attrs_satellites](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/libgps_json.c?ref_type=heads#L295)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Satellite {
    #[serde(rename = "PRN")]
    pub prn: Option<i16>,
    #[serde(rename = "az")]
    pub azimuth: Option<f64>,
    #[serde(rename = "el")]
    pub elevation: Option<f64>,
    /// Signal strength in dBHz
    pub ss: Option<f64>,
    /// Whether the satellite takes part in the current solution
    #[serde(default)]
    pub used: bool,
}

/// # Device Information
/// - [json_device_read](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/shared_json.c#L28)
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub path: Option<String>,
    pub activated: Option<DateTime<Utc>>,
    pub flags: Option<PropertyFlags>,
    pub driver: Option<String>,
    pub subtype: Option<String>,
    pub native: Option<i32>,
    /// Baud rate of the serial link
    pub bps: Option<u32>,
    pub cycle: Option<f64>,
}

/// # Watch Policy
/// - [json_watch_read](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/shared_json.c#L95)
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub device: Option<String>,
    pub enable: Option<bool>,
    pub json: Option<bool>,
    pub nmea: Option<bool>,
    pub raw: Option<i32>,
    pub scaled: Option<bool>,
    pub timing: Option<bool>,
    pub pps: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_mode_ordering() {
        assert!(FixMode::NotSeen < FixMode::NoFix);
        assert!(FixMode::NoFix < FixMode::Fix2D);
        assert!(FixMode::Fix2D < FixMode::Fix3D);
    }

    #[test]
    fn test_fix_mode_from_wire() {
        let mode: FixMode = serde_json::from_str("3").unwrap();
        assert_eq!(mode, FixMode::Fix3D);
        assert!(serde_json::from_str::<FixMode>("4").is_err());
    }

    #[test]
    fn test_property_flags_truncate_unknown_bits() {
        let flags: PropertyFlags = serde_json::from_str("25").unwrap();
        assert_eq!(flags, PropertyFlags::SEEN_GPS | PropertyFlags::SEEN_AIS);
    }

    #[test]
    fn test_watch_ack_ignores_extra_fields() {
        let watch: Watch = serde_json::from_str(
            r#"{"class":"WATCH","enable":true,"json":false,"nmea":false,"raw":0,"scaled":false,"timing":false,"split24":false,"pps":false}"#,
        )
        .unwrap();
        assert_eq!(watch.enable, Some(true));
        assert_eq!(watch.raw, Some(0));
        assert_eq!(watch.device, None);
    }
}
