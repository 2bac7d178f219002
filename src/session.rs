//! Handshake state machine and cached daemon state
//!
//! The connection handshake is:
//!
//! 1. gpsd greets with a `VERSION` message.
//! 2. The client sends `?WATCH={"enable":true}`.
//! 3. gpsd acknowledges with exactly two messages, `DEVICES` and `WATCH`,
//!    in either order.
//!
//! [`Handshake`] drives that sequence without doing any I/O itself: the
//! blocking and async clients read frames, feed them in, and perform the
//! [`Step`] it returns. Acknowledgements land in a [`SessionState`] owned by
//! the session.

use crate::{
    Result,
    error::{GpsdError, ProtocolError},
    protocol::{
        Class, Frame,
        v3::{RequestMessage, response::DeviceList, types::Watch},
    },
};

/// Number of acknowledgements gpsd sends after a watch request
const WATCH_ACKS: u8 = 2;

/// The last `DEVICES` and `WATCH` messages seen on a session
///
/// A newer message of either class replaces the older one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    devices: Option<DeviceList>,
    watch: Option<Watch>,
}

/// Identity of the first device gpsd reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device path, e.g. `/dev/ttyUSB0`
    pub path: Option<String>,
    /// Baud rate of the serial link
    pub bps: Option<u32>,
    /// Name of the gpsd driver handling the device
    pub driver: Option<String>,
}

impl SessionState {
    pub fn devices(&self) -> Option<&DeviceList> {
        self.devices.as_ref()
    }

    pub fn watch(&self) -> Option<&Watch> {
        self.watch.as_ref()
    }

    /// Whether both acknowledgements have been stored
    pub fn is_complete(&self) -> bool {
        self.devices.is_some() && self.watch.is_some()
    }

    /// Stores a `DEVICES` or `WATCH` message
    ///
    /// Any other class is rejected and leaves the state untouched.
    pub fn apply(&mut self, frame: Frame) -> Result<()> {
        match frame.class() {
            Class::Devices => {
                let devices: DeviceList = frame.payload()?;
                tracing::debug!(count = devices.devices.len(), "stored DEVICES");
                self.devices = Some(devices);
            }
            Class::Watch => {
                let watch: Watch = frame.payload()?;
                tracing::debug!(enable = ?watch.enable, "stored WATCH");
                self.watch = Some(watch);
            }
            other => {
                return Err(ProtocolError::UnexpectedHandshakeClass(other.clone()).into());
            }
        }
        Ok(())
    }

    /// Path, baud rate and driver of the first listed device
    pub fn device_info(&self) -> Result<DeviceInfo> {
        let device = self
            .devices
            .as_ref()
            .and_then(|list| list.devices.first())
            .ok_or(GpsdError::NoDevice)?;

        Ok(DeviceInfo {
            path: device.path.clone(),
            bps: device.bps,
            driver: device.driver.clone(),
        })
    }
}

/// What the driver of a [`Handshake`] must do next
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Write this request, then read the next frame
    Send(RequestMessage),
    /// Read the next frame
    Read,
    /// The session is ready for polling
    Done,
}

/// Connection handshake progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Handshake {
    #[default]
    AwaitingVersion,
    AwaitingAcks { remaining: u8 },
    Complete,
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Handshake::Complete)
    }

    /// Consumes one frame read from gpsd and returns the next step
    ///
    /// On error the handshake is left where it was and the session must be
    /// discarded.
    pub fn advance(&mut self, state: &mut SessionState, frame: Frame) -> Result<Step> {
        match *self {
            Handshake::AwaitingVersion => {
                if *frame.class() != Class::Version {
                    return Err(ProtocolError::NotGpsd(frame.class().clone()).into());
                }
                // Only the class matters; the version fields are logged as sent
                let body = frame.body();
                tracing::debug!(
                    release = ?body.get("release"),
                    proto_major = ?body.get("proto_major"),
                    proto_minor = ?body.get("proto_minor"),
                    "received VERSION greeting, enabling watch"
                );

                *self = Handshake::AwaitingAcks {
                    remaining: WATCH_ACKS,
                };
                Ok(Step::Send(RequestMessage::enable_watch()))
            }
            Handshake::AwaitingAcks { remaining } => {
                state.apply(frame)?;

                if remaining > 1 {
                    *self = Handshake::AwaitingAcks {
                        remaining: remaining - 1,
                    };
                    return Ok(Step::Read);
                }

                // Two acks of the same class leave the other one missing
                if state.devices.is_none() {
                    return Err(ProtocolError::MissingAck(Class::Devices).into());
                }
                if state.watch.is_none() {
                    return Err(ProtocolError::MissingAck(Class::Watch).into());
                }

                *self = Handshake::Complete;
                Ok(Step::Done)
            }
            Handshake::Complete => Err(ProtocolError::HandshakeComplete.into()),
        }
    }
}
