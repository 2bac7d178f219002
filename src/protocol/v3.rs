//! GPSD JSON Protocol Version 3 subset
//!
//! This client only speaks the part of protocol version 3 it needs: the
//! `VERSION` greeting, the `?WATCH` handshake with its `DEVICES` and
//! `WATCH` acknowledgements, and `?POLL;` with its `POLL` reply carrying
//! embedded `TPV` and `SKY` reports.
//!
//! # References
//!
//! - [GPSD Protocol Documentation](https://gpsd.io/gpsd_json.html)

use crate::protocol::GpsdJsonResponse;

/// Request message types
pub mod request;
/// Response payload types
pub mod response;
/// Common data types used in protocol messages
pub mod types;

/// Type alias for version 3 request messages
pub type RequestMessage = request::Message;

impl GpsdJsonResponse for response::DeviceList {}
impl GpsdJsonResponse for response::Poll {}
impl GpsdJsonResponse for types::Watch {}
