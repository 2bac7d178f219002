//! # gpsd-fix
//!
//! A small Rust client for GPSD (GPS Service Daemon) that polls the latest
//! position fix over the daemon's JSON protocol.
//!
//! ## Overview
//!
//! GPSD multiplexes GPS receiver data to clients over newline-delimited JSON
//! on TCP port 2947. This crate performs the connection handshake
//! (`VERSION` greeting, `?WATCH` enable, `DEVICES`/`WATCH` acknowledgements),
//! caches the acknowledged device and watch state, and on demand sends
//! `?POLL;` and turns the reply into a [`fix::FixReport`].
//!
//! A [`fix::FixReport`] only answers questions its fix mode can support:
//! asking for a position without a 2D fix, or an altitude without a 3D fix,
//! yields a [`fix::NoFixError`] instead of stale zeros.
//!
//! A session is strictly request/reply and owns its stream. Share it between
//! threads only behind a lock.
//!
//! ## Example
//!
//! ```no_run
//! use gpsd_fix::client::blocking::GpsdClient;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = GpsdClient::connect("127.0.0.1", 2947)?;
//!     let fix = client.poll_fix()?;
//!     println!("{fix} with {} satellites in view", fix.satellites_in_view());
//!
//!     if let Ok((lat, lon)) = fix.position() {
//!         println!("lat {lat:.6}, lon {lon:.6}");
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::GpsdError;

/// Client sessions for establishing connections and polling GPSD
pub mod client;

/// Error types used throughout the library
pub mod error;

/// Fix reports built from GPSD poll replies
pub mod fix;

/// Frame decoding and typed messages of the GPSD JSON protocol
pub mod protocol;

/// Handshake state machine and cached daemon state
pub mod session;

/// Address gpsd listens on by default
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// TCP port gpsd listens on by default
pub const DEFAULT_PORT: u16 = 2947;

/// Convenience type alias for Results with GpsdError
pub type Result<T> = core::result::Result<T, GpsdError>;
