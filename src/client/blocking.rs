//! Blocking (synchronous) GPSD client implementation
//!
//! This module provides a synchronous session for applications that don't
//! need async I/O. It performs the same handshake and poll as the async
//! client, but every call blocks until gpsd answers.

use std::net::TcpStream;

use crate::Result;
use crate::error::{GpsdError, ProtocolError};
use crate::fix::FixReport;
use crate::protocol::v3::{RequestMessage, response::Poll};
use crate::protocol::{Class, Frame, GpsdJsonDecode, GpsdJsonEncode};
use crate::session::{DeviceInfo, Handshake, SessionState, Step};

/// Core implementation of a blocking GPSD session
///
/// Owns the stream to gpsd together with the state acknowledged during the
/// handshake. Dropping the session closes the stream.
///
/// There is no read timeout: a daemon that never answers blocks the caller
/// indefinitely. Set one on the stream before handing it to [`open`] if that
/// matters.
///
/// # Type Parameters
/// * `Stream` - The underlying I/O stream type (e.g., TcpStream)
///
/// [`open`]: GpsdClientCore::open
#[derive(Debug)]
pub struct GpsdClientCore<Stream> {
    reader: std::io::BufReader<Stream>,
    buf: Vec<u8>,
    state: SessionState,
}

impl<Stream> GpsdClientCore<Stream>
where
    Stream: std::io::Read + std::io::Write,
{
    /// Opens a session over an already connected stream
    ///
    /// Waits for the `VERSION` greeting, enables watching, and stores the
    /// `DEVICES` and `WATCH` acknowledgements.
    ///
    /// # Returns
    /// * `Ok(client)` - The handshake completed
    /// * `Err(_)` - The stream failed or gpsd answered out of sequence
    pub fn open(stream: Stream) -> Result<Self> {
        let reader = std::io::BufReader::new(stream);
        let mut client = GpsdClientCore {
            reader,
            buf: Vec::new(),
            state: SessionState::default(),
        };

        client.handshake()?;
        Ok(client)
    }

    /// Sends a request message to the GPSD server
    fn send(&mut self, msg: &RequestMessage) -> Result<()> {
        self.reader.get_mut().write_request(msg)
    }

    /// Receives one frame from the GPSD server
    fn recv(&mut self) -> Result<Frame> {
        self.reader.read_frame(&mut self.buf)
    }

    fn handshake(&mut self) -> Result<()> {
        tracing::debug!("waiting for VERSION greeting");
        let mut handshake = Handshake::new();
        loop {
            let frame = self.recv()?;
            match handshake.advance(&mut self.state, frame)? {
                Step::Send(request) => self.send(&request)?,
                Step::Read => {}
                Step::Done => return Ok(()),
            }
        }
    }

    /// Polls gpsd for the latest fix
    ///
    /// Sends `?POLL;` and builds a [`FixReport`] from the newest TPV and SKY
    /// samples in the reply. Any reply other than `POLL` is a protocol error.
    pub fn poll_fix(&mut self) -> Result<FixReport> {
        tracing::debug!("polling gpsd");
        self.send(&RequestMessage::Poll)?;

        let frame = self.recv()?;
        if *frame.class() != Class::Poll {
            return Err(ProtocolError::UnexpectedReply {
                expected: Class::Poll,
                found: frame.class().clone(),
            }
            .into());
        }

        let poll: Poll = frame.payload()?;
        Ok(FixReport::from_poll(&poll))
    }

    /// Path, baud rate and driver of the first device gpsd reported
    pub fn device_info(&self) -> Result<DeviceInfo> {
        self.state.device_info()
    }

    /// State acknowledged during the handshake
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Releases the underlying stream, discarding any buffered input
    pub fn into_inner(self) -> Stream {
        self.reader.into_inner()
    }
}

impl GpsdClientCore<TcpStream> {
    /// Connects to a GPSD server over TCP
    ///
    /// # Arguments
    /// * `host` - Host name or address of the GPSD server
    /// * `port` - TCP port, normally [`DEFAULT_PORT`](crate::DEFAULT_PORT)
    ///
    /// # Example
    /// ```no_run
    /// # use gpsd_fix::client::blocking::GpsdClient;
    /// let client = GpsdClient::connect("127.0.0.1", 2947).unwrap();
    /// ```
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        tracing::debug!(host, port, "connecting to gpsd");
        let stream = TcpStream::connect((host, port)).map_err(GpsdError::Transport)?;
        Self::open(stream)
    }

    /// Connects to gpsd on its standard local address
    pub fn connect_default() -> Result<Self> {
        Self::connect(crate::DEFAULT_HOST, crate::DEFAULT_PORT)
    }
}

impl TryFrom<TcpStream> for GpsdClientCore<TcpStream> {
    type Error = GpsdError;

    fn try_from(stream: TcpStream) -> Result<Self> {
        Self::open(stream)
    }
}

/// Type alias for a blocking GPSD session using protocol version 3
#[cfg(feature = "proto-v3")]
pub type GpsdClient<Stream> = GpsdClientCore<Stream>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{DEVICES, POLL_3D, ScriptedStream, VERSION, WATCH};
    use crate::protocol::v3::types::FixMode;

    #[test]
    fn test_connect_and_poll() {
        let stream = ScriptedStream::new(&[VERSION, WATCH, DEVICES, POLL_3D]);
        let mut client = GpsdClientCore::open(stream).unwrap();

        assert!(client.state().is_complete());
        let info = client.device_info().unwrap();
        assert_eq!(info.path.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(info.bps, Some(4800));
        assert_eq!(info.driver.as_deref(), Some("NMEA0183"));

        let fix = client.poll_fix().unwrap();
        assert_eq!(fix.mode(), FixMode::Fix3D);
        assert_eq!(fix.position().unwrap(), (52.0, 4.3));
        assert_eq!(fix.altitude().unwrap(), 10.5);
        assert_eq!(fix.speed().unwrap(), 1.2);
        assert_eq!(fix.vertical_speed_filtered(), 0.0);
        assert_eq!(fix.satellites_in_view(), 7);
        assert_eq!(fix.satellites_used(), 4);

        let stream = client.into_inner();
        assert_eq!(stream.written_str(), "?WATCH={\"enable\":true}\n?POLL;\n");
    }

    #[test]
    fn test_open_rejects_non_gpsd_greeting() {
        let stream = ScriptedStream::new(&[r#"{"class":"TPV","mode":1}"#]);
        let err = GpsdClientCore::open(stream).unwrap_err();
        assert!(matches!(
            err,
            GpsdError::Protocol(ProtocolError::NotGpsd(Class::Other(_)))
        ));
    }

    #[test]
    fn test_open_rejects_garbage_greeting() {
        let stream = ScriptedStream::new(&["HTTP/1.1 400 Bad Request"]);
        let err = GpsdClientCore::open(stream).unwrap_err();
        assert!(matches!(err, GpsdError::MalformedFrame(_)));
    }

    #[test]
    fn test_open_fails_when_daemon_hangs_up() {
        let stream = ScriptedStream::new(&[VERSION, DEVICES]);
        match GpsdClientCore::open(stream) {
            Err(GpsdError::Transport(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_poll_rejects_other_reply() {
        let stream = ScriptedStream::new(&[
            VERSION,
            DEVICES,
            WATCH,
            r#"{"class":"TPV","mode":3,"lat":1.0,"lon":2.0}"#,
        ]);
        let mut client = GpsdClientCore::open(stream).unwrap();

        match client.poll_fix() {
            Err(GpsdError::Protocol(ProtocolError::UnexpectedReply { expected, found })) => {
                assert_eq!(expected, Class::Poll);
                assert_eq!(found, Class::Other("TPV".into()));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_poll_without_device() {
        let stream = ScriptedStream::new(&[
            VERSION,
            r#"{"class":"DEVICES","devices":[]}"#,
            WATCH,
            r#"{"class":"POLL","time":"2024-05-01T12:00:01.000Z","active":0,"tpv":[],"gst":[],"sky":[]}"#,
        ]);
        let mut client = GpsdClientCore::open(stream).unwrap();

        assert!(matches!(client.device_info(), Err(GpsdError::NoDevice)));
        let fix = client.poll_fix().unwrap();
        assert_eq!(fix.mode(), FixMode::NotSeen);
        assert!(matches!(
            fix.position().map_err(GpsdError::from),
            Err(GpsdError::NoFix(_))
        ));
    }
}
