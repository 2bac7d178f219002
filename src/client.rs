//! Asynchronous GPSD client implementation
//!
//! This module provides the async session for connecting to and polling a
//! GPSD server. It works over any `futures_io` stream; with the `tokio`
//! feature it can also open the TCP connection itself.
//!
//! For synchronous/blocking operations, see the `blocking` submodule.
//!
//! # Example
//!
//! ```no_run
//! use gpsd_fix::client::GpsdClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = GpsdClient::connect("127.0.0.1", 2947).await?;
//!
//! let device = client.device_info()?;
//! println!("Device: {:?} ({:?})", device.path, device.driver);
//!
//! let fix = client.poll_fix().await?;
//! println!("{fix}");
//! # Ok(())
//! # }
//! ```

use crate::{
    Result,
    error::ProtocolError,
    fix::FixReport,
    protocol::{
        Class, Frame, GpsdJsonDecodeAsync, GpsdJsonEncodeAsync,
        v3::{RequestMessage, response::Poll},
    },
    session::{DeviceInfo, Handshake, SessionState, Step},
};

/// Blocking (synchronous) client implementation
pub mod blocking;

#[cfg(test)]
mod mock;

/// Core implementation of an asynchronous GPSD session
///
/// Owns the stream to gpsd together with the state acknowledged during the
/// handshake. Requests are answered strictly in order, so a session must not
/// be polled from two tasks at once; `&mut self` enforces that.
///
/// No timeout is applied to any read. Wrap calls in the runtime's timeout
/// if the daemon may stall.
///
/// # Type Parameters
/// * `Stream` - The underlying async I/O stream type (e.g., TcpStream)
#[derive(Debug)]
pub struct GpsdClientCore<Stream> {
    reader: futures_util::io::BufReader<Stream>,
    buf: Vec<u8>,
    state: SessionState,
}

impl<Stream> GpsdClientCore<Stream>
where
    Stream: futures_io::AsyncRead + futures_io::AsyncWrite + Unpin,
{
    /// Opens a session over an already connected async stream
    ///
    /// Waits for the `VERSION` greeting, enables watching, and stores the
    /// `DEVICES` and `WATCH` acknowledgements.
    pub async fn open(stream: Stream) -> Result<Self> {
        let reader = futures_util::io::BufReader::new(stream);
        let mut client = GpsdClientCore {
            reader,
            buf: Vec::new(),
            state: SessionState::default(),
        };

        client.handshake().await?;
        Ok(client)
    }

    /// Sends a request message to the GPSD server asynchronously
    async fn send(&mut self, msg: &RequestMessage) -> Result<()> {
        self.reader.get_mut().write_request_async(msg).await
    }

    /// Receives one frame from the GPSD server asynchronously
    async fn recv(&mut self) -> Result<Frame> {
        self.reader.read_frame_async(&mut self.buf).await
    }

    async fn handshake(&mut self) -> Result<()> {
        tracing::debug!("waiting for VERSION greeting");
        let mut handshake = Handshake::new();
        loop {
            let frame = self.recv().await?;
            match handshake.advance(&mut self.state, frame)? {
                Step::Send(request) => self.send(&request).await?,
                Step::Read => {}
                Step::Done => return Ok(()),
            }
        }
    }

    /// Polls gpsd for the latest fix
    ///
    /// Sends `?POLL;` and builds a [`FixReport`] from the newest TPV and SKY
    /// samples in the reply. Any reply other than `POLL` is a protocol error.
    pub async fn poll_fix(&mut self) -> Result<FixReport> {
        tracing::debug!("polling gpsd");
        self.send(&RequestMessage::Poll).await?;

        let frame = self.recv().await?;
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

#[cfg(feature = "tokio")]
impl GpsdClientCore<tokio_util::compat::Compat<tokio::net::TcpStream>> {
    /// Connects to a GPSD server over TCP asynchronously
    ///
    /// # Arguments
    /// * `host` - Host name or address of the GPSD server
    /// * `port` - TCP port, normally [`DEFAULT_PORT`](crate::DEFAULT_PORT)
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        use tokio_util::compat::TokioAsyncReadCompatExt;

        tracing::debug!(host, port, "connecting to gpsd");
        let stream = tokio::net::TcpStream::connect((host, port)).await?;
        GpsdClientCore::open(stream.compat()).await
    }

    /// Connects to gpsd on its standard local address
    pub async fn connect_default() -> Result<Self> {
        Self::connect(crate::DEFAULT_HOST, crate::DEFAULT_PORT).await
    }
}

/// Type alias for an async GPSD session using protocol version 3
#[cfg(feature = "proto-v3")]
pub type GpsdClient<Stream> = GpsdClientCore<Stream>;
