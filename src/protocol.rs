//! Frame decoding and line codecs for the GPSD JSON protocol
//!
//! Every message gpsd sends is one JSON object per line, discriminated by
//! its `"class"` field. [`Frame`] is that object with the class already
//! extracted; typed payloads are decoded from it on demand once the caller
//! knows which class it expects.

use std::future::Future;

use serde_json::Value;

use crate::{
    Result,
    error::{FrameError, GpsdError},
};

pub mod v3;

/// Marker for typed payloads that can be decoded from a [`Frame`]
pub trait GpsdJsonResponse: serde::de::DeserializeOwned {}

/// Discriminant carried in the `"class"` field of every gpsd message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Class {
    Version,
    Devices,
    Watch,
    Poll,
    /// Any class this client does not act on (TPV, SKY, ERROR, ...)
    Other(String),
}

impl Class {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "VERSION" => Class::Version,
            "DEVICES" => Class::Devices,
            "WATCH" => Class::Watch,
            "POLL" => Class::Poll,
            other => Class::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Class::Version => "VERSION",
            Class::Devices => "DEVICES",
            Class::Watch => "WATCH",
            Class::Poll => "POLL",
            Class::Other(tag) => tag,
        }
    }
}

impl core::fmt::Display for Class {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded line from gpsd
///
/// Holds the generic JSON object together with its class. Frames are
/// transient: they are classified and turned into typed payloads by the
/// caller that read them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    class: Class,
    body: Value,
}

impl Frame {
    /// Parses one line of text into a frame
    ///
    /// Fails with [`FrameError::Json`] if the line is not JSON and with
    /// [`FrameError::MissingClass`] if it is not an object with a string
    /// `"class"` field. Trailing newlines are accepted.
    pub fn decode(line: &str) -> core::result::Result<Self, FrameError> {
        let body: Value = serde_json::from_str(line).map_err(FrameError::Json)?;
        let class = body
            .get("class")
            .and_then(Value::as_str)
            .map(Class::from_tag)
            .ok_or(FrameError::MissingClass)?;

        Ok(Frame { class, body })
    }

    /// Decodes one raw line as read off the wire
    ///
    /// Bytes that are not UTF-8 fail with [`FrameError::Utf8`].
    pub fn decode_bytes(line: &[u8]) -> core::result::Result<Self, FrameError> {
        let line = std::str::from_utf8(line).map_err(FrameError::Utf8)?;
        tracing::trace!(line = line.trim_end(), "received");
        Self::decode(line)
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Decodes the frame body into the typed payload of its class
    pub fn payload<Res>(self) -> core::result::Result<Res, FrameError>
    where
        Res: GpsdJsonResponse,
    {
        let Frame { class, body } = self;
        serde_json::from_value(body).map_err(|source| FrameError::Payload { class, source })
    }
}

fn eof() -> GpsdError {
    GpsdError::Transport(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "gpsd closed the connection",
    ))
}

/// Reads frames from a blocking buffered reader
pub trait GpsdJsonDecode: std::io::BufRead {
    /// Reads one line and decodes it
    ///
    /// End of stream is a transport error: the protocol never expects the
    /// daemon to hang up while a reply is outstanding.
    fn read_frame(&mut self, buf: &mut Vec<u8>) -> Result<Frame> {
        buf.clear();
        let bytes_read = self.read_until(b'\n', buf)?;
        if bytes_read == 0 {
            return Err(eof());
        }

        Ok(Frame::decode_bytes(buf)?)
    }
}

impl<R: std::io::BufRead + ?Sized> GpsdJsonDecode for R {}

/// Reads frames from an async buffered reader
pub trait GpsdJsonDecodeAsync: futures_io::AsyncBufRead + Unpin {
    /// Async counterpart of [`GpsdJsonDecode::read_frame`]
    fn read_frame_async(&mut self, buf: &mut Vec<u8>) -> impl Future<Output = Result<Frame>> {
        async move {
            use futures_util::AsyncBufReadExt;

            buf.clear();
            let bytes_read = self.read_until(b'\n', buf).await?;
            if bytes_read == 0 {
                return Err(eof());
            }

            Ok(Frame::decode_bytes(buf)?)
        }
    }
}

impl<R: futures_io::AsyncBufRead + Unpin + ?Sized> GpsdJsonDecodeAsync for R {}

/// A command that can be written to gpsd
pub trait GpsdJsonRequest {
    /// Renders the full command line, including the trailing newline
    fn to_command(&self) -> Result<String>;
}

/// Writes requests to a blocking writer
pub trait GpsdJsonEncode: std::io::Write {
    /// Writes the command and flushes so gpsd sees it immediately
    fn write_request(&mut self, request: &impl GpsdJsonRequest) -> Result<()> {
        let cmd = request.to_command()?;
        tracing::trace!(command = cmd.trim_end(), "sending");
        self.write_all(cmd.as_bytes())?;
        self.flush()?;
        Ok(())
    }
}

impl<W: std::io::Write + ?Sized> GpsdJsonEncode for W {}

/// Writes requests to an async writer
pub trait GpsdJsonEncodeAsync: futures_io::AsyncWrite + Unpin {
    /// Async counterpart of [`GpsdJsonEncode::write_request`]
    fn write_request_async(
        &mut self,
        request: &impl GpsdJsonRequest,
    ) -> impl Future<Output = Result<()>> {
        async move {
            use futures_util::AsyncWriteExt;

            let cmd = request.to_command()?;
            tracing::trace!(command = cmd.trim_end(), "sending");
            self.write_all(cmd.as_bytes()).await?;
            self.flush().await?;
            Ok(())
        }
    }
}

impl<W: futures_io::AsyncWrite + Unpin + ?Sized> GpsdJsonEncodeAsync for W {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_decode_extracts_class() {
        let frame = Frame::decode("{\"class\":\"VERSION\",\"release\":\"3.25\"}\n").unwrap();
        assert_eq!(frame.class(), &Class::Version);
        assert_eq!(frame.body()["release"], "3.25");

        let frame = Frame::decode(r#"{"class":"TPV","mode":3}"#).unwrap();
        assert_eq!(frame.class(), &Class::Other("TPV".into()));
        assert_eq!(frame.class().to_string(), "TPV");
    }

    #[test]
    fn test_frame_decode_rejects_invalid_json() {
        let err = Frame::decode("{\"class\":\"VERSION\"").unwrap_err();
        assert!(matches!(err, FrameError::Json(_)));
    }

    #[test]
    fn test_frame_decode_requires_class() {
        assert!(matches!(
            Frame::decode(r#"{"release":"3.25"}"#),
            Err(FrameError::MissingClass)
        ));
        assert!(matches!(
            Frame::decode(r#"{"class":3}"#),
            Err(FrameError::MissingClass)
        ));
        assert!(matches!(
            Frame::decode("[1, 2, 3]"),
            Err(FrameError::MissingClass)
        ));
    }

    #[test]
    fn test_frame_payload_mismatch_names_class() {
        let frame = Frame::decode(r#"{"class":"POLL","tpv":"nope"}"#).unwrap();
        let err = frame.payload::<v3::response::Poll>().unwrap_err();
        assert!(matches!(err, FrameError::Payload { class: Class::Poll, .. }));
    }

    #[test]
    fn test_read_frame_eof_is_transport_error() {
        let mut reader = std::io::Cursor::new(Vec::<u8>::new());
        let mut buf = Vec::new();
        match reader.read_frame(&mut buf) {
            Err(GpsdError::Transport(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_read_frame_rejects_invalid_utf8() {
        let mut reader = std::io::Cursor::new(b"\xff\xfe{\"class\":\"VERSION\"}\n".to_vec());
        let mut buf = Vec::new();
        assert!(matches!(
            reader.read_frame(&mut buf),
            Err(GpsdError::MalformedFrame(FrameError::Utf8(_)))
        ));
    }

    #[test]
    fn test_write_request_appends_newline() {
        let mut out = Vec::new();
        out.write_request(&v3::RequestMessage::Poll).unwrap();
        assert_eq!(out, b"?POLL;\n");
    }
}
