//! In-memory stand-in for a gpsd connection

use std::io::{Cursor, Read, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Replays scripted daemon lines and records everything the client writes
#[derive(Debug, Default)]
pub struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    pub written: Vec<u8>,
}

impl ScriptedStream {
    pub fn new(lines: &[&str]) -> Self {
        let mut script = String::new();
        for line in lines {
            script.push_str(line);
            script.push('\n');
        }
        ScriptedStream {
            input: Cursor::new(script.into_bytes()),
            written: Vec::new(),
        }
    }

    pub fn written_str(&self) -> &str {
        std::str::from_utf8(&self.written).unwrap()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl futures_io::AsyncRead for ScriptedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<std::io::Result<usize>> {
        Poll::Ready(self.get_mut().input.read(buf))
    }
}

impl futures_io::AsyncWrite for ScriptedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.get_mut().written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Greeting and acknowledgements of a daemon with one NMEA receiver attached
pub const VERSION: &str = r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#;
pub const DEVICES: &str = r#"{"class":"DEVICES","devices":[{"class":"DEVICE","path":"/dev/ttyUSB0","driver":"NMEA0183","activated":"2024-05-01T12:00:00.000Z","flags":1,"native":0,"bps":4800,"parity":"N","stopbits":1,"cycle":1.00}]}"#;
pub const WATCH: &str = r#"{"class":"WATCH","enable":true,"json":false,"nmea":false,"raw":0,"scaled":false,"timing":false,"split24":false,"pps":false}"#;
pub const POLL_3D: &str = r#"{"class":"POLL","time":"2024-05-01T12:00:01.000Z","active":1,"tpv":[{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2024-05-01T12:00:00.000Z","lat":52.0,"lon":4.3,"alt":10.5,"track":180.0,"speed":1.2,"climb":0.05,"eps":0.5,"ept":0.01,"epx":0.3,"epy":0.3,"epc":0.2,"epv":1.0}],"gst":[],"sky":[{"class":"SKY","device":"/dev/ttyUSB0","satellites":[{"PRN":1,"el":45,"az":90,"ss":40,"used":true},{"PRN":2,"used":true},{"PRN":3,"used":true},{"PRN":4,"used":true},{"PRN":5,"used":false},{"PRN":6,"used":false},{"PRN":7,"used":false}]}]}"#;
