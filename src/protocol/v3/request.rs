use crate::{Result, error::GpsdError, protocol::GpsdJsonRequest};

use super::types::Watch;

/// Commands this client sends to gpsd
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// `?WATCH={...}` with the given policy
    Watch(Watch),
    /// `?POLL;`, a one-shot request for the latest cached fix
    Poll,
}

impl Message {
    /// The watch request sent during the handshake
    pub fn enable_watch() -> Self {
        Message::Watch(Watch {
            enable: Some(true),
            ..Default::default()
        })
    }
}

impl GpsdJsonRequest for Message {
    fn to_command(&self) -> Result<String> {
        match self {
            Message::Watch(watch) => {
                let params = serde_json::to_string(watch).map_err(GpsdError::Encode)?;
                Ok(format!("?WATCH={params}\n"))
            }
            Message::Poll => Ok("?POLL;\n".into()),
        }
    }
}
