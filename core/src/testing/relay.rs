//! Single-slot channel carrying a case's result from the isolated process back
//! to the coordinator.
//!
//! The slot holds one line: the judge glyph followed by a JSON payload. It is
//! truncated by the parent before each spawn and overwritten in full by the
//! child, so nothing from a previous case can be read back. Anything missing
//! or unparsable reads as a crash.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tempfile::TempPath;

use super::result::JudgeCode;

pub type Result<T> = std::result::Result<T, RelayError>;

type Msg = &'static str;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0} ({1}): {2}")]
    SingleIO(Msg, PathBuf, #[source] io::Error),

    #[error("Cannot encode relay payload: {0}")]
    Encode(#[source] serde_json::Error),
}

/// What the child reports after a clean run.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayMessage {
    pub judge: JudgeCode,
    pub execution_time: Duration,
    pub produced: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    elapsed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    produced: Option<String>,
}

impl RelayMessage {
    /// `<glyph><json>`, always a single line.
    pub fn encode(&self) -> Result<String> {
        let payload = Payload {
            elapsed: self.execution_time.as_secs_f64(),
            produced: self.produced.clone(),
        };
        let json = serde_json::to_string(&payload).map_err(RelayError::Encode)?;
        Ok(format!("{}{}", self.judge.glyph(), json))
    }

    /// `None` means "treat as crashed".
    pub fn decode(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let judge = JudgeCode::from_glyph(chars.next()?)?;
        if matches!(judge, JudgeCode::CrashedOrAborted | JudgeCode::Disabled) {
            return None;
        }
        let payload: Payload = serde_json::from_str(chars.as_str()).ok()?;
        let execution_time = Duration::try_from_secs_f64(payload.elapsed).ok()?;
        Some(Self {
            judge,
            execution_time,
            produced: payload.produced,
        })
    }
}

#[derive(Debug)]
pub struct RelaySlot {
    path: PathBuf,
    // Keeps a private temp file alive (and removes it on drop).
    _temp: Option<TempPath>,
}

impl RelaySlot {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _temp: None,
        }
    }

    pub fn temporary() -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("tcjudge-relay-")
            .tempfile()
            .map_err(|e| {
                RelayError::SingleIO("Cannot create relay file", std::env::temp_dir(), e)
            })?
            .into_temp_path();
        Ok(Self {
            path: temp.to_path_buf(),
            _temp: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empty the slot before a case starts.
    pub fn clear(&self) -> Result<()> {
        fs::write(&self.path, "")
            .map_err(|e| RelayError::SingleIO("Cannot truncate relay file", self.path.clone(), e))
    }

    pub fn send(&self, msg: &RelayMessage) -> Result<()> {
        let line = msg.encode()?;
        fs::write(&self.path, line)
            .map_err(|e| RelayError::SingleIO("Cannot write relay file", self.path.clone(), e))
    }

    /// Reads whatever the child left. Missing, empty or garbled slots read as
    /// a crash.
    pub fn receive(&self) -> Option<RelayMessage> {
        let content = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Cannot read relay file {:?}: {}", self.path, e);
                return None;
            }
        };
        let line = content.lines().next().unwrap_or_default();
        let msg = RelayMessage::decode(line);
        if msg.is_none() {
            log::debug!("Relay slot holds no result: {:?}", line);
        }
        msg
    }
}
