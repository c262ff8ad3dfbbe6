//! Target container format and quality tier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output audio container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Wav,
    Aiff,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Wav => "wav",
            Format::Aiff => "aiff",
        }
    }

    /// File extension of converted output (same as the codec name).
    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wav" => Ok(Format::Wav),
            "aiff" => Ok(Format::Aiff),
            other => Err(format!("unsupported format '{other}' (expected wav or aiff)")),
        }
    }
}

/// Quality tier. Each tier maps to a fixed target bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Best,
    High,
    Medium,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::High => "high",
            Quality::Medium => "medium",
        }
    }

    /// Target bitrate in kbit/s.
    pub fn bitrate_kbps(self) -> u32 {
        match self {
            Quality::Best => 320,
            Quality::High => 192,
            Quality::Medium => 128,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "best" => Ok(Quality::Best),
            "high" => Ok(Quality::High),
            "medium" => Ok(Quality::Medium),
            other => Err(format!(
                "unsupported quality '{other}' (expected best, high or medium)"
            )),
        }
    }
}
