//! Best-effort source platform classification (diagnostics only).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    SoundCloud,
    Spotify,
    AppleMusic,
    Unknown,
}

impl Platform {
    /// Classify a locator by substring. Does not validate the URL.
    pub fn detect(locator: &str) -> Self {
        if locator.contains("youtube.com") || locator.contains("youtu.be") {
            Platform::YouTube
        } else if locator.contains("soundcloud.com") {
            Platform::SoundCloud
        } else if locator.contains("spotify.com") {
            Platform::Spotify
        } else if locator.contains("music.apple.com") || locator.contains("itunes.apple.com") {
            Platform::AppleMusic
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::SoundCloud => "soundcloud",
            Platform::Spotify => "spotify",
            Platform::AppleMusic => "apple_music",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
