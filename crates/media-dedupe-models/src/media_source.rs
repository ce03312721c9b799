use serde::{Deserialize, Serialize};

/// One playable file behind a catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate_bps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// First video stream of the file, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoStream>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoStream {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate_bps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}

impl MediaSource {
    pub fn new(size_bytes: u64, bitrate_bps: u64) -> Self {
        Self {
            size_bytes: Some(size_bytes),
            bitrate_bps: Some(bitrate_bps),
            container: None,
            video: None,
        }
    }

    /// File size, absent reads as 0
    pub fn size(&self) -> u64 {
        self.size_bytes.unwrap_or(0)
    }

    /// Container-level bitrate, absent reads as 0
    ///
    /// This is the value used for ranking. The video stream is not consulted.
    pub fn bitrate(&self) -> u64 {
        self.bitrate_bps.unwrap_or(0)
    }

    /// Bitrate for display: container bitrate, else the video stream's
    pub fn display_bitrate(&self) -> Option<u64> {
        self.bitrate_bps
            .or_else(|| self.video.as_ref().and_then(|v| v.bitrate_bps))
    }

    /// Width and height of the video stream, if both are known
    pub fn resolution(&self) -> Option<(u32, u32)> {
        let video = self.video.as_ref()?;
        Some((video.width?, video.height?))
    }
}
