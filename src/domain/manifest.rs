//! JSON manifest describing a segmented clip and its renditions.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub url: String,
}

/// Fields shared by audio and video variants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Rendition {
    pub clip_id: String,
    pub base_url: String,
    pub format: String,
    pub mime_type: String,
    pub codecs: String,
    pub bitrate: f64,
    pub avg_bitrate: f64,
    /// Seconds
    pub duration: f64,
    pub max_segment_duration: f64,
    /// Base64 encoded header bytes written before the first segment
    pub init_segment: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoVariant {
    #[serde(flatten)]
    pub rendition: Rendition,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AudioVariant {
    #[serde(flatten)]
    pub rendition: Rendition,
    pub channels: u32,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Clip {
    #[serde(rename = "clip_id")]
    pub id: String,
    pub base_url: String,
    pub video: Vec<VideoVariant>,
    pub audio: Vec<AudioVariant>,
}

impl Clip {
    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
