//! Channel document shape consumed by the engine
//!
//! Decoding is lenient: `null`, missing, or wrongly typed members become
//! empty values instead of errors, so a half-scraped channel still yields a
//! document that can be classified.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Channel metadata plus its video titles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// Channel-level metadata
    #[serde(deserialize_with = "lenient_channel_info")]
    pub channel_info: ChannelInfo,
    /// Videos in page order
    #[serde(deserialize_with = "lenient_videos")]
    pub videos: Vec<Video>,
}

/// Channel title and description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    /// Channel title
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// Free-text channel description
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

/// One video record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    /// Video title
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

impl Document {
    /// Build a document from a title, description and video titles
    pub fn new<I, S>(title: impl Into<String>, description: impl Into<String>, videos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channel_info: ChannelInfo {
                title: Some(title.into()),
                description: Some(description.into()),
            },
            videos: videos
                .into_iter()
                .map(|title| Video {
                    title: Some(title.into()),
                })
                .collect(),
        }
    }

    /// Decode a document from loose JSON
    ///
    /// Anything that is not an object (including `null`) yields an empty
    /// document.
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextRepr {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelInfoRepr {
    Info(ChannelInfo),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VideoRepr {
    Video(Video),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VideosRepr {
    List(Vec<VideoRepr>),
    Other(IgnoredAny),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextRepr::deserialize(deserializer)? {
        TextRepr::Text(text) => Some(text),
        TextRepr::Other(_) => None,
    })
}

fn lenient_channel_info<'de, D>(deserializer: D) -> Result<ChannelInfo, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ChannelInfoRepr::deserialize(deserializer)? {
        ChannelInfoRepr::Info(info) => info,
        ChannelInfoRepr::Other(_) => ChannelInfo::default(),
    })
}

// Non-object entries stay in the list as empty videos so positional field
// names keep matching the source order.
fn lenient_videos<'de, D>(deserializer: D) -> Result<Vec<Video>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match VideosRepr::deserialize(deserializer)? {
        VideosRepr::List(items) => items
            .into_iter()
            .map(|item| match item {
                VideoRepr::Video(video) => video,
                VideoRepr::Other(_) => Video::default(),
            })
            .collect(),
        VideosRepr::Other(_) => Vec::new(),
    })
}
