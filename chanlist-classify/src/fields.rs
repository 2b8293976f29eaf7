//! Field extraction: flattens a document into named text locations

use crate::document::Document;
use serde::Serialize;

/// Field name for the channel title
pub const TITLE_FIELD: &str = "channelInfo.title";
/// Field name for the channel description
pub const DESCRIPTION_FIELD: &str = "channelInfo.description";

/// One named text location within a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Source location, e.g. `videos[3].title`
    pub name: String,
    /// Field text; empty when the source value was missing
    pub text: String,
}

impl Field {
    /// Create a field
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Field name for the video at `index` (0-based)
pub fn video_field_name(index: usize) -> String {
    format!("videos[{}].title", index)
}

/// Produce the title field, the description field, then one field per
/// video in original order. Missing values become empty strings.
pub fn extract_fields(document: &Document) -> Vec<Field> {
    let info = &document.channel_info;
    let mut fields = Vec::with_capacity(2 + document.videos.len());

    fields.push(Field::new(
        TITLE_FIELD,
        info.title.clone().unwrap_or_default(),
    ));
    fields.push(Field::new(
        DESCRIPTION_FIELD,
        info.description.clone().unwrap_or_default(),
    ));
    fields.extend(document.videos.iter().enumerate().map(|(index, video)| {
        Field::new(video_field_name(index), video.title.clone().unwrap_or_default())
    }));

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Video;

    #[test]
    fn test_field_order_and_names() {
        let doc = Document::new("Title", "Desc", ["first", "second"]);
        let fields = extract_fields(&doc);

        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "channelInfo.title",
                "channelInfo.description",
                "videos[0].title",
                "videos[1].title"
            ]
        );
        assert_eq!(fields[3].text, "second");
    }

    #[test]
    fn test_missing_values_become_empty() {
        let mut doc = Document::default();
        doc.videos.push(Video { title: None });

        let fields = extract_fields(&doc);
        assert_eq!(fields.len(), 3);
        assert!(fields.iter().all(|f| f.text.is_empty()));
    }
}
