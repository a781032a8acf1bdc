//! CSV export of the record set
//!
//! One row per feature. Multi-valued columns are space-joined, and newlines
//! in extracted note text become spaces. Fields holding a separator or a
//! quote are quoted so the column count of a row never changes.

use blockscope_proto::Feature;
use std::borrow::Cow;

pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Title",
    "High Estimate",
    "Low Estimate",
    "Notes",
    "Notes Content",
    "Figma Frame Reference",
];

/// File name offered for an export of the given document
pub fn csv_file_name(file_key: &str) -> String {
    format!("features-{}.csv", file_key)
}

pub fn export_csv(features: &[Feature]) -> String {
    let mut lines = Vec::with_capacity(features.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for feature in features {
        let notes = feature
            .notes
            .iter()
            .map(|note| note.embed_url.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let notes_content = feature
            .notes
            .iter()
            .map(|note| note.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .replace('\n', " ");
        let images = feature
            .images
            .iter()
            .map(|image| image.embed_url.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let row = [
            feature.id.to_string(),
            feature.title.clone(),
            feature.high_estimate.to_string(),
            feature.low_estimate.to_string(),
            notes,
            notes_content,
            images,
        ];
        lines.push(
            row.iter()
                .map(|value| field(value))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

fn field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
