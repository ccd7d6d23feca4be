//! Segmentation of the raw generation response into per-platform posts.

use regex::Regex;

use super::{Platform, PostBundle};

/// Splits one generated text blob into the three labeled platform sections.
///
/// The backend is only *asked* to emit `**<Platform> Post**` markers; nothing
/// enforces it. Partial or malformed output therefore degrades to empty
/// sections instead of failing the request.
pub struct ResponseSegmenter {
    marker: Regex,
}

impl ResponseSegmenter {
    pub fn new() -> Self {
        let marker = Regex::new(r"\*\*(LinkedIn|Instagram|Twitter) Post\*\*")
            .expect("marker pattern is valid");

        Self { marker }
    }

    /// Total over any input: always returns all three keys, each holding the
    /// trimmed text between that platform's marker and the next marker of
    /// any platform (or end of text), or an empty string when the marker is
    /// absent. Labels are matched case-sensitively, anywhere in the blob.
    pub fn segment(&self, raw: &str) -> PostBundle {
        let markers: Vec<(usize, usize, &str)> = self
            .marker
            .captures_iter(raw)
            .map(|captures| {
                let whole = captures.get(0).expect("match has a range");
                let label = captures.get(1).expect("marker captures a label");
                (whole.start(), whole.end(), label.as_str())
            })
            .collect();

        let section = |platform: Platform| -> String {
            for (index, (_, body_start, label)) in markers.iter().enumerate() {
                if *label == platform.label() {
                    let body_end = markers
                        .get(index + 1)
                        .map(|(next_start, _, _)| *next_start)
                        .unwrap_or(raw.len());
                    return raw[*body_start..body_end].trim().to_string();
                }
            }
            String::new()
        };

        PostBundle {
            linkedin: section(Platform::LinkedIn),
            instagram: section(Platform::Instagram),
            twitter: section(Platform::Twitter),
        }
    }
}

impl Default for ResponseSegmenter {
    fn default() -> Self {
        Self::new()
    }
}
