use serde::Serialize;

/// Marker joining the head and tail of a long preview.
const PREVIEW_ELLIPSIS: &str = "\n\n...\n\n";
/// Characters kept on each side of a long preview.
const PREVIEW_CHARS: usize = 100;
/// Crude characters-per-token ratio behind the estimate.
const CHARS_PER_TOKEN: usize = 4;

/// Size and shape of the assembled artifact text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMetrics {
    /// UTF-8 encoded size.
    pub bytes: usize,
    pub chars: usize,
    /// `ceil(chars / 4)`: a deliberately crude proxy, not a tokenizer.
    pub estimated_tokens: usize,
    /// First and last 100 characters of the artifact.
    pub preview: String,
}

impl ArtifactMetrics {
    /// Measure `text`.
    pub fn measure(text: &str) -> Self {
        let chars = text.chars().count();
        Self {
            bytes: text.len(),
            chars,
            estimated_tokens: chars.div_ceil(CHARS_PER_TOKEN),
            preview: preview(text, chars),
        }
    }

    /// Artifact size in kilobytes for display.
    pub fn kilobytes(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Head-and-tail preview: the whole text up to 200 characters, otherwise
/// the first and last 100 joined by an ellipsis marker.
fn preview(text: &str, chars: usize) -> String {
    if chars <= PREVIEW_CHARS * 2 {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    let tail: String = text.chars().skip(chars - PREVIEW_CHARS).collect();
    format!("{head}{PREVIEW_ELLIPSIS}{tail}")
}
