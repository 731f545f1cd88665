//! Output sinks for child process streams
//!
//! A single capability with two variants selected by execution mode:
//! `Buffer` holds output for conditional replay after a failure, `Stream`
//! prints each line as it arrives, tagged with the layer name. The two are
//! mutually exclusive; a streamed layer is never replayed.

use crate::models::{Layer, LayerColor, RESET};

/// Destination for a child's combined stdout/stderr lines
#[derive(Debug)]
pub enum OutputSink {
    /// Silent capture, surfaced only when the layer fails
    Buffer { captured: String },
    /// Live interleaved output with a colored `[LayerName]` tag per line
    Stream { name: String, color: LayerColor },
}

impl OutputSink {
    pub fn buffer() -> Self {
        Self::Buffer {
            captured: String::new(),
        }
    }

    pub fn stream(layer: &Layer) -> Self {
        Self::Stream {
            name: layer.name.clone(),
            color: layer.color,
        }
    }

    /// Append one line of child output
    pub fn append(&mut self, line: &str, from_stderr: bool) {
        match self {
            Self::Buffer { captured } => {
                captured.push_str(line);
                captured.push('\n');
            }
            Self::Stream { name, color } => {
                // stderr lines carry a red tag, matching their origin
                let tag_color = if from_stderr { LayerColor::Red } else { *color };
                let tagged = format!(
                    "  {}[{}]{} {}",
                    tag_color.code(),
                    name,
                    RESET,
                    line
                );
                if from_stderr {
                    eprintln!("{tagged}");
                } else {
                    println!("{tagged}");
                }
            }
        }
    }

    /// Finalize the sink; only the buffer variant yields captured text
    pub fn into_captured(self) -> String {
        match self {
            Self::Buffer { captured } => captured,
            Self::Stream { .. } => String::new(),
        }
    }
}
