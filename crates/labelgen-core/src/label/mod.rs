//! Label layout and PDF rendering.

mod layout;
pub mod metrics;
mod renderer;

pub use layout::{layout_label, split_description, Align, DescriptionParts, LabelPage, LabelStyle, TextRun};
pub use metrics::Font;
pub use renderer::{LabelRenderer, RenderedLabels};
