pub mod pipeline;
pub mod scale;

pub use pipeline::{Frame, ImageDetails, Quality, RenderError, RenderPhase, RenderPipeline};
