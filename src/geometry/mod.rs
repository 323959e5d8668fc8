pub mod section;
pub mod segment;

pub use section::{ContourBounds, FramedSection, Framing, LocalContour, PreparedSection, Section};
pub use segment::{Segment, SegmentCorners};
