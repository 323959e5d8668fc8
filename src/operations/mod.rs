mod locate;
mod prepare;
mod reconstruct;

pub use locate::LocateSegment;
pub use prepare::{prepare_all, PrepareSection};
pub use reconstruct::{
    measure_transitions, reconstruct_batch, resolve_segments, Centerline, ReconstructCenterline,
    Transition,
};

use crate::geometry::Framing;
use crate::math::TOLERANCE;

/// Parameters controlling a reconstruction run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconstructionParams {
    /// Threshold below which lengths, angles and normal cross products count as zero.
    pub tolerance: f64,
    /// Section framing used by [`ReconstructCenterline::from_prepared`].
    pub framing: Framing,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            framing: Framing::Adjusted,
        }
    }
}
