use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{FramedSection, PreparedSection, Segment, SegmentCorners};
use crate::math::arc_2d::{arc_outlet_with, curvature_between_with, Curvature};

use super::ReconstructionParams;

/// Length and curvature between two adjacent sections.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub length: f64,
    pub curvature: Curvature,
}

/// Reconstructed segments of one section chain, in chain order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Centerline {
    pub segments: Vec<Segment>,
}

impl Centerline {
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Reconstructs the centerline of a section chain.
///
/// # Algorithm
///
/// 1. **Stage 1** ([`measure_transitions`]): length and curvature for every
///    adjacent pair of sections.
/// 2. **Stage 2** ([`resolve_segments`]): exit point, exit normal and corners
///    for every transition, starting from the entry section's frame.
///
/// Stage 1 completes over the whole chain before stage 2 starts. A chain of
/// `n` sections yields `n - 1` segments; fewer than two sections yield none.
#[derive(Debug)]
pub struct ReconstructCenterline<'a> {
    sections: &'a [FramedSection],
    params: ReconstructionParams,
}

impl<'a> ReconstructCenterline<'a> {
    /// Creates a reconstruction over already framed sections.
    #[must_use]
    pub fn new(sections: &'a [FramedSection], params: ReconstructionParams) -> Self {
        Self { sections, params }
    }

    /// Executes the reconstruction.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if the tolerance is not positive or a
    ///   section holds a non-finite point, normal or bound
    /// - `OperationError::Failed` if a segment's exit geometry is not finite
    pub fn execute(&self) -> Result<Centerline> {
        let eps = self.params.tolerance;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "tolerance must be positive, got {eps}"
            ))
            .into());
        }
        for (i, s) in self.sections.iter().enumerate() {
            if !is_finite_section(s) {
                return Err(OperationError::InvalidInput(format!(
                    "section {i} has non-finite geometry"
                ))
                .into());
            }
        }

        let sections = self.sections.len();
        debug!(sections, eps, "reconstructing centerline");

        let transitions = measure_transitions(self.sections, eps);
        let segments = resolve_segments(self.sections, &transitions, eps)?;

        Ok(Centerline { segments })
    }

    /// Frames `prepared` with `params.framing` and reconstructs it.
    ///
    /// # Errors
    ///
    /// Same as [`ReconstructCenterline::execute`].
    pub fn from_prepared(
        prepared: &[PreparedSection],
        params: ReconstructionParams,
    ) -> Result<Centerline> {
        let framed: Vec<FramedSection> =
            prepared.iter().map(|p| p.framed(params.framing)).collect();
        ReconstructCenterline::new(&framed, params).execute()
    }
}

fn is_finite_section(s: &FramedSection) -> bool {
    [
        s.point.x,
        s.point.y,
        s.normal.x,
        s.normal.y,
        s.scale_in,
        s.scale_out,
        s.depth_bounds.min,
        s.depth_bounds.max,
    ]
    .iter()
    .all(|v| v.is_finite())
}

/// Stage 1: length and curvature for each adjacent pair of sections.
#[must_use]
pub fn measure_transitions(sections: &[FramedSection], eps: f64) -> Vec<Transition> {
    sections
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            Transition {
                length: (b.point - a.point).norm(),
                curvature: curvature_between_with(a.point, a.normal, b.point, b.normal, eps),
            }
        })
        .collect()
}

/// Stage 2: exit geometry and corners for each transition.
///
/// `transitions[i]` starts at `sections[i]`.
///
/// # Errors
///
/// - `OperationError::InvalidInput` if there are more transitions than section pairs
/// - `OperationError::Failed` if an exit point or normal is not finite
pub fn resolve_segments(
    sections: &[FramedSection],
    transitions: &[Transition],
    eps: f64,
) -> Result<Vec<Segment>> {
    if transitions.len() >= sections.len().max(1) {
        return Err(OperationError::InvalidInput(format!(
            "{} transitions for {} sections",
            transitions.len(),
            sections.len()
        ))
        .into());
    }

    let mut segments = Vec::with_capacity(transitions.len());
    for (i, (entry, t)) in sections.iter().zip(transitions).enumerate() {
        let (exit_point, exit_normal) = arc_outlet_with(
            entry.point,
            entry.normal,
            t.length,
            t.curvature.radius,
            t.curvature.angle,
            eps,
        );

        if !(exit_point.x.is_finite()
            && exit_point.y.is_finite()
            && exit_normal.x.is_finite()
            && exit_normal.y.is_finite())
        {
            return Err(OperationError::Failed(format!(
                "segment {i} has non-finite exit geometry"
            ))
            .into());
        }

        let segment = Segment {
            length: t.length,
            curvature_radius: t.curvature.radius,
            curvature_angle: t.curvature.angle,
            exit_point,
            exit_normal,
            corners: SegmentCorners::derive(entry, exit_point, exit_normal),
        };
        trace!(
            index = i,
            length = segment.length,
            radius = segment.curvature_radius,
            angle = segment.curvature_angle,
            straight = segment.curvature().is_straight(),
            "resolved segment"
        );
        segments.push(segment);
    }
    Ok(segments)
}

/// Reconstructs independent chains, one result per chain in input order.
///
/// With the `parallel` feature chains are spread over the rayon pool; each
/// chain is still reconstructed sequentially.
#[must_use]
pub fn reconstruct_batch(
    chains: &[Vec<FramedSection>],
    params: ReconstructionParams,
) -> Vec<Result<Centerline>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        chains
            .par_iter()
            .map(|chain| ReconstructCenterline::new(chain, params).execute())
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        chains
            .iter()
            .map(|chain| ReconstructCenterline::new(chain, params).execute())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::TubelineError;
    use crate::geometry::ContourBounds;
    use crate::math::{Point2, Vector2};

    const TOL: f64 = 1e-10;

    fn framed(x: f64, y: f64, nx: f64, ny: f64) -> FramedSection {
        FramedSection {
            point: Point2::new(x, y),
            normal: Vector2::new(nx, ny),
            scale_in: 1.0,
            scale_out: 1.0,
            depth_bounds: ContourBounds {
                min: -1.0,
                max: 1.0,
            },
        }
    }

    /// Sections along a straight duct heading in -y with normal (1, 0).
    fn straight_chain() -> Vec<FramedSection> {
        vec![
            framed(0.0, 0.0, 1.0, 0.0),
            framed(0.0, -2.0, 1.0, 0.0),
            framed(0.0, -5.0, 1.0, 0.0),
        ]
    }

    /// Sections on a circle of radius 4 around the origin.
    fn bent_chain() -> Vec<FramedSection> {
        (0..4)
            .map(|k| {
                let a = FRAC_PI_2 - f64::from(k) * 0.3;
                framed(4.0 * a.cos(), 4.0 * a.sin(), a.cos(), a.sin())
            })
            .collect()
    }

    #[test]
    fn empty_and_single_section_chains() {
        let params = ReconstructionParams::default();
        assert!(ReconstructCenterline::new(&[], params).execute().unwrap().is_empty());
        let one = [framed(0.0, 0.0, 1.0, 0.0)];
        assert!(ReconstructCenterline::new(&one, params).execute().unwrap().is_empty());
    }

    #[test]
    fn straight_chain_lands_on_next_section() {
        let chain = straight_chain();
        let line = ReconstructCenterline::new(&chain, ReconstructionParams::default())
            .execute()
            .unwrap();
        assert_eq!(line.len(), 2);

        let s0 = &line.segments[0];
        assert_abs_diff_eq!(s0.length, 2.0);
        assert!(s0.curvature_radius.is_infinite());
        assert_eq!(s0.curvature_angle, 0.0);
        assert_eq!(s0.exit_point, Point2::new(0.0, -2.0));
        assert_eq!(s0.exit_normal, Vector2::new(1.0, 0.0));
        assert_eq!(s0.corners.entry_min, Point2::new(-1.0, 0.0));
        assert_eq!(s0.corners.exit_max, Point2::new(1.0, -2.0));

        assert_abs_diff_eq!(line.segments[1].length, 3.0);
        assert_eq!(line.segments[1].exit_point, Point2::new(0.0, -5.0));
    }

    #[test]
    fn bent_chain_has_constant_curvature() {
        let chain = bent_chain();
        let line = ReconstructCenterline::new(&chain, ReconstructionParams::default())
            .execute()
            .unwrap();
        assert_eq!(line.len(), 3);
        for s in &line.segments {
            assert_abs_diff_eq!(s.curvature_radius.abs(), 4.0, epsilon = TOL);
            assert_abs_diff_eq!(s.curvature_angle, -0.3, epsilon = TOL);
            assert_abs_diff_eq!(s.length, 8.0 * 0.15_f64.sin(), epsilon = TOL);
            assert_abs_diff_eq!(s.exit_normal.norm(), 1.0, epsilon = TOL);
        }
    }

    #[test]
    fn exit_normal_matches_next_section_normal() {
        let chain = bent_chain();
        let line = ReconstructCenterline::new(&chain, ReconstructionParams::default())
            .execute()
            .unwrap();
        for (s, next) in line.segments.iter().zip(&chain[1..]) {
            assert_abs_diff_eq!(s.exit_normal.x, next.normal.x, epsilon = TOL);
            assert_abs_diff_eq!(s.exit_normal.y, next.normal.y, epsilon = TOL);
        }
    }

    #[test]
    fn rerun_is_bit_identical() {
        let chain = bent_chain();
        let op = ReconstructCenterline::new(&chain, ReconstructionParams::default());
        let a = op.execute().unwrap();
        let b = op.execute().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stages_compose_to_execute() {
        let chain = bent_chain();
        let eps = ReconstructionParams::default().tolerance;
        let transitions = measure_transitions(&chain, eps);
        assert_eq!(transitions.len(), chain.len() - 1);
        let segments = resolve_segments(&chain, &transitions, eps).unwrap();
        let line = ReconstructCenterline::new(&chain, ReconstructionParams::default())
            .execute()
            .unwrap();
        assert_eq!(segments, line.segments);
    }

    #[test]
    fn original_centers_with_adjusted_transitions() {
        // Same frames as `bent_chain`, with centers moved half a unit inward.
        let adjusted = bent_chain();
        let original: Vec<FramedSection> = adjusted
            .iter()
            .map(|s| FramedSection {
                point: s.point - s.normal * 0.5,
                ..*s
            })
            .collect();
        let eps = ReconstructionParams::default().tolerance;

        let transitions = measure_transitions(&adjusted, eps);
        let segments = resolve_segments(&original, &transitions, eps).unwrap();
        let reference = resolve_segments(&adjusted, &transitions, eps).unwrap();
        assert_eq!(segments.len(), 3);

        for (i, (s, r)) in segments.iter().zip(&reference).enumerate() {
            let c = s.corners;
            let entry_mid = (c.entry_min.coords + c.entry_max.coords) * 0.5;
            assert_abs_diff_eq!(entry_mid.x, original[i].point.x, epsilon = TOL);
            assert_abs_diff_eq!(entry_mid.y, original[i].point.y, epsilon = TOL);

            // Same transition, same outlet offset, different start.
            let offset = s.exit_point - original[i].point;
            let adjusted_offset = r.exit_point - adjusted[i].point;
            assert_abs_diff_eq!(offset.x, adjusted_offset.x, epsilon = TOL);
            assert_abs_diff_eq!(offset.y, adjusted_offset.y, epsilon = TOL);
            assert_eq!(s.length, r.length);
            assert_eq!(s.exit_normal, r.exit_normal);
        }

        // Not what an all-original run produces.
        let own = ReconstructCenterline::new(&original, ReconstructionParams::default())
            .execute()
            .unwrap();
        assert_ne!(own.segments, segments);
    }

    #[test]
    fn too_many_transitions_is_rejected() {
        let chain = straight_chain();
        let mut transitions = measure_transitions(&chain, 1e-6);
        transitions.push(transitions[0]);
        let err = resolve_segments(&chain, &transitions, 1e-6).unwrap_err();
        assert!(matches!(
            err,
            TubelineError::Operation(OperationError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let chain = straight_chain();
        let params = ReconstructionParams {
            tolerance: 0.0,
            ..ReconstructionParams::default()
        };
        assert!(ReconstructCenterline::new(&chain, params).execute().is_err());
    }

    #[test]
    fn non_finite_section_is_rejected() {
        let mut chain = straight_chain();
        chain[1].point.y = f64::NAN;
        let err = ReconstructCenterline::new(&chain, ReconstructionParams::default())
            .execute()
            .unwrap_err();
        assert!(err.to_string().contains("section 1"));
    }

    #[test]
    fn overflowing_exit_fails_whole_run() {
        let chain = vec![framed(0.0, 0.0, 1.0, 0.0), framed(f64::MAX, -f64::MAX, 1.0, 0.0)];
        let err = ReconstructCenterline::new(&chain, ReconstructionParams::default())
            .execute()
            .unwrap_err();
        assert!(matches!(err, TubelineError::Operation(OperationError::Failed(_))));
    }

    #[test]
    fn batch_matches_individual_runs() {
        let chains = vec![straight_chain(), bent_chain(), Vec::new()];
        let params = ReconstructionParams::default();
        let results = reconstruct_batch(&chains, params);
        assert_eq!(results.len(), 3);
        for (chain, result) in chains.iter().zip(results) {
            let op = ReconstructCenterline::new(chain, params);
            assert_eq!(result.unwrap(), op.execute().unwrap());
        }
    }
}
