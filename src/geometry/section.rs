use crate::error::{Result, SectionError};
use crate::math::{Point2, Vector2};

/// Closed 2D contour of a cross-section in its own `(lateral, depth)` axes.
///
/// Stored as parallel arrays. The closing point is implicit: it is not
/// repeated in storage and takes no part in bound computations.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ContourRepr"))]
pub struct LocalContour {
    lateral: Vec<f64>,
    depth: Vec<f64>,
}

impl LocalContour {
    /// Creates a contour from parallel lateral and depth arrays.
    ///
    /// # Errors
    ///
    /// - `SectionError::ContourLengthMismatch` if the arrays differ in length
    /// - `SectionError::NonFinite` if any value is NaN or infinite
    pub fn new(lateral: Vec<f64>, depth: Vec<f64>) -> Result<Self> {
        if lateral.len() != depth.len() {
            return Err(SectionError::ContourLengthMismatch {
                lateral: lateral.len(),
                depth: depth.len(),
            }
            .into());
        }
        if !lateral.iter().chain(&depth).all(|v| v.is_finite()) {
            return Err(SectionError::NonFinite("contour").into());
        }
        Ok(Self { lateral, depth })
    }

    /// A contour with no points.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lateral (local Y) offsets.
    #[must_use]
    pub fn lateral(&self) -> &[f64] {
        &self.lateral
    }

    /// Depth (local Z) offsets.
    #[must_use]
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Number of contour points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lateral.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lateral.is_empty()
    }

    /// Extent of the depth axis, `(0, 0)` for an empty contour.
    #[must_use]
    pub fn depth_bounds(&self) -> ContourBounds {
        ContourBounds::of(&self.depth).unwrap_or_default()
    }

    /// Lateral values with the first point repeated at the end, for drawing.
    #[must_use]
    pub fn closed_lateral(&self) -> Vec<f64> {
        closed(&self.lateral)
    }

    /// Depth values with the first point repeated at the end, for drawing.
    #[must_use]
    pub fn closed_depth(&self) -> Vec<f64> {
        closed(&self.depth)
    }

    /// Returns a copy with every depth value reduced by `offset`.
    pub(crate) fn shift_depth(&self, offset: f64) -> Self {
        Self {
            lateral: self.lateral.clone(),
            depth: self.depth.iter().map(|z| z - offset).collect(),
        }
    }
}

/// Unvalidated wire form of [`LocalContour`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ContourRepr {
    lateral: Vec<f64>,
    depth: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<ContourRepr> for LocalContour {
    type Error = crate::TubelineError;

    fn try_from(repr: ContourRepr) -> Result<Self> {
        Self::new(repr.lateral, repr.depth)
    }
}

fn closed(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    if let Some(&first) = values.first() {
        out.push(first);
    }
    out
}

/// Minimum and maximum of a contour's depth axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourBounds {
    pub min: f64,
    pub max: f64,
}

impl ContourBounds {
    /// Bounds of `values`, or `None` when empty.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let start = Self {
            min: first,
            max: first,
        };
        let bounds = rest.iter().fold(start, |b, &v| Self {
            min: b.min.min(v),
            max: b.max.max(v),
        });
        Some(bounds)
    }

    /// Midpoint between `min` and `max`.
    #[must_use]
    pub fn midline(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// One raw cross-section of the duct, as delivered by a parser.
///
/// The normal is stored as given; it is normalized during preparation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SectionRepr"))]
pub struct Section {
    reference_point: Point2,
    normal: Vector2,
    scale_in: f64,
    scale_out: f64,
    contour: LocalContour,
}

impl Section {
    /// Creates a section whose entry and exit scales are both `scale`.
    ///
    /// # Errors
    ///
    /// - `SectionError::NonFinite` if the reference point or normal is not finite
    /// - `SectionError::NonPositiveScale` if `scale` is not a positive finite number
    pub fn new(
        reference_point: Point2,
        normal: Vector2,
        scale: f64,
        contour: LocalContour,
    ) -> Result<Self> {
        if !(reference_point.x.is_finite() && reference_point.y.is_finite()) {
            return Err(SectionError::NonFinite("reference point").into());
        }
        if !(normal.x.is_finite() && normal.y.is_finite()) {
            return Err(SectionError::NonFinite("normal").into());
        }
        check_scale("entry", scale)?;
        Ok(Self {
            reference_point,
            normal,
            scale_in: scale,
            scale_out: scale,
            contour,
        })
    }

    /// Overrides the scale applied at the exit face of the section's segment.
    ///
    /// # Errors
    ///
    /// Returns `SectionError::NonPositiveScale` if `scale` is not a positive finite number.
    pub fn with_exit_scale(mut self, scale: f64) -> Result<Self> {
        check_scale("exit", scale)?;
        self.scale_out = scale;
        Ok(self)
    }

    #[must_use]
    pub fn reference_point(&self) -> Point2 {
        self.reference_point
    }

    /// The normal as given, not necessarily unit length.
    #[must_use]
    pub fn normal(&self) -> Vector2 {
        self.normal
    }

    #[must_use]
    pub fn scale_in(&self) -> f64 {
        self.scale_in
    }

    #[must_use]
    pub fn scale_out(&self) -> f64 {
        self.scale_out
    }

    #[must_use]
    pub fn contour(&self) -> &LocalContour {
        &self.contour
    }
}

/// Unvalidated wire form of [`Section`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SectionRepr {
    reference_point: Point2,
    normal: Vector2,
    scale_in: f64,
    scale_out: f64,
    contour: LocalContour,
}

#[cfg(feature = "serde")]
impl TryFrom<SectionRepr> for Section {
    type Error = crate::TubelineError;

    fn try_from(repr: SectionRepr) -> Result<Self> {
        Self::new(
            repr.reference_point,
            repr.normal,
            repr.scale_in,
            repr.contour,
        )?
        .with_exit_scale(repr.scale_out)
    }
}

fn check_scale(which: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SectionError::NonPositiveScale { which, value }.into())
    }
}

/// Which placement of a prepared section feeds the reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Framing {
    /// Depth axis recentered on its bounding-box midline, reference point compensated.
    #[default]
    Adjusted,
    /// Reference point and depth axis exactly as given.
    ///
    /// A full run in this framing measures transitions between the original
    /// points. To start adjusted transitions at the original points instead,
    /// call [`resolve_segments`](crate::operations::resolve_segments) with
    /// original sections and adjusted transitions.
    Original,
}

/// A section reduced to what the reconstruction consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FramedSection {
    /// Entry point of the section's segment in global space.
    pub point: Point2,
    /// Unit normal at `point`.
    pub normal: Vector2,
    /// Scale of the contour bounds at the entry face.
    pub scale_in: f64,
    /// Scale of the contour bounds at the exit face.
    pub scale_out: f64,
    /// Depth bounds shared by both faces of the segment.
    pub depth_bounds: ContourBounds,
}

/// A section after normal normalization and depth recentering.
///
/// Holds both framings so that adjusted and original geometry can be
/// reconstructed side by side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PreparedSection {
    pub(crate) depth_midline: f64,
    pub(crate) unit_normal: Vector2,
    pub(crate) adjusted: FramedSection,
    pub(crate) original: FramedSection,
    pub(crate) adjusted_contour: LocalContour,
    pub(crate) original_contour: LocalContour,
}

impl PreparedSection {
    /// Amount the depth axis was shifted, `0` for an empty contour.
    #[must_use]
    pub fn depth_midline(&self) -> f64 {
        self.depth_midline
    }

    #[must_use]
    pub fn unit_normal(&self) -> Vector2 {
        self.unit_normal
    }

    /// The section in the requested framing.
    #[must_use]
    pub fn framed(&self, framing: Framing) -> FramedSection {
        match framing {
            Framing::Adjusted => self.adjusted,
            Framing::Original => self.original,
        }
    }

    /// Recentered reference point, bounds and scales.
    #[must_use]
    pub fn adjusted(&self) -> &FramedSection {
        &self.adjusted
    }

    /// Reference point and bounds as given, with the normal normalized.
    #[must_use]
    pub fn original(&self) -> &FramedSection {
        &self.original
    }

    /// Contour with the depth axis recentered; lateral values unchanged.
    #[must_use]
    pub fn adjusted_contour(&self) -> &LocalContour {
        &self.adjusted_contour
    }

    #[must_use]
    pub fn original_contour(&self) -> &LocalContour {
        &self.original_contour
    }
}
