use crate::knot_vector::EndCondition;

/// Everything that can go wrong while building a curve or patch.
///
/// All of these are detected before any point is evaluated; once a curve
/// or surface has been constructed, evaluation only fails on an
/// out-of-range parameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("multiplicity at index {index} must be between 1 and {max}, got {got}")]
    BadMultiplicity {
        index: usize,
        got: usize,
        max: usize,
    },

    #[error("{end:?} degree-{degree} curve needs exactly {expected} knots, got {got}")]
    KnotCountMismatch {
        end: EndCondition,
        degree: usize,
        expected: usize,
        got: usize,
    },

    #[error("knot vector decreases at index {index}")]
    DecreasingKnots { index: usize },

    #[error("first and last knots of a clamped curve may not repeat")]
    RepeatedBoundaryKnot,

    #[error("knot and multiplicity lists differ in length ({knots} vs {multiplicities})")]
    KnotMultiplicityMismatch { knots: usize, multiplicities: usize },

    #[error("need at least {needed} control points for degree {degree}, got {got}")]
    TooFewControlPoints {
        needed: usize,
        degree: usize,
        got: usize,
    },

    #[error("weight at index {index} must be positive, got {value}")]
    BadWeight { index: usize, value: f64 },

    #[error("got {got} weights for {expected} control points")]
    WeightCountMismatch { expected: usize, got: usize },

    #[error("control grid is ragged: row {row} has {got} points, expected {expected}")]
    RaggedGrid {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("knot vector spans an empty parameter domain")]
    DegenerateDomain,

    #[error("parameter {0} is outside [0, 1]")]
    ParameterOutOfDomain(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
