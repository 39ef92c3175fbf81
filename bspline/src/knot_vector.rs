use crate::error::{Error, Result};
use crate::VecF;
use log::debug;
use ordered_float::OrderedFloat;

/// Boundary behaviour of a curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndCondition {
    /// The curve starts and ends exactly at the first and last control
    /// points, tangent to the control polygon there.  The first and last
    /// knots are repeated `degree + 1` times internally.
    #[default]
    Clamped,
    /// The curve generally does not touch the end control points.  The
    /// caller supplies the full knot vector of `n + degree + 1` entries.
    Open,
    /// The control polygon is treated as cyclic; the first `degree`
    /// control points are duplicated onto the tail and the knot pattern is
    /// extended periodically.
    Closed,
}

impl EndCondition {
    /// Number of knots the caller must supply (after multiplicity
    /// expansion, before any internal padding or periodic extension).
    ///
    /// `n_control` must already satisfy [`EndCondition::min_control_points`].
    pub fn required_knot_count(self, n_control: usize, degree: usize) -> usize {
        match self {
            EndCondition::Clamped => n_control - degree + 1,
            EndCondition::Open => n_control + degree + 1,
            EndCondition::Closed => n_control + 1,
        }
    }

    /// Fewest control points that make a curve of the given degree
    /// well-defined.  Closed curves get away with fewer than `degree + 1`
    /// because the wraparound duplication pads them back out.
    pub fn min_control_points(self, degree: usize) -> usize {
        match self {
            EndCondition::Clamped | EndCondition::Open => degree + 1,
            EndCondition::Closed => degree.max(1),
        }
    }
}

/// Caller-side description of a knot vector, canonicalized once by
/// [`KnotVector::resolve`] so the evaluators never see partial defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Knots {
    /// Uniformly spaced knots over `[0, 1]`, one per required slot.
    #[default]
    Uniform,
    /// Uniformly spaced distinct knot values, each repeated by its
    /// multiplicity.  The multiplicities must sum to the required count.
    Multiplicity(Vec<usize>),
    /// The full knot list, with any repeats written out inline.
    Explicit(Vec<f64>),
    /// Distinct knot values paired 1:1 with multiplicities.
    ExplicitMultiplicity {
        knots: Vec<f64>,
        multiplicity: Vec<usize>,
    },
}

/// A fully materialized, non-decreasing knot vector.
///
/// This always holds the *internal* vector: clamped padding and periodic
/// extension have already been applied, so the evaluators can index it
/// without caring about the end condition.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    knots: Vec<f64>,
}

impl KnotVector {
    /// Validates the caller's knot description and expands it into the
    /// internal vector for a curve over `n_control` points.
    ///
    /// `n_control` is the *caller-visible* control point count; for closed
    /// curves the matching duplication of the first `degree` control
    /// points is done by the curve constructor.
    pub fn resolve(
        n_control: usize,
        degree: usize,
        end: EndCondition,
        knots: &Knots,
    ) -> Result<Self> {
        let needed = end.min_control_points(degree);
        if n_control < needed {
            return Err(Error::TooFewControlPoints {
                needed,
                degree,
                got: n_control,
            });
        }
        let required = end.required_knot_count(n_control, degree);

        let base = match knots {
            Knots::Uniform => linspace(required),
            Knots::Multiplicity(mult) => {
                validate_multiplicity(mult, degree, end)?;
                let total: usize = mult.iter().sum();
                if total != required {
                    return Err(Error::KnotCountMismatch {
                        end,
                        degree,
                        expected: required,
                        got: total,
                    });
                }
                expand_by_multiplicity(&linspace(mult.len()), mult)
            }
            Knots::Explicit(list) => {
                if list.len() != required {
                    return Err(Error::KnotCountMismatch {
                        end,
                        degree,
                        expected: required,
                        got: list.len(),
                    });
                }
                check_non_decreasing(list, false)?;
                if end == EndCondition::Clamped
                    && (list[0] == list[1] || list[required - 2] == list[required - 1])
                {
                    return Err(Error::RepeatedBoundaryKnot);
                }
                list.clone()
            }
            Knots::ExplicitMultiplicity {
                knots: list,
                multiplicity: mult,
            } => {
                if list.len() != mult.len() {
                    return Err(Error::KnotMultiplicityMismatch {
                        knots: list.len(),
                        multiplicities: mult.len(),
                    });
                }
                validate_multiplicity(mult, degree, end)?;
                // Repeats belong in the multiplicity list here, so the
                // values themselves must strictly increase.
                check_non_decreasing(list, true)?;
                let total: usize = mult.iter().sum();
                if total != required {
                    return Err(Error::KnotCountMismatch {
                        end,
                        degree,
                        expected: required,
                        got: total,
                    });
                }
                expand_by_multiplicity(list, mult)
            }
        };

        let knots = match end {
            EndCondition::Clamped => {
                let mut v = Vec::with_capacity(base.len() + 2 * degree);
                v.extend(std::iter::repeat(base[0]).take(degree));
                v.extend_from_slice(&base);
                v.extend(std::iter::repeat(base[base.len() - 1]).take(degree));
                v
            }
            EndCondition::Open => base,
            EndCondition::Closed => periodic_extension(&base, degree),
        };
        let n_internal = match end {
            EndCondition::Closed => n_control + degree,
            _ => n_control,
        };
        if knots[degree] >= knots[n_internal] {
            return Err(Error::DegenerateDomain);
        }
        debug!(
            "resolved {:?} degree-{} knot vector: {} entries over [{}, {}]",
            end,
            degree,
            knots.len(),
            knots[degree],
            knots[knots.len() - 1 - degree],
        );
        Ok(KnotVector { knots })
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    /// Evaluation domain for a curve over `n` internal control points.
    pub fn domain(&self, n: usize, degree: usize) -> (f64, f64) {
        (self.knots[degree], self.knots[n])
    }

    /// Index of the span containing `u`: the largest `k` with
    /// `knot[k] <= u`, skipping the zero-width spans that repeated knots
    /// produce at the top of the domain.  The returned span is never
    /// empty, which is what guarantees non-zero denominators in the
    /// de Boor blend.
    pub fn find_span(&self, n: usize, degree: usize, u: f64) -> usize {
        if u >= self.knots[n] {
            let mut k = n - 1;
            while self.knots[k] == self.knots[k + 1] {
                k -= 1;
            }
            return k;
        }
        let mut low = degree;
        let mut high = n;
        while low < high {
            let mid = (low + high) / 2;
            if self.knots[mid] > u {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low - 1
    }

    /// Distinct knot values inside the domain, in order.  A knot of
    /// multiplicity `degree` is a genuine corner, so samplers walk these
    /// to guarantee a sample lands exactly on every one.
    pub fn breaks(&self, n: usize, degree: usize) -> Vec<f64> {
        let mut out: Vec<f64> = Vec::new();
        for &k in &self.knots[degree..=n] {
            if out
                .last()
                .is_none_or(|&last| OrderedFloat(last) != OrderedFloat(k))
            {
                out.push(k);
            }
        }
        out
    }

    /// Basis functions and their derivatives through order `n_der` at `u`
    /// (The NURBS Book, A2.3).  Row `k` holds the `k`-th derivative of the
    /// `degree + 1` basis functions active on `span`.
    pub(crate) fn derivative_basis_functions(
        &self,
        span: usize,
        u: f64,
        degree: usize,
        n_der: usize,
    ) -> Vec<VecF> {
        let p = degree;
        let mut ndu = vec![VecF::from_elem(0.0, p + 1); p + 1];
        let mut left = VecF::from_elem(0.0, p + 1);
        let mut right = VecF::from_elem(0.0, p + 1);
        ndu[0][0] = 1.0;
        for j in 1..=p {
            left[j] = u - self.knots[span + 1 - j];
            right[j] = self.knots[span + j] - u;
            let mut saved = 0.0;
            for r in 0..j {
                ndu[j][r] = right[r + 1] + left[j - r];
                let temp = ndu[r][j - 1] / ndu[j][r];
                ndu[r][j] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            ndu[j][j] = saved;
        }

        let mut ders = vec![VecF::from_elem(0.0, p + 1); n_der + 1];
        for j in 0..=p {
            ders[0][j] = ndu[j][p];
        }

        let mut a = [VecF::from_elem(0.0, p + 1), VecF::from_elem(0.0, p + 1)];
        for r in 0..=p {
            let mut s1 = 0;
            let mut s2 = 1;
            a[0][0] = 1.0;
            for k in 1..=n_der {
                let mut d = 0.0;
                let rk = r as isize - k as isize;
                let pk = p - k;
                if r >= k {
                    a[s2][0] = a[s1][0] / ndu[pk + 1][rk as usize];
                    d = a[s2][0] * ndu[rk as usize][pk];
                }
                let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
                let j2 = if r <= pk + 1 { k - 1 } else { p - r };
                for j in j1..=j2 {
                    a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][(rk + j as isize) as usize];
                    d += a[s2][j] * ndu[(rk + j as isize) as usize][pk];
                }
                if r <= pk {
                    a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                    d += a[s2][k] * ndu[r][pk];
                }
                ders[k][r] = d;
                std::mem::swap(&mut s1, &mut s2);
            }
        }

        let mut f = p as f64;
        for k in 1..=n_der {
            for j in 0..=p {
                ders[k][j] *= f;
            }
            f *= (p - k) as f64;
        }
        ders
    }
}

impl std::ops::Index<usize> for KnotVector {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.knots[i]
    }
}

/// Tiles the one-period knot pattern of a closed curve with `degree`
/// extra entries on each side, shifting by the pattern's period.  This is
/// the knot half of closure; the control-point half is the duplication of
/// the first `degree` points done by the curve constructor.
fn periodic_extension(base: &[f64], degree: usize) -> Vec<f64> {
    let m = base.len();
    let period = base[m - 1] - base[0];
    let mut out = Vec::with_capacity(m + 2 * degree);
    for i in 0..degree {
        out.push(base[m - 1 - degree + i] - period);
    }
    out.extend_from_slice(base);
    for i in 0..degree {
        out.push(base[i + 1] + period);
    }
    out
}

fn linspace(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| i as f64 / (count - 1) as f64)
        .collect()
}

fn expand_by_multiplicity(values: &[f64], mult: &[usize]) -> Vec<f64> {
    let mut out = Vec::with_capacity(mult.iter().sum());
    for (&v, &m) in values.iter().zip(mult) {
        out.extend(std::iter::repeat(v).take(m));
    }
    out
}

fn validate_multiplicity(mult: &[usize], degree: usize, end: EndCondition) -> Result<()> {
    for (index, &m) in mult.iter().enumerate() {
        let boundary = index == 0 || index == mult.len() - 1;
        let max = match end {
            EndCondition::Open if boundary => degree + 1,
            _ => degree,
        };
        if m == 0 {
            return Err(Error::BadMultiplicity { index, got: m, max });
        }
        if end == EndCondition::Clamped && boundary && m != 1 {
            return Err(Error::RepeatedBoundaryKnot);
        }
        if m > max {
            return Err(Error::BadMultiplicity { index, got: m, max });
        }
    }
    Ok(())
}

fn check_non_decreasing(list: &[f64], strict: bool) -> Result<()> {
    for i in 1..list.len() {
        let bad = if strict {
            list[i] <= list[i - 1]
        } else {
            list[i] < list[i - 1]
        };
        if bad {
            return Err(Error::DecreasingKnots { index: i });
        }
    }
    Ok(())
}

/// Evaluation schedule for "segments between knots" sampling: `segments`
/// evenly spaced parameters per break interval, endpoint-exclusive except
/// for the final break.
pub(crate) fn segment_schedule(breaks: &[f64], segments: usize) -> Vec<f64> {
    let segments = segments.max(1);
    let mut out = Vec::with_capacity((breaks.len() - 1) * segments + 1);
    for w in breaks.windows(2) {
        let (a, b) = (w[0], w[1]);
        for s in 0..segments {
            out.push(a + (b - a) * s as f64 / segments as f64);
        }
    }
    out.push(breaks[breaks.len() - 1]);
    out
}
