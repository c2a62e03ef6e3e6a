//! Interval bounds on node values
//!
//! Every state and guess carries two `(min, max)` pairs: success probability
//! and expected remaining guesses. The search tightens these intervals as it
//! expands; a node is converged once the interval width drops inside the
//! configured tolerance. Floating-point comparisons between pairs go through
//! [`cmp_pairs`], which treats differences inside the tolerance as equal.

use std::cmp::Ordering;

/// A closed `[min, max]` interval on a node value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// An interval with the given endpoints
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The degenerate interval `[value, value]`
    #[must_use]
    pub const fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// An interval from two endpoints in either order
    ///
    /// Heuristic estimates can transiently invert; callers that assemble a
    /// pair from independent optimistic and pessimistic formulas normalize
    /// through here.
    #[must_use]
    pub fn ordered(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Interval width
    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    /// True once the interval width is within `tolerance`
    #[must_use]
    pub fn converged(self, tolerance: f64) -> bool {
        self.width() <= tolerance
    }

    /// True when the endpoints are correctly ordered, up to `tolerance`
    #[must_use]
    pub fn is_valid(self, tolerance: f64) -> bool {
        self.min <= self.max + tolerance
    }

    /// The intersection with `update`: each endpoint keeps the tighter value
    ///
    /// Updates that would loosen an endpoint are dropped, so repeated
    /// tightening is monotone. The result can be invalid when the update
    /// contradicts the current interval; callers check [`Bounds::is_valid`].
    #[must_use]
    pub fn tightened(self, update: Self) -> Self {
        Self {
            min: self.min.max(update.min),
            max: self.max.min(update.max),
        }
    }
}

/// Compare two bound pairs with an epsilon, min first then max
///
/// `Less` means `a` is smaller (a lower interval). Differences within
/// `tolerance` on both endpoints compare as `Equal`, which is what makes
/// change detection and convergence checks stable under floating-point noise.
#[must_use]
pub fn cmp_pairs(a: Bounds, b: Bounds, tolerance: f64) -> Ordering {
    let d_min = b.min - a.min;
    if d_min >= tolerance {
        return Ordering::Less;
    }
    if d_min <= -tolerance {
        return Ordering::Greater;
    }
    let d_max = b.max - a.max;
    if d_max >= tolerance {
        return Ordering::Less;
    }
    if d_max <= -tolerance {
        return Ordering::Greater;
    }
    Ordering::Equal
}
