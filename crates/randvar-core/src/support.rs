//! Support classification for univariate distributions

/// Shape of a distribution's support on the real line.
///
/// The classification drives two pieces of shared machinery: the
/// substitution used to integrate expectations over unbounded intervals,
/// and whether quantiles can be solved over a finite bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    /// Both endpoints finite, e.g. Beta on [0, 1]
    Finite,
    /// Bounded below, extends to +inf, e.g. Gamma on [0, inf)
    RightSemiInfinite,
    /// Bounded above, extends to -inf
    LeftSemiInfinite,
    /// The whole real line, e.g. Normal
    Infinite,
}

impl Support {
    /// True when the support has a finite lower endpoint
    pub fn is_bounded_below(&self) -> bool {
        matches!(self, Support::Finite | Support::RightSemiInfinite)
    }

    /// True when the support has a finite upper endpoint
    pub fn is_bounded_above(&self) -> bool {
        matches!(self, Support::Finite | Support::LeftSemiInfinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundedness() {
        assert!(Support::Finite.is_bounded_below());
        assert!(Support::Finite.is_bounded_above());

        assert!(Support::RightSemiInfinite.is_bounded_below());
        assert!(!Support::RightSemiInfinite.is_bounded_above());

        assert!(!Support::LeftSemiInfinite.is_bounded_below());
        assert!(Support::LeftSemiInfinite.is_bounded_above());

        assert!(!Support::Infinite.is_bounded_below());
        assert!(!Support::Infinite.is_bounded_above());
    }
}
