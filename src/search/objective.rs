//! Search objectives
//!
//! The objective decides which bound pair drives node selection and what
//! counts as converged: pure win-rate maximization, pure expected-guess
//! minimization, or the default lexicographic combination of the two.

/// What the policy optimizes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Maximize the probability of winning within the guess budget
    WinRate,
    /// Minimize the expected number of guesses, ignoring the budget
    FewestGuesses,
    /// Maximize win probability, break ties on expected guesses
    #[default]
    WinThenGuesses,
}

impl Objective {
    /// Parse an objective name from the command line
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "win" | "win-rate" => Some(Self::WinRate),
            "guesses" | "fewest-guesses" => Some(Self::FewestGuesses),
            "win-then-guesses" => Some(Self::WinThenGuesses),
            _ => None,
        }
    }

    /// Whether win probability is a selection criterion
    #[must_use]
    pub const fn maximize_win(self) -> bool {
        !matches!(self, Self::FewestGuesses)
    }

    /// Whether expected guesses participate in selection and convergence
    #[must_use]
    pub const fn track_guesses(self) -> bool {
        !matches!(self, Self::WinRate)
    }

    /// Canonical name for display
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WinRate => "win-rate",
            Self::FewestGuesses => "fewest-guesses",
            Self::WinThenGuesses => "win-then-guesses",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for objective in [
            Objective::WinRate,
            Objective::FewestGuesses,
            Objective::WinThenGuesses,
        ] {
            assert_eq!(Objective::from_name(objective.name()), Some(objective));
        }
        assert_eq!(Objective::from_name("fastest"), None);
    }

    #[test]
    fn criteria_per_objective() {
        assert!(Objective::WinRate.maximize_win());
        assert!(!Objective::WinRate.track_guesses());
        assert!(!Objective::FewestGuesses.maximize_win());
        assert!(Objective::FewestGuesses.track_guesses());
        assert!(Objective::WinThenGuesses.maximize_win());
        assert!(Objective::WinThenGuesses.track_guesses());
    }
}
