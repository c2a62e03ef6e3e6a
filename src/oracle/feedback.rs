//! Feedback rule evaluation
//!
//! Computes, for a (solution, guess) pair, the set of solutions consistent with
//! the feedback that guess would receive. The feedback itself is never
//! materialized as colors; the oracle goes straight from the pair to the
//! surviving candidate set.
//!
//! Duplicate letters follow the game's counting rule: a guess letter is marked
//! wrong-position only while the solution still has unaccounted occurrences of
//! it, so at most min(solution count, guess count) occurrences ever constrain
//! the candidates.

use crate::core::{CandidateSet, WORD_LEN, Word};

const ALPHABET: usize = 26;

#[inline]
fn letter(c: u8) -> usize {
    (c - b'a') as usize
}

/// All solutions consistent with the feedback `guess` would receive against `solution`
///
/// The returned set always contains `solution` itself: a word is consistent
/// with the feedback it produces.
#[must_use]
pub fn remaining_candidates(solution: &Word, guess: &Word, solutions: &[Word]) -> CandidateSet {
    let s = solution.chars();
    let g = guess.chars();

    // Pass 1: exact position matches; count the solution letters left over.
    let mut matched = [false; WORD_LEN];
    let mut available = [0u8; ALPHABET];
    for i in 0..WORD_LEN {
        if g[i] == s[i] {
            matched[i] = true;
        } else {
            available[letter(s[i])] += 1;
        }
    }

    // Pass 2: wrong-position marks, consuming the per-letter budget, and
    // letters absent from the solution entirely.
    let mut wrong_position = [false; WORD_LEN];
    let mut absent = [false; ALPHABET];
    for i in 0..WORD_LEN {
        if matched[i] {
            continue;
        }
        if solution.has_letter(g[i]) {
            if available[letter(g[i])] > 0 {
                wrong_position[i] = true;
                available[letter(g[i])] -= 1;
            }
        } else {
            absent[letter(g[i])] = true;
        }
    }

    // Minimum occurrences the feedback proves for each guessed letter.
    let mut min_count = [0u8; ALPHABET];
    for &c in g {
        min_count[letter(c)] = solution.letter_count(c).min(guess.letter_count(c));
    }

    let mut remaining = CandidateSet::empty(solutions.len());
    'candidates: for (index, w) in solutions.iter().enumerate() {
        let wc = w.chars();

        // Matched positions must agree with the guess; every other position
        // must disagree (wrong-position letters cannot repeat their slot, and
        // a gray slot rules that letter out of that position).
        for i in 0..WORD_LEN {
            if matched[i] {
                if wc[i] != g[i] {
                    continue 'candidates;
                }
            } else if wc[i] == g[i] {
                continue 'candidates;
            }
        }

        // Wrong-position letters must occur at least as often as proven.
        for i in 0..WORD_LEN {
            if wrong_position[i] && w.letter_count(g[i]) < min_count[letter(g[i])] {
                continue 'candidates;
            }
        }

        // Absent letters cannot occur at all.
        for (l, &is_absent) in absent.iter().enumerate() {
            if is_absent && w.has_letter(b'a' + l as u8) {
                continue 'candidates;
            }
        }

        remaining.insert(index as u32);
    }

    remaining
}
