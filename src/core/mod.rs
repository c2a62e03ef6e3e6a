//! Core domain types for the policy search
//!
//! This module contains the fundamental domain types with zero external dependencies
//! beyond hashing and serde. All types here are pure and have clear mathematical
//! properties.

mod candidates;
mod word;
mod word_list;

pub use candidates::CandidateSet;
pub use word::{WORD_LEN, Word, WordError};
pub use word_list::{WordList, WordListError};
