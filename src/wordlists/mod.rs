//! Word list files

pub mod loader;

pub use loader::{load_word_list, load_words, words_from_lines};
