//! CSV line tokenizing

mod tokenizer;

pub use tokenizer::{Tokenizer, TokenizerConfig};
