//! `viper-io`: textual IL reader and canonical/pretty writer (spec §4.1–§4.2,
//! §6.1). Round-trip determinism is part of the contract (P1/P2, spec §8),
//! so the reader and writer live in one crate and are tested together.

mod error;
mod lexer;
mod reader;
mod writer;

pub use error::ParseError;
pub use reader::parse_text;
pub use writer::write_text;
