//! Byte-level helpers shared by the blob encoder and decoder.

pub mod io;
pub mod math;
pub mod parser;

pub use math::{align_up, padding_for, range_end, to_u32};
pub use parser::Parser;
