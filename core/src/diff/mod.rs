pub mod parser;

pub use parser::{parse_diff, DiffHunk, DiffLine, LineType};
