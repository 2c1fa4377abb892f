mod file;
mod hash;
mod records;
mod sandbox;
mod verdict;

pub use file::*;
pub use hash::*;
pub use records::*;
pub use sandbox::*;
pub use verdict::*;
