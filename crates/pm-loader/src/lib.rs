pub mod error;
pub mod reader;

pub use error::{LoadError, Result};
pub use reader::{load_matrices, parse_matrices, read_matrices, Dimensions};
