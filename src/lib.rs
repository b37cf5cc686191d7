pub mod align;
pub mod config;
pub mod dimred;
mod error;
pub mod io;
pub mod pipeline;
pub mod similarity;
pub mod timing;
mod utils;

pub use align::{align, SignAligner};
pub use dimred::pca::reduce;
pub use dimred::Reduction;
pub use error::{ReduceError, Result};
