pub mod vectors;

pub use vectors::{load_vectors, read_vectors, save_vectors, unique_categories, write_vectors};
