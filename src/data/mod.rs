pub mod loader;

pub use loader::{generate_xor, load_iris, Dataset};
