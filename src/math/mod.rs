pub mod element;
pub mod matrix;

pub use element::Element;
pub use matrix::Matrix;
