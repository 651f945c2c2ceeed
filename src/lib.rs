pub mod activation;
pub mod data;
pub mod error;
pub mod init;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use error::{NetworkError, Result};
pub use init::initializer::Initializer;
pub use math::element::Element;
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use train::trainer::{classification_accuracy, mse, train_epoch, EpochStats};
