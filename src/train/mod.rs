pub mod trainer;

pub use trainer::{classification_accuracy, mse, train_epoch, EpochStats};
