use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::element::Element;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Scalar mean-squared error between two same-shape matrices.
pub fn mse<T: Element>(predicted: &Matrix<T>, expected: &Matrix<T>) -> f64 {
    let mut diff = predicted.clone();
    diff.subtract(expected);
    diff.apply(|x| x * x);
    diff.mean().to_f64()
}

/// One full online-SGD pass over the dataset, sample order as given.
/// Returns the mean squared error measured before each sample's update.
pub fn train_epoch<T: Element>(
    network: &mut Network<T>,
    inputs: &[Matrix<T>],
    targets: &[Matrix<T>],
    learning_rate: T,
) -> Result<f64> {
    assert_eq!(
        inputs.len(),
        targets.len(),
        "dataset has {} inputs but {} targets",
        inputs.len(),
        targets.len()
    );
    if inputs.is_empty() {
        return Ok(0.0);
    }

    let mut total_loss = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        let output = network.predict(input)?;
        total_loss += mse(&output, target);
        network.train(input, target, learning_rate)?;
    }
    Ok(total_loss / inputs.len() as f64)
}

/// Fraction of samples where the prediction's argmax agrees with the
/// target's argmax (one-hot classification decoding).
pub fn classification_accuracy<T: Element>(
    network: &Network<T>,
    inputs: &[Matrix<T>],
    targets: &[Matrix<T>],
) -> Result<f64> {
    assert_eq!(
        inputs.len(),
        targets.len(),
        "dataset has {} inputs but {} targets",
        inputs.len(),
        targets.len()
    );
    if inputs.is_empty() {
        return Ok(0.0);
    }

    let mut correct = 0usize;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        let output = network.predict(input)?;
        if output.argmax() == target.argmax() {
            correct += 1;
        }
    }
    Ok(correct as f64 / inputs.len() as f64)
}

/// Per-epoch training statistics, handy for progress reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub mean_loss: f64,
    /// Training accuracy in [0, 1]; only set for classification runs.
    pub accuracy: Option<f64>,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
