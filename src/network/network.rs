use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::init::initializer::Initializer;
use crate::math::element::Element;
use crate::math::matrix::Matrix;

/// Tracks how the network's initializer was chosen. Once a caller picks one
/// explicitly it is sticky: later activation changes no longer re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum InitChoice {
    /// Nothing chosen yet; build() falls back to plain Uniform.
    Unset,
    /// Derived automatically from the selected activation.
    Auto(Initializer),
    /// Chosen by the caller; never overridden.
    Explicit(Initializer),
}

impl InitChoice {
    fn effective(self) -> Initializer {
        match self {
            InitChoice::Unset => Initializer::Uniform,
            InitChoice::Auto(init) | InitChoice::Explicit(init) => init,
        }
    }
}

/// A fully-connected feed-forward network trained by single-sample
/// backpropagation.
///
/// Lifecycle: configure layer sizes (and optionally activation and
/// initializer), then `build()`, then `predict`/`train` freely. `build()`
/// is a full reset — calling it again reallocates every parameter from the
/// current configuration and discards anything trained. `predict` and
/// `train` before a successful build return [`NetworkError::NotBuilt`].
///
/// For adjacent layer widths (n_in, n_out) the network holds one
/// (n_out × n_in) weight matrix and one (n_out × 1) bias column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network<T: Element> {
    pub(crate) layer_sizes: Vec<usize>,
    pub(crate) weights: Vec<Matrix<T>>,
    pub(crate) biases: Vec<Matrix<T>>,
    pub(crate) activation: ActivationFunction,
    pub(crate) init_choice: InitChoice,
    pub(crate) built: bool,
    #[serde(skip, default = "entropy_rng")]
    pub(crate) rng: StdRng,
}

fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

impl<T: Element> Network<T> {
    /// An unconfigured network with an entropy-seeded RNG.
    pub fn new() -> Network<T> {
        Network::from_rng(entropy_rng())
    }

    /// An unconfigured network with a fixed RNG seed, for reproducible
    /// initialization.
    pub fn with_seed(seed: u64) -> Network<T> {
        Network::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Network<T> {
        Network {
            layer_sizes: Vec::new(),
            weights: Vec::new(),
            biases: Vec::new(),
            activation: ActivationFunction::Sigmoid,
            init_choice: InitChoice::Unset,
            built: false,
            rng,
        }
    }

    /// Sets the ordered layer widths, input first. May be called any number
    /// of times before `build()`.
    pub fn set_layer_sizes(&mut self, sizes: &[usize]) {
        self.layer_sizes = sizes.to_vec();
    }

    /// Selects the activation. Unless an initializer was already chosen
    /// explicitly, this also derives the matching default initializer
    /// (Sigmoid/Tanh → Xavier, ReLU/LeakyReLU → He).
    pub fn set_activation(&mut self, activation: ActivationFunction) {
        self.activation = activation;
        if !matches!(self.init_choice, InitChoice::Explicit(_)) {
            self.init_choice = InitChoice::Auto(activation.default_initializer());
        }
    }

    /// Selects the activation by tag; unknown tags fall back to Sigmoid.
    pub fn set_activation_name(&mut self, name: &str) {
        self.set_activation(ActivationFunction::from_name(name));
    }

    /// Selects the initializer explicitly. The choice is sticky: later
    /// `set_activation` calls will not replace it.
    pub fn set_initializer(&mut self, initializer: Initializer) {
        self.init_choice = InitChoice::Explicit(initializer);
    }

    /// Selects the initializer by tag; unknown tags fall back to Uniform.
    pub fn set_initializer_name(&mut self, name: &str) {
        self.set_initializer(Initializer::from_name(name));
    }

    /// (Re)allocates every weight and bias matrix from the current
    /// configuration, discarding any previously trained parameters.
    /// Weights go through the effective initializer; biases start at zero.
    pub fn build(&mut self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(NetworkError::TooFewLayers(self.layer_sizes.len()));
        }

        let init = self.init_choice.effective();
        self.weights.clear();
        self.biases.clear();

        for i in 0..self.layer_sizes.len() - 1 {
            let fan_in = self.layer_sizes[i];
            let fan_out = self.layer_sizes[i + 1];

            let mut weight = Matrix::zeros(fan_out, fan_in);
            init.apply(&mut weight, fan_in, fan_out, &mut self.rng);
            self.weights.push(weight);

            self.biases.push(Matrix::zeros(fan_out, 1));
        }

        self.built = true;
        log::info!(
            "built network: layers {:?}, activation {}, initializer {}",
            self.layer_sizes,
            self.activation.name(),
            init.name()
        );
        Ok(())
    }

    /// Forward-only inference. `input` must be a (layer_sizes[0] × 1)
    /// column; the result is the (layer_sizes[last] × 1) output activation.
    pub fn predict(&self, input: &Matrix<T>) -> Result<Matrix<T>> {
        if !self.built {
            return Err(NetworkError::NotBuilt);
        }

        let act = self.activation;
        let mut activation = input.clone();
        for i in 0..self.weights.len() {
            let mut z = self.weights[i].mat_mul(&activation);
            z.add(&self.biases[i]);
            z.apply(|x| T::from_f64(act.value(x.to_f64())));
            activation = z;
        }
        Ok(activation)
    }

    /// One step of online stochastic gradient descent on a single
    /// (input, target) pair: forward with every intermediate activation
    /// retained, then backpropagation updating weights and biases in place.
    pub fn train(&mut self, input: &Matrix<T>, target: &Matrix<T>, learning_rate: T) -> Result<()> {
        if !self.built {
            return Err(NetworkError::NotBuilt);
        }
        let activations = self.forward(input);
        self.backward(&activations, target, learning_rate);
        Ok(())
    }

    /// Forward pass retaining every layer activation, the raw input
    /// included as activations[0]. Backpropagation needs all of them.
    fn forward(&self, input: &Matrix<T>) -> Vec<Matrix<T>> {
        let act = self.activation;
        let mut activations = Vec::with_capacity(self.layer_sizes.len());
        activations.push(input.clone());

        let mut current = input.clone();
        for i in 0..self.weights.len() {
            let mut z = self.weights[i].mat_mul(&current);
            z.add(&self.biases[i]);
            z.apply(|x| T::from_f64(act.value(x.to_f64())));
            current = z;
            activations.push(current.clone());
        }
        activations
    }

    /// Chain-rule backpropagation. Every derivative is taken on the stored
    /// forward activations, never on raw pre-activation sums.
    fn backward(&mut self, activations: &[Matrix<T>], target: &Matrix<T>, learning_rate: T) {
        let act = self.activation;
        let deriv = |x: T| T::from_f64(act.derivative(x.to_f64()));
        let last = self.weights.len() - 1;

        // Output layer: delta = act'(a_L) ⊙ (a_L − target).
        let mut error = activations[last + 1].clone();
        error.subtract(target);

        let mut delta = activations[last + 1].clone();
        delta.apply(deriv);
        delta.hadamard(&error);

        self.descend(last, &delta, &activations[last], learning_rate);

        // Remaining layers, second-to-last down to the first.
        for i in (0..last).rev() {
            let mut new_delta = self.weights[i + 1].transpose().mat_mul(&delta);
            let mut act_deriv = activations[i + 1].clone();
            act_deriv.apply(deriv);
            new_delta.hadamard(&act_deriv);
            delta = new_delta;

            self.descend(i, &delta, &activations[i], learning_rate);
        }
    }

    /// Gradient step for one layer: parameter -= lr · gradient, with
    /// grad_W = delta · prevᵀ and grad_b = delta.
    fn descend(
        &mut self,
        layer: usize,
        delta: &Matrix<T>,
        prev_activation: &Matrix<T>,
        learning_rate: T,
    ) {
        let mut grad_weights = delta.mat_mul(&prev_activation.transpose());
        let mut grad_biases = delta.clone();

        grad_weights.scale(learning_rate);
        grad_biases.scale(learning_rate);

        self.weights[layer].subtract(&grad_weights);
        self.biases[layer].subtract(&grad_biases);
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn weights(&self) -> &[Matrix<T>] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix<T>] {
        &self.biases
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Serializes the network to a pretty-printed JSON file. This is a
    /// debug/interchange format; the binary model format is `save()`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()>
    where
        T: Serialize,
    {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`. The restored network gets a fresh entropy-seeded RNG.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network<T>>
    where
        T: DeserializeOwned,
    {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let network = serde_json::from_reader(reader)?;
        Ok(network)
    }
}

impl<T: Element> Default for Network<T> {
    fn default() -> Self {
        Network::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Matrix<f64> {
        let mut m = Matrix::zeros(values.len(), 1);
        for (i, &v) in values.iter().enumerate() {
            m.set(i, 0, v);
        }
        m
    }

    #[test]
    fn build_allocates_expected_shapes() {
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_layer_sizes(&[2, 3, 1]);
        net.build().unwrap();

        assert_eq!(net.weights().len(), 2);
        assert_eq!(net.biases().len(), 2);
        assert_eq!((net.weights()[0].rows(), net.weights()[0].cols()), (3, 2));
        assert_eq!((net.weights()[1].rows(), net.weights()[1].cols()), (1, 3));
        assert_eq!((net.biases()[0].rows(), net.biases()[0].cols()), (3, 1));
        assert_eq!((net.biases()[1].rows(), net.biases()[1].cols()), (1, 1));
        // Biases start at zero regardless of initializer.
        assert_eq!(net.biases()[0].sum(), 0.0);
    }

    #[test]
    fn build_requires_two_layer_sizes() {
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_layer_sizes(&[4]);
        assert!(matches!(net.build(), Err(NetworkError::TooFewLayers(1))));
    }

    #[test]
    fn predict_and_train_require_build() {
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_layer_sizes(&[2, 1]);
        let input = column(&[0.0, 1.0]);
        let target = column(&[1.0]);
        assert!(matches!(net.predict(&input), Err(NetworkError::NotBuilt)));
        assert!(matches!(
            net.train(&input, &target, 0.1),
            Err(NetworkError::NotBuilt)
        ));
    }

    #[test]
    fn rebuild_discards_trained_parameters() {
        let mut net: Network<f64> = Network::with_seed(3);
        net.set_layer_sizes(&[2, 2, 1]);
        net.build().unwrap();
        let input = column(&[1.0, 0.0]);
        let target = column(&[1.0]);
        for _ in 0..50 {
            net.train(&input, &target, 0.5).unwrap();
        }
        net.build().unwrap();
        // Fresh biases are all zero again.
        assert_eq!(net.biases()[0].sum(), 0.0);
        assert_eq!(net.biases()[1].sum(), 0.0);
    }

    #[test]
    fn activation_derives_default_initializer() {
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_activation(ActivationFunction::ReLU);
        assert_eq!(net.init_choice, InitChoice::Auto(Initializer::He));
        net.set_activation(ActivationFunction::Tanh);
        assert_eq!(net.init_choice, InitChoice::Auto(Initializer::Xavier));
    }

    #[test]
    fn explicit_initializer_is_sticky() {
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_initializer(Initializer::Zeros);
        net.set_activation(ActivationFunction::ReLU);
        assert_eq!(net.init_choice, InitChoice::Explicit(Initializer::Zeros));
    }

    #[test]
    fn unknown_tags_fall_back() {
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_activation_name("Mish");
        assert_eq!(net.activation(), ActivationFunction::Sigmoid);
        net.set_initializer_name("LeCun");
        assert_eq!(
            net.init_choice,
            InitChoice::Explicit(Initializer::Uniform)
        );
    }

    #[test]
    fn predict_output_has_output_layer_shape() {
        let mut net: Network<f64> = Network::with_seed(5);
        net.set_layer_sizes(&[4, 6, 3]);
        net.build().unwrap();
        let out = net.predict(&column(&[0.1, 0.2, 0.3, 0.4])).unwrap();
        assert_eq!((out.rows(), out.cols()), (3, 1));
    }

    #[test]
    fn repeated_training_reduces_error_in_aggregate() {
        let mut net: Network<f64> = Network::with_seed(9);
        net.set_layer_sizes(&[2, 4, 1]);
        net.set_activation(ActivationFunction::Sigmoid);
        net.build().unwrap();

        let input = column(&[0.3, 0.8]);
        let target = column(&[0.9]);

        let squared_error = |net: &Network<f64>| {
            let out = net.predict(&input).unwrap();
            let diff = out.get(0, 0) - target.get(0, 0);
            diff * diff
        };

        let mut errors = Vec::with_capacity(1000);
        for _ in 0..1000 {
            errors.push(squared_error(&net));
            net.train(&input, &target, 0.5).unwrap();
        }

        let first: f64 = errors[..10].iter().sum::<f64>() / 10.0;
        let last: f64 = errors[990..].iter().sum::<f64>() / 10.0;
        assert!(
            last < first,
            "error should drop in aggregate: first {first}, last {last}"
        );
    }

    #[test]
    fn single_weight_network_update_matches_hand_computation() {
        // One layer, one weight, one bias: a = σ(w·x + b).
        let mut net: Network<f64> = Network::with_seed(1);
        net.set_layer_sizes(&[1, 1]);
        net.set_initializer(Initializer::Zeros);
        net.build().unwrap();

        // w = 0, b = 0 → a = σ(0) = 0.5 for any input.
        let input = column(&[2.0]);
        let target = column(&[1.0]);
        let lr = 1.0;

        // delta = a(1−a)(a−t) = 0.5·0.5·(−0.5) = −0.125
        // w ← 0 − lr·delta·x = 0.25; b ← 0 − lr·delta = 0.125
        net.train(&input, &target, lr).unwrap();
        let w = net.weights()[0].get(0, 0);
        let b = net.biases()[0].get(0, 0);
        assert!((w - 0.25).abs() < 1e-12, "w = {w}");
        assert!((b - 0.125).abs() < 1e-12, "b = {b}");
    }

    #[test]
    fn json_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");

        let mut net: Network<f64> = Network::with_seed(21);
        net.set_layer_sizes(&[2, 3, 2]);
        net.build().unwrap();
        net.save_json(&path).unwrap();

        let restored: Network<f64> = Network::load_json(&path).unwrap();
        let input = column(&[0.25, 0.75]);
        assert_eq!(
            net.predict(&input).unwrap(),
            restored.predict(&input).unwrap()
        );
    }
}
