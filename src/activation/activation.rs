use serde::{Deserialize, Serialize};

use crate::init::initializer::Initializer;

/// Negative-side slope of LeakyReLU.
const LEAKY_SLOPE: f64 = 0.01;

/// The closed set of supported activations.
///
/// Every variant binds a value function and a derivative expressed in terms
/// of the activation's *output* a = f(z), not its raw input. That is what
/// makes backpropagation work off the stored forward activations alone:
/// sigmoid' = a·(1−a), tanh' = 1−a². For (Leaky)ReLU the sign of a matches
/// the sign of z, so testing a is equivalent to testing z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    ReLU,
    LeakyReLU,
}

impl ActivationFunction {
    /// Elementwise activation value.
    pub fn value(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU => {
                if x > 0.0 {
                    x
                } else {
                    LEAKY_SLOPE * x
                }
            }
        }
    }

    /// Elementwise derivative, taking the activation *output* a = f(z).
    pub fn derivative(&self, a: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => a * (1.0 - a),
            ActivationFunction::Tanh => 1.0 - a * a,
            ActivationFunction::ReLU => {
                if a > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU => {
                if a > 0.0 {
                    1.0
                } else {
                    LEAKY_SLOPE
                }
            }
        }
    }

    /// Looks up an activation by tag. Lookup is total: an unrecognized tag
    /// falls back to `Sigmoid`. This is a deliberate policy, not an
    /// accident — callers (including the model loader) never have to handle
    /// an unknown-tag error. The legacy "Leaky ReLU" spelling is accepted
    /// as an alias.
    pub fn from_name(name: &str) -> ActivationFunction {
        match name {
            "Sigmoid" => ActivationFunction::Sigmoid,
            "Tanh" => ActivationFunction::Tanh,
            "ReLU" => ActivationFunction::ReLU,
            "LeakyReLU" | "Leaky ReLU" => ActivationFunction::LeakyReLU,
            _ => ActivationFunction::Sigmoid,
        }
    }

    /// Canonical tag, as persisted in model files.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "Sigmoid",
            ActivationFunction::Tanh => "Tanh",
            ActivationFunction::ReLU => "ReLU",
            ActivationFunction::LeakyReLU => "LeakyReLU",
        }
    }

    /// The weight initializer that pairs naturally with this activation:
    /// Xavier for the saturating ones, He for the rectifiers.
    pub fn default_initializer(&self) -> Initializer {
        match self {
            ActivationFunction::Sigmoid | ActivationFunction::Tanh => Initializer::Xavier,
            ActivationFunction::ReLU | ActivationFunction::LeakyReLU => Initializer::He,
        }
    }
}
