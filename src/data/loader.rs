use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::math::matrix::Matrix;

/// A dataset as the network consumes it: column inputs paired with column
/// targets, index-aligned.
pub type Dataset = (Vec<Matrix<f64>>, Vec<Matrix<f64>>);

/// The four XOR pairs: (0,0)→0, (0,1)→1, (1,0)→1, (1,1)→0, as (2×1) inputs
/// and (1×1) targets.
pub fn generate_xor() -> Dataset {
    let cases: [([f64; 2], f64); 4] = [
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ];

    let mut inputs = Vec::with_capacity(4);
    let mut targets = Vec::with_capacity(4);
    for (pair, out) in cases {
        let mut input = Matrix::zeros(2, 1);
        input.set(0, 0, pair[0]);
        input.set(1, 0, pair[1]);
        inputs.push(input);

        let mut target = Matrix::zeros(1, 1);
        target.set(0, 0, out);
        targets.push(target);
    }
    (inputs, targets)
}

/// Loads the classic Iris CSV (4 numeric features, then the class label)
/// into (4×1) feature columns and (3×1) one-hot targets.
///
/// Rows with the wrong field count, unparseable feature values, or an
/// unknown class label are skipped with a warning — malformed records are
/// this loader's concern, never the network's.
pub fn load_iris(path: impl AsRef<Path>) -> Result<Dataset> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut inputs = Vec::new();
    let mut targets = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            log::warn!("skipping iris row with {} fields: {line}", fields.len());
            continue;
        }

        let mut values = [0.0f64; 4];
        let mut parsed = true;
        for (i, field) in fields[..4].iter().enumerate() {
            match field.trim().parse::<f64>() {
                Ok(v) => values[i] = v,
                Err(_) => {
                    parsed = false;
                    break;
                }
            }
        }
        if !parsed {
            log::warn!("skipping iris row with unparseable feature: {line}");
            continue;
        }

        let class_index = match fields[4].trim() {
            "Iris-setosa" => 0,
            "Iris-versicolor" => 1,
            "Iris-virginica" => 2,
            other => {
                log::warn!("skipping iris row with unknown label {other:?}");
                continue;
            }
        };

        let mut input = Matrix::zeros(4, 1);
        for (i, &v) in values.iter().enumerate() {
            input.set(i, 0, v);
        }
        inputs.push(input);

        let mut target = Matrix::zeros(3, 1);
        target.set(class_index, 0, 1.0);
        targets.push(target);
    }

    Ok((inputs, targets))
}
