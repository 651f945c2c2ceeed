//! Binary model format.
//!
//! Little-endian, fixed field order:
//!
//! ```text
//! magic:      4 bytes, literal "NNB1"
//! version:    u32 (currently 0)
//! num_layers: u32
//! layer_sizes[num_layers]: u32 each
//! activation_name_len: u32
//! activation_name: raw bytes, no terminator
//! (num_layers - 1) weight matrices, then (num_layers - 1) bias matrices:
//!     rows: u32, cols: u32, rows*cols elements, row-major
//! ```
//!
//! Element width is fixed per element type (`Element::BYTE_WIDTH`); a file
//! round-trips with the element type that wrote it.

use std::fs;
use std::io;
use std::path::Path;

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::math::element::Element;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

pub const MAGIC: [u8; 4] = *b"NNB1";
pub const FORMAT_VERSION: u32 = 0;

impl<T: Element> Network<T> {
    /// Writes the full model (topology, activation tag, all weights and
    /// biases) to `path`, overwriting any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if !self.built {
            return Err(NetworkError::NotBuilt);
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        push_u32(&mut buf, FORMAT_VERSION);

        push_u32(&mut buf, self.layer_sizes.len() as u32);
        for &size in &self.layer_sizes {
            push_u32(&mut buf, size as u32);
        }

        let name = self.activation.name().as_bytes();
        push_u32(&mut buf, name.len() as u32);
        buf.extend_from_slice(name);

        for matrix in &self.weights {
            write_matrix(&mut buf, matrix);
        }
        for matrix in &self.biases {
            write_matrix(&mut buf, matrix);
        }

        fs::write(path, buf)?;
        Ok(())
    }

    /// Restores a model previously written by `save()`.
    ///
    /// A missing file is a soft outcome: it logs a warning and returns
    /// `Ok(false)` with the network untouched. Anything structurally wrong
    /// with the file (bad magic, unknown version, truncation, topology
    /// mismatch) is a hard error — and also leaves the network untouched,
    /// because nothing is committed until the whole file has decoded.
    ///
    /// On success the activation goes through the same selection logic as
    /// `set_activation`; the initializer tag is not part of the format, so
    /// the choice comes back auto-derived, which is fine since an
    /// initializer is only consulted by `build()`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "model file {} not found; keeping current network",
                    path.display()
                );
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = ByteReader::new(&bytes);

        if reader.take(4)? != &MAGIC[..] {
            return Err(NetworkError::BadMagic);
        }
        let version = reader.read_u32()?;
        if version != FORMAT_VERSION {
            return Err(NetworkError::UnsupportedVersion(version));
        }

        let num_layers = reader.read_u32()? as usize;
        if num_layers < 2 {
            return Err(NetworkError::MalformedModel(format!(
                "topology needs at least two layer sizes, file has {num_layers}"
            )));
        }
        let mut layer_sizes = Vec::with_capacity(num_layers);
        for _ in 0..num_layers {
            layer_sizes.push(reader.read_u32()? as usize);
        }

        let name_len = reader.read_u32()? as usize;
        let name_bytes = reader.take(name_len)?;
        let activation_name = std::str::from_utf8(name_bytes)
            .map_err(|_| {
                NetworkError::MalformedModel("activation name is not valid UTF-8".into())
            })?
            .to_owned();

        let mut weights = Vec::with_capacity(num_layers - 1);
        for i in 0..num_layers - 1 {
            let matrix = read_matrix::<T>(&mut reader)?;
            if matrix.rows() != layer_sizes[i + 1] || matrix.cols() != layer_sizes[i] {
                return Err(NetworkError::MalformedModel(format!(
                    "weight matrix {i} is {}x{}, topology expects {}x{}",
                    matrix.rows(),
                    matrix.cols(),
                    layer_sizes[i + 1],
                    layer_sizes[i]
                )));
            }
            weights.push(matrix);
        }

        let mut biases = Vec::with_capacity(num_layers - 1);
        for i in 0..num_layers - 1 {
            let matrix = read_matrix::<T>(&mut reader)?;
            if matrix.rows() != layer_sizes[i + 1] || matrix.cols() != 1 {
                return Err(NetworkError::MalformedModel(format!(
                    "bias matrix {i} is {}x{}, topology expects {}x1",
                    matrix.rows(),
                    matrix.cols(),
                    layer_sizes[i + 1]
                )));
            }
            biases.push(matrix);
        }

        // Everything decoded; commit.
        self.layer_sizes = layer_sizes;
        self.set_activation(ActivationFunction::from_name(&activation_name));
        self.weights = weights;
        self.biases = biases;
        self.built = true;

        log::info!(
            "loaded model from {}: layers {:?}, activation {}",
            path.display(),
            self.layer_sizes,
            self.activation.name()
        );
        Ok(true)
    }
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_matrix<T: Element>(buf: &mut Vec<u8>, matrix: &Matrix<T>) {
    push_u32(buf, matrix.rows() as u32);
    push_u32(buf, matrix.cols() as u32);
    for i in 0..matrix.rows() * matrix.cols() {
        matrix.get_flat(i).write_le(buf);
    }
}

fn read_matrix<T: Element>(reader: &mut ByteReader<'_>) -> Result<Matrix<T>> {
    let rows = reader.read_u32()? as usize;
    let cols = reader.read_u32()? as usize;
    if rows == 0 || cols == 0 {
        return Err(NetworkError::MalformedModel(format!(
            "matrix header claims {rows}x{cols}"
        )));
    }
    let mut matrix = Matrix::zeros(rows, cols);
    for i in 0..rows * cols {
        matrix.set_flat(i, reader.read_element()?);
    }
    Ok(matrix)
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> ByteReader<'a> {
        ByteReader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.bytes.len() - self.pos < n {
            return Err(NetworkError::Truncated);
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_element<T: Element>(&mut self) -> Result<T> {
        Ok(T::read_le(self.take(T::BYTE_WIDTH)?))
    }
}
