//! Byte layout of a persisted embedding: little-endian IEEE-754 `f32`,
//! one value after another. Encoding is lossless in both directions.

use thiserror::Error;

const F32_WIDTH: usize = std::mem::size_of::<f32>();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("blob of {0} bytes is not a whole number of f32 values")]
    Truncated(usize),

    #[error("blob holds {actual} values, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
}

#[must_use]
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn decode_embedding(bytes: &[u8], expected_dimension: usize) -> Result<Vec<f32>, CodecError> {
    if bytes.len() % F32_WIDTH != 0 {
        return Err(CodecError::Truncated(bytes.len()));
    }
    let actual = bytes.len() / F32_WIDTH;
    if actual != expected_dimension {
        return Err(CodecError::WrongLength { expected: expected_dimension, actual });
    }
    Ok(bytes
        .chunks_exact(F32_WIDTH)
        .map(|chunk| {
            let mut buf = [0_u8; F32_WIDTH];
            buf.copy_from_slice(chunk);
            f32::from_le_bytes(buf)
        })
        .collect())
}
