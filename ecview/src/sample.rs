//! One reading of the source: a timestamp followed by the series values.

use std::str::FromStr;

use crate::error::ReadError;

/// Timestamp plus at least three series.
pub const MIN_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Validates length and finiteness. A `Sample` that exists is always usable.
    pub fn new(values: Vec<f64>) -> Result<Self, ReadError> {
        if values.len() < MIN_FIELDS {
            return Err(ReadError::Malformed(format!(
                "{} fields, need at least {MIN_FIELDS}",
                values.len()
            )));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ReadError::Malformed(format!(
                "field {pos} is not finite"
            )));
        }
        Ok(Self { values })
    }

    pub fn timestamp(&self) -> f64 {
        self.values[0]
    }

    /// Series values, in the source's fixed order.
    pub fn series(&self) -> &[f64] {
        &self.values[1..]
    }

    /// Total field count, timestamp included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromStr for Sample {
    type Err = ReadError;

    /// Parses one line of whitespace separated decimal numbers.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| ReadError::Malformed(format!("not a number: {tok:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Sample::new(values)
    }
}
