//! Loading labelled examples from CSV files.
//!
//! Each row of a file is one example. The trailing `label_columns` fields are
//! the expected output and everything before them is the input, e.g. the
//! classic iris data:
//!
//! ```text
//! 5.1,3.5,1.4,0.2,0
//! 7.0,3.2,4.7,1.4,1
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}, column {column}: {value:?} is not a number")]
    Parse {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("row {row} has {columns} columns, need more than {label_columns}")]
    MissingLabels {
        row: usize,
        columns: usize,
        label_columns: usize,
    },

    #[error("row {row}: {value} is not a class index below {label_count}")]
    InvalidClass {
        row: usize,
        value: f64,
        label_count: usize,
    },
}

/// A list of `(input, expected output)` pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<(Vec<f64>, Vec<f64>)>,
}

impl Dataset {
    pub fn new(examples: Vec<(Vec<f64>, Vec<f64>)>) -> Self {
        Dataset { examples }
    }

    /// Reads a headerless CSV file of numbers.
    pub fn load_csv<P: AsRef<Path>>(path: P, label_columns: usize) -> Result<Self, DataError> {
        let path = path.as_ref();
        debug!("loading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file), label_columns)
    }

    /// Reads headerless CSV data of numbers from `reader`.
    pub fn from_csv_reader<R: io::Read>(reader: R, label_columns: usize) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut examples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() <= label_columns {
                return Err(DataError::MissingLabels {
                    row,
                    columns: record.len(),
                    label_columns,
                });
            }
            let mut input = record
                .iter()
                .enumerate()
                .map(|(column, field)| {
                    field.parse::<f64>().map_err(|_| DataError::Parse {
                        row,
                        column,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            let labels = input.split_off(input.len() - label_columns);
            examples.push((input, labels));
        }
        debug!("loaded {} examples", examples.len());
        Ok(Dataset { examples })
    }

    /// Replaces each single class-index label with a one-hot vector of
    /// `label_count` values.
    pub fn one_hot(self, label_count: usize) -> Result<Self, DataError> {
        let examples = self
            .examples
            .into_iter()
            .enumerate()
            .map(|(row, (input, labels))| {
                let value = match labels[..] {
                    [value] => value,
                    _ => {
                        return Err(DataError::MissingLabels {
                            row,
                            columns: input.len() + labels.len(),
                            label_columns: 1,
                        })
                    }
                };
                if value < 0.0 || value.fract() != 0.0 || value >= label_count as f64 {
                    return Err(DataError::InvalidClass {
                        row,
                        value,
                        label_count,
                    });
                }
                let mut encoded = vec![0.0; label_count];
                encoded[value as usize] = 1.0;
                Ok((input, encoded))
            })
            .collect::<Result<_, _>>()?;
        Ok(Dataset { examples })
    }

    /// Shuffles the examples in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.examples.shuffle(rng);
    }

    /// Splits off the trailing examples, keeping `fraction` of them (rounded)
    /// in the first dataset.
    pub fn split(mut self, fraction: f64) -> (Dataset, Dataset) {
        let len = self.examples.len();
        let at = ((len as f64 * fraction).round().max(0.0) as usize).min(len);
        let rest = self.examples.split_off(at);
        (self, Dataset { examples: rest })
    }

    pub fn examples(&self) -> &[(Vec<f64>, Vec<f64>)] {
        &self.examples
    }

    pub fn into_examples(self) -> Vec<(Vec<f64>, Vec<f64>)> {
        self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
