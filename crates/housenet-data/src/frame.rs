use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Frame has no columns")]
    Empty,

    #[error("Row count mismatch: {left} vs {right}")]
    RowCountMismatch { left: usize, right: usize },

    #[error("Column count mismatch: {left} vs {right}")]
    ColumnCountMismatch { left: usize, right: usize },

    #[error("Column kinds differ between frames")]
    KindMismatch,
}

/// A single column of a frame. Missing numeric values are stored as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice(&self, start: usize, end: usize) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(v[start..end].to_vec()),
            Column::Categorical(v) => Column::Categorical(v[start..end].to_vec()),
        }
    }

    fn append(&mut self, other: &Column) -> Result<(), FrameError> {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => {
                a.extend_from_slice(b);
                Ok(())
            }
            (Column::Categorical(a), Column::Categorical(b)) => {
                a.extend_from_slice(b);
                Ok(())
            }
            _ => Err(FrameError::KindMismatch),
        }
    }
}

/// A named collection of equally-long columns, numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Frame {
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, FrameError> {
        let first = columns.first().ok_or(FrameError::Empty)?;
        let n = first.len();
        for c in &columns {
            if c.len() != n {
                return Err(FrameError::RowCountMismatch {
                    left: n,
                    right: c.len(),
                });
            }
        }
        if names.len() != columns.len() {
            return Err(FrameError::ColumnCountMismatch {
                left: names.len(),
                right: columns.len(),
            });
        }
        Ok(Frame { names, columns })
    }

    /// Reads a headered CSV file. A column is numeric when every non-empty
    /// field parses as a float; empty fields become NaN. Any other column
    /// is kept as strings.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, FrameError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FrameError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let names: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for record in rdr.records() {
            let record = record?;
            for (i, field) in record.iter().enumerate() {
                raw[i].push(field.trim().to_string());
            }
        }

        let columns = raw
            .into_iter()
            .map(|fields| {
                let numeric = fields
                    .iter()
                    .filter(|f| !f.is_empty())
                    .all(|f| f.parse::<f64>().is_ok());
                if numeric {
                    Column::Numeric(
                        fields
                            .iter()
                            .map(|f| {
                                if f.is_empty() {
                                    f64::NAN
                                } else {
                                    f.parse().unwrap_or(f64::NAN)
                                }
                            })
                            .collect(),
                    )
                } else {
                    Column::Categorical(fields)
                }
            })
            .collect();

        Frame::new(names, columns)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn index_of(&self, name: &str) -> Result<usize, FrameError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column, FrameError> {
        Ok(&self.columns[self.index_of(name)?])
    }

    /// A new frame holding only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Frame, FrameError> {
        let mut out_names = Vec::with_capacity(names.len());
        let mut out_cols = Vec::with_capacity(names.len());
        for &name in names {
            let i = self.index_of(name)?;
            out_names.push(self.names[i].clone());
            out_cols.push(self.columns[i].clone());
        }
        Frame::new(out_names, out_cols)
    }

    /// A new frame without the named column.
    pub fn drop_column(&self, name: &str) -> Result<Frame, FrameError> {
        let i = self.index_of(name)?;
        let mut names = self.names.clone();
        let mut columns = self.columns.clone();
        names.remove(i);
        columns.remove(i);
        Frame::new(names, columns)
    }

    /// Splits off the named column, returning (rest, column).
    pub fn split_target(&self, name: &str) -> Result<(Frame, Frame), FrameError> {
        let target = self.select(&[name])?;
        Ok((self.drop_column(name)?, target))
    }

    /// Row range `[start, end)` as a new frame.
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Frame, FrameError> {
        let n = self.n_rows();
        if start > end || end > n {
            return Err(FrameError::RowCountMismatch { left: end, right: n });
        }
        let columns = self.columns.iter().map(|c| c.slice(start, end)).collect();
        Frame::new(self.names.clone(), columns)
    }

    /// Row-wise concatenation. Schemas must match by name and kind.
    pub fn concat(&self, other: &Frame) -> Result<Frame, FrameError> {
        if self.names != other.names {
            return Err(FrameError::ColumnCountMismatch {
                left: self.n_cols(),
                right: other.n_cols(),
            });
        }
        let mut columns = self.columns.clone();
        for (c, o) in columns.iter_mut().zip(&other.columns) {
            c.append(o)?;
        }
        Frame::new(self.names.clone(), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
longitude,ocean_proximity,total_bedrooms
-122.2,NEAR BAY,129
-122.3,INLAND,
-121.9,NEAR BAY,310
";

    fn sample() -> Frame {
        Frame::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn sniffs_numeric_and_categorical_columns() {
        let f = sample();
        assert_eq!(f.n_rows(), 3);
        assert!(matches!(f.column("longitude").unwrap(), Column::Numeric(_)));
        assert!(matches!(
            f.column("ocean_proximity").unwrap(),
            Column::Categorical(_)
        ));
    }

    #[test]
    fn empty_numeric_field_becomes_nan() {
        let f = sample();
        match f.column("total_bedrooms").unwrap() {
            Column::Numeric(v) => {
                assert!(v[1].is_nan());
                assert_eq!(v[0], 129.0);
            }
            _ => panic!("expected numeric column"),
        }
    }

    #[test]
    fn split_target_removes_the_column() {
        let f = sample();
        let (rest, target) = f.split_target("total_bedrooms").unwrap();
        assert_eq!(rest.n_cols(), 2);
        assert_eq!(target.n_cols(), 1);
        assert_eq!(target.names(), &["total_bedrooms".to_string()]);
        assert!(rest.column("total_bedrooms").is_err());
    }

    #[test]
    fn slice_and_concat_round_trip() {
        let f = sample();
        let head = f.slice_rows(0, 1).unwrap();
        let tail = f.slice_rows(1, 3).unwrap();
        assert_eq!(head.concat(&tail).unwrap().n_rows(), 3);
    }

    #[test]
    fn unknown_column_is_reported_by_name() {
        let f = sample();
        let err = f.select(&["latitude"]).unwrap_err();
        assert!(matches!(err, FrameError::ColumnNotFound(ref n) if n == "latitude"));
    }
}
