//! Boston housing dataset: download, parse and column split.
//!
//! The CMU StatLib copy of the dataset is a plain-text file with a 22-line
//! prose preamble followed by 506 records. Each record is wrapped over two
//! physical lines: the first carries 11 values, the second carries the last
//! two features and the target (`MEDV`).

use crate::config::PipelineConfig;
use crate::error::ModelError;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::time::Duration;
use tracing::{debug, info};

/// Default download location of the raw dataset.
pub const BOSTON_DATA_URL: &str = "http://lib.stat.cmu.edu/datasets/boston";

/// Feature column names, in file order.
pub const FEATURE_NAMES: [&str; 13] = [
    "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX", "PTRATIO", "B",
    "LSTAT",
];

/// Name of the target column (median home value, $1000s).
pub const TARGET_COLUMN: &str = "MEDV";

/// Number of preamble lines before the first record.
const PREAMBLE_LINES: usize = 22;

/// Values on the first and second physical line of a record.
const FIRST_LINE_VALUES: usize = 11;
const SECOND_LINE_VALUES: usize = 3;

/// A table of named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    data: Array2<f64>,
}

impl Dataset {
    /// Build a dataset, checking that names are unique and match the width.
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> Result<Self, ModelError> {
        if columns.len() != data.ncols() {
            return Err(ModelError::shape("column names", data.ncols(), columns.len()));
        }
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(ModelError::InvalidConfig(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(Self { columns, data })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// View of a single column by name.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|i| self.data.column(i))
    }
}

/// Download and parse the dataset configured in `config`.
///
/// Network and parse failures are fatal; nothing is cached between runs.
pub fn load_data(config: &PipelineConfig) -> Result<Dataset, ModelError> {
    let raw = fetch_raw(&config.dataset_url, config.download_timeout_secs)?;
    let dataset = parse_boston(&raw)?;
    info!(
        "Loaded dataset: {} rows x {} columns",
        dataset.n_rows(),
        dataset.columns().len()
    );
    Ok(dataset)
}

/// Fetch the raw dataset text over HTTP.
pub fn fetch_raw(url: &str, timeout_secs: u64) -> Result<String, ModelError> {
    info!("Downloading dataset from: {}", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ModelError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() {
            ModelError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ModelError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().map_err(map_err)?;
    if !response.status().is_success() {
        return Err(ModelError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let body = response.text().map_err(map_err)?;
    debug!("Downloaded {} bytes", body.len());
    Ok(body)
}

/// Parse the StatLib text format into a [`Dataset`] with 13 features + `MEDV`.
pub fn parse_boston(raw: &str) -> Result<Dataset, ModelError> {
    let mut values: Vec<f64> = Vec::new();
    let mut pending: Option<(usize, Vec<f64>)> = None;
    let mut rows = 0usize;

    for (idx, line) in raw.lines().enumerate().skip(PREAMBLE_LINES) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = parse_line(line, line_no)?;

        match pending.take() {
            None => {
                if parsed.len() != FIRST_LINE_VALUES {
                    return Err(ModelError::MalformedData {
                        line: line_no,
                        detail: format!(
                            "expected {FIRST_LINE_VALUES} values, found {}",
                            parsed.len()
                        ),
                    });
                }
                pending = Some((line_no, parsed));
            }
            Some((_, first)) => {
                if parsed.len() != SECOND_LINE_VALUES {
                    return Err(ModelError::MalformedData {
                        line: line_no,
                        detail: format!(
                            "expected {SECOND_LINE_VALUES} values, found {}",
                            parsed.len()
                        ),
                    });
                }
                values.extend_from_slice(&first);
                values.extend_from_slice(&parsed);
                rows += 1;
            }
        }
    }

    if let Some((line, _)) = pending {
        return Err(ModelError::MalformedData {
            line,
            detail: "record is missing its second line".into(),
        });
    }
    if rows == 0 {
        return Err(ModelError::EmptyInput("dataset contains no records"));
    }

    let width = FIRST_LINE_VALUES + SECOND_LINE_VALUES;
    let data = Array2::from_shape_vec((rows, width), values)
        .map_err(|e| ModelError::MalformedData {
            line: 0,
            detail: e.to_string(),
        })?;

    let columns = FEATURE_NAMES
        .iter()
        .chain(std::iter::once(&TARGET_COLUMN))
        .map(|s| s.to_string())
        .collect();
    Dataset::new(columns, data)
}

fn parse_line(line: &str, line_no: usize) -> Result<Vec<f64>, ModelError> {
    line.split_whitespace()
        .map(|tok| match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ModelError::MalformedData {
                line: line_no,
                detail: format!("'{tok}' is not a finite number"),
            }),
        })
        .collect()
}

/// Split the dataset into a feature matrix and the `MEDV` target vector.
pub fn split_features_target(dataset: &Dataset) -> Result<(Array2<f64>, Array1<f64>), ModelError> {
    split_features_target_by(dataset, TARGET_COLUMN)
}

/// Split the dataset on an arbitrary target column; every other column,
/// in order, becomes a feature.
pub fn split_features_target_by(
    dataset: &Dataset,
    target: &str,
) -> Result<(Array2<f64>, Array1<f64>), ModelError> {
    let target_idx = dataset
        .column_index(target)
        .ok_or_else(|| ModelError::MissingColumn {
            name: target.to_string(),
        })?;

    let feature_idx: Vec<usize> = (0..dataset.columns().len())
        .filter(|&i| i != target_idx)
        .collect();

    let x = dataset.data().select(Axis(1), &feature_idx);
    let y = dataset.data().column(target_idx).to_owned();
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_text(records: usize) -> String {
        let mut s = String::new();
        for i in 0..PREAMBLE_LINES {
            s.push_str(&format!(" preamble line {i}: Variables in order ...\n"));
        }
        for r in 0..records {
            let first: Vec<String> = (0..11).map(|c| format!("{}.5", r * 100 + c)).collect();
            s.push_str(&format!(" {}\n", first.join("  ")));
            s.push_str(&format!(" {}.0 {}.25 {}.0\n", r, r, 20 + r));
        }
        s
    }

    #[test]
    fn parses_two_line_records() {
        let ds = parse_boston(&sample_text(3)).expect("parse");
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.columns().len(), 14);
        assert_eq!(ds.columns()[13], "MEDV");
        assert_eq!(ds.data()[[1, 0]], 100.5);
        assert_eq!(ds.data()[[1, 12]], 1.25);
        assert_eq!(ds.column("MEDV").unwrap().to_vec(), vec![20.0, 21.0, 22.0]);
    }

    #[test]
    fn dangling_first_line_is_rejected() {
        let mut text = sample_text(2);
        text.push_str(" 1 2 3 4 5 6 7 8 9 10 11\n");
        let err = parse_boston(&text).unwrap_err();
        assert!(matches!(err, ModelError::MalformedData { .. }), "{err}");
    }

    #[test]
    fn non_numeric_token_names_line() {
        let mut text = sample_text(1);
        text.push_str(" 1 2 3 4 5 6 7 8 9 10 eleven\n");
        match parse_boston(&text).unwrap_err() {
            ModelError::MalformedData { line, detail } => {
                assert_eq!(line, PREAMBLE_LINES + 3);
                assert!(detail.contains("eleven"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_finite_tokens_are_rejected() {
        for bad in ["nan", "inf", "-inf", "NaN"] {
            let mut text = sample_text(1);
            text.push_str(&format!(" {bad} 2 3 4 5 6 7 8 9 10 11\n"));
            text.push_str(" 1.0 2.0 3.0\n");
            match parse_boston(&text).unwrap_err() {
                ModelError::MalformedData { line, detail } => {
                    assert_eq!(line, PREAMBLE_LINES + 3);
                    assert!(detail.contains(bad), "{detail}");
                }
                other => panic!("unexpected for {bad}: {other:?}"),
            }
        }
    }

    #[test]
    fn preamble_only_is_empty() {
        let text = sample_text(0);
        assert!(matches!(
            parse_boston(&text),
            Err(ModelError::EmptyInput(_))
        ));
    }

    #[test]
    fn split_drops_target_from_features() {
        let ds = Dataset::new(
            vec!["A".into(), "MEDV".into(), "B".into()],
            array![[1.0, 10.0, 2.0], [3.0, 30.0, 4.0]],
        )
        .unwrap();
        let (x, y) = split_features_target(&ds).unwrap();
        assert_eq!(x, array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(y, array![10.0, 30.0]);
    }

    #[test]
    fn split_without_target_fails() {
        let ds = Dataset::new(vec!["A".into()], array![[1.0]]).unwrap();
        assert!(matches!(
            split_features_target(&ds),
            Err(ModelError::MissingColumn { .. })
        ));
    }

    #[test]
    fn duplicate_columns_rejected() {
        let res = Dataset::new(vec!["A".into(), "A".into()], array![[1.0, 2.0]]);
        assert!(res.is_err());
    }
}
