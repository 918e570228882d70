// Synthetic bootstrap corpus for first-run training
// Rows follow the default feature layout in vector::FEATURE_NAMES.

use ndarray::{Array1, Array2};

use super::forest::{LEGITIMATE_LABEL, PHISHING_LABEL};
use super::vector::FEATURE_NAMES;

/// Copies of each prototype in the corpus
pub const PROTOTYPE_REPEATS: usize = 50;

static LEGITIMATE_PROTOTYPES: [[f64; 11]; 10] = [
    [1.0, 0.0, 0.0, 10.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 10.0, 0.0, 0.0, 5.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 6.0, 0.0, 0.0, 3.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 11.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 8.0, 0.0, 0.0, 4.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 5.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 10.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 6.0, 0.0, 0.0, 3.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 9.0, 0.0, 0.0, 2.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 7.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0],
];

static PHISHING_PROTOTYPES: [[f64; 11]; 10] = [
    [0.0, 0.0, 0.0, 15.0, 1.0, 1.0, 25.0, 1.0, 3.0, 1.0, 2.0],
    [0.0, 2.0, 1.0, 45.0, 0.0, 1.0, 30.0, 1.0, 2.0, 1.0, 3.0],
    [0.0, 4.0, 0.0, 35.0, 0.0, 0.0, 20.0, 1.0, 1.0, 1.0, 2.0],
    [0.0, 1.0, 1.0, 30.0, 0.0, 1.0, 15.0, 1.0, 2.0, 1.0, 4.0],
    [0.0, 1.0, 0.0, 25.0, 0.0, 1.0, 40.0, 1.0, 5.0, 1.0, 2.0],
    [0.0, 2.0, 1.0, 40.0, 0.0, 0.0, 50.0, 1.0, 3.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 20.0, 1.0, 0.0, 35.0, 1.0, 2.0, 1.0, 2.0],
    [0.0, 3.0, 1.0, 33.0, 0.0, 1.0, 28.0, 1.0, 3.0, 1.0, 3.0],
    [0.0, 2.0, 0.0, 30.0, 0.0, 1.0, 60.0, 1.0, 1.0, 1.0, 2.0],
    [0.0, 0.0, 0.0, 22.0, 0.0, 0.0, 18.0, 1.0, 0.0, 1.0, 5.0],
];

pub fn legitimate_prototypes() -> impl Iterator<Item = &'static [f64; 11]> {
    LEGITIMATE_PROTOTYPES.iter()
}

pub fn phishing_prototypes() -> impl Iterator<Item = &'static [f64; 11]> {
    PHISHING_PROTOTYPES.iter()
}

/// Every prototype repeated `PROTOTYPE_REPEATS` times, legitimate rows first
pub fn synthetic_corpus() -> (Array2<f64>, Array1<usize>) {
    let labelled = LEGITIMATE_PROTOTYPES
        .iter()
        .map(|row| (row, LEGITIMATE_LABEL))
        .chain(PHISHING_PROTOTYPES.iter().map(|row| (row, PHISHING_LABEL)));

    let mut values = Vec::new();
    let mut labels = Vec::new();
    for (row, label) in labelled {
        for _ in 0..PROTOTYPE_REPEATS {
            values.extend_from_slice(row);
            labels.push(label);
        }
    }

    let n_rows = labels.len();
    let records = Array2::from_shape_vec((n_rows, FEATURE_NAMES.len()), values)
        .unwrap_or_else(|_| Array2::zeros((0, FEATURE_NAMES.len())));

    (records, Array1::from(labels))
}
