//! Small statistics helpers shared by the aggregators.
//!
//! Everything returns `Option` so that an empty group surfaces as undefined
//! rather than as a silent zero.

use serde::Serialize;
use std::cmp::Ordering;

/// Arithmetic mean. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Median, averaging the two middle values for even-length input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Mean and sample standard deviation of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: Option<f64>,
    pub count: usize,
}

impl MeanStd {
    /// `None` when there is nothing to average.
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: mean(values)?,
            std: sample_std(values),
            count: values.len(),
        })
    }
}

/// Dense ranks (1-based, ties share a rank, no gaps) for `values`, in input
/// order. `ascending = false` gives rank 1 to the largest value.
pub fn dense_rank(values: &[f64], ascending: bool) -> Vec<u32> {
    let mut distinct: Vec<f64> = values.to_vec();
    distinct.sort_by(|a, b| directional_cmp(*a, *b, ascending));
    distinct.dedup();

    values
        .iter()
        .map(|v| {
            let pos = distinct
                .binary_search_by(|probe| directional_cmp(*probe, *v, ascending))
                .unwrap_or_else(|p| p);
            pos as u32 + 1
        })
        .collect()
}

/// Total order on floats, reversed when `ascending` is false.
pub fn directional_cmp(a: f64, b: f64, ascending: bool) -> Ordering {
    if ascending {
        a.total_cmp(&b)
    } else {
        b.total_cmp(&a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        let sd = sample_std(&values).unwrap();
        assert!((sd - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_cases() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[3.0]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(MeanStd::of(&[]), None);
        assert_eq!(MeanStd::of(&[4.0]).unwrap().std, None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_dense_rank_ascending() {
        let ranks = dense_rank(&[10.0, 20.0, 10.0, 30.0], true);
        assert_eq!(ranks, vec![1, 2, 1, 3]);
    }

    #[test]
    fn test_dense_rank_descending() {
        let ranks = dense_rank(&[10.0, 20.0, 10.0, 30.0], false);
        assert_eq!(ranks, vec![3, 2, 3, 1]);
    }
}
