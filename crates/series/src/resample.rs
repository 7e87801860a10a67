//! Stride-based downsampling. No interpolation: samples are kept or dropped.

use ndarray::{Array, Axis, Dimension, Slice};

/// Stride that reduces `len` samples to roughly `target`, never below 1.
pub fn stride_for(len: usize, target: Option<usize>) -> usize {
    match target {
        Some(target) if target > 0 => (len / target).max(1),
        _ => 1,
    }
}

/// Every `stride`-th element starting at index 0.
pub fn downsample<T: Clone>(items: &[T], stride: usize) -> Vec<T> {
    items.iter().step_by(stride.max(1)).cloned().collect()
}

/// Every `stride`-th row (along axis 0) starting at row 0.
pub fn downsample_rows<D: Dimension>(values: &Array<f64, D>, stride: usize) -> Array<f64, D> {
    if values.ndim() == 0 {
        return values.clone();
    }
    let step = stride.max(1) as isize;
    values
        .slice_axis(Axis(0), Slice::new(0, None, step))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn stride_matches_integer_division() {
        assert_eq!(stride_for(10_000, Some(1_000)), 10);
        assert_eq!(stride_for(10_999, Some(1_000)), 10);
        assert_eq!(stride_for(500, Some(1_000)), 1);
        assert_eq!(stride_for(500, Some(0)), 1);
        assert_eq!(stride_for(500, None), 1);
    }

    #[test]
    fn keeps_first_sample_and_every_stride() {
        assert_eq!(downsample(&[0, 1, 2, 3, 4, 5, 6], 3), vec![0, 3, 6]);
        assert_eq!(downsample(&[0, 1], 0), vec![0, 1]);
        let rows = downsample_rows(&array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]], 2);
        assert_eq!(rows, array![[0.0, 1.0], [4.0, 5.0]]);
    }
}
