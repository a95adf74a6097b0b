use alloc::vec::Vec;
use core::cmp::Ordering;

use num_traits::Float;

/// Collects the finite values of an iterator into a vector sorted ascending.
///
/// Missing (`NaN`) and infinite values are dropped before sorting, so the
/// comparison is total over what remains.
pub fn sorted_finite<T: Float>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = values.into_iter().filter(|v| v.is_finite()).collect();
    out.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Returns the median from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice
///
/// # Returns
///
/// * `Option<T>` - The median, or `None` if the slice is empty
#[inline]
pub fn median_from_sorted_slice<T: Float>(ss: &[T]) -> Option<T> {
    let len = ss.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    let _2 = T::one() + T::one();
    if len % 2 == 0 {
        Some((ss[mid - 1] + ss[mid]) / _2)
    } else {
        Some(ss[mid])
    }
}

/// Returns the linearly interpolated quantile from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice
/// * `q` - The quantile to calculate, in `[0, 1]`
///
/// # Returns
///
/// * `Option<T>` - The quantile, or `None` if the slice is empty or `q` is out of range
#[inline]
pub fn quantile_from_sorted_slice<T: Float>(ss: &[T], q: f64) -> Option<T> {
    if ss.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (ss.len() as f64 - 1.0);
    let lower_index = pos.floor() as usize;
    let upper_index = pos.ceil() as usize;

    if lower_index == upper_index {
        Some(ss[lower_index])
    } else {
        let lower_value = ss[lower_index];
        let upper_value = ss[upper_index];
        let weight = T::from(pos - lower_index as f64)?;

        Some(lower_value + weight * (upper_value - lower_value))
    }
}
