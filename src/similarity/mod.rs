use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive, ToPrimitive};

/// A similarity score between two equally long vectors.
///
/// Returns `None` when the score is undefined for the given inputs, so that
/// callers pick their own fallback instead of receiving a NaN.
pub trait SimilarityMeasure {
    fn calculate<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> Option<f64>
    where
        T: Float + FromPrimitive + ToPrimitive;
}

/// Pearson correlation coefficient.
///
/// Undefined for vectors of different length, fewer than two samples, or when
/// either vector is constant up to rounding. Small magnitudes alone do not make
/// it undefined.
#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonSimilarity;

impl SimilarityMeasure for PearsonSimilarity {
    fn calculate<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> Option<f64>
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        if a.len() != b.len() || a.len() < 2 {
            return None;
        }

        let n = T::from_usize(a.len())?;
        let mean_a = a.iter().fold(T::zero(), |acc, &v| acc + v) / n;
        let mean_b = b.iter().fold(T::zero(), |acc, &v| acc + v) / n;

        let mut cov = T::zero();
        let mut var_a = T::zero();
        let mut var_b = T::zero();
        let mut sq_a = T::zero();
        let mut sq_b = T::zero();

        for (&x, &y) in a.iter().zip(b.iter()) {
            let dx = x - mean_a;
            let dy = y - mean_b;
            cov = cov + dx * dy;
            var_a = var_a + dx * dx;
            var_b = var_b + dy * dy;
            sq_a = sq_a + x * x;
            sq_b = sq_b + y * y;
        }

        // Spread below rounding noise relative to the magnitude counts as constant.
        if var_a <= T::epsilon() * sq_a || var_b <= T::epsilon() * sq_b {
            return None;
        }

        (cov / (var_a.sqrt() * var_b.sqrt())).to_f64()
    }
}

/// Uncentred cosine similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl SimilarityMeasure for CosineSimilarity {
    fn calculate<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> Option<f64>
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        if a.len() != b.len() {
            return None;
        }

        let mut dot_product = T::zero();
        let mut norm_a = T::zero();
        let mut norm_b = T::zero();

        for (&x, &y) in a.iter().zip(b.iter()) {
            dot_product = dot_product + x * y;
            norm_a = norm_a + x * x;
            norm_b = norm_b + y * y;
        }

        if norm_a.is_zero() || norm_b.is_zero() {
            return None;
        }

        (dot_product / (norm_a.sqrt() * norm_b.sqrt())).to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_pearson_perfect_correlation() {
        let a = array![1.0, 2.0, 3.0, 4.0];
        let b = array![10.0, 20.0, 30.0, 40.0];
        let r = PearsonSimilarity.calculate(a.view(), b.view()).unwrap();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-12);

        let c = b.mapv(|v: f64| -v);
        let r = PearsonSimilarity.calculate(a.view(), c.view()).unwrap();
        assert_abs_diff_eq!(r, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_is_shift_invariant() {
        let a = array![0.5, -1.0, 2.0, 3.5, 0.0];
        let b = array![1.0, -2.5, 1.5, 4.0, 0.5];
        let shifted = b.mapv(|v: f64| v + 1000.0);
        let r1 = PearsonSimilarity.calculate(a.view(), b.view()).unwrap();
        let r2 = PearsonSimilarity.calculate(a.view(), shifted.view()).unwrap();
        assert_abs_diff_eq!(r1, r2, epsilon = 1e-9);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        let constant = array![2.0, 2.0, 2.0];
        let varying = array![1.0, 2.0, 3.0];
        assert!(PearsonSimilarity
            .calculate(constant.view(), varying.view())
            .is_none());

        let single = array![1.0];
        assert!(PearsonSimilarity
            .calculate(single.view(), single.view())
            .is_none());

        let short = array![1.0, 2.0];
        assert!(PearsonSimilarity
            .calculate(short.view(), varying.view())
            .is_none());
    }

    #[test]
    fn test_pearson_small_scale_values() {
        let a = array![1e-9, 2e-9, 3e-9, 4e-9];
        let b = a.mapv(|v: f64| -v);
        let r = PearsonSimilarity.calculate(a.view(), b.view()).unwrap();
        assert_abs_diff_eq!(r, -1.0, epsilon = 1e-9);

        let tiny = array![1e-60, 3e-60, 2e-60];
        let r = PearsonSimilarity.calculate(tiny.view(), tiny.view()).unwrap();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pearson_rounding_noise_is_constant() {
        let constant = array![0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];
        let varying = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert!(PearsonSimilarity
            .calculate(constant.view(), varying.view())
            .is_none());
    }

    #[test]
    fn test_cosine_small_scale_values() {
        let a = array![1e-12, -2e-12];
        let b = array![-1e-12, 2e-12];
        let r = CosineSimilarity.calculate(a.view(), b.view()).unwrap();
        assert_abs_diff_eq!(r, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cosine() {
        let a = array![1.0f32, 0.0];
        let b = array![0.0f32, 1.0];
        let r = CosineSimilarity.calculate(a.view(), b.view()).unwrap();
        assert_abs_diff_eq!(r, 0.0, epsilon = 1e-7);

        let r = CosineSimilarity.calculate(a.view(), a.view()).unwrap();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-7);

        let zero = array![0.0f32, 0.0];
        assert!(CosineSimilarity.calculate(a.view(), zero.view()).is_none());
    }
}
