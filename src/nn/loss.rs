//! Binary classification loss and scoring

use burn::tensor::{backend::Backend, Tensor};

/// Binary cross-entropy on raw logits, averaged over elements.
///
/// Uses `max(z, 0) - z·y + ln(1 + e^{-|z|})`, which stays finite for large |z|.
pub fn bce_with_logits<B: Backend>(logits: Tensor<B, 1>, targets: Tensor<B, 1>) -> Tensor<B, 1> {
    let positive_part = logits.clone().clamp_min(0.0);
    let softplus = (logits.clone().abs().neg().exp() + 1.0).log();
    (positive_part - logits * targets + softplus).mean()
}

/// Logistic function on a single logit
pub fn probability(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

/// Whether a thresholded prediction matches the label
pub fn is_correct(logit: f32, label: u8, threshold: f32) -> bool {
    (probability(logit) > threshold) == (label == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn loss_of(logit: f32, target: f32) -> f32 {
        let device = <TestBackend as Backend>::Device::default();
        let logits = Tensor::<TestBackend, 1>::from_floats([logit], &device);
        let targets = Tensor::<TestBackend, 1>::from_floats([target], &device);
        bce_with_logits(logits, targets).into_scalar()
    }

    #[test]
    fn test_zero_logit_is_ln2() {
        assert!((loss_of(0.0, 1.0) - std::f32::consts::LN_2).abs() < 1e-6);
        assert!((loss_of(0.0, 0.0) - std::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn test_confident_predictions() {
        assert!(loss_of(10.0, 1.0) < 1e-3);
        assert!(loss_of(-10.0, 1.0) > 9.9);
    }

    #[test]
    fn test_extreme_logits_stay_finite() {
        assert!(loss_of(200.0, 0.0).is_finite());
        assert!(loss_of(-200.0, 1.0).is_finite());
    }

    #[test]
    fn test_thresholding() {
        assert!((probability(0.0) - 0.5).abs() < 1e-7);
        assert!(is_correct(2.0, 1, 0.5));
        assert!(is_correct(-2.0, 0, 0.5));
        assert!(!is_correct(0.0, 1, 0.5));
        assert!(!is_correct(2.0, 0, 0.5));
    }
}
