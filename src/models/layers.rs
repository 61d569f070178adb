//! Activation, loss and gradient helpers shared by both networks.

use candle_core::backprop::GradStore;
use candle_core::{Result, Tensor, Var};

/// LeakyReLU: `max(x, slope * x)` for `0 <= slope < 1`.
pub fn leaky_relu(xs: &Tensor, slope: f64) -> Result<Tensor> {
    xs.maximum(&xs.affine(slope, 0.0)?)
}

/// Mean binary cross-entropy between `sigmoid(logits)` and `targets`.
///
/// Uses `max(x, 0) - x * y + ln(1 + exp(-|x|))`, which equals
/// `-(y ln p + (1 - y) ln(1 - p))` for `p = sigmoid(x)` without
/// overflowing for large `|x|`.
pub fn binary_cross_entropy_with_logits(logits: &Tensor, targets: &Tensor) -> Result<Tensor> {
    let positive = logits.relu()?;
    let cross = logits.mul(targets)?;
    let soft = logits.abs()?.neg()?.exp()?.affine(1.0, 1.0)?.log()?;
    positive.sub(&cross)?.add(&soft)?.mean_all()
}

/// Returns the L2 norm of the gradients of `vars`, skipping vars without a
/// gradient.
pub fn gradient_norm(grads: &GradStore, vars: &[Var]) -> Result<f32> {
    let mut total = 0f32;
    for var in vars {
        if let Some(grad) = grads.get(var.as_tensor()) {
            total += grad.sqr()?.sum_all()?.to_scalar::<f32>()?;
        }
    }
    Ok(total.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn tensor(values: &[f32]) -> Tensor {
        Tensor::from_slice(values, (values.len(), 1), &Device::Cpu).unwrap()
    }

    fn naive_bce(logit: f32, target: f32) -> f32 {
        let p = 1.0 / (1.0 + (-logit).exp());
        -(target * p.ln() + (1.0 - target) * (1.0 - p).ln())
    }

    #[test]
    fn leaky_relu_scales_negatives() {
        let out = leaky_relu(&tensor(&[-2.0, 0.0, 3.0]), 0.1).unwrap();
        let values: Vec<f32> = out.flatten_all().unwrap().to_vec1().unwrap();
        assert!((values[0] + 0.2).abs() < 1e-6);
        assert_eq!(values[1], 0.0);
        assert_eq!(values[2], 3.0);
    }

    #[test]
    fn bce_matches_definition() {
        let logits = [-3.0, -0.5, 0.0, 0.7, 4.0];
        let targets = [1.0, 0.0, 1.0, 0.0, 1.0];
        let loss = binary_cross_entropy_with_logits(&tensor(&logits), &tensor(&targets))
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        let expected: f32 = logits
            .iter()
            .zip(targets)
            .map(|(&x, y)| naive_bce(x, y))
            .sum::<f32>()
            / logits.len() as f32;
        assert!((loss - expected).abs() < 1e-5, "{} vs {}", loss, expected);
    }

    #[test]
    fn bce_is_finite_for_extreme_logits() {
        let loss = binary_cross_entropy_with_logits(&tensor(&[-500.0, 500.0]), &tensor(&[1.0, 0.0]))
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        assert!(loss.is_finite());
        assert!((loss - 500.0).abs() < 1e-2);
    }

    #[test]
    fn gradient_norm_of_quadratic() {
        let var = Var::from_slice(&[3.0f32, 4.0], 2, &Device::Cpu).unwrap();
        let loss = var.as_tensor().sqr().unwrap().sum_all().unwrap().affine(0.5, 0.0).unwrap();
        let grads = loss.backward().unwrap();
        // d/dx 0.5 * |x|^2 = x, so the norm is |(3, 4)| = 5.
        let norm = gradient_norm(&grads, &[var]).unwrap();
        assert!((norm - 5.0).abs() < 1e-5);
    }
}
