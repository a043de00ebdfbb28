use housenet_autodiff::Variable;

/// Mean squared error, composed from tape ops so it is differentiable.
pub fn mse_loss(pred: &Variable, target: &Variable) -> Variable {
    let diff = pred.sub(target);
    diff.mul(&diff).mean()
}
