//! Frame-rate independent exponential damping.

/// Moves `current` toward `target` by the fraction `1 - e^(-rate * dt)`.
///
/// For `rate > 0` and `dt > 0` the result is strictly closer to `target`
/// and never crosses it.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(rate, dt)
}

/// Blend factor used by [`damp`], clamped to `[0, 1]`.
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    if !(rate.is_finite() && dt.is_finite()) || rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    (1.0 - (-rate * dt).exp()).clamp(0.0, 1.0)
}
