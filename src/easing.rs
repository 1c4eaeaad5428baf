/// Quartic ease-in-out over `t` in `[0, 1]`.
///
/// Values outside the unit interval are clamped first.
pub fn quartic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        8.0 * t.powi(4)
    } else {
        1.0 - 8.0 * (1.0 - t).powi(4)
    }
}
