/// Exponential (IIR) smoothing over an optional state slot.
///
/// The first sample seeds the slot; later samples blend as
/// `alpha * sample + (1 - alpha) * previous`. Callers skip the call when
/// there is no sample, so the slot never decays toward a default.
pub fn smooth(slot: &mut Option<f64>, sample: f64, alpha: f64) -> f64 {
    let next = match *slot {
        Some(previous) => alpha * sample + (1.0 - alpha) * previous,
        None => sample,
    };
    *slot = Some(next);
    next
}
