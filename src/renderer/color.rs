/// Constant blue channel of the heat palette.
pub(crate) const BLUE: u8 = 15;

/// Green channel gain relative to temperature.
pub(crate) const GREEN_GAIN: f64 = 0.2;

/// Round to nearest and saturate to a byte. Temperatures are unbounded
/// above, so anything past 255 pins at full intensity.
#[inline]
pub(crate) fn saturate(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Map a temperature to RGBA: red follows `t`, green follows `0.2 * t`.
#[inline]
pub fn temperature_to_rgba(t: f64) -> [u8; 4] {
    [saturate(t), saturate(GREEN_GAIN * t), BLUE, 255]
}
