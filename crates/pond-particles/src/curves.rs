//! Value-over-lifetime helpers

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Opacity from a fade-in that has `fade_in_left` of `fade_in_total` seconds
/// remaining. No fade-in means fully opaque.
pub fn fade_in_alpha(fade_in_left: f32, fade_in_total: f32) -> f32 {
    if fade_in_total <= 0.0 {
        1.0
    } else {
        1.0 - (fade_in_left.max(0.0) / fade_in_total)
    }
}

/// Opacity that reaches 0 as `lifetime_left` runs out over the last
/// `fade_out_time` seconds. No fade-out means fully opaque.
pub fn fade_out_alpha(lifetime_left: f32, fade_out_time: f32) -> f32 {
    if fade_out_time <= 0.0 {
        1.0
    } else {
        (lifetime_left / fade_out_time).min(1.0)
    }
}
