//! Easing curves mapping normalized time `k` in `[0, 1]` to progress

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuarticIn,
    QuarticOut,
    QuarticInOut,
    QuinticIn,
    QuinticOut,
    QuinticInOut,
    SinusoidalIn,
    SinusoidalOut,
    SinusoidalInOut,
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
    CircularIn,
    CircularOut,
    CircularInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

const BACK: f32 = 1.70158;
const BACK_IN_OUT: f32 = BACK * 1.525;

fn bounce_out(k: f32) -> f32 {
    if k < 1.0 / 2.75 {
        7.5625 * k * k
    } else if k < 2.0 / 2.75 {
        let k = k - 1.5 / 2.75;
        7.5625 * k * k + 0.75
    } else if k < 2.5 / 2.75 {
        let k = k - 2.25 / 2.75;
        7.5625 * k * k + 0.9375
    } else {
        let k = k - 2.625 / 2.75;
        7.5625 * k * k + 0.984375
    }
}

impl Easing {
    /// Evaluate the curve. Input is clamped to `[0, 1]`; elastic and back
    /// curves may overshoot the output range.
    pub fn apply(self, k: f32) -> f32 {
        let k = k.clamp(0.0, 1.0);
        match self {
            Easing::Linear => k,

            Easing::QuadraticIn => k * k,
            Easing::QuadraticOut => k * (2.0 - k),
            Easing::QuadraticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k
                } else {
                    let k = k - 1.0;
                    -0.5 * (k * (k - 2.0) - 1.0)
                }
            }

            Easing::CubicIn => k * k * k,
            Easing::CubicOut => {
                let k = k - 1.0;
                k * k * k + 1.0
            }
            Easing::CubicInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k * k
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * k + 2.0)
                }
            }

            Easing::QuarticIn => k.powi(4),
            Easing::QuarticOut => 1.0 - (k - 1.0).powi(4),
            Easing::QuarticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k.powi(4)
                } else {
                    -0.5 * ((k - 2.0).powi(4) - 2.0)
                }
            }

            Easing::QuinticIn => k.powi(5),
            Easing::QuinticOut => (k - 1.0).powi(5) + 1.0,
            Easing::QuinticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k.powi(5)
                } else {
                    0.5 * ((k - 2.0).powi(5) + 2.0)
                }
            }

            Easing::SinusoidalIn => 1.0 - (k * PI / 2.0).cos(),
            Easing::SinusoidalOut => (k * PI / 2.0).sin(),
            Easing::SinusoidalInOut => 0.5 * (1.0 - (PI * k).cos()),

            Easing::ExponentialIn => {
                if k == 0.0 {
                    0.0
                } else {
                    1024f32.powf(k - 1.0)
                }
            }
            Easing::ExponentialOut => {
                if k == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * k)
                }
            }
            Easing::ExponentialInOut => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * 1024f32.powf(k - 1.0)
                } else {
                    0.5 * (2.0 - 2f32.powf(-10.0 * (k - 1.0)))
                }
            }

            Easing::CircularIn => 1.0 - (1.0 - k * k).sqrt(),
            Easing::CircularOut => {
                let k = k - 1.0;
                (1.0 - k * k).sqrt()
            }
            Easing::CircularInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    -0.5 * ((1.0 - k * k).sqrt() - 1.0)
                } else {
                    let k = k - 2.0;
                    0.5 * ((1.0 - k * k).sqrt() + 1.0)
                }
            }

            Easing::ElasticIn => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                -(2f32.powf(10.0 * (k - 1.0))) * ((k - 1.1) * 5.0 * PI).sin()
            }
            Easing::ElasticOut => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                2f32.powf(-10.0 * k) * ((k - 0.1) * 5.0 * PI).sin() + 1.0
            }
            Easing::ElasticInOut => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                let k = k * 2.0;
                if k < 1.0 {
                    -0.5 * 2f32.powf(10.0 * (k - 1.0)) * ((k - 1.1) * 5.0 * PI).sin()
                } else {
                    0.5 * 2f32.powf(-10.0 * (k - 1.0)) * ((k - 1.1) * 5.0 * PI).sin() + 1.0
                }
            }

            Easing::BackIn => k * k * ((BACK + 1.0) * k - BACK),
            Easing::BackOut => {
                let k = k - 1.0;
                k * k * ((BACK + 1.0) * k + BACK) + 1.0
            }
            Easing::BackInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * (k * k * ((BACK_IN_OUT + 1.0) * k - BACK_IN_OUT))
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * ((BACK_IN_OUT + 1.0) * k + BACK_IN_OUT) + 2.0)
                }
            }

            Easing::BounceIn => 1.0 - bounce_out(1.0 - k),
            Easing::BounceOut => bounce_out(k),
            Easing::BounceInOut => {
                if k < 0.5 {
                    (1.0 - bounce_out(1.0 - k * 2.0)) * 0.5
                } else {
                    bounce_out(k * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }

    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuarticIn,
        Easing::QuarticOut,
        Easing::QuarticInOut,
        Easing::QuinticIn,
        Easing::QuinticOut,
        Easing::QuinticInOut,
        Easing::SinusoidalIn,
        Easing::SinusoidalOut,
        Easing::SinusoidalInOut,
        Easing::ExponentialIn,
        Easing::ExponentialOut,
        Easing::ExponentialInOut,
        Easing::CircularIn,
        Easing::CircularOut,
        Easing::CircularInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing:?}(0) = {}", easing.apply(0.0));
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing:?}(1) = {}", easing.apply(1.0));
        }
    }

    #[test]
    fn in_out_pass_through_midpoint() {
        for easing in [
            Easing::QuadraticInOut,
            Easing::CubicInOut,
            Easing::QuarticInOut,
            Easing::QuinticInOut,
            Easing::SinusoidalInOut,
            Easing::ExponentialInOut,
            Easing::CircularInOut,
            Easing::BounceInOut,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-3, "{easing:?}");
        }
    }

    #[test]
    fn elastic_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::ElasticOut.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn back_in_dips_below_zero() {
        assert!(Easing::BackIn.apply(0.2) < 0.0);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::QuadraticIn.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    }

    #[test]
    fn deserializes_snake_case() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            easing: Easing,
        }
        let w: Wrapper = toml::from_str("easing = \"elastic_out\"").unwrap();
        assert_eq!(w.easing, Easing::ElasticOut);
    }
}
