//! Easing curves for the centering tween

pub use photowall_core::EasingType;

pub trait EasingTypeExt {
    /// Map linear progress in `[0, 1]` onto the curve
    fn apply(&self, t: f64) -> f64;

    /// Eased value between `from` and `to`
    fn interpolate(&self, from: f64, to: f64, t: f64) -> f64 {
        from + (to - from) * self.apply(t)
    }
}

impl EasingTypeExt for EasingType {
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - (1.0 - t).powi(3),
            EasingType::Quintic => 1.0 - (1.0 - t).powi(5),
            EasingType::EaseOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [EasingType; 4] = [
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
    ];

    #[test]
    fn test_curves_hit_endpoints() {
        for easing in CURVES {
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?}", easing);
        }
        assert_eq!(EasingType::None.apply(0.99), 0.0);
        assert_eq!(EasingType::None.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_out_curves_lead_linear() {
        for easing in [EasingType::Cubic, EasingType::Quintic, EasingType::EaseOut] {
            assert!(easing.apply(0.5) > 0.5, "{:?}", easing);
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(EasingType::Linear.apply(-1.0), 0.0);
        assert_eq!(EasingType::Linear.apply(3.0), 1.0);
    }

    #[test]
    fn test_interpolate_backwards() {
        let v = EasingType::Linear.interpolate(100.0, 0.0, 0.25);
        assert!((v - 75.0).abs() < 1e-9);
    }
}
