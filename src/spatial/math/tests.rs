#[cfg(test)]
mod vector_tests {

    use crate::spatial::math::V3c;

    #[test]
    fn test_cross_product() {
        let a = V3c::new(3., 0., 2.);
        let b = V3c::new(-1., 4., 2.);
        let cross = a.cross(b);
        assert!(cross.x == -8.);
        assert!(cross.y == -8.);
        assert!(cross.z == 12.);
    }

    #[test]
    fn test_recip_keeps_sign_of_zero() {
        let inv = V3c::new(2.0_f32, 0., -0.).recip();
        assert_eq!(inv.x, 0.5);
        assert_eq!(inv.y, f32::INFINITY);
        assert_eq!(inv.z, f32::NEG_INFINITY);
    }

    #[test]
    fn test_axis_index() {
        let v = V3c::new(1, 2, 3);
        assert_eq!(v[0], 1);
        assert_eq!(v[1], 2);
        assert_eq!(v[2], 3);
    }

    #[test]
    fn test_component_min_max() {
        let a = V3c::new(1., 5., -3.);
        let b = V3c::new(2., -5., -4.);
        assert_eq!(a.min(b), V3c::new(1., -5., -4.));
        assert_eq!(a.max(b), V3c::new(2., 5., -3.));
    }
}

#[cfg(test)]
mod rounding_tests {
    use crate::spatial::math::{next_down, next_up, round_down_f32, round_up_f32};

    #[test]
    fn test_next_up_down() {
        assert!(next_up(1.) > 1.);
        assert!(next_down(1.) < 1.);
        assert_eq!(next_up(0.), f32::from_bits(1));
        assert_eq!(next_up(-0.), f32::from_bits(1));
        assert_eq!(next_down(0.), -f32::from_bits(1));
        assert_eq!(next_up(f32::NEG_INFINITY), f32::MIN);
        assert_eq!(next_down(f32::INFINITY), f32::MAX);
        assert_eq!(next_up(f32::INFINITY), f32::INFINITY);
        assert!(next_up(f32::NAN).is_nan());
    }

    #[test]
    fn test_exact_values_are_kept() {
        assert_eq!(round_down_f32(1.5), 1.5);
        assert_eq!(round_up_f32(1.5), 1.5);
        assert_eq!(round_down_f32(-2.25), -2.25);
        assert_eq!(round_up_f32(0.), 0.);
    }

    #[test]
    fn test_inexact_values_are_bracketed() {
        for value in [0.1_f64, -0.1, 1.0 / 3.0, -7.7777777777, 12345.678901234, 1e-30] {
            let down = round_down_f32(value);
            let up = round_up_f32(value);
            assert!((down as f64) <= value, "{down} > {value}");
            assert!((up as f64) >= value, "{up} < {value}");
            assert!(down < up);
            assert_eq!(next_up(down), up);
        }
    }

    #[test]
    fn test_out_of_range_values() {
        assert_eq!(round_down_f32(1e39), f32::MAX);
        assert_eq!(round_up_f32(1e39), f32::INFINITY);
        assert_eq!(round_up_f32(-1e39), f32::MIN);
        assert_eq!(round_down_f32(-1e39), f32::NEG_INFINITY);
        assert_eq!(round_down_f32(f64::INFINITY), f32::INFINITY);
        assert!(round_up_f32(f64::NAN).is_nan());
    }
}
