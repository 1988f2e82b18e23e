#[cfg(test)]
mod raytracing_tests {
    use crate::spatial::{
        math::V3c,
        raytracing::{near_far, Ray, RayProbe},
        Aabb,
    };

    fn unit_box() -> Aabb {
        Aabb::new(V3c::unit(0.), V3c::unit(4.))
    }

    #[test]
    fn test_probe_reciprocal() {
        let ray = Ray {
            origin: V3c::new(1., 2., 3.),
            direction: V3c::new(0., -1., 0.),
        };
        assert!(ray.is_valid());
        let probe = ray.probe();
        assert_eq!(probe.origin, ray.origin);
        assert_eq!(probe.inv_direction.x, f32::INFINITY);
        assert_eq!(probe.inv_direction.y, -1.);
        assert_eq!(probe.inv_direction.z, f32::INFINITY);
        assert!(probe.is_well_formed());
    }

    #[test]
    fn test_probe_from_f64() {
        let probe = RayProbe::from_f64([0.5, -0.25, 8.], [2., -0., 1e-60]);
        assert_eq!(probe.origin, V3c::new(0.5, -0.25, 8.));
        assert_eq!(probe.inv_direction.x, 0.5);
        assert_eq!(probe.inv_direction.y, f32::NEG_INFINITY);
        // 1e60 does not fit in f32
        assert_eq!(probe.inv_direction.z, f32::INFINITY);
    }

    #[test]
    fn test_near_far_ordering() {
        assert_eq!(near_far(1., 0, 1), (0, 1));
        assert_eq!(near_far(-1., 0, 1), (1, 0));
        assert_eq!(near_far(f32::INFINITY, 0, 1), (0, 1));
        assert_eq!(near_far(f32::NEG_INFINITY, 0, 1), (1, 0));
    }

    #[test]
    fn test_box_contains_ray() {
        let ray_above = Ray {
            origin: V3c::new(2., 5., 2.),
            direction: V3c::new(0., -1., 0.),
        };
        assert_eq!(unit_box().intersect_ray(&ray_above, 100.), Some((1., 5.)));

        let ray_below = Ray {
            origin: V3c::new(2., -5., 2.),
            direction: V3c::new(0., 1., 0.),
        };
        assert_eq!(unit_box().intersect_ray(&ray_below, 100.), Some((5., 9.)));

        let ray_miss = Ray {
            origin: V3c::new(2., 5., 2.),
            direction: V3c::new(0., 1., 0.),
        };
        assert!(unit_box().intersect_ray(&ray_miss, 100.).is_none());

        let ray_hit = Ray {
            origin: V3c::unit(-1.),
            direction: V3c::unit(1.).normalized(),
        };
        assert!(unit_box().intersect_ray(&ray_hit, 100.).is_some());
    }

    #[test]
    fn test_origin_inside_box_starts_at_zero() {
        let ray = Ray {
            origin: V3c::unit(1.),
            direction: V3c::new(1., 0., 0.),
        };
        assert_eq!(unit_box().intersect_ray(&ray, 100.), Some((0., 3.)));
    }

    #[test]
    fn test_t_max_clips_interval() {
        let ray = Ray {
            origin: V3c::new(-2., 2., 2.),
            direction: V3c::new(1., 0., 0.),
        };
        assert_eq!(unit_box().intersect_ray(&ray, 3.), Some((2., 3.)));
        assert!(unit_box().intersect_ray(&ray, 1.).is_none());
        // Touching the box exactly at t_max is still a hit
        assert_eq!(unit_box().intersect_ray(&ray, 2.), Some((2., 2.)));
    }

    #[test]
    fn test_grazing_edge_is_hit() {
        // Travels along the edge of the box where the y = 4 and z = 4 faces meet
        let probe = RayProbe::new(V3c::new(-1., 4., 4.), V3c::new(1., f32::INFINITY, f32::INFINITY));
        assert_eq!(unit_box().intersect(&probe, 100.), Some((1., 5.)));
    }

    #[test]
    fn test_ray_on_face_plane_is_hit() {
        // Origin on the x = 0 face plane and parallel to it: 0 * inf on the x axis
        let probe = RayProbe::new(V3c::new(0., 2., -3.), V3c::new(f32::INFINITY, f32::INFINITY, 1.));
        assert_eq!(unit_box().intersect(&probe, 100.), Some((3., 7.)));

        let probe = RayProbe::new(V3c::new(0., 2., -3.), V3c::new(f32::NEG_INFINITY, f32::INFINITY, 1.));
        assert_eq!(unit_box().intersect(&probe, 100.), Some((3., 7.)));
    }

    #[test]
    fn test_inverted_box_misses_for_any_direction() {
        let inverted = Aabb::new(V3c::new(5., -1., -1.), V3c::new(3., 1., 1.));
        for inv_x in [1., -1., f32::INFINITY, f32::NEG_INFINITY, 0.001, -1000.] {
            for origin_x in [0., 3., 4., 5., 10.] {
                let probe = RayProbe::new(
                    V3c::new(origin_x, 0., 0.),
                    V3c::new(inv_x, f32::INFINITY, f32::INFINITY),
                );
                assert!(
                    inverted.intersect(&probe, 100.).is_none(),
                    "inverted box hit with origin {origin_x} and inv direction {inv_x}"
                );
            }
        }
    }

    #[test]
    fn test_empty_box_never_hit() {
        for inv in [1., -1., f32::INFINITY, f32::NEG_INFINITY] {
            let probe = RayProbe::new(V3c::unit(0.), V3c::unit(inv));
            assert!(Aabb::empty().intersect(&probe, f32::MAX).is_none());
        }
    }

    #[test]
    fn test_behind_origin_misses() {
        let ray = Ray {
            origin: V3c::new(10., 2., 2.),
            direction: V3c::new(1., 0., 0.),
        };
        assert!(unit_box().intersect_ray(&ray, 100.).is_none());
    }
}
