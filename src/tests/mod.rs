#![cfg(test)]

use core::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};

use crate::{
    body_presets::planets, true_anomaly, InvalidElementsError, KeplerSolver, OrbitPropagator,
    OrbitalElements, SolarSystem, DEFAULT_ORBIT_STEPS, DEFAULT_TOLERANCE,
};

const ORBIT_POLL_ANGLES: usize = 4096;
const RANDOM_ORBITS: usize = 64;


use assertions::*;
use polling::*;
use seeders::*;

fn unit_orbit() -> OrbitalElements {
    OrbitalElements::default()
}

#[test]
fn unit_orbit_angle_3d() {
    let elements = unit_orbit();

    assert_orbit_positions_3d(
        &elements,
        &[
            ("unit orbit 1", 0.0 * PI, DVec3::new(1.0, 0.0, 0.0)),
            ("unit orbit 2", 0.5 * PI, DVec3::new(0.0, 0.0, 1.0)),
            ("unit orbit 3", 1.0 * PI, DVec3::new(-1.0, 0.0, 0.0)),
            ("unit orbit 4", 1.5 * PI, DVec3::new(0.0, 0.0, -1.0)),
            ("unit orbit 5", 2.0 * PI, DVec3::new(1.0, 0.0, 0.0)),
        ],
    );
}

#[test]
fn unit_orbit_transformation() {
    // With no inclination, the orbital plane is the XZ plane.
    let elements = unit_orbit();

    let tests = [(1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)];

    for point in tests {
        let transformed = elements.transform_pqw_vector(DVec2::new(point.0, point.1));

        assert_eq!(transformed.x, point.0);
        assert_eq!(transformed.y, 0.0);
        assert_eq!(transformed.z, point.1);
    }
}

#[test]
fn tilted_90deg() {
    let elements = OrbitalElements::new(1.0, 0.0, 90.0, 0.0, 0.0, 0.0, 1.0).unwrap();

    // Before and after transformation
    let tests = [
        ("Vector 1", (1.0, 0.0), DVec3::new(1.0, 0.0, 0.0)),
        ("Vector 2", (0.0, 1.0), DVec3::new(0.0, 1.0, 0.0)),
        ("Vector 3", (-1.0, 0.0), DVec3::new(-1.0, 0.0, 0.0)),
        ("Vector 4", (0.0, -1.0), DVec3::new(0.0, -1.0, 0.0)),
    ];

    for (what, point, expected) in tests.iter() {
        let transformed = elements.transform_pqw_vector(DVec2::new(point.0, point.1));

        assert_almost_eq_vec3(transformed, *expected, what);
    }
}

#[test]
fn transformation_preserves_length() {
    for _ in 0..RANDOM_ORBITS {
        let elements = random_any();

        for vec in poll_transform(&elements) {
            assert_almost_eq(vec.length(), 1.0, "Transformed unit vector");
        }
    }
}

#[test]
fn tilted_equidistant() {
    for _ in 0..RANDOM_ORBITS {
        let elements = random_circular();
        let radius = elements.get_semi_major_axis();

        for point in poll_orbit(&OrbitPropagator::default(), &elements) {
            assert_almost_eq_rescale(point.length(), radius, "Distance");
        }
    }
}

#[test]
fn circular_eccentric_anomaly_is_mean_anomaly() {
    let propagator = OrbitPropagator::default();
    let elements = unit_orbit();

    for (ecc_anom, mean_anom) in poll_eccentric_anomaly(&propagator, &elements)
        .into_iter()
        .zip(poll_mean_anomalies())
    {
        assert_eq!(ecc_anom.to_bits(), mean_anom.to_bits());
    }
}

#[test]
fn kepler_residual_grid() {
    let propagator = OrbitPropagator::default();
    let mean_anomalies = poll_mean_anomalies();

    for eccentricity in [0.0, 0.0167, 0.1, 0.3, 0.5, 0.7, 0.9, 0.95, 0.99] {
        let elements = OrbitalElements::new_flat(1.0, eccentricity, 0.0, 0.0, 1.0).unwrap();
        assert_solves_within_tolerance(&propagator, &elements, &mean_anomalies);
    }
}

#[test]
fn kepler_residual_random() {
    let propagator = OrbitPropagator::default();
    let mean_anomalies = poll_mean_anomalies();

    for _ in 0..RANDOM_ORBITS {
        assert_solves_within_tolerance(&propagator, &random_any(), &mean_anomalies);
    }
}

#[test]
fn tighter_tolerance_is_honored() {
    let solver = KeplerSolver::default().with_tolerance(1e-12);
    let propagator = OrbitPropagator::with_solver(solver);
    let mean_anomalies = poll_mean_anomalies();

    for eccentricity in [0.2, 0.6, 0.95] {
        let elements = OrbitalElements::new_flat(1.0, eccentricity, 0.0, 0.0, 1.0).unwrap();
        assert_solves_within_tolerance(&propagator, &elements, &mean_anomalies);
    }
}

#[test]
fn near_parabolic_terminates() {
    let propagator = OrbitPropagator::default();
    let elements = OrbitalElements::new_flat(1.0, 0.999999, 0.0, 0.0, 1.0).unwrap();

    for ecc_anom in poll_eccentric_anomaly(&propagator, &elements) {
        assert!(
            ecc_anom.is_finite(),
            "Eccentric anomaly algorithm instability at near-parabolic edge case"
        );
    }

    for pos in poll_orbit(&propagator, &elements) {
        assert!(
            pos.is_finite(),
            "3D position algorithm instability at near-parabolic edge case"
        );
    }

    for _ in 0..RANDOM_ORBITS {
        let elements = random_near_parabolic();
        for pos in poll_orbit(&propagator, &elements) {
            assert_within_apsides(&elements, pos, "Near-parabolic position");
        }
    }
}

#[test]
fn true_anomaly_is_odd() {
    for eccentricity in [0.0, 0.2, 0.5, 0.9, 0.999] {
        for i in 1..64 {
            let ecc_anom = -PI + (i as f64) * TAU / 64.0;

            let forward = true_anomaly(ecc_anom, eccentricity);
            let backward = true_anomaly(-ecc_anom, eccentricity);

            assert_almost_eq(forward, -backward, "True anomaly symmetry");
            assert!(forward > -PI && forward <= PI);
        }
    }
}

#[test]
fn apsides() {
    let propagator = OrbitPropagator::default();
    let elements = OrbitalElements::new_flat(2.0, 0.5, 0.0, 0.0, 1.0).unwrap();

    let periapsis = propagator.position_at_mean_anomaly(&elements, 0.0).unwrap();
    let apoapsis = propagator.position_at_mean_anomaly(&elements, PI).unwrap();

    assert_almost_eq_vec3(periapsis, DVec3::new(1.0, 0.0, 0.0), "Pe");
    assert_almost_eq_vec3(apoapsis, DVec3::new(-3.0, 0.0, 0.0), "Ap");
    assert_eq!(elements.get_periapsis(), 1.0);
    assert_eq!(elements.get_apoapsis(), 3.0);
}

#[test]
fn earth_like_starts_at_periapsis() {
    let propagator = OrbitPropagator::default();
    let elements = OrbitalElements::new(1.0, 0.0167, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap();

    let state = propagator.state_at(&elements, 0.0, 1.0).unwrap();

    assert_eq!(state.mean_anomaly, 0.0);
    assert_eq!(state.eccentric_anomaly, 0.0);
    assert_eq!(state.true_anomaly, 0.0);
    assert_almost_eq(state.radius, 0.9833, "Earth-like periapsis");
    assert_almost_eq_vec3(state.position, DVec3::new(0.9833, 0.0, 0.0), "Position");
}

#[test]
fn positions_stay_within_apsides() {
    let propagator = OrbitPropagator::default();

    for _ in 0..RANDOM_ORBITS {
        let elements = random_any();
        for pos in poll_orbit(&propagator, &elements) {
            assert_within_apsides(&elements, pos, "Polled position");
        }
    }
}

#[test]
fn inclined_orbit_is_planar() {
    let propagator = OrbitPropagator::default();

    for _ in 0..RANDOM_ORBITS {
        let elements = random_elliptic();
        let normal = elements.get_orbit_normal();
        assert_almost_eq(normal.length(), 1.0, "Normal length");

        let points = propagator
            .sample_orbit(&elements, DEFAULT_ORBIT_STEPS)
            .unwrap();

        for point in points {
            assert_almost_eq(
                point.dot(normal) / elements.get_apoapsis(),
                0.0,
                "Out-of-plane distance",
            );
        }
    }
}

#[test]
fn flat_orbit_has_no_height() {
    let propagator = OrbitPropagator::default();

    for _ in 0..RANDOM_ORBITS {
        let elements = OrbitalElements::new(
            rand::random_range(0.1..100.0),
            rand::random_range(0.0..0.99),
            0.0,
            rand::random_range(-360.0..360.0),
            rand::random_range(-360.0..360.0),
            rand::random_range(-TAU..TAU),
            rand::random_range(0.1..100.0),
        )
        .unwrap();

        for point in propagator.sample_orbit(&elements, 64).unwrap() {
            assert_eq!(point.y, 0.0, "Flat orbit left the XZ plane: {point}");
        }
    }
}

#[test]
fn default_orbit_curve_is_finite() {
    let propagator = OrbitPropagator::default();

    for eccentricity in [0.0, 0.3, 0.9, 0.999999] {
        let elements =
            OrbitalElements::new(1.5, eccentricity, 10.0, 45.0, 20.0, 0.0, 2.0).unwrap();
        let points = propagator
            .sample_orbit(&elements, DEFAULT_ORBIT_STEPS)
            .unwrap();

        assert_eq!(points.len(), DEFAULT_ORBIT_STEPS);
        assert!(points.iter().all(|point| point.is_finite()));
        assert_ne!(points.first(), points.last());
    }
}

#[test]
fn orbit_curve_matches_positions() {
    let propagator = OrbitPropagator::default();

    for _ in 0..RANDOM_ORBITS {
        let elements = random_any();
        let steps = 90;

        let curve = propagator.orbit_curve(&elements, steps);
        assert_eq!(curve.len(), steps);

        for (k, point) in curve.enumerate() {
            let mean_anomaly = (k as f64 / steps as f64) * TAU;
            let expected = propagator
                .position_at_mean_anomaly(&elements, mean_anomaly)
                .unwrap();

            assert_eq_vec3(point.unwrap(), expected, "Curve point");
        }
    }
}

#[test]
fn orbit_curve_ignores_epoch() {
    let propagator = OrbitPropagator::default();
    let a = OrbitalElements::new(3.0, 0.4, 12.0, 30.0, 60.0, 0.0, 5.0).unwrap();
    let b = OrbitalElements::new(3.0, 0.4, 12.0, 30.0, 60.0, 2.5, 5.0).unwrap();

    assert_eq!(
        propagator.sample_orbit(&a, 32).unwrap(),
        propagator.sample_orbit(&b, 32).unwrap()
    );
}

#[test]
fn orbit_curve_edge_cases() {
    let propagator = OrbitPropagator::default();
    let elements = unit_orbit();

    let mut empty = propagator.orbit_curve(&elements, 0);
    assert_eq!(empty.size_hint(), (0, Some(0)));
    assert!(empty.next().is_none());

    let mut curve = propagator.orbit_curve(&elements, 3);
    curve.next();
    assert_eq!(curve.len(), 2);
    assert_eq!(curve.by_ref().count(), 2);
    assert!(curve.next().is_none());

    curve.restart();
    assert_eq!(curve.len(), curve.steps());
}

#[test]
fn propagation_is_deterministic() {
    let propagator = OrbitPropagator::default();

    for _ in 0..RANDOM_ORBITS {
        let elements = random_any();
        let clone = elements.clone();
        let t = rand::random_range(-1e3..1e3);
        let speed = rand::random_range(0.0..50.0);

        let first = propagator.position_at(&elements, t, speed).unwrap();
        let second = propagator.position_at(&clone, t, speed).unwrap();
        assert_eq_vec3(first, second, "Repeated propagation");

        let state = propagator.state_at(&elements, t, speed).unwrap();
        assert_eq_vec3(state.position, first, "State position");
    }
}

#[test]
fn propagation_is_periodic() {
    // Near periapsis of eccentric orbits, a residual of 1e-6 can move E by
    // much more than that, so compare exact-ish solves.
    let propagator = OrbitPropagator::with_solver(KeplerSolver::default().with_tolerance(1e-13));

    for _ in 0..RANDOM_ORBITS {
        let elements = random_elliptic();
        let period = elements.get_orbital_period();
        let t = rand::random_range(0.0..period);

        let now = propagator.position_at(&elements, t, 1.0).unwrap();
        let later = propagator
            .position_at(&elements, t + 100.0 * period, 1.0)
            .unwrap();

        let scale = elements.get_apoapsis();
        assert_almost_eq_vec3(now / scale, later / scale, "Position 100 periods later");
    }
}

#[test]
fn speed_multiplier_scales_time() {
    let propagator = OrbitPropagator::with_solver(KeplerSolver::default().with_tolerance(1e-13));

    for _ in 0..RANDOM_ORBITS {
        let elements = random_elliptic();
        let t = rand::random_range(0.0..10.0);

        let fast = propagator.position_at(&elements, t, 4.0).unwrap();
        let slow = propagator.position_at(&elements, 4.0 * t, 1.0).unwrap();

        let scale = elements.get_apoapsis();
        assert_almost_eq_vec3(fast / scale, slow / scale, "Sped-up position");
    }
}

#[test]
fn state_radius_matches_position() {
    let propagator = OrbitPropagator::default();

    for _ in 0..RANDOM_ORBITS {
        let elements = random_any();
        let state = propagator
            .state_at(&elements, rand::random_range(0.0..100.0), 1.0)
            .unwrap();

        assert_almost_eq_rescale(state.position.length(), state.radius, "Radius");
        assert!((0.0..TAU).contains(&state.mean_anomaly));
    }
}

#[test]
fn convergence_failure_is_reported() {
    let solver = KeplerSolver::new(1e-15, 1);
    let propagator = OrbitPropagator::with_solver(solver);
    let elements = OrbitalElements::new_flat(1.0, 0.9, 0.0, 0.1, 1.0).unwrap();

    let err = propagator.position_at(&elements, 0.0, 1.0).unwrap_err();
    assert_eq!(err.iterations, 1);
    assert_eq!(err.eccentricity, 0.9);
    assert_eq!(err.tolerance, 1e-15);

    let err = propagator.sample_orbit(&elements, 8).unwrap_err();
    assert_eq!(err.iterations, 1);

    // The propagator wraps the mean anomaly before solving
    let err = propagator
        .position_at_mean_anomaly(&elements, 0.1 + 2.0 * TAU)
        .unwrap_err();
    assert_almost_eq(err.mean_anomaly, 0.1, "Wrapped mean anomaly");
}

#[test]
fn default_tolerance() {
    assert_eq!(KeplerSolver::default().tolerance(), DEFAULT_TOLERANCE);
    assert_eq!(KeplerSolver::default().max_iterations(), 100);
}

#[test]
fn invalid_eccentricities_are_rejected() {
    for eccentricity in [1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
        let err = OrbitalElements::new(1.0, eccentricity, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap_err();
        match err {
            InvalidElementsError::Eccentricity(err) => {
                assert_eq!(err.eccentricity.to_bits(), eccentricity.to_bits());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn unusable_periods_are_rejected() {
    for period in [0.0, -0.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e-320] {
        match OrbitalElements::new(1.0, 0.2, 0.0, 0.0, 0.0, 0.0, period) {
            Err(InvalidElementsError::Period(err)) => {
                assert_eq!(err.period.to_bits(), period.to_bits());
            }
            other => panic!("period {period} gave {other:?}"),
        }

        let err = OrbitalElements::new_circular(1.0, 0.0, 0.0, 0.0, period).unwrap_err();
        assert_eq!(err.period.to_bits(), period.to_bits());
    }

    for mean_motion in [0.0, f64::NAN, f64::INFINITY] {
        let result = OrbitalElements::with_mean_motion(1.0, 0.2, 0.0, 0.0, 0.0, 0.0, mean_motion);
        assert!(
            matches!(result, Err(InvalidElementsError::Period(_))),
            "mean motion {mean_motion}"
        );
    }

    // The eccentricity is checked first
    let err = OrbitalElements::new(1.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, InvalidElementsError::Eccentricity(_)));
}

#[test]
fn negative_periods_run_backwards() {
    let prograde = OrbitalElements::new(1.0, 0.3, 0.0, 0.0, 0.0, 0.0, 2.0).unwrap();
    let retrograde = OrbitalElements::new(1.0, 0.3, 0.0, 0.0, 0.0, 0.0, -2.0).unwrap();
    let propagator = OrbitPropagator::with_solver(KeplerSolver::default().with_tolerance(1e-13));

    let ahead = propagator.position_at(&prograde, 0.25, 1.0).unwrap();
    let behind = propagator.position_at(&retrograde, 0.25, 1.0).unwrap();

    assert!(ahead.is_finite() && behind.is_finite());
    assert_almost_eq_vec3(ahead, behind * DVec3::new(1.0, 1.0, -1.0), "Mirrored position");
}

#[test]
fn mean_motion_and_period_agree() {
    let by_period = OrbitalElements::new(1.0, 0.2, 5.0, 10.0, 15.0, 0.3, 4.0).unwrap();
    let by_motion =
        OrbitalElements::with_mean_motion(1.0, 0.2, 5.0, 10.0, 15.0, 0.3, TAU / 4.0).unwrap();

    assert_almost_eq(
        by_motion.get_orbital_period(),
        by_period.get_orbital_period(),
        "Period",
    );
    assert_almost_eq(
        by_period.get_mean_anomaly_at_time(1.0, 1.0),
        0.3 + PI / 2.0,
        "Mean anomaly after a quarter period",
    );
}

#[test]
fn planets_stay_on_their_orbits() {
    let mut system = SolarSystem::from_bodies(planets::all()).unwrap();
    system.clock_mut().set_speed_multiplier(3.0);

    for _ in 0..100 {
        system.tick(0.37);

        let positions = system.positions().unwrap();
        assert_eq!(positions.len(), system.bodies().len());

        for (body, position) in system.bodies().iter().zip(positions) {
            assert_within_apsides(&body.elements, position, &body.name);
        }
    }

    let curves = system.orbit_curves(DEFAULT_ORBIT_STEPS).unwrap();
    assert!(curves.iter().all(|curve| curve.len() == DEFAULT_ORBIT_STEPS));
}

#[cfg(feature = "serde")]
#[test]
fn elements_deserialization_is_validated() {
    let elements: OrbitalElements = serde_json::from_str(
        r#"{ "semi_major_axis": 2.0, "eccentricity": 0.5, "inclination": 30.0, "period": 3.0 }"#,
    )
    .unwrap();

    assert_eq!(elements.get_inclination(), 30.0);
    assert_eq!(elements.get_arg_pe(), 0.0);
    assert_eq!(
        elements.get_transformation_matrix(),
        OrbitalElements::new(2.0, 0.5, 30.0, 0.0, 0.0, 0.0, 3.0)
            .unwrap()
            .get_transformation_matrix()
    );

    let result = serde_json::from_str::<OrbitalElements>(
        r#"{ "semi_major_axis": 2.0, "eccentricity": 1.0, "period": 3.0 }"#,
    );
    assert!(result.is_err());

    let err = serde_json::from_str::<OrbitalElements>(
        r#"{ "semi_major_axis": 2.0, "eccentricity": 0.5, "period": 0.0 }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("orbital period 0"), "{err}");
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_sampling_matches_sequential() {
    let propagator = OrbitPropagator::default();
    let elements: Vec<_> = (0..RANDOM_ORBITS).map(|_| random_any()).collect();

    let parallel = crate::sample_orbits_par(&propagator, &elements, 120);

    for (elements, curve) in elements.iter().zip(parallel) {
        assert_eq!(curve.unwrap(), propagator.sample_orbit(elements, 120).unwrap());
    }
}
