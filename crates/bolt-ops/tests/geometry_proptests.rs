//! Property-based tests for the bolt's sketch geometry.

use std::f64::consts::{FRAC_PI_2, PI};

use proptest::prelude::*;

use bolt_ops::geometry::{hex_vertices, revolve_cut_profile, CutSide};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_diameter() -> impl Strategy<Value = f64> {
    0.01f64..100.0
}

/// Cut angles short of the vertical.
fn arb_cut_angle() -> impl Strategy<Value = f64> {
    0.0f64..(FRAC_PI_2 - 0.05)
}

fn arb_side() -> impl Strategy<Value = CutSide> {
    prop_oneof![Just(CutSide::Near), Just(CutSide::Far)]
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. Hex vertices lie on the circumscribed circle
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn hex_vertices_on_circumcircle(d in arb_diameter()) {
        let hex = hex_vertices(d);
        prop_assert_eq!(hex.vertices.len(), 6);
        for v in hex.vertices {
            let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
            prop_assert!((r - d / 2.0).abs() < TOL * d.max(1.0),
                "vertex radius {} != {}", r, d / 2.0);
            prop_assert_eq!(v[2], 0.0);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Consecutive vertices are pi/3 apart and the outline closes
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn hex_vertices_evenly_spaced_and_closed(d in arb_diameter()) {
        let hex = hex_vertices(d);
        let edges = hex.edges();
        for (i, (a, b)) in edges.iter().enumerate() {
            let ta = a[1].atan2(a[0]);
            let tb = b[1].atan2(b[0]);
            let mut step = tb - ta;
            if step < 0.0 {
                step += 2.0 * PI;
            }
            prop_assert!((step - PI / 3.0).abs() < 1e-9, "edge {} spans {}", i, step);
        }
        prop_assert_eq!(edges[5].1, hex.vertices[0]);
    }
}

// ---------------------------------------------------------------------------
// 3. Apex offset follows (r - r cos(pi/6)) tan(angle), pointing into the head
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cut_profile_apex_offset(
        d in arb_diameter(),
        h in 0.01f64..10.0,
        angle in arb_cut_angle(),
        side in arb_side(),
    ) {
        let r = d / 2.0;
        let z_base = match side { CutSide::Near => 0.0, CutSide::Far => h };
        let profile = revolve_cut_profile(r, z_base, angle, side);
        let expected = (r - r * (PI / 6.0).cos()) * angle.tan();

        prop_assert!((profile.apex_offset() - expected).abs() < TOL * expected.max(1.0));
        prop_assert_eq!(profile.points[0][2], z_base);
        prop_assert_eq!(profile.points[1][2], z_base);
        prop_assert_eq!(profile.points[2][0], r);

        let apex_z = profile.points[2][2];
        match side {
            CutSide::Near => prop_assert!(apex_z >= z_base),
            CutSide::Far => prop_assert!(apex_z <= z_base),
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Same inputs, same outputs
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn geometry_is_pure(d in arb_diameter(), angle in arb_cut_angle(), side in arb_side()) {
        prop_assert_eq!(hex_vertices(d), hex_vertices(d));
        prop_assert_eq!(
            revolve_cut_profile(d / 2.0, 1.0, angle, side),
            revolve_cut_profile(d / 2.0, 1.0, angle, side)
        );
    }
}

// ---------------------------------------------------------------------------
// Fixed cases
// ---------------------------------------------------------------------------

#[test]
fn zero_cut_angle_collapses_both_profiles() {
    for side in [CutSide::Near, CutSide::Far] {
        let profile = revolve_cut_profile(0.375, 0.3125, 0.0, side);
        assert_eq!(profile.apex_offset(), 0.0);
        assert_eq!(profile.area(), 0.0);
        assert!(profile.is_degenerate(0.0));
    }
}

#[test]
fn steep_cut_angle_grows_without_bound() {
    let shallow = revolve_cut_profile(0.375, 0.0, 1.0, CutSide::Near).apex_offset();
    let steep = revolve_cut_profile(0.375, 0.0, FRAC_PI_2 - 1e-6, CutSide::Near).apex_offset();
    assert!(steep > 1000.0 * shallow);
}

#[test]
fn default_bolt_near_profile() {
    let profile = revolve_cut_profile(0.375, 0.0, 30f64.to_radians(), CutSide::Near);
    let flats = 0.375 * (PI / 6.0).cos();
    approx::assert_relative_eq!(profile.points[0][0], flats);
    approx::assert_relative_eq!(
        profile.points[2][2],
        (0.375 - flats) * 30f64.to_radians().tan(),
        epsilon = 1e-12
    );
    assert!(!profile.is_degenerate(1e-7));
}

#[test]
fn inradius_matches_flats() {
    approx::assert_relative_eq!(hex_vertices(0.75).inradius(), 0.375 * (PI / 6.0).cos());
}

#[test]
fn shallow_cut_is_degenerate_within_tolerance() {
    let r = 0.375;
    let base = r - r * (PI / 6.0).cos();
    let shallow = revolve_cut_profile(r, 0.0, 0.001f64.to_radians(), CutSide::Near);
    approx::assert_relative_eq!(
        shallow.area(),
        0.5 * base * base * 0.001f64.to_radians().tan(),
        max_relative = 1e-9
    );
    assert!(shallow.is_degenerate(1e-7));

    let visible = revolve_cut_profile(r, 0.0, 0.01f64.to_radians(), CutSide::Far);
    assert!(!visible.is_degenerate(1e-7));
}
