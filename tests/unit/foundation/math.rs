use super::*;

fn approx(a: Vec4, b: Vec4) -> bool {
    (a.x - b.x).abs() < 1e-5
        && (a.y - b.y).abs() < 1e-5
        && (a.z - b.z).abs() < 1e-5
        && (a.w - b.w).abs() < 1e-5
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
}

#[test]
fn fixed_point_rounds_to_nearest() {
    assert_eq!(to_fixed(1.0), FIXED_ONE);
    assert_eq!(to_fixed(-0.5), -(FIXED_ONE / 2));
}

#[test]
fn translation_then_scale_composes_right_to_left() {
    let m = Mat4::translation(10.0, 0.0, 0.0) * Mat4::scaling(2.0, 2.0, 2.0);
    let p = m.transform(Vec4::new(1.0, 1.0, 0.0, 1.0));
    assert!(approx(p, Vec4::new(12.0, 2.0, 0.0, 1.0)));
}

#[test]
fn rotation_about_z_turns_x_into_y() {
    let m = Mat4::rotation(90.0, 0.0, 0.0, 1.0);
    let p = m.transform(Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert!(approx(p, Vec4::new(0.0, 1.0, 0.0, 1.0)));
    assert_eq!(Mat4::rotation(45.0, 0.0, 0.0, 0.0), Mat4::IDENTITY);
}

#[test]
fn ortho_maps_box_corners_to_unit_cube() {
    let m = Mat4::ortho(0.0, 100.0, 0.0, 50.0, -1.0, 1.0);
    assert!(approx(
        m.transform(Vec4::new(0.0, 0.0, 0.0, 1.0)),
        Vec4::new(-1.0, -1.0, 0.0, 1.0)
    ));
    assert!(approx(
        m.transform(Vec4::new(100.0, 50.0, 0.0, 1.0)),
        Vec4::new(1.0, 1.0, 0.0, 1.0)
    ));
}

#[test]
fn frustum_puts_eye_distance_into_w() {
    let m = Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
    let p = m.transform(Vec4::new(0.0, 0.0, -5.0, 1.0));
    assert!((p.w - 5.0).abs() < 1e-5);
}

#[test]
fn identity_is_neutral() {
    let m = Mat4::rotation(30.0, 1.0, 1.0, 0.0);
    assert_eq!(m * Mat4::IDENTITY, m);
    assert_eq!(Mat4::IDENTITY * m, m);
}
