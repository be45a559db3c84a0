use super::*;

#[test]
fn unit_conversions_match_print_conventions() {
    assert!((mm_to_pt(MM_PER_INCH) - 72.0).abs() < 1e-12);
    assert!((px_to_mm(300, DEFAULT_DPI) - 25.4).abs() < 1e-12);
    assert!((px_to_mm(600, 150.0) - 101.6).abs() < 1e-9);
}

#[test]
fn dimension_swap_and_inset() {
    let d = Dimension::new(210.0, 297.0);
    assert_eq!(d.swapped(), Dimension::new(297.0, 210.0));
    assert_eq!(d.inset(10.0), Dimension::new(190.0, 277.0));
    assert!(!Dimension::new(10.0, 10.0).inset(6.0).is_positive());
}

#[test]
fn dimension_positivity_rejects_zero_and_nan() {
    assert!(Dimension::new(1.0, 1.0).is_positive());
    assert!(!Dimension::new(0.0, 1.0).is_positive());
    assert!(!Dimension::new(1.0, -1.0).is_positive());
    assert!(!Dimension::new(f64::NAN, 1.0).is_positive());
}

#[test]
fn from_inches_letter() {
    let letter = Dimension::from_inches(8.5, 11.0);
    assert!((letter.width - 215.9).abs() < 1e-9);
    assert!((letter.height - 279.4).abs() < 1e-9);
    let (w_pt, h_pt) = letter.to_points();
    assert!((w_pt - 612.0).abs() < 1e-9);
    assert!((h_pt - 792.0).abs() < 1e-9);
}
