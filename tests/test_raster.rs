mod common;

use common::*;
use gridlab::raster::{octant_steps, plot_points, rasterize_circle, rasterize_line};

fn assert_connected(points: &PointSequence) {
    let pts = points.as_tuples();
    for pair in pts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let step = ((b.0 - a.0).abs(), (b.1 - a.1).abs());
        assert!(step.0 <= 1 && step.1 <= 1 && step != (0, 0), "jump {a:?} -> {b:?}");
    }
}

// ===== Lines =====

#[test]
fn horizontal_line_in_order() {
    let pts = rasterize_line(0, 0, 5, 0).as_tuples();
    assert_eq!(pts, vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
}

#[test]
fn degenerate_line_is_single_point() {
    assert_eq!(rasterize_line(0, 0, 0, 0).as_tuples(), vec![(0, 0)]);
    assert_eq!(rasterize_line(-7, 4, -7, 4).as_tuples(), vec![(-7, 4)]);
}

#[test]
fn shallow_line_steps_on_x() {
    let pts = rasterize_line(0, 0, 6, 2).as_tuples();
    assert_eq!(pts, vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 1), (5, 2), (6, 2)]);
}

#[test]
fn steep_line_steps_on_y() {
    let pts = rasterize_line(0, 0, 2, 6).as_tuples();
    assert_eq!(pts, vec![(0, 0), (0, 1), (1, 2), (1, 3), (1, 4), (2, 5), (2, 6)]);
}

#[test]
fn lines_in_every_direction_are_connected() {
    let ends = [
        (9, 3),
        (3, 9),
        (-9, 3),
        (-3, 9),
        (9, -3),
        (3, -9),
        (-9, -3),
        (-3, -9),
        (5, 5),
        (-5, 5),
        (0, -8),
        (-8, 0),
    ];
    for &(ex, ey) in &ends {
        let (x1, y1) = (2, -1);
        let (x2, y2) = (x1 + ex, y1 + ey);
        let points = rasterize_line(x1, y1, x2, y2);

        assert_eq!(points.first(), Some(&Point::new(x1, y1)));
        assert_eq!(points.last(), Some(&Point::new(x2, y2)));
        assert_eq!(points.len(), ex.abs().max(ey.abs()) as usize + 1);
        assert_connected(&points);
    }
}

#[test]
fn line_is_deterministic() {
    assert_eq!(rasterize_line(-3, 11, 17, -4), rasterize_line(-3, 11, 17, -4));
}

// ===== Circles =====

#[test]
fn unit_circle_has_two_octant_steps() {
    let pts = rasterize_circle(0, 0, 1);
    assert_eq!(pts.len(), 16);
    assert_eq!(octant_steps(1), 2);
    for p in &pts {
        assert!(p.x.abs() <= 1 && p.y.abs() <= 1);
        assert!(!(p.x == 0 && p.y == 0));
    }
}

#[test]
fn circle_points_stay_near_radius() {
    for r in 1..=40 {
        let (cx, cy) = (-5, 12);
        for p in &rasterize_circle(cx, cy, r) {
            let dist = f64::from((p.x - cx).pow(2) + (p.y - cy).pow(2)).sqrt();
            assert!((dist - f64::from(r)).abs() <= 0.5, "r={r} point {p:?} dist={dist}");
        }
    }
}

#[test]
fn circle_count_is_eight_per_octant_step() {
    for r in 0..=50 {
        let pts = rasterize_circle(3, 3, r);
        assert_eq!(pts.len(), 8 * octant_steps(r));
        let expected = f64::from(r) / std::f64::consts::SQRT_2;
        assert!((octant_steps(r) as f64 - expected).abs() <= 1.5, "r={r}");
    }
}

#[test]
fn circle_is_symmetric_about_center() {
    let (cx, cy, r) = (7, -2, 13);
    let pts = rasterize_circle(cx, cy, r);
    for p in &pts {
        let mirrored = Point::new(2 * cx - p.x, p.y);
        let swapped = Point::new(cx + (p.y - cy), cy + (p.x - cx));
        assert!(pts.iter().any(|q| *q == mirrored));
        assert!(pts.iter().any(|q| *q == swapped));
    }
}

#[test]
fn negative_radius_yields_nothing() {
    assert!(rasterize_circle(0, 0, -3).is_empty());
    assert_eq!(octant_steps(-3), 0);
}

// ===== Plotting =====

#[test]
fn plotted_circle_marks_every_point() {
    let pts = rasterize_circle(0, 0, 6);
    let canvas = plot_points(&pts, 2).unwrap();
    assert_eq!(canvas.dimensions(), (17, 17));

    let ink = canvas.pixels().filter(|p| p[0] == 0).count();
    let mut distinct = pts.as_tuples();
    distinct.sort();
    distinct.dedup();
    assert_eq!(ink, distinct.len());
    assert_eq!(canvas.get_pixel(8, 8)[0], 255);
}

#[test]
fn plotting_nothing_gives_blank_canvas() {
    let canvas = plot_points(&PointSequence::new(), 3).unwrap();
    assert_eq!(canvas.dimensions(), (7, 7));
    assert!(canvas.pixels().all(|p| p[0] == 255));
}
