mod common;

use common::*;
use gridlab::features::morphology::{self, StructuringElement};
use gridlab::features::points::{corner_response, laplacian_response};
use gridlab::features::{
    EDGE_THRESHOLD, GradientOperator, HarrisParams, LineMethod, PointMethod, detect_edges,
    detect_lines, detect_points, gradient_magnitude,
};
use image::{GrayImage, Luma};

// ===== Points =====

#[test]
fn laplacian_finds_every_impulse() {
    let spots = [(3, 3), (12, 5), (20, 14)];
    let img = impulses(24, 18, &spots);
    let out = detect_points(&img, &PointMethod::laplacian());

    assert!(is_binary(&out));
    for &(x, y) in &spots {
        assert_eq!(out.get_pixel(x, y)[0], 255, "missed impulse at ({x},{y})");
    }
    assert_eq!(out.pixels().filter(|p| p[0] == 255).count(), spots.len());
}

#[test]
fn laplacian_response_is_clipped() {
    let img = impulses(7, 7, &[(3, 3)]);
    let response = laplacian_response(&img);
    assert_eq!(response.get_pixel(3, 3)[0], 255);
    assert_eq!(response.get_pixel(2, 3)[0], 0);
    assert_eq!(response.get_pixel(0, 0)[0], 0);
}

#[test]
fn corners_found_at_checkerboard_junctions() {
    let img = checkerboard(40, 10, 20, 230);
    let out = detect_points(&img, &PointMethod::corner());

    for &(jx, jy) in &[(10u32, 10u32), (20, 20), (30, 10)] {
        let hit = (jy - 2..jy + 2).any(|y| (jx - 2..jx + 2).any(|x| out.get_pixel(x, y)[0] == 255));
        assert!(hit, "no corner near junction ({jx},{jy})");
    }
    // Cell centers are flat.
    assert_eq!(out.get_pixel(5, 5)[0], 0);
    assert_eq!(out.get_pixel(25, 15)[0], 0);
}

#[test]
fn corner_response_negative_along_straight_edge() {
    let img = step_edge(20, 20, 10, 0, 200);
    let r = corner_response(&img, &HarrisParams::default());
    assert!(r.get_pixel(10, 10)[0] < 0.0);
}

#[test]
fn blur_otsu_separates_bright_blob() {
    let img = GrayImage::from_fn(20, 20, |x, y| {
        Luma([if (8..12).contains(&x) && (8..12).contains(&y) { 230 } else { 25 }])
    });
    let out = detect_points(&img, &PointMethod::blur_otsu());
    assert_eq!(out.get_pixel(10, 10)[0], 255);
    assert_eq!(out.get_pixel(0, 0)[0], 0);
}

#[test]
fn detectors_keep_empty_grid_empty() {
    let empty = GrayImage::new(0, 0);
    for method in [PointMethod::laplacian(), PointMethod::corner(), PointMethod::blur_otsu()] {
        assert_eq!(detect_points(&empty, &method).dimensions(), (0, 0));
    }
    for method in [LineMethod::directional_kernel(), LineMethod::morph_close(), LineMethod::canny()] {
        assert_eq!(detect_lines(&empty, &method).dimensions(), (0, 0));
    }
    assert_eq!(detect_edges(&empty, GradientOperator::Sobel, EDGE_THRESHOLD).dimensions(), (0, 0));
}

// ===== Lines =====

#[test]
fn directional_kernel_traces_rising_diagonal() {
    let img = GrayImage::from_fn(16, 16, |x, y| Luma([if x + y == 15 { 250 } else { 10 }]));
    let out = detect_lines(&img, &LineMethod::directional_kernel());
    for x in 1..15 {
        assert_eq!(out.get_pixel(x, 15 - x)[0], 255, "diagonal gap at x={x}");
    }
    assert_eq!(out.get_pixel(2, 2)[0], 0);
}

#[test]
fn morph_close_recovers_broken_stroke() {
    let img = broken_stroke(40, 21, 10, &[12, 13, 25]);
    let out = detect_lines(&img, &LineMethod::morph_close());

    assert!(is_binary(&out));
    for x in 4..36 {
        assert_eq!(out.get_pixel(x, 10)[0], 255, "stroke broken at x={x}");
    }
    assert_eq!(out.get_pixel(20, 3)[0], 0);
}

#[test]
fn canny_outlines_square() {
    let img = GrayImage::from_fn(32, 32, |x, y| {
        Luma([if (8..24).contains(&x) && (8..24).contains(&y) { 240 } else { 10 }])
    });
    let out = detect_lines(&img, &LineMethod::canny());
    assert!(is_binary(&out));
    assert!(out.pixels().any(|p| p[0] == 255));
    assert_eq!(out.get_pixel(16, 16)[0], 0);
    assert_eq!(out.get_pixel(1, 1)[0], 0);
}

// ===== Edges =====

#[test]
fn gradient_is_zero_on_flat_grid() {
    for op in [GradientOperator::Sobel, GradientOperator::Prewitt] {
        let mag = gradient_magnitude(&flat(13, 9, 173), op);
        assert!(mag.pixels().all(|p| p[0] == 0.0), "{op:?}");
        let edges = detect_edges(&flat(13, 9, 173), op, EDGE_THRESHOLD);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }
}

#[test]
fn both_operators_mark_step_columns() {
    let img = step_edge(20, 10, 10, 40, 160);
    for op in [GradientOperator::Sobel, GradientOperator::Prewitt] {
        let out = detect_edges(&img, op, EDGE_THRESHOLD);
        for y in 0..10 {
            assert_eq!(out.get_pixel(9, y)[0], 255);
            assert_eq!(out.get_pixel(10, y)[0], 255);
            assert_eq!(out.get_pixel(5, y)[0], 0);
            assert_eq!(out.get_pixel(15, y)[0], 0);
        }
    }
}

#[test]
fn sobel_matches_imageproc_in_interior() {
    let img = noise(12, 10, 5);
    let ours = gradient_magnitude(&img, GradientOperator::Sobel);
    let gx = imageproc::gradients::horizontal_sobel(&img);
    let gy = imageproc::gradients::vertical_sobel(&img);

    for y in 1..9 {
        for x in 1..11 {
            let dx = gx.get_pixel(x, y)[0] as f32;
            let dy = gy.get_pixel(x, y)[0] as f32;
            let theirs = dx.hypot(dy);
            assert!((ours.get_pixel(x, y)[0] - theirs).abs() < 1e-3, "({x},{y})");
        }
    }
}

// ===== Morphology =====

#[test]
fn closing_is_idempotent_on_binary_input() {
    let img = gridlab::grid::binarize(&noise(20, 20, 9), 128);
    let se = StructuringElement::rect(3, 3);
    let once = morphology::close(&img, &se);
    let twice = morphology::close(&once, &se);
    assert_eq!(once, twice);
    assert!(is_binary(&once));
}
