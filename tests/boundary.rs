use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use primitive_reader::PrimitiveDetector;
use primitive_reader::boundary::{
    prim_arc, prim_arc_count, prim_circle, prim_circle_count, prim_create_detector,
    prim_destroy_detector, prim_destroy_result, prim_line, prim_line_count, prim_process_image,
};

fn scene() -> GrayImage {
    let mut img = GrayImage::new(120, 90);
    draw_filled_circle_mut(&mut img, (60, 45), 28, Luma([255]));
    draw_line_segment_mut(&mut img, (5.0, 85.0), (115.0, 85.0), Luma([200]));
    img
}

#[test]
fn handles_mirror_the_rust_api() {
    let img = scene();
    let expected = PrimitiveDetector::default()
        .process_image(img.as_raw(), 120, 90, 1)
        .expect("pipeline failed");

    let detector = prim_create_detector();
    assert!(!detector.is_null());
    unsafe {
        let result = prim_process_image(detector, img.as_raw().as_ptr(), 120, 90, 1);
        assert!(!result.is_null());

        assert_eq!(prim_line_count(result) as usize, expected.lines.len());
        for (i, line) in expected.lines.iter().enumerate() {
            assert_eq!(prim_line(result, i as i32), *line);
        }
        assert_eq!(prim_circle_count(result) as usize, expected.circles.len());
        for (i, circle) in expected.circles.iter().enumerate() {
            assert_eq!(prim_circle(result, i as i32), *circle);
        }
        assert_eq!(prim_arc_count(result) as usize, expected.arcs.len());
        for (i, arc) in expected.arcs.iter().enumerate() {
            assert_eq!(prim_arc(result, i as i32), *arc);
        }

        prim_destroy_result(result);
        prim_destroy_detector(detector);
    }
}

#[test]
fn one_detector_serves_many_results() {
    let img = scene();
    let detector = prim_create_detector();
    unsafe {
        let a = prim_process_image(detector, img.as_raw().as_ptr(), 120, 90, 1);
        let b = prim_process_image(detector, img.as_raw().as_ptr(), 120, 90, 1);
        assert!(!a.is_null() && !b.is_null());
        assert_eq!(prim_circle_count(a), prim_circle_count(b));
        assert_eq!(prim_line_count(a), prim_line_count(b));
        prim_destroy_result(a);
        for i in 0..prim_circle_count(b) {
            assert!(prim_circle(b, i).radius > 0.0);
        }
        prim_destroy_result(b);
        prim_destroy_detector(detector);
    }
}

#[test]
fn rejected_inputs_return_null() {
    let pixels = vec![0u8; 16 * 16 * 3];
    let detector = prim_create_detector();
    unsafe {
        assert!(prim_process_image(std::ptr::null(), pixels.as_ptr(), 16, 16, 3).is_null());
        assert!(prim_process_image(detector, std::ptr::null(), 16, 16, 3).is_null());
        assert!(prim_process_image(detector, pixels.as_ptr(), -16, 16, 3).is_null());
        assert!(prim_process_image(detector, pixels.as_ptr(), 16, -1, 3).is_null());
        assert!(prim_process_image(detector, pixels.as_ptr(), 16, 16, -3).is_null());
        assert!(prim_process_image(detector, pixels.as_ptr(), 16, 16, 2).is_null());
        prim_destroy_detector(detector);
    }
}

#[test]
fn empty_image_gives_an_empty_result() {
    let pixels = [0u8; 1];
    let detector = prim_create_detector();
    unsafe {
        let result = prim_process_image(detector, pixels.as_ptr(), 0, 0, 1);
        assert!(!result.is_null());
        assert_eq!(prim_line_count(result), 0);
        assert_eq!(prim_circle_count(result), 0);
        assert_eq!(prim_arc_count(result), 0);
        prim_destroy_result(result);
        prim_destroy_detector(detector);
    }
}

#[test]
fn destroying_null_is_a_no_op() {
    unsafe {
        prim_destroy_result(std::ptr::null_mut());
        prim_destroy_detector(std::ptr::null_mut());
    }
}

#[test]
fn nulled_handles_make_repeated_release_safe() {
    let img = scene();
    let mut detector = prim_create_detector();
    unsafe {
        let mut result = prim_process_image(detector, img.as_raw().as_ptr(), 120, 90, 1);
        assert!(!result.is_null());

        // releasing a live pointer twice is undefined; the caller nulls it instead
        for _ in 0..2 {
            prim_destroy_result(result);
            result = std::ptr::null_mut();
        }
        for _ in 0..2 {
            prim_destroy_detector(detector);
            detector = std::ptr::null_mut();
        }
        assert!(result.is_null() && detector.is_null());
    }
}
