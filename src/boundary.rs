//! C ABI over [`PrimitiveDetector`] for callers in another language.
//!
//! Detectors and results are heap allocations handed out as opaque pointers.
//! Each one must be released exactly once with its matching `prim_destroy_*`
//! call. Destroy functions ignore null. Index accessors trust the caller:
//! an out-of-range index aborts the process.

use log::warn;
use std::ffi::c_int;

use crate::detector::PrimitiveDetector;
use crate::geometry::{Arc, Circle, GeometricPrimitives, Line};

/// Allocates a detector with the default parameters. Never returns null.
#[unsafe(no_mangle)]
pub extern "C" fn prim_create_detector() -> *mut PrimitiveDetector {
    Box::into_raw(Box::new(PrimitiveDetector::default()))
}

/// Runs the pipeline over `width * height * channels` bytes at `data`.
///
/// Returns null when a pointer is null, a dimension is negative, or the
/// format is rejected.
///
/// # Safety
/// `detector` must come from [`prim_create_detector`] and not be destroyed.
/// `data` must be readable for `width * height * channels` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_process_image(
    detector: *const PrimitiveDetector,
    data: *const u8,
    width: c_int,
    height: c_int,
    channels: c_int,
) -> *mut GeometricPrimitives {
    if detector.is_null() || data.is_null() {
        warn!("prim_process_image called with a null pointer");
        return std::ptr::null_mut();
    }
    let (Ok(w), Ok(h), Ok(c)) = (
        usize::try_from(width),
        usize::try_from(height),
        usize::try_from(channels),
    ) else {
        warn!("prim_process_image called with negative dimensions {width}x{height}x{channels}");
        return std::ptr::null_mut();
    };
    let Some(len) = w.checked_mul(h).and_then(|n| n.checked_mul(c)) else {
        warn!("prim_process_image dimensions overflow: {w}x{h}x{c}");
        return std::ptr::null_mut();
    };

    // SAFETY: the caller guarantees both pointers are live for this call.
    let (detector, buffer) = unsafe { (&*detector, std::slice::from_raw_parts(data, len)) };
    match detector.process_image(buffer, w, h, c) {
        Ok(primitives) => Box::into_raw(Box::new(primitives)),
        Err(e) => {
            warn!("prim_process_image failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `result` must be a live handle from [`prim_process_image`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_line_count(result: *const GeometricPrimitives) -> c_int {
    // SAFETY: upheld by the caller.
    unsafe { (*result).lines.len() as c_int }
}

/// # Safety
/// `result` must be a live handle and `0 <= index < prim_line_count(result)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_line(result: *const GeometricPrimitives, index: c_int) -> Line {
    // SAFETY: upheld by the caller.
    unsafe { (&(*result).lines)[index as usize] }
}

/// # Safety
/// `result` must be a live handle from [`prim_process_image`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_circle_count(result: *const GeometricPrimitives) -> c_int {
    // SAFETY: upheld by the caller.
    unsafe { (*result).circles.len() as c_int }
}

/// # Safety
/// `result` must be a live handle and `0 <= index < prim_circle_count(result)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_circle(result: *const GeometricPrimitives, index: c_int) -> Circle {
    // SAFETY: upheld by the caller.
    unsafe { (&(*result).circles)[index as usize] }
}

/// # Safety
/// `result` must be a live handle from [`prim_process_image`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_arc_count(result: *const GeometricPrimitives) -> c_int {
    // SAFETY: upheld by the caller.
    unsafe { (*result).arcs.len() as c_int }
}

/// # Safety
/// `result` must be a live handle and `0 <= index < prim_arc_count(result)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_arc(result: *const GeometricPrimitives, index: c_int) -> Arc {
    // SAFETY: upheld by the caller.
    unsafe { (&(*result).arcs)[index as usize] }
}

/// Releases a result. Null is ignored.
///
/// Destroying the same non-null handle twice frees the allocation twice and
/// is undefined behaviour, so it cannot be detected here. Callers that may
/// reach the destroy path more than once should null their copy after the
/// first call.
///
/// # Safety
/// `result` must be null or a handle from [`prim_process_image`] not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_destroy_result(result: *mut GeometricPrimitives) {
    if result.is_null() {
        return;
    }
    // SAFETY: the handle was produced by Box::into_raw and is released once.
    drop(unsafe { Box::from_raw(result) });
}

/// Releases a detector. Null is ignored. The double-release rules of
/// [`prim_destroy_result`] apply here too.
///
/// # Safety
/// `detector` must be null or a handle from [`prim_create_detector`] not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prim_destroy_detector(detector: *mut PrimitiveDetector) {
    if detector.is_null() {
        return;
    }
    // SAFETY: the handle was produced by Box::into_raw and is released once.
    drop(unsafe { Box::from_raw(detector) });
}
