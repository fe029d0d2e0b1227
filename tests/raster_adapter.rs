use primitive_reader::kornia::to_gray;
use primitive_reader::{ExtractError, FormatError, Raster, RasterView};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 37 + 11) % 251) as u8).collect()
}

#[test]
fn round_trip_is_identity_for_supported_layouts() {
    for channels in [1usize, 3, 4] {
        for (w, h) in [(1usize, 1usize), (7, 5), (16, 3), (3, 16)] {
            let buffer = pattern(w * h * channels);
            let raster = Raster::from_buffer(&buffer, w, h, channels).expect("adapt");
            assert_eq!(raster.width(), w);
            assert_eq!(raster.height(), h);
            assert_eq!(raster.channels(), channels);
            assert!(raster.view().is_contiguous());
            assert_eq!(raster.to_buffer(), buffer, "{w}x{h}x{channels}");
        }
    }
}

#[test]
fn unsupported_channel_counts_are_invalid_format() {
    for channels in [0usize, 2, 5] {
        let buffer = pattern(4 * 4 * channels.max(1));
        let err = Raster::from_buffer(&buffer, 4, 4, channels).expect_err("must fail");
        assert!(
            matches!(err, ExtractError::InvalidFormat(FormatError::Channels(c)) if c == channels),
            "{err}"
        );
    }
}

#[test]
fn short_buffer_is_invalid_format() {
    let buffer = pattern(10 * 10 * 3 - 1);
    let err = Raster::from_buffer(&buffer, 10, 10, 3).expect_err("must fail");
    assert!(matches!(
        err,
        ExtractError::InvalidFormat(FormatError::BufferTooShort {
            expected: 300,
            actual: 299
        })
    ));
}

#[test]
fn longer_buffer_uses_leading_bytes() {
    let buffer = pattern(6 * 4 + 9);
    let raster = Raster::from_buffer(&buffer, 6, 4, 1).expect("adapt");
    assert_eq!(raster.to_buffer(), &buffer[..24]);
}

#[test]
fn zero_area_is_empty() {
    let raster = Raster::from_buffer(&[], 0, 12, 3).expect("adapt");
    assert!(raster.is_empty());
    assert!(raster.to_buffer().is_empty());
    let gray = to_gray(&raster).expect("gray");
    assert_eq!(gray.dimensions(), (0, 0));
}

#[test]
fn strided_view_drops_row_padding() {
    let (w, h, c, pad) = (5usize, 4usize, 3usize, 7usize);
    let stride = w * c + pad;
    let packed = pattern(w * h * c);
    let mut padded = vec![0xEEu8; stride * h];
    for y in 0..h {
        padded[y * stride..y * stride + w * c].copy_from_slice(&packed[y * w * c..(y + 1) * w * c]);
    }

    let view = RasterView::new(&padded, w, h, c, stride).expect("view");
    assert!(!view.is_contiguous());
    assert_eq!(view.row(2), &packed[2 * w * c..3 * w * c]);
    assert_eq!(view.to_buffer(), packed);

    let raster = Raster::from_view(&view).expect("pack");
    assert_eq!(raster.to_buffer(), packed);
}

#[test]
fn last_row_needs_no_padding() {
    let (w, h, stride) = (4usize, 3usize, 6usize);
    let data = pattern(stride * (h - 1) + w);
    let view = RasterView::new(&data, w, h, 1, stride).expect("view");
    assert_eq!(view.to_buffer().len(), w * h);
}

#[test]
fn stride_shorter_than_row_is_rejected() {
    let data = pattern(64);
    let err = RasterView::new(&data, 8, 2, 4, 16).expect_err("must fail");
    assert!(matches!(
        err,
        ExtractError::InvalidFormat(FormatError::Stride { stride: 16, row: 32 })
    ));
}

#[test]
fn grayscale_passes_single_channel_through() {
    let buffer = pattern(9 * 4);
    let raster = Raster::from_buffer(&buffer, 9, 4, 1).expect("adapt");
    let gray = to_gray(&raster).expect("gray");
    assert_eq!(gray.as_raw(), &buffer);
}

#[test]
fn grayscale_ignores_alpha() {
    let rgb = pattern(6 * 6 * 3);
    let rgba: Vec<u8> = rgb
        .chunks_exact(3)
        .enumerate()
        .flat_map(|(i, px)| [px[0], px[1], px[2], (i * 13) as u8])
        .collect();
    let from_rgb = to_gray(&Raster::from_buffer(&rgb, 6, 6, 3).expect("rgb")).expect("gray");
    let from_rgba = to_gray(&Raster::from_buffer(&rgba, 6, 6, 4).expect("rgba")).expect("gray");
    assert_eq!(from_rgb, from_rgba);
}

#[test]
fn colour_bytes_are_blue_green_red() {
    let pixels = [255u8, 0, 0, 0, 255, 0, 0, 0, 255];
    let gray = to_gray(&Raster::from_buffer(&pixels, 3, 1, 3).expect("bgr")).expect("gray");
    let (b, g, r) = (gray.as_raw()[0], gray.as_raw()[1], gray.as_raw()[2]);
    assert!(g > r && r > b, "b={b} g={g} r={r}");
    // 0.114 * 255 for a pure blue pixel, allowing for fixed-point rounding
    assert!((28..=29).contains(&b), "blue maps to {b}");
    assert!((75..=77).contains(&r), "red maps to {r}");
}

#[test]
fn four_channel_bytes_are_blue_green_red_alpha() {
    let pixels = [255u8, 0, 0, 255];
    let gray = to_gray(&Raster::from_buffer(&pixels, 1, 1, 4).expect("bgra")).expect("gray");
    assert!((28..=29).contains(&gray.as_raw()[0]), "blue maps to {}", gray.as_raw()[0]);
}

#[test]
fn white_stays_white() {
    let pixels = [255u8; 4 * 2 * 3];
    let gray = to_gray(&Raster::from_buffer(&pixels, 4, 2, 3).expect("bgr")).expect("gray");
    assert!(gray.pixels().all(|p| p[0] >= 254));
}
