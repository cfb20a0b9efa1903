//! Comprehensive tests for vexel-canvas
//!
//! Drives the full context surface: transform composition, path rules,
//! pixel access, compositing and PNG export.

use vexel_canvas::{CanvasContext, Color, FillRule, Image, ImageDrawing};

fn pixel(ctx: &CanvasContext, x: i64, y: i64) -> Color {
    ctx.buffer().pixel(x, y)
}

fn opaque_pixels(ctx: &CanvasContext) -> usize {
    ctx.data().chunks(4).filter(|px| px[3] != 0).count()
}

#[test]
fn test_translate_then_scale_composition() {
    // Under translate(a,b); scale(c,d) a user point (x,y) lands at
    // (c*x + a, d*y + b)
    let mut ctx = CanvasContext::new(20, 20);
    ctx.translate(3.0, 4.0);
    ctx.scale(2.0, 2.0);
    ctx.fill_rect(2.0, 2.0, 1.0, 1.0);

    // Device rect: x in [7, 9), y in [8, 10)
    for y in 0..20 {
        for x in 0..20 {
            let expected = (7..9).contains(&x) && (8..10).contains(&y);
            assert_eq!(pixel(&ctx, x, y).a == 255, expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_transform_after_path_build_still_applies() {
    // The matrix is sampled at fill() time, not at path-build time
    let mut ctx = CanvasContext::new(10, 10);
    ctx.rect(0.0, 0.0, 2.0, 2.0);
    ctx.translate(4.0, 4.0);
    ctx.fill();

    assert_eq!(pixel(&ctx, 5, 5), Color::BLACK);
    assert_eq!(pixel(&ctx, 1, 1), Color::TRANSPARENT);
}

#[test]
fn test_close_path_idempotent_for_fill() {
    let draw = |closes: usize| {
        let mut ctx = CanvasContext::new(16, 16);
        ctx.move_to(2.0, 2.0);
        ctx.line_to(12.0, 2.0);
        ctx.line_to(2.0, 12.0);
        for _ in 0..closes {
            ctx.close_path();
        }
        ctx.fill();
        ctx.data().to_vec()
    };

    let zero = draw(0);
    assert_eq!(zero, draw(1));
    assert_eq!(zero, draw(2));
}

#[test]
fn test_close_path_idempotent_for_stroke() {
    let draw = |closes: usize| {
        let mut ctx = CanvasContext::new(16, 16);
        ctx.set_line_width(2.0);
        ctx.move_to(2.0, 2.0);
        ctx.line_to(12.0, 2.0);
        ctx.line_to(2.0, 12.0);
        for _ in 0..closes {
            ctx.close_path();
        }
        ctx.stroke();
        ctx.data().to_vec()
    };

    let once = draw(1);
    assert_eq!(once, draw(2));
    // The un-closed variant is missing the closing edge
    assert_ne!(once, draw(0));
}

#[test]
fn test_close_path_scope_is_last_subpath() {
    let mut ctx = CanvasContext::new(30, 30);
    ctx.set_line_width(2.0);
    // First subpath: open elbow whose closing edge would run along y = 10
    ctx.move_to(2.0, 2.0);
    ctx.line_to(2.0, 10.0);
    ctx.line_to(10.0, 10.0);
    // Second subpath: explicitly closed triangle whose closing edge is the
    // diagonal from (26, 2) back to (18, 10)
    ctx.move_to(18.0, 10.0);
    ctx.line_to(18.0, 2.0);
    ctx.line_to(26.0, 2.0);
    ctx.close_path();
    ctx.stroke();

    // The first subpath has no edge from (10, 10) back to (2, 2)
    assert_eq!(pixel(&ctx, 6, 6), Color::TRANSPARENT);
    // The second subpath's closing diagonal passes through (22, 6)
    assert_eq!(pixel(&ctx, 22, 6), Color::BLACK);
}

#[test]
fn test_image_data_roundtrip_is_identity() {
    let mut ctx = CanvasContext::new(12, 12);
    ctx.set_fill_style("#336699");
    ctx.fill_rect(1.0, 1.0, 7.0, 5.0);
    ctx.set_fill_style("rgba(200, 10, 10, 0.5)");
    ctx.fill_rect(4.0, 3.0, 6.0, 6.0);

    let before = ctx.data().to_vec();
    let snapshot = ctx.get_image_data(2, 2, 6, 6).unwrap();
    ctx.put_image_data(&snapshot, 2, 2);

    assert_eq!(ctx.data(), &before[..]);
}

#[test]
fn test_fully_out_of_bounds_pixel_access() {
    let mut ctx = CanvasContext::new(8, 8);
    ctx.fill_rect(0.0, 0.0, 8.0, 8.0);
    let before = ctx.data().to_vec();

    let outside = ctx.get_image_data(-50, -50, 4, 4).unwrap();
    assert!(outside.data().iter().all(|&b| b == 0));

    let patch = ctx.create_image_data(4, 4).unwrap();
    ctx.put_image_data(&patch, 100, 100);
    ctx.put_image_data(&patch, -100, -100);
    assert_eq!(ctx.data(), &before[..]);
}

#[test]
fn test_global_alpha_boundaries() {
    let mut ctx = CanvasContext::new(8, 8);
    ctx.set_global_alpha(0.0);
    ctx.fill_rect(0.0, 0.0, 8.0, 8.0);
    ctx.set_line_width(3.0);
    ctx.move_to(0.0, 4.0);
    ctx.line_to(8.0, 4.0);
    ctx.stroke();
    ctx.draw_image(&Image::from_rgba(2, 2, vec![255u8; 16]), 0.0, 0.0);
    assert!(ctx.data().iter().all(|&b| b == 0), "alpha 0 must be a no-op");

    ctx.set_global_alpha(1.0);
    ctx.set_fill_style("rgb(10, 20, 30)");
    ctx.fill_rect(0.0, 0.0, 8.0, 8.0);
    assert_eq!(pixel(&ctx, 4, 4), Color::rgb(10, 20, 30));
}

#[test]
fn test_negative_size_draw_image_bounding_box() {
    let tile = Image::from_rgba(4, 4, (0u8..64).collect());

    let mut forward = CanvasContext::new(12, 12);
    forward.draw_image_scaled(&tile, 2.0, 2.0, 4.0, 4.0);

    let mut mirrored = CanvasContext::new(12, 12);
    mirrored.draw_image_scaled(&tile, 6.0, 6.0, -4.0, -4.0);

    // Same set of pixels touched
    for y in 0..12 {
        for x in 0..12 {
            assert_eq!(
                forward.buffer().pixel(x, y).a != 0,
                mirrored.buffer().pixel(x, y).a != 0,
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn test_fill_then_clear_scenario() {
    // 20x10 buffer, default black fill: fillRect(2,2,16,6) then
    // clearRect(4,4,6,6)
    let mut ctx = CanvasContext::new(20, 10);
    ctx.fill_rect(2.0, 2.0, 16.0, 6.0);
    ctx.clear_rect(4.0, 4.0, 6.0, 6.0);

    for y in 0..10i64 {
        for x in 0..20i64 {
            let filled = (2..18).contains(&x) && (2..8).contains(&y);
            let cleared = (4..10).contains(&x) && (4..10).contains(&y);
            let expected = if filled && !cleared {
                Color::BLACK
            } else {
                Color::TRANSPARENT
            };
            assert_eq!(pixel(&ctx, x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_create_image_data_indexed_writes() {
    let ctx = CanvasContext::new(4, 4);
    let mut img = ctx.create_image_data(2, 3).unwrap();
    assert_eq!(img.data().len(), 24);

    img.set(2, 17.0);
    assert_eq!(img.get(2), Some(17));
    for (i, &b) in img.data().iter().enumerate() {
        assert_eq!(b, if i == 2 { 17 } else { 0 });
    }
}

#[test]
fn test_png_data_url_roundtrip() {
    let mut ctx = CanvasContext::new(9, 7);
    ctx.set_fill_style("#ff8800");
    ctx.fill_rect(1.0, 1.0, 5.0, 4.0);

    let url = ctx.to_data_url();
    assert!(url.starts_with("data:image/png;base64,"));

    let bytes = vexel_codec::decode_png_data_url(&url).unwrap();
    let decoded = vexel_codec::png::decode(&bytes).unwrap();
    assert_eq!(decoded.width, 9);
    assert_eq!(decoded.height, 7);
    assert_eq!(decoded.pixels, ctx.data());

    // The reference decoder agrees on the same stream
    let decoder = png::Decoder::new(&bytes[..]);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!((info.width, info.height), (9, 7));
    assert_eq!(&buf[..info.buffer_size()], ctx.data());
}

#[test]
fn test_linear_gradient_fill() {
    let mut ctx = CanvasContext::new(10, 4);
    let mut gradient = ctx.create_linear_gradient(0.0, 0.0, 10.0, 0.0);
    gradient.add_color_stop(0.0, "#000000");
    gradient.add_color_stop(1.0, "#ffffff");
    ctx.set_fill_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, 10.0, 4.0);

    let left = pixel(&ctx, 0, 2).r;
    let mid = pixel(&ctx, 5, 2).r;
    let right = pixel(&ctx, 9, 2).r;
    assert!(left < mid && mid < right);
    assert_eq!(pixel(&ctx, 0, 2).a, 255);
}

#[test]
fn test_radial_gradient_fill() {
    let mut ctx = CanvasContext::new(20, 20);
    let mut gradient = ctx.create_radial_gradient(10.0, 10.0, 0.0, 10.0, 10.0, 8.0);
    gradient.add_color_stop(0.0, "red");
    gradient.add_color_stop(1.0, "blue");
    ctx.set_fill_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, 20.0, 20.0);

    assert!(pixel(&ctx, 10, 10).r > 200);
    assert!(pixel(&ctx, 0, 0).b > 200);
}

#[test]
fn test_pattern_fill_tiles() {
    let mut tile_data = vec![0u8; 2 * 2 * 4];
    tile_data[0..4].copy_from_slice(&[255, 0, 0, 255]); // (0,0) red
    let tile = Image::from_rgba(2, 2, tile_data);

    let mut ctx = CanvasContext::new(8, 8);
    let pattern = ctx.create_pattern(&tile, "repeat").unwrap();
    ctx.set_fill_pattern(&pattern);
    ctx.fill_rect(0.0, 0.0, 8.0, 8.0);

    // Red at every even (x, y), transparent tile elsewhere
    assert_eq!(pixel(&ctx, 0, 0), Color::rgb(255, 0, 0));
    assert_eq!(pixel(&ctx, 4, 6), Color::rgb(255, 0, 0));
    assert_eq!(pixel(&ctx, 1, 0), Color::TRANSPARENT);
}

#[test]
fn test_clip_restricts_fill_and_restore_lifts_it() {
    let mut ctx = CanvasContext::new(12, 12);
    ctx.save();
    ctx.rect(2.0, 2.0, 4.0, 4.0);
    ctx.clip();
    ctx.fill_rect(0.0, 0.0, 12.0, 12.0);

    assert_eq!(pixel(&ctx, 3, 3), Color::BLACK);
    assert_eq!(pixel(&ctx, 8, 8), Color::TRANSPARENT);

    ctx.restore();
    ctx.fill_rect(0.0, 0.0, 12.0, 12.0);
    assert_eq!(pixel(&ctx, 8, 8), Color::BLACK);
}

#[test]
fn test_nested_clips_intersect() {
    let mut ctx = CanvasContext::new(12, 12);
    ctx.rect(0.0, 0.0, 6.0, 12.0);
    ctx.clip();
    ctx.begin_path();
    ctx.rect(0.0, 0.0, 12.0, 6.0);
    ctx.clip();
    ctx.fill_rect(0.0, 0.0, 12.0, 12.0);

    assert_eq!(pixel(&ctx, 2, 2), Color::BLACK);
    assert_eq!(pixel(&ctx, 8, 2), Color::TRANSPARENT);
    assert_eq!(pixel(&ctx, 2, 8), Color::TRANSPARENT);
    assert_eq!(opaque_pixels(&ctx), 36);
}

#[test]
fn test_even_odd_fill_rule() {
    let mut ctx = CanvasContext::new(12, 12);
    ctx.rect(1.0, 1.0, 10.0, 10.0);
    ctx.rect(4.0, 4.0, 4.0, 4.0);
    ctx.fill_with_rule(FillRule::EvenOdd);

    assert_eq!(pixel(&ctx, 2, 2), Color::BLACK);
    assert_eq!(pixel(&ctx, 6, 6), Color::TRANSPARENT);

    let mut nz = CanvasContext::new(12, 12);
    nz.rect(1.0, 1.0, 10.0, 10.0);
    nz.rect(4.0, 4.0, 4.0, 4.0);
    nz.fill();
    assert_eq!(nz.buffer().pixel(6, 6), Color::BLACK);
}

#[test]
fn test_composite_destination_out_and_lighter() {
    let mut ctx = CanvasContext::new(4, 4);
    ctx.set_fill_style("rgb(100, 0, 0)");
    ctx.fill_rect(0.0, 0.0, 4.0, 4.0);

    ctx.set_global_composite_operation("destination-out");
    ctx.fill_rect(0.0, 0.0, 2.0, 4.0);
    assert_eq!(pixel(&ctx, 0, 0), Color::TRANSPARENT);
    assert_eq!(pixel(&ctx, 3, 0), Color::rgba(100, 0, 0, 255));

    ctx.set_global_composite_operation("lighter");
    ctx.set_fill_style("rgb(0, 50, 0)");
    ctx.fill_rect(2.0, 0.0, 2.0, 4.0);
    assert_eq!(pixel(&ctx, 3, 0), Color::rgba(100, 50, 0, 255));
}

#[test]
fn test_stroke_follows_transform_at_draw_time() {
    let mut ctx = CanvasContext::new(20, 20);
    ctx.set_line_width(2.0);
    ctx.move_to(0.0, 5.0);
    ctx.line_to(10.0, 5.0);
    // Move the whole already-built segment down before stroking
    ctx.translate(0.0, 10.0);
    ctx.stroke();

    assert_eq!(pixel(&ctx, 5, 15), Color::BLACK);
    assert_eq!(pixel(&ctx, 5, 5), Color::TRANSPARENT);
}

#[test]
fn test_measure_text_default_provider() {
    let ctx = CanvasContext::new(4, 4);
    let metrics = ctx.measure_text("hello");
    assert_eq!(metrics.width, 40.0);

    // No shaper attached: text draws nothing but never errors
    let mut ctx = CanvasContext::new(4, 4);
    ctx.fill_text("hello", 0.0, 0.0);
    assert!(ctx.data().iter().all(|&b| b == 0));
}
