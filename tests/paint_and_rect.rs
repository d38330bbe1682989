use easel::{Bitmap, BlendMode, Canvas, Color, Paint, Pixel, Rect};

#[test]
fn paint_floods_the_device_with_src() {
    let mut bmp = Bitmap::new(10, 10);
    let mut canvas = Canvas::new(&mut bmp);
    let mut paint = Paint::with_color(Color::rgb(1.0, 0.0, 0.0)).blend_mode(BlendMode::Src);
    canvas.draw_paint(&mut paint);
    assert!(bmp.pixels().iter().all(|&p| p == Pixel(0xFFFF0000)));
}

#[test]
fn rect_src_over_transparent_background() {
    let mut bmp = Bitmap::new(4, 4);
    let mut canvas = Canvas::new(&mut bmp);
    let mut paint = Paint::with_color(Color::new(1.0, 1.0, 1.0, 0.5));
    canvas.draw_rect(&Rect::from_ltrb(1.0, 1.0, 3.0, 3.0), &mut paint);
    for y in 0..4 {
        for x in 0..4 {
            let p = bmp.get(x, y);
            if (1..3).contains(&x) && (1..3).contains(&y) {
                for got in [p.a(), p.r(), p.g(), p.b()] {
                    assert!((got as i32 - 0x80).abs() <= 1, "({}, {}) = {:08x}", x, y, p.0);
                }
            } else {
                assert_eq!(p, Pixel(0), "({}, {})", x, y);
            }
        }
    }
}

#[test]
fn rect_src_over_opaque_black() {
    let mut bmp = Bitmap::new(4, 4);
    bmp.fill(Pixel(0xFF000000));
    let mut canvas = Canvas::new(&mut bmp);
    let mut paint = Paint::with_color(Color::new(1.0, 1.0, 1.0, 0.5));
    canvas.draw_rect(&Rect::from_ltrb(1.0, 1.0, 3.0, 3.0), &mut paint);
    for y in 0..4 {
        for x in 0..4 {
            let p = bmp.get(x, y);
            if (1..3).contains(&x) && (1..3).contains(&y) {
                assert_eq!(p.a(), 0xFF);
                for got in [p.r(), p.g(), p.b()] {
                    assert!((got as i32 - 0x80).abs() <= 1, "({}, {}) = {:08x}", x, y, p.0);
                }
            } else {
                assert_eq!(p, Pixel(0xFF000000), "({}, {})", x, y);
            }
        }
    }
}

#[test]
fn rect_covers_pixels_by_center() {
    // edges through pixel centers: center must be strictly past the min
    // edge and at or before the max edge
    let mut bmp = Bitmap::new(4, 4);
    let mut canvas = Canvas::new(&mut bmp);
    let mut paint = Paint::with_color(Color::rgb(0.0, 1.0, 0.0)).blend_mode(BlendMode::Src);
    canvas.draw_rect(&Rect::from_ltrb(0.5, 0.5, 2.5, 2.5), &mut paint);
    let lit: Vec<_> = (0..16).filter(|i| bmp.pixels()[*i] != Pixel(0)).collect();
    // rows 1..2, columns 1..2
    assert_eq!(lit, vec![5, 6, 9, 10]);
}

#[test]
fn offscreen_and_empty_rects_draw_nothing() {
    let mut bmp = Bitmap::new(4, 4);
    let mut canvas = Canvas::new(&mut bmp);
    let mut paint = Paint::with_color(Color::white()).blend_mode(BlendMode::Src);
    canvas.draw_rect(&Rect::from_ltrb(10.0, 10.0, 20.0, 20.0), &mut paint);
    canvas.draw_rect(&Rect::from_ltrb(-9.0, -9.0, -1.0, -1.0), &mut paint);
    canvas.draw_rect(&Rect::from_ltrb(2.0, 2.0, 2.0, 3.0), &mut paint);
    assert!(bmp.pixels().iter().all(|&p| p == Pixel(0)));
}

#[test]
fn partially_offscreen_rect_is_clipped() {
    let mut bmp = Bitmap::new(4, 4);
    let mut canvas = Canvas::new(&mut bmp);
    let mut paint = Paint::with_color(Color::white()).blend_mode(BlendMode::Src);
    canvas.draw_rect(&Rect::from_ltrb(-5.0, -5.0, 2.0, 2.0), &mut paint);
    for y in 0..4 {
        for x in 0..4 {
            let expect = if x < 2 && y < 2 { Pixel(0xFFFFFFFF) } else { Pixel(0) };
            assert_eq!(bmp.get(x, y), expect, "({}, {})", x, y);
        }
    }
}
