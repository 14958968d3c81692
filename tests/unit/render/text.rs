use super::*;
use crate::assets::store::AssetStore;

/// Every character advances by the same width.
struct FixedAdvance {
    char_width: f32,
}

impl TextMeasure for FixedAdvance {
    fn measure_width(&mut self, text: &str, size_px: f32) -> PosterResult<f32> {
        assert_eq!(size_px, 36.0);
        Ok(self.char_width * text.chars().count() as f32)
    }
}

fn dark_canvas(w: u32, h: u32) -> Canvas {
    Canvas::from_premul(w, h, [0u8, 0, 0, 255].repeat((w * h) as usize)).unwrap()
}

#[test]
fn default_style_is_36px_white() {
    let style = TextStyle::default();
    assert_eq!(style.size_px(), 36.0);
    assert_eq!(style.color_rgba8, [255, 255, 255, 255]);

    let hi_dpi = TextStyle {
        dpi: 144.0,
        ..TextStyle::default()
    };
    assert_eq!(hi_dpi.size_px(), 72.0);
}

#[test]
fn centers_using_measured_width() {
    let mut mock = FixedAdvance { char_width: 20.0 };
    for name in ["Ada", "Grace Hopper", "x"] {
        let (x, width) = centered_text_x(&mut mock, 800, name, 36.0).unwrap();
        let expected = (800 - 20 * name.chars().count() as i32) / 2;
        assert_eq!(x, expected, "{name}");
        assert_eq!(width, 20.0 * name.chars().count() as f32);
    }
}

#[test]
fn fractional_widths_round_up_before_centering() {
    let mut mock = FixedAdvance { char_width: 10.5 };
    // 3 * 10.5 = 31.5 -> 32 -> (800 - 32) / 2
    let (x, _) = centered_text_x(&mut mock, 800, "abc", 36.0).unwrap();
    assert_eq!(x, 384);
}

#[test]
fn real_font_measures_longer_text_wider() {
    let store = AssetStore::bundled().unwrap();
    let mut engine = TextLayoutEngine::new(store.font()).unwrap();
    let short = engine.measure_width("Ada", 36.0).unwrap();
    let long = engine.measure_width("Ada Lovelace", 36.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short);
}

#[test]
fn rejects_non_positive_size() {
    let store = AssetStore::bundled().unwrap();
    let mut engine = TextLayoutEngine::new(store.font()).unwrap();
    assert!(engine.measure_width("Ada", 0.0).is_err());
    assert!(engine.measure_width("Ada", f32::NAN).is_err());
}

#[test]
fn draws_white_pixels_around_baseline() {
    let store = AssetStore::bundled().unwrap();
    let mut engine = TextLayoutEngine::new(store.font()).unwrap();
    let mut canvas = dark_canvas(400, 200);

    let placement =
        draw_centered_text(&mut canvas, &mut engine, "Ada", &TextStyle::default(), 120).unwrap();
    assert_eq!(placement.baseline_y, 120);
    assert_eq!(
        placement.x,
        centered_origin_x(400, placement.measured_width)
    );

    let mut lit = 0usize;
    for y in 0..200u32 {
        for x in 0..400u32 {
            let px = canvas.pixel(x, y).unwrap();
            if px[0] > 128 {
                lit += 1;
                // Glyphs sit above the baseline (no descenders in "Ada").
                assert!((84..=122).contains(&y), "lit pixel at y={y}");
                assert!(x as i32 >= placement.x - 2, "lit pixel at x={x}");
            }
        }
    }
    assert!(lit > 0, "no text pixels drawn");
}

#[test]
fn long_names_are_not_clipped_to_a_layout_box() {
    let store = AssetStore::bundled().unwrap();
    let mut engine = TextLayoutEngine::new(store.font()).unwrap();
    let mut canvas = dark_canvas(120, 80);
    let name = "Bartholomew Montgomery-Featherstonehaugh";

    let placement =
        draw_centered_text(&mut canvas, &mut engine, name, &TextStyle::default(), 60).unwrap();
    assert!(placement.x < 0);
    assert!(placement.measured_width > 120.0);
}

#[test]
fn missing_glyph_is_render_error() {
    let store = AssetStore::bundled().unwrap();
    let mut engine = TextLayoutEngine::new(store.font()).unwrap();
    let mut canvas = dark_canvas(200, 100);
    let before = canvas.clone();

    let err = draw_centered_text(
        &mut canvas,
        &mut engine,
        "\u{E000}",
        &TextStyle::default(),
        50,
    )
    .unwrap_err();
    assert!(matches!(err, PosterError::Render(_)), "{err}");
    assert_eq!(canvas, before);
}
