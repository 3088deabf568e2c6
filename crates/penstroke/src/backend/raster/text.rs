//! Glyph rendering with cosmic-text.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache};
use log::info;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

use penstroke_core::geometry::Point;

/// Shared font database and glyph cache.
///
/// Loading system fonts is slow, so one instance serves every canvas.
struct GlyphRenderer {
    font_system: FontSystem,
    cache: SwashCache,
}

static GLYPH_RENDERER: OnceLock<Mutex<GlyphRenderer>> = OnceLock::new();

fn renderer() -> &'static Mutex<GlyphRenderer> {
    GLYPH_RENDERER.get_or_init(|| {
        info!("Initializing FontSystem");
        Mutex::new(GlyphRenderer {
            font_system: FontSystem::new(),
            cache: SwashCache::new(),
        })
    })
}

/// Draws `content` with its baseline starting at `position`.
///
/// Returns `false` when no glyph pixel was produced, which happens when no
/// usable font is installed.
pub fn draw_text(
    pixmap: &mut Pixmap,
    position: Point,
    content: &str,
    font_size: f32,
    color: [u8; 4],
) -> bool {
    if content.is_empty() || color[3] == 0 {
        return false;
    }

    let mut renderer = renderer().lock().expect("failed to lock glyph renderer");
    let GlyphRenderer { font_system, cache } = &mut *renderer;

    let metrics = Metrics::new(font_size, font_size * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);
    let mut buffer = buffer.borrow_with(font_system);
    buffer.set_size(None, None);
    buffer.set_text(
        content,
        &Attrs::new().family(Family::SansSerif),
        Shaping::Advanced,
        None,
    );
    buffer.shape_until_scroll(true);

    let ascent = buffer
        .layout_runs()
        .next()
        .map_or(font_size * 0.8, |run| run.line_y);
    let left = position.x().round() as i32;
    let top = (position.y() - ascent).round() as i32;

    let [r, g, b, a] = color;
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    let mut paint = Paint {
        anti_alias: false,
        ..Paint::default()
    };
    let mut drawn = false;
    buffer.draw(
        cache,
        cosmic_text::Color::rgba(r, g, b, a),
        |x, y, w, h, glyph_color| {
            let (px, py) = (left + x, top + y);
            let visible = glyph_color.a() > 0
                && px < width
                && py < height
                && px + w as i32 > 0
                && py + h as i32 > 0;
            if !visible {
                return;
            }
            let Some(rect) = Rect::from_xywh(px as f32, py as f32, w as f32, h as f32) else {
                return;
            };
            paint.set_color_rgba8(
                glyph_color.r(),
                glyph_color.g(),
                glyph_color.b(),
                glyph_color.a(),
            );
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            drawn = true;
        },
    );
    drawn
}
