//! Painter-based renderer: mosaic background, vines, particles, creatures
//! and the pre-audio prompt, drawn back-to-front each frame. Pure output —
//! nothing here mutates scene state.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};
use glam::Vec2;

use crate::scene::creature::Creature;
use crate::scene::Scene;
use crate::video::VideoFrame;

/// Mosaic cells darker than this are left empty.
const MOSAIC_MIN_BRIGHTNESS: f32 = 40.0;

/// Scene colors; the whole palette flips while a fist is held.
pub struct Palette {
    pub background: Color32,
    pub mosaic: Color32,
    pub vine: Color32,
    pub flow: Color32,
    pub core: Color32,
}

impl Palette {
    pub fn new(invert: bool) -> Self {
        let base = Self {
            background: Color32::BLACK,
            mosaic: Color32::WHITE,
            vine: Color32::from_rgb(80, 80, 80),
            flow: Color32::from_rgb(100, 100, 100),
            core: Color32::WHITE,
        };
        if invert { base.inverted() } else { base }
    }

    fn inverted(self) -> Self {
        Self {
            background: invert_color(self.background),
            mosaic: invert_color(self.mosaic),
            vine: invert_color(self.vine),
            flow: invert_color(self.flow),
            core: invert_color(self.core),
        }
    }
}

fn invert_color(c: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(255 - c.r(), 255 - c.g(), 255 - c.b(), c.a())
}

fn with_alpha(c: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), alpha.clamp(0.0, 255.0) as u8)
}

fn to_pos2(rect: Rect, p: Vec2) -> Pos2 {
    Pos2::new(rect.min.x + p.x, rect.min.y + p.y)
}

pub fn draw(
    painter: &Painter,
    rect: Rect,
    scene: &Scene,
    video: Option<&VideoFrame>,
    invert: bool,
    audio_started: bool,
    mosaic_cell: f32,
) {
    let palette = Palette::new(invert);
    painter.rect_filled(rect, egui::CornerRadius::same(0), palette.background);

    if let Some(frame) = video {
        if frame.is_ready() {
            draw_mosaic(painter, rect, frame, &palette, mosaic_cell);
        }
    }

    for vine in &scene.vines {
        draw_vine(painter, rect, &palette, vine);
    }

    for p in &scene.particles {
        painter.line_segment(
            [to_pos2(rect, p.prev_pos), to_pos2(rect, p.pos)],
            Stroke::new(2.0, palette.flow),
        );
    }

    for creature in &scene.creatures {
        draw_creature(painter, rect, &palette, creature, scene.frame, invert);
    }

    if !audio_started {
        let alpha = 150.0 + (scene.frame as f32 * 0.1).sin() * 100.0;
        painter.text(
            Pos2::new(rect.center().x, rect.max.y - 20.0),
            Align2::CENTER_CENTER,
            ">>> click to start the generative piano <<<",
            FontId::proportional(12.0),
            with_alpha(palette.mosaic, alpha),
        );
    }
}

/// Coarse circular sampling of the video frame: cover-fit, mirrored
/// horizontally, one dot per cell for cells bright enough to show.
fn draw_mosaic(painter: &Painter, rect: Rect, frame: &VideoFrame, palette: &Palette, cell: f32) {
    let cell = cell.max(2.0);
    let (cw, ch) = (rect.width(), rect.height());
    let (vw, vh) = (frame.width as f32, frame.height as f32);

    // Source window covering the canvas aspect inside the video frame.
    let aspect_canvas = cw / ch;
    let aspect_video = vw / vh;
    let (sx, sy, sw, sh) = if aspect_canvas > aspect_video {
        let sw = vw;
        let sh = vw / aspect_canvas;
        (0.0, (vh - sh) / 2.0, sw, sh)
    } else {
        let sh = vh;
        let sw = vh * aspect_canvas;
        ((vw - sw) / 2.0, 0.0, sw, sh)
    };

    let radius = cell * 0.45;
    let mut y = 0.0;
    while y < ch {
        let vy = (sy + sh * (y / ch)).clamp(0.0, vh - 1.0) as usize;
        let mut x = 0.0;
        while x < cw {
            // Mirror horizontally so the mosaic behaves like a reflection.
            let vx = (sx + sw * (1.0 - x / cw)).clamp(0.0, vw - 1.0) as usize;
            let brightness = frame.brightness_at(vx, vy);
            if brightness > MOSAIC_MIN_BRIGHTNESS {
                let alpha = 5.0
                    + (brightness - MOSAIC_MIN_BRIGHTNESS) / (255.0 - MOSAIC_MIN_BRIGHTNESS)
                        * 55.0;
                painter.circle_filled(
                    Pos2::new(rect.min.x + x, rect.min.y + y),
                    radius,
                    with_alpha(palette.mosaic, alpha),
                );
            }
            x += cell;
        }
        y += cell;
    }
}

fn draw_vine(painter: &Painter, rect: Rect, palette: &Palette, vine: &crate::scene::vines::EdgeVine) {
    if vine.history.len() < 2 {
        return;
    }
    let points: Vec<Pos2> = vine.history.iter().map(|&p| to_pos2(rect, p)).collect();
    let color = with_alpha(palette.vine, vine.life * 0.5);
    painter.add(Shape::line(points, Stroke::new(1.0, color)));
}

fn draw_creature(
    painter: &Painter,
    rect: Rect,
    palette: &Palette,
    creature: &Creature,
    frame: u64,
    invert: bool,
) {
    // Tentacles disappear entirely while the scene is inverted.
    if !invert {
        for tentacle in &creature.tentacles {
            let points = tentacle.points();
            let n = points.len();
            for i in 0..n - 1 {
                let t = i as f32 / (n - 1) as f32;
                let width = 3.0 + (0.5 - 3.0) * t;
                let alpha = 120.0 * (1.0 - t);
                painter.line_segment(
                    [to_pos2(rect, points[i]), to_pos2(rect, points[i + 1])],
                    Stroke::new(width, with_alpha(palette.core, alpha)),
                );
            }
        }
    }

    let center = to_pos2(rect, creature.pos);

    // Soft halo standing in for an additive glow.
    painter.circle_filled(center, 40.0, with_alpha(palette.core, 12.0));
    painter.circle_filled(center, 24.0, with_alpha(palette.core, 20.0));

    let ring_stroke = Stroke::new(1.5, palette.core);
    let a = creature.ring_angle;
    draw_ellipse(painter, center, 30.0, 12.5, a, ring_stroke);
    draw_ellipse(
        painter,
        center,
        30.0,
        12.5,
        a * 0.8 + std::f32::consts::FRAC_PI_3,
        ring_stroke,
    );
    draw_ellipse(
        painter,
        center,
        30.0,
        12.5,
        -a * 1.2 - std::f32::consts::FRAC_PI_3,
        ring_stroke,
    );

    let dot_alpha = if invert {
        255.0
    } else {
        200.0 + (frame as f32 * 0.1).sin() * 55.0
    };
    painter.circle_filled(center, 7.5, with_alpha(palette.core, dot_alpha));
}

/// Rotated ellipse outline, sampled as a closed polyline.
fn draw_ellipse(painter: &Painter, center: Pos2, rx: f32, ry: f32, rotation: f32, stroke: Stroke) {
    const STEPS: usize = 36;
    let (sin_r, cos_r) = rotation.sin_cos();
    let points: Vec<Pos2> = (0..STEPS)
        .map(|i| {
            let a = i as f32 / STEPS as f32 * std::f32::consts::TAU;
            let x = a.cos() * rx;
            let y = a.sin() * ry;
            Pos2::new(
                center.x + x * cos_r - y * sin_r,
                center.y + x * sin_r + y * cos_r,
            )
        })
        .collect();
    painter.add(Shape::closed_line(points, stroke));
}
