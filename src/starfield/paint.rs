//! egui painting for the starfield.

use egui::{Color32, Pos2, Stroke};

use super::Starfield;

fn color32(rgb: [u8; 3], alpha: f32) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2]).gamma_multiply(alpha.clamp(0.0, 1.0))
}

/// Draw the field into `painter`, offset by the top-left of `rect`.
///
/// Stars are soft-glow circles with time-oscillating opacity; shooting
/// stars are fading line segments trailing opposite to their velocity.
pub fn paint(field: &Starfield, painter: &egui::Painter, rect: egui::Rect, now: f64) {
    let origin = rect.min;

    for star in field.stars() {
        let alpha = star.alpha(now);
        let pos = Pos2::new(origin.x + star.x, origin.y + star.arc_y());
        // Glow halo under the core.
        painter.circle_filled(pos, star.radius * 2.5, color32(star.color, alpha * 0.25));
        painter.circle_filled(pos, star.radius, color32(star.color, alpha));
    }

    for s in field.shooting_stars() {
        let head = Pos2::new(origin.x + s.x, origin.y + s.y);
        let (tx, ty) = s.tail();
        let tail = Pos2::new(origin.x + tx, origin.y + ty);
        painter.line_segment([head, tail], Stroke::new(s.radius, color32(s.color, s.alpha())));
    }
}
