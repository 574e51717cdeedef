use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Widget};

use crate::display::{ring_circumference, ring_offset, Projection, RING_RADIUS};

/// Sample points around the full ring.
const RING_SAMPLES: usize = 240;

/// Progress ring with the remaining time in its centre.
///
/// The lit arc is the part of the ring not hidden by the stroke offset, i.e.
/// the elapsed share, drawn clockwise from twelve o'clock.
pub struct CountdownWidget<'a> {
    projection: &'a Projection,
    running: bool,
}

impl<'a> CountdownWidget<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        Self {
            projection,
            running: false,
        }
    }

    pub fn running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }
}

fn ring_point(i: usize) -> (f64, f64) {
    let angle = FRAC_PI_2 - TAU * i as f64 / RING_SAMPLES as f64;
    (RING_RADIUS * angle.cos(), RING_RADIUS * angle.sin())
}

impl Widget for CountdownWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let circumference = ring_circumference(RING_RADIUS);
        let visible = circumference - ring_offset(self.projection.progress_fraction, RING_RADIUS);
        let lit = ((visible / circumference) * RING_SAMPLES as f64).round() as usize;

        let track: Vec<(f64, f64)> = (lit..RING_SAMPLES).map(ring_point).collect();
        let elapsed: Vec<(f64, f64)> = (0..lit.min(RING_SAMPLES)).map(ring_point).collect();

        let arc_color = if self.running { Color::Red } else { Color::Yellow };
        let label = self.projection.time_label();
        let half_width = label.len() as f64 * 4.0;

        let extent = RING_RADIUS + 10.0;
        Canvas::default()
            .block(Block::default().title(" Timer ").borders(Borders::ALL))
            .marker(Marker::Braille)
            .x_bounds([-extent, extent])
            .y_bounds([-extent, extent])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &track,
                    color: Color::DarkGray,
                });
                ctx.draw(&Points {
                    coords: &elapsed,
                    color: arc_color,
                });
                ctx.print(
                    -half_width,
                    0.0,
                    Line::from(Span::styled(
                        label.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                );
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_starts_at_twelve_and_runs_clockwise() {
        let (x, y) = ring_point(0);
        assert!(x.abs() < 1e-9);
        assert!((y - RING_RADIUS).abs() < 1e-9);

        // A quarter turn clockwise lands at three o'clock.
        let (x, y) = ring_point(RING_SAMPLES / 4);
        assert!((x - RING_RADIUS).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }
}
