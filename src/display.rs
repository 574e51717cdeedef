use std::f64::consts::PI;

use crate::timer::TimerSnapshot;

/// Ring radius of the reference layout. A rendering constant only; the
/// widget scales the ring to whatever area it gets.
pub const RING_RADIUS: f64 = 90.0;

/// Human-facing numbers derived from a timer snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub minutes_label: String,
    pub seconds_label: String,
    /// Elapsed share of the configured duration: 0.0 at start, 1.0 at zero.
    pub progress_fraction: f64,
}

impl Projection {
    /// "MM:SS"
    pub fn time_label(&self) -> String {
        format!("{}:{}", self.minutes_label, self.seconds_label)
    }
}

pub fn project(snapshot: &TimerSnapshot) -> Projection {
    let remaining = snapshot.remaining_secs;
    let progress_fraction = if snapshot.configured_secs == 0 {
        0.0
    } else {
        1.0 - remaining as f64 / snapshot.configured_secs as f64
    };

    Projection {
        minutes_label: format!("{:02}", remaining / 60),
        seconds_label: format!("{:02}", remaining % 60),
        progress_fraction,
    }
}

pub fn ring_circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Stroke offset of the progress ring: the full circumference at the start,
/// zero once the countdown is done.
pub fn ring_offset(progress_fraction: f64, radius: f64) -> f64 {
    (1.0 - progress_fraction) * ring_circumference(radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerStatus;

    fn snap(configured: u32, remaining: u32) -> TimerSnapshot {
        TimerSnapshot {
            status: TimerStatus::Running,
            configured_secs: configured,
            remaining_secs: remaining,
        }
    }

    #[test]
    fn labels_are_zero_padded() {
        let p = project(&snap(1500, 1500));
        assert_eq!(p.time_label(), "25:00");

        let p = project(&snap(600, 65));
        assert_eq!(p.minutes_label, "01");
        assert_eq!(p.seconds_label, "05");

        let p = project(&snap(3600, 3600));
        assert_eq!(p.time_label(), "60:00");
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        assert_eq!(project(&snap(60, 60)).progress_fraction, 0.0);
        assert!((project(&snap(60, 30)).progress_fraction - 0.5).abs() < 1e-9);
        assert_eq!(project(&snap(60, 0)).progress_fraction, 1.0);
    }

    #[test]
    fn ring_offset_matches_circumference_at_start() {
        let circ = ring_circumference(RING_RADIUS);
        assert!((circ - 565.486_677_6).abs() < 1e-6);
        assert!((ring_offset(0.0, RING_RADIUS) - circ).abs() < 1e-9);
        assert_eq!(ring_offset(1.0, RING_RADIUS), 0.0);
        assert!((ring_offset(0.25, RING_RADIUS) - circ * 0.75).abs() < 1e-9);
    }
}
