//! History panel scroll coordination.
//!
//! The history list is aligned so the active row sits at the bottom of the
//! panel, next to a fixed arrow. Programmatic scrolls animate with a quintic
//! in-out curve and hold a lock long enough that the user-scroll debounce
//! cannot mistake them for user input. Geometry is supplied by the renderer;
//! this module only does the arithmetic and timing.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::timer::{CancellableTimer, Debouncer};

/// Quiet period before a user scroll selects the row under the arrow.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(80);
/// Extra lock time after a programmatic scroll ends.
pub const UNLOCK_DELAY: Duration = Duration::from_millis(170);
/// Quiet period before a resize re-aligns the panel.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

const MIN_DURATION_MS: f64 = 280.0;
const MAX_DURATION_MS: f64 = 720.0;

/// Quintic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out_quint(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        16.0 * t.powi(5)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
    }
}

/// Animation length for a scroll of `distance` pixels.
pub fn scroll_duration(distance: f64) -> Duration {
    let millis = (260.0 + distance.abs() * 0.55).clamp(MIN_DURATION_MS, MAX_DURATION_MS);
    Duration::from_micros((millis * 1000.0).round() as u64)
}

/// Vertical placement of one rendered history row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub offset_top: f64,
    pub height: f64,
}

impl RowGeometry {
    pub fn bottom(&self) -> f64 {
        self.offset_top + self.height
    }
}

/// Scroll state of the history panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl Viewport {
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Y coordinate of the arrow line (panel bottom) in content space.
    pub fn arrow_line(&self) -> f64 {
        self.scroll_top + self.client_height
    }
}

/// Index of the row whose bottom edge is closest to the arrow line. Ties go
/// to the earlier row.
pub fn row_at_arrow(rows: &[RowGeometry], viewport: &Viewport) -> Option<usize> {
    let arrow = viewport.arrow_line();
    let mut closest: Option<(usize, f64)> = None;
    for (index, row) in rows.iter().enumerate() {
        let distance = (row.bottom() - arrow).abs();
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((index, distance));
        }
    }
    closest.map(|(index, _)| index)
}

/// Scroll offset that puts `row` at the bottom of the panel.
pub fn target_scroll_top(row: &RowGeometry, viewport: &Viewport) -> f64 {
    (row.bottom() - viewport.client_height).clamp(0.0, viewport.max_scroll_top())
}

/// One in-flight smooth scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    distance: f64,
    started_at: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, started_at: Instant) -> Self {
        let distance = to - from;
        Self {
            from,
            distance,
            started_at,
            duration: scroll_duration(distance),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn target(&self) -> f64 {
        self.from + self.distance
    }

    /// Position at `now` and whether the animation has finished.
    pub fn sample(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        (self.from + self.distance * ease_in_out_quint(t), t >= 1.0)
    }
}

/// What a [`HistoryScroller::poll`] call asks the owner to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollTick {
    /// A user scroll settled; select the row under the arrow.
    pub settle_user_scroll: bool,
    /// A resize settled; re-align without animation.
    pub realign: bool,
}

/// Owns the animation, the programmatic-scroll lock and both debouncers.
#[derive(Debug)]
pub struct HistoryScroller {
    animation: Option<ScrollAnimation>,
    locked: bool,
    unlock: CancellableTimer,
    user_scroll: Debouncer,
    resize: Debouncer,
}

impl Default for HistoryScroller {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryScroller {
    pub fn new() -> Self {
        Self {
            animation: None,
            locked: false,
            unlock: CancellableTimer::new(UNLOCK_DELAY + SCROLL_DEBOUNCE),
            user_scroll: Debouncer::new(SCROLL_DEBOUNCE),
            resize: Debouncer::new(RESIZE_DEBOUNCE),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start scrolling from `current` to `target`. Returns the offset to
    /// apply right away: the target for jumps, `current` when animating.
    pub fn scroll_to(&mut self, now: Instant, current: f64, target: f64, animated: bool) -> f64 {
        if !animated || (target - current).abs() < 1.0 {
            self.animation = None;
            self.lock(now, Duration::ZERO);
            return target;
        }
        let animation = ScrollAnimation::new(current, target, now);
        self.lock(now, animation.duration());
        trace!(from = current, to = target, duration_ms = animation.duration().as_millis() as u64, "Animating history scroll");
        self.animation = Some(animation);
        current
    }

    /// Advance the animation. `None` when nothing is animating.
    pub fn frame(&mut self, now: Instant) -> Option<f64> {
        let animation = self.animation?;
        let (position, finished) = animation.sample(now);
        if finished {
            self.animation = None;
        }
        Some(position)
    }

    /// Record a scroll event from the user. Ignored while locked.
    pub fn on_user_scroll(&mut self, now: Instant) {
        if self.locked {
            return;
        }
        self.user_scroll.trigger(now);
    }

    pub fn on_resize(&mut self, now: Instant) {
        self.resize.trigger(now);
    }

    pub fn poll(&mut self, now: Instant) -> ScrollTick {
        if self.unlock.poll(now) {
            self.locked = false;
        }
        let settled = self.user_scroll.poll(now);
        ScrollTick {
            settle_user_scroll: settled && !self.locked,
            realign: self.resize.poll(now),
        }
    }

    /// Drop the animation, the lock and any pending debounce.
    pub fn cancel_all(&mut self) {
        self.animation = None;
        self.unlock.cancel();
        self.user_scroll.cancel();
        self.locked = false;
    }

    fn lock(&mut self, now: Instant, animation: Duration) {
        self.locked = true;
        self.user_scroll.cancel();
        self.unlock.start_with(now, animation + UNLOCK_DELAY + SCROLL_DEBOUNCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn rows(count: usize) -> Vec<RowGeometry> {
        (0..count)
            .map(|index| RowGeometry {
                offset_top: 100.0 + index as f64 * 20.0,
                height: 17.0,
            })
            .collect()
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quint(0.0), 0.0);
        assert_eq!(ease_in_out_quint(1.0), 1.0);
        assert!((ease_in_out_quint(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_in_out_quint(0.25) < 0.25);
        assert!(ease_in_out_quint(0.75) > 0.75);
    }

    #[test]
    fn duration_is_clamped() {
        assert_eq!(scroll_duration(0.0), MS * 280);
        assert_eq!(scroll_duration(-100.0), MS * 315);
        assert_eq!(scroll_duration(5000.0), MS * 720);
    }

    #[test]
    fn arrow_selects_nearest_row_bottom() {
        let rows = rows(5);
        let viewport = Viewport {
            scroll_top: 0.0,
            client_height: 160.0,
            scroll_height: 200.0,
        };
        // bottoms: 117, 137, 157, 177, 197; arrow at 160
        assert_eq!(row_at_arrow(&rows, &viewport), Some(2));
        assert_eq!(row_at_arrow(&[], &viewport), None);
    }

    #[test]
    fn target_offset_is_clamped_to_scroll_range() {
        let viewport = Viewport {
            scroll_top: 0.0,
            client_height: 100.0,
            scroll_height: 150.0,
        };
        let near = RowGeometry { offset_top: 10.0, height: 17.0 };
        let far = RowGeometry { offset_top: 400.0, height: 17.0 };
        let middle = RowGeometry { offset_top: 120.0, height: 10.0 };
        assert_eq!(target_scroll_top(&near, &viewport), 0.0);
        assert_eq!(target_scroll_top(&far, &viewport), 50.0);
        assert_eq!(target_scroll_top(&middle, &viewport), 30.0);
    }

    #[test]
    fn animation_reaches_target_and_unlocks_later() {
        let start = Instant::now();
        let mut scroller = HistoryScroller::new();
        assert_eq!(scroller.scroll_to(start, 0.0, 200.0, true), 0.0);
        assert!(scroller.is_locked());

        // duration = 260 + 110 = 370ms
        let halfway = scroller.frame(start + MS * 185).unwrap();
        assert!((halfway - 100.0).abs() < 1.0);
        assert!(scroller.is_animating());
        assert_eq!(scroller.frame(start + MS * 370), Some(200.0));
        assert!(scroller.frame(start + MS * 380).is_none());

        scroller.poll(start + MS * 600);
        assert!(scroller.is_locked());
        scroller.poll(start + MS * 620);
        assert!(!scroller.is_locked());
    }

    #[test]
    fn newer_scroll_supersedes_animation() {
        let start = Instant::now();
        let mut scroller = HistoryScroller::new();
        scroller.scroll_to(start, 0.0, 400.0, true);
        assert_eq!(scroller.scroll_to(start + MS * 50, 30.0, 10.0, false), 10.0);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn user_scroll_is_ignored_while_locked() {
        let start = Instant::now();
        let mut scroller = HistoryScroller::new();
        scroller.scroll_to(start, 0.0, 0.0, false);
        scroller.on_user_scroll(start + MS * 10);
        assert!(!scroller.poll(start + MS * 200).settle_user_scroll);

        scroller.poll(start + MS * 250);
        assert!(!scroller.is_locked());
        scroller.on_user_scroll(start + MS * 300);
        assert!(!scroller.poll(start + MS * 370).settle_user_scroll);
        assert!(scroller.poll(start + MS * 380).settle_user_scroll);
    }

    #[test]
    fn resize_is_debounced() {
        let start = Instant::now();
        let mut scroller = HistoryScroller::new();
        scroller.on_resize(start);
        scroller.on_resize(start + MS * 100);
        assert!(!scroller.poll(start + MS * 200).realign);
        assert!(scroller.poll(start + MS * 250).realign);
    }

    #[test]
    fn cancel_all_clears_pending_work() {
        let start = Instant::now();
        let mut scroller = HistoryScroller::new();
        scroller.scroll_to(start, 0.0, 300.0, true);
        scroller.cancel_all();
        assert!(!scroller.is_locked());
        assert!(!scroller.is_animating());
        assert_eq!(scroller.poll(start + MS * 2000), ScrollTick::default());
    }
}
