//! Scroll position controller with eased transitions between targets

use std::time::{Duration, Instant};

use wikiscroll_core::ScrollConfig;

use super::easing::EasingTypeExt;

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u32,
    to: u32,
    duration: Duration,
}

/// Feed scroll position, in rows
///
/// Line scrolls move immediately; panel jumps animate when smooth scrolling
/// is enabled. Call `update()` once per frame to advance the animation.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current: u32,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0,
        }
    }

    fn is_smooth(&self) -> bool {
        self.config.smooth_enabled && self.config.animation_duration_ms > 0
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Position the viewport is heading to
    pub fn target(&self) -> u32 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    /// Position currently drawn
    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Rows moved per line scroll
    pub fn scroll_lines(&self) -> u32 {
        self.config.scroll_lines.max(1)
    }

    /// Move immediately, dropping any animation
    pub fn jump_to(&mut self, target: u32, max_scroll: u32) {
        self.animation = None;
        self.current = target.min(max_scroll);
    }

    /// Move by a signed number of rows immediately
    pub fn scroll_by(&mut self, delta: i64, max_scroll: u32) {
        let base = i64::from(self.target());
        let target = (base + delta).clamp(0, i64::from(max_scroll)) as u32;
        self.jump_to(target, max_scroll);
    }

    /// Animate towards `target`; chained calls retarget from the current position
    pub fn animate_to(&mut self, target: u32, max_scroll: u32) {
        let target = target.min(max_scroll);
        if !self.is_smooth() || target == self.current {
            self.jump_to(target, max_scroll);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: Instant::now(),
            from: self.current,
            to: target,
            duration: Duration::from_millis(self.config.animation_duration_ms),
        });
    }

    /// Advance the animation and return the position to draw
    pub fn update(&mut self, max_scroll: u32) -> u32 {
        if let Some(anim) = &self.animation {
            let elapsed = anim.start.elapsed();
            if elapsed >= anim.duration {
                self.current = anim.to;
                self.animation = None;
            } else {
                let t = elapsed.as_secs_f64() / anim.duration.as_secs_f64();
                let eased = self.config.easing.apply(t);
                let from = f64::from(anim.from);
                let to = f64::from(anim.to);
                self.current = (from + (to - from) * eased).round() as u32;
            }
        }

        self.current = self.current.min(max_scroll);
        self.current
    }
}
