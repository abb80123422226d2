//! Smooth scrolling for the article feed
//!
//! - `easing` - pure easing curves
//! - `animation` - scroll position controller built on them

pub mod animation;
pub mod easing;

pub use animation::ScrollAnimator;
pub use easing::{EasingType, EasingTypeExt};
