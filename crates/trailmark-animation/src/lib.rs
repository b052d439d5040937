//! Time-based animation for Trailmark.
//!
//! Provides eased tweens and spring physics on top of the core frame
//! clock. The central type is [`Animatable`], a value holder whose rendered
//! value chases a target over subsequent frames; retargeting cancels the
//! in-flight animation instead of queueing another.

mod animation;

pub use animation::{
    Animatable, Easing, Lerp, Motion, SpringScalar, SpringSpec, TweenSpec,
};
