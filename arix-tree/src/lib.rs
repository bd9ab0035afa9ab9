//! This crate provides everything about the decorated tree that doesn't need a renderer: where the
//! decorations go, what the tree is made of, how it moves over time, and how the scene around it
//! is lit and framed.

pub mod animation;
pub mod mesh;
pub mod placement;
pub mod scene;
pub mod tree;

pub use self::{
    placement::{Instance, Sparkle},
    scene::SceneLayout,
    tree::DecoratedTree,
};

/// Linearly interpolate between `a` and `b` by `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a).mul_add(t, a)
}
