//! Pixel-exact collision between positioned sprites
//!
//! There is no bounding-box hit test: two entities touch only when their
//! masks share an opaque pixel at the offset between their snapped origins.

use glam::Vec2;

use crate::assets::Sprite;
use crate::to_pixel;

/// Anything drawn at a screen position with a masked sprite
pub trait Positioned {
    /// Top-left corner in screen space
    fn position(&self) -> Vec2;
    fn sprite(&self) -> &Sprite;
}

/// True when the opaque pixels of `a` and `b` overlap. Symmetric.
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Positioned + ?Sized,
    B: Positioned + ?Sized,
{
    let (ax, ay) = to_pixel(a.position());
    let (bx, by) = to_pixel(b.position());
    a.sprite()
        .mask()
        .overlaps(b.sprite().mask(), (bx - ax, by - ay))
}
