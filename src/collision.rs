//! Sprite overlap test

use crate::sprite::Sprite;

/// True when two visible sprites' bounding boxes share interior area.
///
/// Boxes that only touch along an edge do not overlap.
pub fn overlaps(a: &Sprite, b: &Sprite) -> bool {
    if !a.visible || !b.visible {
        return false;
    }
    let (a, b) = (a.bounding_box(), b.bounding_box());
    !(a.left >= b.right || a.right <= b.left || a.top >= b.bottom || a.bottom <= b.top)
}
