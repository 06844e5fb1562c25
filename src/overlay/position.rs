//! Positioning engine.
//!
//! Turns a trigger rectangle and a placement into an anchor point, and
//! resolves the layout of every surface kind. Everything here is a pure
//! function of its inputs. Surfaces are not clamped to the viewport, so a
//! surface anchored near a screen edge may overflow it.

use serde::{Deserialize, Serialize};

use crate::domain::{Align, Placement, Point, Rect, Side, Size, SurfaceSize, Viewport};

/// Default gap between a trigger and an anchored surface.
pub const DEFAULT_OFFSET: f32 = 8.0;

/// Computes the anchor point of a surface placed next to `trigger`.
pub fn compute(trigger: Rect, placement: Placement, offset: f32) -> Point {
    let y = match placement.side {
        Side::Top => trigger.top - offset,
        Side::Bottom => trigger.bottom + offset,
        Side::Left | Side::Right => trigger.top + trigger.height / 2.0,
    };

    let x = match placement.side {
        Side::Top | Side::Bottom => match placement.align {
            Align::Start => trigger.left,
            Align::Center => trigger.left + trigger.width / 2.0,
            Align::End => trigger.right,
        },
        Side::Left => trigger.left - offset,
        Side::Right => trigger.right + offset,
    };

    Point::new(x, y)
}

/// Fractional translation hosts apply to an anchor point.
///
/// Top and bottom surfaces are shifted half their width to the left,
/// left and right surfaces half their height up.
pub fn anchor_transform(side: Side) -> (f32, f32) {
    if side.is_vertical() {
        (-0.5, 0.0)
    } else {
        (0.0, -0.5)
    }
}

/// Applies [`anchor_transform`] to get the surface's top-left corner.
pub fn origin_for(anchor: Point, side: Side, size: Size) -> Point {
    let (tx, ty) = anchor_transform(side);
    Point::new(anchor.x + tx * size.width, anchor.y + ty * size.height)
}

/// Which edge preset table a surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Sheet,
    Drawer,
}

/// How a surface is laid out, fixed per surface kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Next to the trigger.
    Anchored { placement: Placement, offset: f32 },
    /// Centered in the viewport.
    Centered { max_width: f32 },
    /// Attached to one viewport edge.
    Edge {
        side: Side,
        size: SurfaceSize,
        kind: EdgeKind,
    },
    /// Horizontally centered, a fixed distance from the top.
    TopInset { inset: f32, max_width: f32 },
}

/// Result of resolving a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurfaceLayout {
    Anchored { anchor: Point, side: Side },
    Centered { center: Point, max_width: f32 },
    Edge { side: Side, extent: f32 },
    TopInset { anchor: Point, max_width: f32 },
}

impl Geometry {
    /// Resolves the layout for the current trigger rectangle and viewport.
    ///
    /// Anchored geometry needs a trigger rectangle and returns `None`
    /// without one.
    pub fn resolve(&self, trigger: Option<Rect>, viewport: Viewport) -> Option<SurfaceLayout> {
        match *self {
            Geometry::Anchored { placement, offset } => {
                let rect = trigger?;
                Some(SurfaceLayout::Anchored {
                    anchor: compute(rect, placement, offset),
                    side: placement.side,
                })
            }
            Geometry::Centered { max_width } => Some(SurfaceLayout::Centered {
                center: Point::new(viewport.width / 2.0, viewport.height / 2.0),
                max_width,
            }),
            Geometry::Edge { side, size, kind } => Some(SurfaceLayout::Edge {
                side,
                extent: edge_extent(kind, side, size, viewport),
            }),
            Geometry::TopInset { inset, max_width } => Some(SurfaceLayout::TopInset {
                anchor: Point::new(viewport.width / 2.0, inset),
                max_width,
            }),
        }
    }

    /// Whether the layout depends on the trigger rectangle.
    pub fn needs_trigger(&self) -> bool {
        matches!(self, Geometry::Anchored { .. })
    }
}

/// Width (left/right) or height (top/bottom) of an edge-attached surface.
pub fn edge_extent(kind: EdgeKind, side: Side, size: SurfaceSize, viewport: Viewport) -> f32 {
    let full = if side.is_vertical() {
        viewport.height
    } else {
        viewport.width
    };
    match (kind, side.is_vertical(), size) {
        (_, _, SurfaceSize::Full) => full,
        (EdgeKind::Sheet, false, SurfaceSize::Sm) => 320.0,
        (EdgeKind::Sheet, false, SurfaceSize::Md) => 384.0,
        (EdgeKind::Sheet, false, SurfaceSize::Lg) => 576.0,
        (EdgeKind::Sheet, true, SurfaceSize::Sm) => 192.0,
        (EdgeKind::Sheet, true, SurfaceSize::Md) => 256.0,
        (EdgeKind::Sheet, true, SurfaceSize::Lg) => 384.0,
        (EdgeKind::Drawer, _, SurfaceSize::Sm) => 192.0,
        (EdgeKind::Drawer, _, SurfaceSize::Md) => 320.0,
        (EdgeKind::Drawer, _, SurfaceSize::Lg) => 512.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger() -> Rect {
        Rect::new(100.0, 200.0, 80.0, 40.0)
    }

    #[test]
    fn top_and_bottom_offsets() {
        let top = compute(trigger(), Placement::new(Side::Top, Align::Center), 8.0);
        assert_eq!(top, Point::new(140.0, 192.0));

        let bottom = compute(trigger(), Placement::new(Side::Bottom, Align::Center), 8.0);
        assert_eq!(bottom, Point::new(140.0, 248.0));
    }

    #[test]
    fn alignment_on_vertical_sides() {
        let start = compute(trigger(), Placement::new(Side::Bottom, Align::Start), 4.0);
        let end = compute(trigger(), Placement::new(Side::Bottom, Align::End), 4.0);

        assert_eq!(start.x, 100.0);
        assert_eq!(end.x, 180.0);
    }

    #[test]
    fn horizontal_sides_center_vertically() {
        let left = compute(trigger(), Placement::new(Side::Left, Align::End), 8.0);
        let right = compute(trigger(), Placement::new(Side::Right, Align::Start), 8.0);

        // Alignment is ignored on horizontal sides.
        assert_eq!(left, Point::new(92.0, 220.0));
        assert_eq!(right, Point::new(188.0, 220.0));
    }

    #[test]
    fn compute_is_deterministic() {
        let placement = Placement::new(Side::Right, Align::Center);
        let a = compute(trigger(), placement, 12.0);
        let b = compute(trigger(), placement, 12.0);
        assert_eq!(a, b);
    }

    #[test]
    fn origin_applies_centering() {
        let anchor = Point::new(140.0, 192.0);
        let origin = origin_for(anchor, Side::Top, Size::new(100.0, 30.0));
        assert_eq!(origin, Point::new(90.0, 192.0));

        let origin = origin_for(anchor, Side::Right, Size::new(100.0, 30.0));
        assert_eq!(origin, Point::new(140.0, 177.0));
    }

    #[test]
    fn anchored_geometry_needs_a_trigger() {
        let geometry = Geometry::Anchored {
            placement: Placement::default(),
            offset: DEFAULT_OFFSET,
        };
        assert!(geometry.needs_trigger());
        assert_eq!(geometry.resolve(None, Viewport::default()), None);
    }

    #[test]
    fn edge_extents_follow_presets() {
        let viewport = Viewport::new(1000.0, 700.0);

        assert_eq!(edge_extent(EdgeKind::Sheet, Side::Right, SurfaceSize::Md, viewport), 384.0);
        assert_eq!(edge_extent(EdgeKind::Sheet, Side::Top, SurfaceSize::Lg, viewport), 384.0);
        assert_eq!(edge_extent(EdgeKind::Drawer, Side::Bottom, SurfaceSize::Md, viewport), 320.0);
        assert_eq!(edge_extent(EdgeKind::Sheet, Side::Left, SurfaceSize::Full, viewport), 1000.0);
        assert_eq!(edge_extent(EdgeKind::Drawer, Side::Bottom, SurfaceSize::Full, viewport), 700.0);
    }

    #[test]
    fn centered_and_inset_layouts() {
        let viewport = Viewport::new(1000.0, 600.0);

        let centered = Geometry::Centered { max_width: 512.0 }.resolve(None, viewport);
        assert_eq!(
            centered,
            Some(SurfaceLayout::Centered {
                center: Point::new(500.0, 300.0),
                max_width: 512.0
            })
        );

        let inset = Geometry::TopInset {
            inset: 80.0,
            max_width: 448.0,
        }
        .resolve(None, viewport);
        assert_eq!(
            inset,
            Some(SurfaceLayout::TopInset {
                anchor: Point::new(500.0, 80.0),
                max_width: 448.0
            })
        );
    }
}
