use crate::{
    config::{OverflowStrategy, PlacementConfig, ReferenceFrame},
    geometry::Rect,
};

/// Measurements taken from the host for one positioning pass.
///
/// [`place`] is pure: the controller measures this from the host and renders the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub trigger: Rect,
    pub surface: Rect,
    /// The body for [`ReferenceFrame::Document`], the trigger's parent for [`ReferenceFrame::Parent`].
    pub container: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Adjustment {
    #[default]
    None,
    /// The popup was aligned to the trigger's right edge instead of its left.
    RightJustified,
    /// The popup was moved left by this many pixels to stay inside the container.
    Shifted(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top: f32,
    pub left: f32,
    pub adjustment: Adjustment,
}

impl Placement {
    pub fn arrow_adjustment(&self) -> Option<f32> {
        match self.adjustment {
            Adjustment::Shifted(distance) => Some(distance),
            Adjustment::None | Adjustment::RightJustified => None,
        }
    }
}

pub fn place(geometry: &Geometry, config: &PlacementConfig) -> Placement {
    let Geometry {
        trigger,
        surface,
        container,
    } = geometry;

    let (origin_left, origin_top) = match config.frame {
        ReferenceFrame::Document => (0.0, 0.0),
        ReferenceFrame::Parent => (container.left, container.top),
    };

    let top = trigger.bottom() - origin_top + config.gap;
    let left = trigger.left - origin_left;

    // Measured against the container's width, not its right edge.
    let overflow = trigger.left + surface.width - container.width;
    if overflow <= 0.0 {
        return Placement {
            top,
            left,
            adjustment: Adjustment::None,
        };
    }

    match config.strategy {
        OverflowStrategy::ClampOrFlip => {
            let flipped = trigger.right() - surface.width - origin_left;
            if flipped > 0.0 {
                Placement {
                    top,
                    left: flipped,
                    adjustment: Adjustment::RightJustified,
                }
            } else {
                Placement {
                    top,
                    left,
                    adjustment: Adjustment::None,
                }
            }
        }
        OverflowStrategy::ShiftAndMark => {
            let shift = if config.clamp_left {
                overflow.min(left.max(0.0))
            } else {
                overflow
            };

            Placement {
                top,
                left: left - shift,
                adjustment: if shift > 0.0 {
                    Adjustment::Shifted(shift)
                } else {
                    Adjustment::None
                },
            }
        }
    }
}
