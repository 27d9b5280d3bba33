//! Overlay geometry
//!
//! Pure derivation of the overlay window's size, screen position and the
//! four arm rectangles from a `CrosshairConfig` and the primary screen's
//! dimensions. No I/O and no shared state; the overlay recomputes this on
//! every refresh instead of caching it across configuration changes.

use crate::config::CrosshairConfig;

/// One crosshair arm, in window-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmRect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Computed placement for the overlay window and its four arms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    /// Window side length in pixels, always even
    pub side: u16,
    /// Window top-left in screen coordinates
    pub x: i32,
    pub y: i32,
    /// Left, right, top, bottom arms
    pub arms: [ArmRect; 4],
}

/// Derive the overlay layout for the given screen.
///
/// The side is `2 * (arm_length + gap + arm_thickness)`, grown by one pixel
/// if odd so that center-based integer division is exact and the marker is
/// never clipped. Arms start exactly `gap` pixels from the window center on
/// their axis and are offset by `floor(thickness / 2)` on the cross axis;
/// with odd thickness this leaves the marker one pixel heavy toward the
/// top-left, which is accepted rather than patched per side.
pub fn layout(config: &CrosshairConfig, screen_width: u16, screen_height: u16) -> OverlayLayout {
    let mut side = 2 * (config.arm_length + config.gap + config.arm_thickness);
    if side % 2 == 1 {
        side += 1;
    }

    let center_x = i32::from(screen_width) / 2 + config.offset_x;
    let center_y = i32::from(screen_height) / 2 + config.offset_y;
    let half_side = i32::from(side) / 2;

    let center = (side / 2) as i16;
    let length = config.arm_length;
    let thickness = config.arm_thickness;
    let gap = config.gap as i16;
    let half_thickness = (thickness / 2) as i16;

    let left = ArmRect {
        x: center - gap - length as i16,
        y: center - half_thickness,
        width: length,
        height: thickness,
    };
    let right = ArmRect {
        x: center + gap,
        y: center - half_thickness,
        width: length,
        height: thickness,
    };
    let top = ArmRect {
        x: center - half_thickness,
        y: center - gap - length as i16,
        width: thickness,
        height: length,
    };
    let bottom = ArmRect {
        x: center - half_thickness,
        y: center + gap,
        width: thickness,
        height: length,
    };

    OverlayLayout {
        side,
        x: center_x - half_side,
        y: center_y - half_side,
        arms: [left, right, top, bottom],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ARM_LENGTH_RANGE, ARM_THICKNESS_RANGE, GAP_RANGE, CrosshairConfig};

    fn config(arm_length: u16, arm_thickness: u16, gap: u16) -> CrosshairConfig {
        CrosshairConfig {
            arm_length,
            arm_thickness,
            gap,
            ..CrosshairConfig::default()
        }
    }

    #[test]
    fn test_documented_scenario() {
        // arm_length=12, thickness=2, gap=4 -> side 36, left arm at x=2
        let layout = layout(&config(12, 2, 4), 1920, 1080);
        assert_eq!(layout.side, 36);
        let left = layout.arms[0];
        assert_eq!(left.x, 18 - 4 - 12);
        assert_eq!(left.width, 12);
        assert_eq!(left.height, 2);
    }

    #[test]
    fn test_minimal_marker() {
        // arm_length=1, thickness=1, gap=0 -> side 4
        let layout = layout(&config(1, 1, 0), 1920, 1080);
        assert_eq!(layout.side, 4);
    }

    #[test]
    fn test_odd_raw_side_grows_to_even() {
        for length in ARM_LENGTH_RANGE {
            for thickness in ARM_THICKNESS_RANGE.clone() {
                for gap in GAP_RANGE.clone() {
                    let layout = layout(&config(length, thickness, gap), 1920, 1080);
                    assert_eq!(layout.side % 2, 0);
                    assert!(layout.side >= 2 * (length + gap + thickness));
                }
            }
        }
    }

    #[test]
    fn test_arms_contained_in_window() {
        for length in ARM_LENGTH_RANGE {
            for thickness in ARM_THICKNESS_RANGE.clone() {
                for gap in GAP_RANGE.clone() {
                    let layout = layout(&config(length, thickness, gap), 1920, 1080);
                    for arm in layout.arms {
                        assert!(arm.x >= 0 && arm.y >= 0, "arm out of window: {arm:?}");
                        assert!(
                            arm.x as u16 + arm.width <= layout.side
                                && arm.y as u16 + arm.height <= layout.side,
                            "arm clipped: {arm:?} side={}",
                            layout.side
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_window_centered_on_screen() {
        let layout = layout(&config(12, 2, 4), 1920, 1080);
        assert_eq!(layout.x, 960 - 18);
        assert_eq!(layout.y, 540 - 18);
    }

    #[test]
    fn test_offset_translates_window() {
        let base = layout(&config(12, 2, 4), 1920, 1080);
        let moved = layout(
            &CrosshairConfig {
                offset_x: -5,
                offset_y: 40,
                ..config(12, 2, 4)
            },
            1920,
            1080,
        );
        assert_eq!(moved.x, base.x - 5);
        assert_eq!(moved.y, base.y + 40);
        assert_eq!(moved.arms, base.arms);
    }

    #[test]
    fn test_right_and_bottom_mirror_left_and_top() {
        let layout = layout(&config(10, 3, 5), 1920, 1080);
        let [left, right, top, bottom] = layout.arms;
        let center = i16::try_from(layout.side / 2).unwrap();
        // Both horizontal arms end/start the same distance from center
        assert_eq!(center - (left.x + left.width as i16), right.x - center);
        assert_eq!(center - (top.y + top.height as i16), bottom.y - center);
        assert_eq!(left.y, right.y);
        assert_eq!(top.x, bottom.x);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let config = config(7, 3, 11);
        assert_eq!(layout(&config, 2560, 1440), layout(&config, 2560, 1440));
    }
}
