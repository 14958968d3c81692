/// Side length of the square the avatar is resized to.
pub const AVATAR_SIDE_PX: u32 = 150;

/// Gap between the avatar's bottom edge and the name's baseline.
pub const TEXT_MARGIN_PX: i32 = 30;

/// Fixed poster layout derived from the canvas size.
///
/// All divisions are signed and truncate toward zero, so a canvas narrower or shorter than the
/// avatar produces negative offsets rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PosterGeometry {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Avatar square side.
    pub avatar_side: u32,
    /// Avatar top-left x.
    pub avatar_x: i32,
    /// Avatar top-left y.
    pub avatar_y: i32,
}

impl PosterGeometry {
    /// Geometry for a canvas of `width x height`.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let side = AVATAR_SIDE_PX as i32;
        Self {
            canvas_width: width,
            canvas_height: height,
            avatar_side: AVATAR_SIDE_PX,
            avatar_x: (width as i32 - side) / 2,
            avatar_y: height as i32 / 3 - side / 2,
        }
    }

    /// Baseline y for the name: avatar bottom plus the fixed margin.
    pub fn text_baseline_y(&self) -> i32 {
        self.avatar_y + self.avatar_side as i32 + TEXT_MARGIN_PX
    }
}

/// Left x that centers a run of `measured_px` width; the width is rounded up first.
pub fn centered_origin_x(canvas_width: u32, measured_px: f32) -> i32 {
    let measured = measured_px.max(0.0).ceil() as i32;
    (canvas_width as i32 - measured) / 2
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
