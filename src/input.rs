/// Map a pointer position in canvas pixels to a `(col, row)` grid index.
///
/// The pointer source reports positions with a one-pixel origin, so pixel
/// (1, 1) is the top-left cell. The result may lie outside the grid;
/// callers bounds-check.
pub fn screen_to_grid(px: f64, py: f64, scale: usize) -> (i64, i64) {
    let s = scale as f64;
    let col = ((px - 1.0) / s).floor() as i64;
    let row = ((py - 1.0) / s).floor() as i64;
    (col, row)
}

/// Last observed pointer state, sampled by the injection cadence.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PointerTracker {
    position: Option<(f64, f64)>,
    pressed: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, x: f64, y: f64) {
        self.position = Some((x, y));
    }

    pub fn button_down(&mut self) {
        self.pressed = true;
    }

    pub fn button_up(&mut self) {
        self.pressed = false;
    }

    /// Pointer left the canvas: forget the position and release the button.
    pub fn left_area(&mut self) {
        self.position = None;
        self.pressed = false;
    }

    /// Feed one polled sample (position is `None` outside the canvas).
    pub fn sample(&mut self, position: Option<(f64, f64)>, down: bool) {
        match position {
            None => self.left_area(),
            Some((x, y)) => {
                self.moved(x, y);
                if down {
                    self.button_down();
                } else {
                    self.button_up();
                }
            }
        }
    }

    /// Where heat should go right now, if anywhere.
    pub fn injection_point(&self) -> Option<(f64, f64)> {
        if self.pressed { self.position } else { None }
    }
}
