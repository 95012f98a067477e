pub const DRAG_THRESHOLD_PX: f64 = 50.0;
pub const AUTO_ADVANCE_MS: u32 = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    Advance,
    Retreat,
    Stay,
}

/// Swiping left shows the next slide, swiping right the previous one.
pub fn resolve_drag(delta_x: f64, threshold: f64) -> DragOutcome {
    if !delta_x.is_finite() {
        return DragOutcome::Stay;
    }
    if delta_x < -threshold {
        DragOutcome::Advance
    } else if delta_x > threshold {
        DragOutcome::Retreat
    } else {
        DragOutcome::Stay
    }
}

#[derive(Clone, Copy, Debug)]
struct DragStart {
    x: f64,
}

#[derive(Clone, Debug)]
pub struct Carousel {
    len: usize,
    index: usize,
    hovered: bool,
    drag: Option<DragStart>,
    threshold: f64,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self::with_threshold(len, DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(len: usize, threshold: f64) -> Self {
        Self {
            len,
            index: 0,
            hovered: false,
            drag: None,
            threshold: threshold.abs(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Held by hover or by an active drag.
    pub fn is_paused(&self) -> bool {
        self.hovered || self.drag.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn advance(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.index = (self.index + 1) % self.len;
        Some(self.index)
    }

    pub fn retreat(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.index = if self.index == 0 {
            self.len - 1
        } else {
            self.index - 1
        };
        Some(self.index)
    }

    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        self.index = index;
        Some(self.index)
    }

    /// Timer tick; moves only while nothing holds the carousel.
    pub fn tick(&mut self) -> Option<usize> {
        if self.is_paused() {
            return None;
        }
        self.advance()
    }

    /// Pointer entered the carousel.
    pub fn pause(&mut self) {
        self.hovered = true;
    }

    /// Pointer left the carousel. A drag in progress still holds it.
    pub fn resume(&mut self) {
        self.hovered = false;
    }

    pub fn begin_drag(&mut self, x: f64) {
        if self.len == 0 {
            return;
        }
        self.drag = Some(DragStart { x });
    }

    pub fn drag_delta(&self, x: f64) -> Option<f64> {
        self.drag.map(|start| x - start.x)
    }

    pub fn end_drag(&mut self, x: f64) -> DragOutcome {
        let Some(start) = self.drag.take() else {
            return DragOutcome::Stay;
        };
        let outcome = resolve_drag(x - start.x, self.threshold);
        match outcome {
            DragOutcome::Advance => {
                self.advance();
            }
            DragOutcome::Retreat => {
                self.retreat();
            }
            DragOutcome::Stay => {}
        }
        outcome
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn track_offset_percent(&self) -> f64 {
        0.0 - self.index as f64 * 100.0
    }
}
