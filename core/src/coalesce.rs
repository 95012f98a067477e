/// Keeps only the newest value until the next frame picks it up.
#[derive(Clone, Debug)]
pub struct Coalescer<T> {
    pending: Option<T>,
    scheduled: bool,
}

impl<T> Default for Coalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            scheduled: false,
        }
    }
}

impl<T> Coalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the caller has to schedule a frame.
    pub fn push(&mut self, value: T) -> bool {
        self.pending = Some(value);
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    pub fn take(&mut self) -> Option<T> {
        self.scheduled = false;
        self.pending.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

/// In-flight flag for work that carries no payload (scroll, resize).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameGate {
    in_flight: bool,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }
}
