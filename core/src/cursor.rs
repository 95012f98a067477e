pub const CURSOR_DURATION_S: f64 = 0.1;
pub const FOLLOWER_DURATION_S: f64 = 0.4;
pub const SETTLE_EPSILON_PX: f64 = 0.1;
const FRAME_DT_CAP_MS: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Exponential ease toward the latest pointer position, about 98% of the way after `duration`.
#[derive(Clone, Debug)]
pub struct Follower {
    position: Point,
    target: Point,
    time_constant_ms: f64,
    primed: bool,
}

impl Follower {
    pub fn new(duration_s: f64) -> Self {
        Self {
            position: Point::default(),
            target: Point::default(),
            time_constant_ms: (duration_s * 1000.0 / 4.0).max(1.0),
            primed: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// The first target snaps so the follower does not fly in from the corner.
    pub fn set_target(&mut self, target: Point) {
        self.target = target;
        if !self.primed {
            self.position = target;
            self.primed = true;
        }
    }

    pub fn step(&mut self, dt_ms: f64) -> Point {
        let dt = dt_ms.clamp(0.0, FRAME_DT_CAP_MS);
        let alpha = 1.0 - (-dt / self.time_constant_ms).exp();
        self.position.x += (self.target.x - self.position.x) * alpha;
        self.position.y += (self.target.y - self.position.y) * alpha;
        if self.is_settled() {
            self.position = self.target;
        }
        self.position
    }

    pub fn is_settled(&self) -> bool {
        self.position.distance(self.target) <= SETTLE_EPSILON_PX
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Interactive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorLook {
    pub cursor_scale: f64,
    pub follower_scale: f64,
    pub follower_background: &'static str,
}

impl HoverState {
    pub fn look(self) -> CursorLook {
        match self {
            HoverState::Idle => CursorLook {
                cursor_scale: 1.0,
                follower_scale: 1.0,
                follower_background: "rgba(255,255,255,0.1)",
            },
            HoverState::Interactive => CursorLook {
                cursor_scale: 0.0,
                follower_scale: 3.0,
                follower_background: "rgba(255,255,255,0.3)",
            },
        }
    }
}
