pub const TILT_DIVISOR: f64 = 10.0;
pub const TILT_PERSPECTIVE_PX: f64 = 1000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    pub const FLAT: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };
}

/// `x`/`y` are relative to the card's top-left corner.
pub fn tilt_for_pointer(x: f64, y: f64, width: f64, height: f64) -> Tilt {
    if width <= 0.0 || height <= 0.0 {
        return Tilt::FLAT;
    }
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    Tilt {
        rotate_x: (center_y - y) / TILT_DIVISOR,
        rotate_y: (x - center_x) / TILT_DIVISOR,
    }
}
