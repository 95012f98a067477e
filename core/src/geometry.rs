use std::fmt;
use std::str::FromStr;

use crate::error::MarginError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Edge-inclusive intersection, so a zero-sized rect touching `other` still yields `Some`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            MarginLength::Px(value) => value,
            MarginLength::Percent(value) => basis * value / 100.0,
        }
    }
}

impl Default for MarginLength {
    fn default() -> Self {
        MarginLength::Px(0.0)
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(value) => write!(f, "{value}px"),
            MarginLength::Percent(value) => write!(f, "{value}%"),
        }
    }
}

impl FromStr for MarginLength {
    type Err = MarginError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let invalid = || MarginError::Component(raw.to_string());
        if let Some(number) = raw.strip_suffix('%') {
            let value = number.trim().parse::<f64>().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            return Ok(MarginLength::Percent(value));
        }
        let number = raw.strip_suffix("px").unwrap_or(raw);
        let value = number.trim().parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        // A unitless length is only valid when it is zero.
        if number.len() == raw.len() && value != 0.0 {
            return Err(invalid());
        }
        Ok(MarginLength::Px(value))
    }
}

/// CSS `rootMargin` shorthand: top, right, bottom, left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: MarginLength::Px(0.0),
        right: MarginLength::Px(0.0),
        bottom: MarginLength::Px(0.0),
        left: MarginLength::Px(0.0),
    };

    pub fn expand(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.left - left,
            root.top - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = MarginError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts = raw
            .split_whitespace()
            .map(str::parse::<MarginLength>)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [] => return Err(MarginError::Empty),
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return Err(MarginError::Arity(parts.len())),
        };
        Ok(RootMargin {
            top,
            right,
            bottom,
            left,
        })
    }
}

/// Fraction of `target` inside `root` after applying `margin` to the root.
///
/// A zero-area target is never visible: unrendered elements report an empty rect at the origin.
pub fn visible_ratio(target: Rect, root: Rect, margin: &RootMargin) -> f64 {
    let area = target.area();
    if area <= 0.0 {
        return 0.0;
    }
    let root = margin.expand(root);
    let Some(overlap) = target.intersection(&root) else {
        return 0.0;
    };
    (overlap.area() / area).clamp(0.0, 1.0)
}
