use crate::error::CounterError;

pub const COUNTER_TICK_MS: u32 = 16;
pub const COUNTER_DURATION_MS: u32 = 2000;
pub const DEFAULT_COUNTER_SUFFIX: &str = "%";

pub fn parse_counter_target(raw: Option<&str>) -> Result<u64, CounterError> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(CounterError::MissingTarget);
    }
    raw.parse::<u64>()
        .map_err(|_| CounterError::InvalidTarget(raw.to_string()))
}

pub fn format_counter(value: u64, suffix: &str) -> String {
    format!("{value}{suffix}")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u64,
    pub text: String,
    pub done: bool,
}

/// Fixed-step count-up: each tick adds `(target - start) / (duration / tick)`.
#[derive(Clone, Debug)]
pub struct CounterAnimation {
    target: u64,
    current: f64,
    increment: f64,
    suffix: String,
    done: bool,
}

impl CounterAnimation {
    pub fn new(target: u64, duration_ms: u32, tick_ms: u32, suffix: &str) -> Self {
        Self::from_value(0, target, duration_ms, tick_ms, suffix)
    }

    pub fn from_value(start: u64, target: u64, duration_ms: u32, tick_ms: u32, suffix: &str) -> Self {
        let ticks = (duration_ms as f64 / tick_ms.max(1) as f64).max(1.0);
        let span = target.saturating_sub(start) as f64;
        Self {
            target,
            current: start.min(target) as f64,
            increment: span / ticks,
            suffix: suffix.to_string(),
            done: false,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn tick(&mut self) -> CounterFrame {
        if self.done {
            return self.final_frame();
        }
        self.current += self.increment;
        if self.increment <= 0.0 || self.current >= self.target as f64 {
            self.done = true;
            return self.final_frame();
        }
        let value = (self.current.floor() as u64).min(self.target.saturating_sub(1));
        CounterFrame {
            value,
            text: format_counter(value, &self.suffix),
            done: false,
        }
    }

    pub fn final_frame(&self) -> CounterFrame {
        CounterFrame {
            value: self.target,
            text: format_counter(self.target, &self.suffix),
            done: true,
        }
    }

    pub fn reset_text(&self) -> String {
        format_counter(0, &self.suffix)
    }
}
