/// Output level in `[0, 1]` plus the mute toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
    muted: bool,
    before_mute: f32,
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Volume {
    pub fn new(level: f32) -> Self {
        let level = if level.is_nan() { 1.0 } else { level.clamp(0.0, 1.0) };
        Self {
            level,
            muted: false,
            before_mute: level,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Clamp and apply `v`. NaN is ignored and reported as `false`.
    /// Any explicit level clears the mute flag.
    pub fn set(&mut self, v: f32) -> bool {
        if v.is_nan() {
            return false;
        }
        self.level = v.clamp(0.0, 1.0);
        self.muted = false;
        if self.level > 0.0 {
            self.before_mute = self.level;
        }
        true
    }

    pub fn adjust(&mut self, delta: f32) -> bool {
        self.set(self.level + delta)
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.level = if self.before_mute > 0.0 {
                self.before_mute
            } else {
                1.0
            };
            self.muted = false;
        } else {
            self.before_mute = self.level;
            self.level = 0.0;
            self.muted = true;
        }
    }
}
