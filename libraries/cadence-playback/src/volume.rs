//! Volume control
//!
//! Volume range is 0-100%. Mute zeroes the level and remembers the previous
//! one, so the stored level is always what the transport should play at.

/// Icon tier shown next to the volume slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    /// Level is 0
    Silent,
    /// Below 50%
    Low,
    /// 50% and up
    High,
}

/// Volume controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Explicit mute toggle state
    muted: bool,

    /// Level to restore on unmute
    pre_mute_level: u8,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped to 0-100
    pub fn new(level: i32) -> Self {
        let level = clamp_percent(level);
        Self {
            level,
            muted: false,
            pre_mute_level: level,
        }
    }

    /// Set volume level, clamped to 0-100
    ///
    /// Does not touch the explicit mute flag.
    pub fn set_level(&mut self, level: i32) {
        self.level = clamp_percent(level);
    }

    /// Adjust the level by `delta` percentage points
    pub fn adjust(&mut self, delta: i32) {
        self.set_level(i32::from(self.level) + delta);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Toggle mute state
    ///
    /// Muting saves the current level and zeroes it; unmuting restores the
    /// saved level. Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        if self.muted {
            self.muted = false;
            self.level = self.pre_mute_level;
        } else {
            self.muted = true;
            self.pre_mute_level = self.level;
            self.level = 0;
        }
        self.muted
    }

    /// Explicit mute flag
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Derived: nothing is audible
    pub fn is_silent(&self) -> bool {
        self.level == 0
    }

    pub fn pre_mute_level(&self) -> u8 {
        self.pre_mute_level
    }

    pub fn icon(&self) -> VolumeIcon {
        match self.level {
            0 => VolumeIcon::Silent,
            1..=49 => VolumeIcon::Low,
            _ => VolumeIcon::High,
        }
    }

    /// Linear gain for the output device (0.0-1.0)
    pub fn gain(&self) -> f32 {
        f32::from(self.level) / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(70)
    }
}

fn clamp_percent(level: i32) -> u8 {
    level.clamp(0, 100) as u8
}
