//! Volume control with mute memory
//!
//! Volume is a linear level in [0.0, 1.0]. Muting keeps the level so that
//! unmuting restores it exactly, however many times mute is toggled.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Chosen volume level (0.0-1.0), kept while muted
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// Non-finite levels fall back to full volume.
    pub fn new(level: f32) -> Self {
        let level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            1.0
        };

        Self {
            level,
            muted: false,
        }
    }

    /// Set volume level, clamped to [0.0, 1.0]
    ///
    /// Returns `false` (and changes nothing) for NaN or infinite input.
    /// While muted only the remembered level changes.
    pub fn set_level(&mut self, level: f32) -> bool {
        if !level.is_finite() {
            return false;
        }
        self.level = level.clamp(0.0, 1.0);
        true
    }

    /// Chosen volume level, regardless of mute
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level restored on unmute, if muted
    pub fn pre_mute_level(&self) -> Option<f32> {
        self.muted.then_some(self.level)
    }

    /// Gain applied to the output
    ///
    /// Returns 0.0 if muted, otherwise the level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
        assert_eq!(Volume::new(f32::NAN).level(), 1.0);
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);

        assert!(vol.set_level(0.75));
        assert_eq!(vol.level(), 0.75);

        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);

        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn non_finite_level_ignored() {
        let mut vol = Volume::new(0.4);
        assert!(!vol.set_level(f32::NAN));
        assert!(!vol.set_level(f32::INFINITY));
        assert_eq!(vol.level(), 0.4);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.8);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.gain(), 0.0);
        assert_eq!(vol.level(), 0.8);
        assert_eq!(vol.pre_mute_level(), Some(0.8));

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.gain(), 0.8);
        assert_eq!(vol.pre_mute_level(), None);
    }

    #[test]
    fn set_while_muted_updates_remembered_level() {
        let mut vol = Volume::new(0.8);
        vol.toggle_mute();

        vol.set_level(0.3);
        assert_eq!(vol.gain(), 0.0);

        vol.toggle_mute();
        assert_eq!(vol.gain(), 0.3);
    }
}
