//! When to redraw and with which waveform

use crate::display::Refresh;

/// Picks the waveform for each frame
///
/// The first frame after boot uses the full waveform, the panel content is
/// unknown at that point. After that frames go out partial, with a full refresh
/// every `full_every` frames to wipe the ghosting partial updates leave behind.
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    full_every: u32,
    frames: u32,
}

impl RefreshPolicy {
    /// `full_every` of 0 or 1 means every frame is a full refresh
    pub const fn new(full_every: u32) -> Self {
        RefreshPolicy {
            full_every,
            frames: 0,
        }
    }

    /// Waveform for the next frame, advances the counter
    pub fn next(&mut self) -> Refresh {
        let refresh = if self.full_every <= 1 || self.frames % self.full_every == 0 {
            Refresh::Full
        } else {
            Refresh::Partial
        };
        self.frames = self.frames.wrapping_add(1);
        refresh
    }

    /// Make the next frame a full refresh, e.g. after switching watchface
    pub fn force_full(&mut self) {
        self.frames = 0;
    }
}

/// Detects minute changes when the firmware polls the clock instead of sleeping
#[derive(Debug, Default)]
pub struct MinuteWatcher {
    last: Option<u8>,
}

impl MinuteWatcher {
    pub const fn new() -> Self {
        MinuteWatcher { last: None }
    }

    /// True on the first observation and whenever the minute differs from the last one
    pub fn changed(&mut self, minute: u8) -> bool {
        let changed = self.last != Some(minute);
        self.last = Some(minute);
        changed
    }
}
