//! One wake cycle of the watch
//!
//! The firmware loop sleeps until the RTC pulls INT low at the top of a minute,
//! then calls [`Watch::on_wake`]. Without an alarm line the loop calls
//! [`Watch::poll`] instead, which only redraws when the minute changed.

use crate::config::WakeMode;
use crate::display::{EpdPanel, Refresh};
use crate::rtc::format::{format_date, format_time};
use crate::rtc::time_source::ERROR_TEXT;
use crate::rtc::{DateTime, Rtc, TimeSource};
use crate::schedule::{MinuteWatcher, RefreshPolicy};
use crate::watchface::layout::Placement;
use crate::watchface::render::Renderer;
use crate::watchface::WatchFace;

pub struct Watch<R, P> {
    time: TimeSource<R>,
    renderer: Renderer<P>,
    face: &'static WatchFace,
    policy: RefreshPolicy,
    minutes: MinuteWatcher,
}

impl<R: Rtc, P: EpdPanel> Watch<R, P> {
    /// `full_every` is passed on to [`RefreshPolicy::new`]
    pub fn new(time: TimeSource<R>, panel: P, face: &'static WatchFace, full_every: u32) -> Self {
        Watch {
            time,
            renderer: Renderer::new(panel),
            face,
            policy: RefreshPolicy::new(full_every),
            minutes: MinuteWatcher::new(),
        }
    }

    pub fn panel_mut(&mut self) -> &mut P {
        self.renderer.panel_mut()
    }

    pub fn face(&self) -> &'static WatchFace {
        self.face
    }

    /// Switch watchface, the next frame clears the old one with a full refresh
    pub fn set_face(&mut self, face: &'static WatchFace) {
        log::info!("Switching watchface to '{}'", face.name);
        self.face = face;
        self.policy.force_full();
    }

    /// Handle a wake from the minute alarm
    ///
    /// The alarm flag is cleared unconditionally so INT is released and the next
    /// falling edge can wake us again, even if the flag was not what woke us.
    pub fn on_wake(&mut self) -> Result<Placement, P::Error> {
        if !self.time.alarm_fired() {
            log::debug!("Woken without alarm flag set");
        }
        self.time.clear_alarm_flag();
        self.redraw()
    }

    /// Redraw when the minute changed since the last frame, returns whether it did
    pub fn poll(&mut self) -> Result<bool, P::Error> {
        let now = self.time.now();
        if !self.minutes.changed(minute_of(now.as_ref())) {
            return Ok(false);
        }
        self.draw(now.as_ref()).map(|_| true)
    }

    /// Read the clock and draw the current face
    pub fn redraw(&mut self) -> Result<Placement, P::Error> {
        let now = self.time.now();
        self.minutes.changed(minute_of(now.as_ref()));
        self.draw(now.as_ref())
    }

    /// Time and date both come from the one reading in `now`
    fn draw(&mut self, now: Option<&DateTime>) -> Result<Placement, P::Error> {
        let (time, date) = match now {
            Some(dt) => (format_time(dt.hour, dt.minute, true), format_date(dt.month, dt.day)),
            None => (ERROR_TEXT.to_string(), ERROR_TEXT.to_string()),
        };
        let refresh = self.policy.next();

        log::info!("Display: {} {} ({})", time, date, describe(refresh));
        self.renderer.render(self.face, &time, &date, refresh)
    }
}

/// Arm the minute alarm if `requested` relies on it
///
/// Without an armed alarm INT never goes low, so sleeping on it would freeze the
/// display. In that case the loop polls instead.
pub fn start_wake_source<R: Rtc>(time: &mut TimeSource<R>, requested: WakeMode) -> WakeMode {
    match requested {
        WakeMode::Alarm if time.arm_minute_alarm() => WakeMode::Alarm,
        WakeMode::Alarm => {
            log::warn!("Minute alarm not armed, falling back to polling the RTC");
            WakeMode::Poll
        }
        WakeMode::Poll => WakeMode::Poll,
    }
}

fn minute_of(now: Option<&DateTime>) -> u8 {
    now.map_or(0, |dt| dt.minute)
}

fn describe(refresh: Refresh) -> &'static str {
    match refresh {
        Refresh::Full => "full refresh",
        Refresh::Partial => "partial refresh",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtc::fake::{FakeDs3231, Registers};
    use crate::rtc::Ds3231;
    use crate::watchface::catalog;
    use crate::watchface::layout::measure;
    use crate::watchface::render::draw_face;
    use crate::watchface::render::mock::RecordingPanel;
    use crate::Frame;

    type TestWatch = Watch<Ds3231<FakeDs3231>, RecordingPanel>;

    fn watch(face: &'static WatchFace) -> (TestWatch, Registers) {
        // 2025-10-20 17:30:00
        let fake = FakeDs3231::new().with_time([0x00, 0x30, 0x17, 0x01, 0x20, 0x10, 0x25]);
        let regs = fake.handle();
        let mut time = TimeSource::new(Ds3231::new(fake));
        assert!(time.begin());
        assert!(time.arm_minute_alarm());
        (Watch::new(time, RecordingPanel::default(), face, 30), regs)
    }

    fn refreshes(watch: &mut TestWatch) -> Vec<Refresh> {
        watch.panel_mut().frames.iter().map(|(_, r)| *r).collect()
    }

    #[test]
    fn wake_clears_alarm_and_renders_current_time() {
        let face = catalog::by_name("atat").unwrap();
        let (mut watch, regs) = watch(face);
        regs.borrow_mut()[0x0F] |= 0x01;

        let placement = watch.on_wake().unwrap();

        assert_eq!(regs.borrow()[0x0F] & 0x01, 0);
        assert_eq!(placement.text1.bounds, measure("5:30 PM", face.text1.font));
        assert_eq!(placement.text2.bounds, measure("Oct 20", face.text2.font));
        assert_eq!(refreshes(&mut watch), vec![Refresh::Full]);
    }

    #[test]
    fn no_ampm_face_gets_stripped_time() {
        let face = catalog::by_name("giraffe1").unwrap();
        assert!(face.no_ampm);
        let (mut watch, _regs) = watch(face);

        let placement = watch.on_wake().unwrap();

        assert_eq!(placement.text1.bounds, measure("5:30 ", face.text1.font));
    }

    #[test]
    fn later_wakes_use_partial_refresh() {
        let (mut watch, _regs) = watch(catalog::get(0));

        for _ in 0..3 {
            watch.on_wake().unwrap();
        }

        assert_eq!(
            refreshes(&mut watch),
            vec![Refresh::Full, Refresh::Partial, Refresh::Partial]
        );
    }

    #[test]
    fn switching_face_forces_full_refresh() {
        let (mut watch, _regs) = watch(catalog::get(0));
        watch.on_wake().unwrap();
        watch.on_wake().unwrap();

        watch.set_face(catalog::get(1));
        watch.on_wake().unwrap();

        assert_eq!(
            refreshes(&mut watch),
            vec![Refresh::Full, Refresh::Partial, Refresh::Full]
        );
        assert_eq!(watch.face().name, catalog::get(1).name);
    }

    #[test]
    fn poll_redraws_only_on_minute_change() {
        let (mut watch, regs) = watch(catalog::get(0));

        assert!(watch.poll().unwrap());
        assert!(!watch.poll().unwrap());

        regs.borrow_mut()[0x01] = 0x31;
        assert!(watch.poll().unwrap());
        assert!(!watch.poll().unwrap());

        assert_eq!(watch.panel_mut().frames.len(), 2);
    }

    #[test]
    fn poll_after_wake_does_not_draw_twice() {
        let (mut watch, _regs) = watch(catalog::get(0));
        watch.on_wake().unwrap();

        assert!(!watch.poll().unwrap());
        assert_eq!(watch.panel_mut().frames.len(), 1);
    }

    #[test]
    fn missing_clock_renders_error_text() {
        let face = catalog::get(0);
        let mut time = TimeSource::new(Ds3231::new(FakeDs3231::absent()));
        assert!(!time.begin());
        let mut watch = Watch::new(time, RecordingPanel::default(), face, 30);

        let placement = watch.on_wake().unwrap();

        assert_eq!(placement.text1.bounds, measure("ERR", face.text1.font));
        assert_eq!(placement.text2.bounds, measure("ERR", face.text2.font));
    }

    #[test]
    fn time_and_date_come_from_one_reading() {
        let face = catalog::get(0);
        // 2025-10-20 23:59:59, ticking over to midnight on the 21st
        let fake = FakeDs3231::new()
            .with_time([0x59, 0x59, 0x23, 0x01, 0x20, 0x10, 0x25])
            .with_tick([0x00, 0x00, 0x00, 0x02, 0x21, 0x10, 0x25]);
        let mut time = TimeSource::new(Ds3231::new(fake));
        assert!(time.begin());
        let mut watch = Watch::new(time, RecordingPanel::default(), face, 30);

        watch.redraw().unwrap();

        let mut expected = Frame::new();
        match draw_face(&mut expected, face, "11:59 PM", "Oct 20") {
            Ok(_) => {}
            Err(never) => match never {},
        }
        let (frame, _) = &watch.panel_mut().frames[0];
        assert!(frame.buffer() == expected.buffer(), "frame mixes two clock readings");
    }

    #[test]
    fn alarm_wake_is_kept_when_armed() {
        let fake = FakeDs3231::new().with_time([0x00, 0x30, 0x17, 0x01, 0x20, 0x10, 0x25]);
        let regs = fake.handle();
        let mut time = TimeSource::new(Ds3231::new(fake));
        assert!(time.begin());

        assert_eq!(start_wake_source(&mut time, WakeMode::Alarm), WakeMode::Alarm);
        assert!(time.alarm_armed());
        assert_eq!(regs.borrow()[0x0E] & 0x05, 0x05);
    }

    #[test]
    fn failed_alarm_falls_back_to_polling() {
        let mut time = TimeSource::new(Ds3231::new(FakeDs3231::absent()));
        assert!(!time.begin());

        assert_eq!(start_wake_source(&mut time, WakeMode::Alarm), WakeMode::Poll);
        assert!(!time.alarm_armed());
    }

    #[test]
    fn polling_does_not_arm_the_alarm() {
        let fake = FakeDs3231::new();
        let regs = fake.handle();
        let mut time = TimeSource::new(Ds3231::new(fake));
        assert!(time.begin());

        assert_eq!(start_wake_source(&mut time, WakeMode::Poll), WakeMode::Poll);
        assert!(!time.alarm_armed());
        assert_eq!(regs.borrow()[0x0E] & 0x01, 0);
    }
}
