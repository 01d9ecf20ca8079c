use super::*;

#[derive(Default)]
struct Recorder {
    frames: Vec<f64>,
}

impl FrameRenderer for Recorder {
    fn render_frame(&mut self, t_ms: f64) {
        self.frames.push(t_ms);
    }
}

fn drive(fps: f64, timestamps: &[f64]) -> (AnimationLoop, Recorder, ManualScheduler) {
    let mut sched = ManualScheduler::new();
    let mut lp = AnimationLoop::new(FrameThrottle::from_fps(fps).unwrap());
    let mut rec = Recorder::default();
    lp.start(&mut sched);
    for &t in timestamps {
        assert_eq!(sched.take_due(), vec![lp.pending().unwrap()]);
        lp.on_frame(t, &mut sched, &mut rec);
    }
    (lp, rec, sched)
}

#[test]
fn rejects_non_positive_fps() {
    assert!(FrameThrottle::from_fps(0.0).is_err());
    assert!(FrameThrottle::from_fps(-5.0).is_err());
    assert!(FrameThrottle::from_fps(f64::NAN).is_err());
    assert_eq!(FrameThrottle::from_fps(20.0).unwrap().interval_ms(), 50.0);
}

#[test]
fn fast_host_callbacks_are_throttled() {
    // 60 Hz host, 20 fps target: one draw every third callback.
    let ts: Vec<f64> = (1..=60).map(|i| f64::from(i) * 1000.0 / 60.0).collect();
    let (lp, rec, _) = drive(20.0, &ts);
    for pair in rec.frames.windows(2) {
        assert!(pair[1] - pair[0] >= 50.0 - 1e-9);
    }
    assert_eq!(lp.draws() as usize, rec.frames.len());
    assert_eq!(lp.draws() + lp.skips(), 60);
    assert!((19..=20).contains(&lp.draws()));
}

#[test]
fn no_draw_while_inside_interval() {
    let (lp, rec, _) = drive(20.0, &[10.0, 20.0, 30.0, 49.9]);
    assert!(rec.frames.is_empty());
    assert_eq!(lp.skips(), 4);
    // Even skipped ticks keep exactly one callback pending.
    assert!(lp.pending().is_some());
}

#[test]
fn every_tick_draws_when_spaced_at_least_one_interval() {
    let ts = [50.0, 100.0, 175.0, 225.0, 1000.0];
    let (lp, rec, _) = drive(20.0, &ts);
    assert_eq!(rec.frames, ts.to_vec());
    assert_eq!(lp.skips(), 0);
}

#[test]
fn teardown_cancels_pending_callback_once() {
    let (mut lp, mut rec, mut sched) = drive(20.0, &[50.0]);
    let pending = lp.pending().unwrap();
    lp.teardown(&mut sched);
    lp.teardown(&mut sched);

    assert_eq!(sched.cancelled(), &[pending]);
    assert!(sched.pending().is_empty());
    assert!(!lp.is_running());

    // A stale callback delivered after teardown does nothing.
    assert_eq!(lp.on_frame(500.0, &mut sched, &mut rec), FrameOutcome::Stopped);
    assert_eq!(rec.frames, vec![50.0]);
    assert!(sched.pending().is_empty());
}

#[test]
fn start_is_idempotent() {
    let mut sched = ManualScheduler::new();
    let mut lp = AnimationLoop::new(FrameThrottle::from_fps(30.0).unwrap());
    lp.start(&mut sched);
    lp.start(&mut sched);
    assert_eq!(sched.pending().len(), 1);
}
