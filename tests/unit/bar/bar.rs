use super::*;
use crate::foundation::random::ConstantSource;
use rand::{SeedableRng, rngs::StdRng};

fn viewport() -> DisplaySize {
    DisplaySize::new(1000.0, 600.0)
}

#[test]
fn defaults_validate() {
    BarParams::default().validate().unwrap();
}

#[test]
fn inverted_or_negative_ranges_are_rejected() {
    let p = BarParams {
        min_delay: 10.0,
        max_delay: 5.0,
        ..BarParams::default()
    };
    assert!(p.validate().is_err());
    let p = BarParams {
        min_width: -1.0,
        ..BarParams::default()
    };
    assert!(p.validate().is_err());
    let p = BarParams {
        height: f64::NAN,
        ..BarParams::default()
    };
    assert!(p.validate().is_err());
}

#[test]
fn first_tick_schedules_within_delay_range() {
    let mut rng = StdRng::seed_from_u64(9);
    for t0 in [0.0, 123.0, 10_000.0] {
        let mut m = BarMachine::new(BarParams::default());
        assert!(m.step(t0, viewport(), &mut rng).is_none());
        let BarPhase::Waiting { next_activation } = m.phase() else {
            panic!("expected waiting, got {:?}", m.phase());
        };
        assert!(next_activation >= t0 + 1000.0);
        assert!(next_activation <= t0 + 5000.0);
    }
}

#[test]
fn fixed_delay_activates_exactly_on_time() {
    let params = BarParams {
        min_delay: 1000.0,
        max_delay: 1000.0,
        ..BarParams::default()
    };
    let mut m = BarMachine::new(params);
    let mut rng = StdRng::seed_from_u64(10);
    let t0 = 500.0;
    assert!(m.step(t0, viewport(), &mut rng).is_none());
    assert!(m.step(t0 + 999.9, viewport(), &mut rng).is_none());
    assert!(matches!(m.phase(), BarPhase::Waiting { .. }));

    let frame = m.step(t0 + 1000.0, viewport(), &mut rng).unwrap();
    let BarPhase::Active(bar) = m.phase() else {
        panic!("expected active");
    };
    assert_eq!(bar.start_time, t0 + 1000.0);
    assert_eq!(frame.progress, 0.0);
}

#[test]
fn active_bar_starts_and_ends_off_screen() {
    let mut rng = StdRng::seed_from_u64(11);
    let params = BarParams {
        min_delay: 0.0,
        max_delay: 0.0,
        ..BarParams::default()
    };
    let mut m = BarMachine::new(params);
    let first = m.step(0.0, viewport(), &mut rng).unwrap();
    let BarPhase::Active(bar) = m.phase() else {
        panic!("expected active");
    };

    match first.direction {
        TravelDirection::LeftToRight => assert_eq!(first.rect.x1, 0.0),
        TravelDirection::RightToLeft => assert_eq!(first.rect.x0, 1000.0),
    }
    assert_eq!(first.rect.height(), 25.0);
    assert!(first.rect.y0 >= 0.0 && first.rect.y1 <= 600.0);
    assert!((50.0..=200.0).contains(&bar.width));

    let almost = m.step(bar.duration - 1e-6, viewport(), &mut rng).unwrap();
    match almost.direction {
        TravelDirection::LeftToRight => assert!(almost.rect.x0 > 999.9),
        TravelDirection::RightToLeft => assert!(almost.rect.x1 < 0.1),
    }
}

#[test]
fn durations_stay_in_range_and_bar_never_outlives_duration() {
    let mut rng = StdRng::seed_from_u64(12);
    let params = BarParams::default();
    let mut m = BarMachine::new(params);
    let mut activations = 0;
    let mut t = 0.0;
    while t < 200_000.0 {
        let frame = m.step(t, viewport(), &mut rng);
        if let BarPhase::Active(bar) = m.phase() {
            assert!(bar.duration >= params.min_duration);
            assert!(bar.duration <= params.max_duration);
            assert!(t - bar.start_time < bar.duration);
            assert!(frame.is_some());
            if t == bar.start_time {
                activations += 1;
            }
        } else {
            assert!(frame.is_none());
        }
        t += 50.0;
    }
    assert!(activations > 10);
}

#[test]
fn finished_bar_goes_dormant_then_waits_again() {
    let params = BarParams {
        min_delay: 100.0,
        max_delay: 100.0,
        min_duration: 1000.0,
        max_duration: 1000.0,
        ..BarParams::default()
    };
    let mut m = BarMachine::new(params);
    let mut c = ConstantSource(0.5);
    m.step(0.0, viewport(), &mut c);
    assert!(m.step(100.0, viewport(), &mut c).is_some());
    assert!(m.step(1099.0, viewport(), &mut c).is_some());
    assert!(m.step(1100.0, viewport(), &mut c).is_none());
    assert_eq!(m.phase(), BarPhase::Dormant);

    assert!(m.step(1150.0, viewport(), &mut c).is_none());
    assert_eq!(
        m.phase(),
        BarPhase::Waiting {
            next_activation: 1250.0
        }
    );
}

#[test]
fn progress_is_eased() {
    let params = BarParams {
        min_delay: 0.0,
        max_delay: 0.0,
        min_duration: 1000.0,
        max_duration: 1000.0,
        ..BarParams::default()
    };
    let mut m = BarMachine::new(params);
    let mut c = ConstantSource(0.9);
    m.step(0.0, viewport(), &mut c).unwrap();
    let f = m.step(250.0, viewport(), &mut c).unwrap();
    assert_eq!(f.progress, 0.25);
    assert_eq!(f.eased, Ease::InOutCubic.apply(0.25));
    assert_eq!(f.direction, TravelDirection::LeftToRight);
    let travel = 1000.0 + f.rect.width();
    assert!((f.rect.x0 - (f.eased * travel - f.rect.width())).abs() < 1e-9);
}

#[test]
fn short_surface_pins_bar_to_top() {
    let params = BarParams {
        min_delay: 0.0,
        max_delay: 0.0,
        ..BarParams::default()
    };
    let mut m = BarMachine::new(params);
    let mut c = ConstantSource(0.7);
    let f = m.step(0.0, DisplaySize::new(300.0, 10.0), &mut c).unwrap();
    assert_eq!(f.rect.y0, 0.0);
}
