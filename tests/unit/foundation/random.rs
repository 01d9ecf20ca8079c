use super::*;

#[test]
fn uniform_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let v = rng.uniform(1000.0, 5000.0);
        assert!((1000.0..5000.0).contains(&v));
    }
}

#[test]
fn empty_range_returns_min() {
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(rng.uniform(1000.0, 1000.0), 1000.0);
    assert_eq!(rng.uniform(10.0, 3.0), 10.0);
}

#[test]
fn bytes_cover_both_halves_of_the_range() {
    let mut rng = StdRng::seed_from_u64(11);
    let samples: Vec<u8> = (0..4096).map(|_| rng.next_byte()).collect();
    assert!(samples.iter().any(|&b| b < 16));
    assert!(samples.iter().any(|&b| b > 240));
    let mean = samples.iter().map(|&b| f64::from(b)).sum::<f64>() / samples.len() as f64;
    assert!((mean - 127.5).abs() < 8.0, "mean {mean}");
}

#[test]
fn constant_source_is_constant() {
    let mut c = ConstantSource(0.25);
    assert_eq!(c.uniform(0.0, 100.0), 25.0);
    assert_eq!(c.next_byte(), 64);
    assert!(!c.coin());
    assert!(ConstantSource(0.75).coin());
}
