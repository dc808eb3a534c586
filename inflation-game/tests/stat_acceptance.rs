use inflation_game::{EventSource, GameConfig, SeededEventSource};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::convert::TryFrom;

const SAMPLE_SIZE: usize = 4000;
const TOLERANCE: f64 = 0.025;

struct ChaChaSource(ChaCha20Rng);

impl EventSource for ChaChaSource {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

fn frequencies(source: &mut dyn EventSource) -> Vec<f64> {
    let config = GameConfig::builtin().expect("builtin tables load");
    let mut counts = vec![0usize; config.events.len()];
    for _ in 0..SAMPLE_SIZE {
        let drawn = config.events.draw(source).expect("catalog is not empty");
        let index = config
            .events
            .iter()
            .position(|event| event.title == drawn.title)
            .expect("drawn event is in the catalog");
        counts[index] += 1;
    }
    let total = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    counts
        .into_iter()
        .map(|count| f64::from(u32::try_from(count).expect("count fits")) / total)
        .collect()
}

#[test]
fn seeded_event_draws_are_uniform() {
    for seed in [1337_u64, 0xDEAD_BEEF, 7] {
        let mut source = SeededEventSource::from_user_seed(seed);
        let observed = frequencies(&mut source);
        let expected = 1.0 / f64::from(u32::try_from(observed.len()).expect("len fits"));
        for (index, rate) in observed.iter().enumerate() {
            assert!(
                (rate - expected).abs() <= TOLERANCE,
                "seed {seed}: event {index} drawn at {rate:.4}, expected {expected:.4}"
            );
        }
        assert_eq!(source.picks(), 4000);
    }
}

#[test]
fn catalog_draws_are_uniform_for_any_source() {
    let mut source = ChaChaSource(ChaCha20Rng::seed_from_u64(0xACED));
    let observed = frequencies(&mut source);
    let expected = 1.0 / f64::from(u32::try_from(observed.len()).expect("len fits"));
    assert!(
        observed.iter().all(|rate| (rate - expected).abs() <= TOLERANCE),
        "draw distribution drifted: {observed:?}"
    );
}

#[test]
fn distinct_seeds_diverge() {
    let draws = |seed: u64| {
        let mut source = SeededEventSource::from_user_seed(seed);
        (0..32).map(|_| source.pick_index(4)).collect::<Vec<_>>()
    };
    assert_eq!(draws(42), draws(42));
    assert_ne!(draws(42), draws(43));
}
