use crc31_fec::channel::Channel;
use crc31_fec::fec::SyndromeTable;
use crc31_fec::sim::{NoiseLadder, Sweep, SweepConfig, TrialCounters, generate, receive, run_trial};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn config(ladder: NoiseLadder, trials: usize, threads: Option<usize>) -> SweepConfig {
    SweepConfig {
        amplitude: 1.0,
        ladder,
        trials_per_level: trials,
        seed: Some(0xC1E5_2417),
        threads,
    }
}

#[test]
fn noiseless_batch_has_no_errors() {
    let table = SyndromeTable::new().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let channel = Channel::noiseless(1.0);

    let counters: TrialCounters = (0..1000)
        .map(|_| run_trial(&mut rng, &channel, &table))
        .collect();

    assert_eq!(counters.trials, 1000);
    assert_eq!(counters.bit_errors, 0);
    assert_eq!(counters.fixed_crc, 0);
    assert_eq!(counters.good_crc, 1000);
    assert_eq!(counters.bad_crc, 0);
}

#[test]
fn forced_single_bit_error_is_fixed() {
    let table = SyndromeTable::new().unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    for bit in [0usize, 100, 512, 513, 543] {
        let tx = generate(&mut rng);
        let mut rx = tx;
        rx.flip_bit(bit);

        let outcome = receive(&tx, rx, &table);
        assert!(outcome.is_fixed(), "bit {}", bit);
        assert_eq!(outcome.bit_errors, 1);
        assert_eq!(outcome.residual_bit_errors, 0);

        let mut counters = TrialCounters::new();
        counters.record(&outcome);
        assert_eq!(counters.fixed_crc, 1);
        assert_eq!(counters.good_crc, 1);
        assert_eq!(counters.false_corrections, 0);
    }
}

#[test]
fn sweep_is_reproducible_across_thread_counts() {
    let table = SyndromeTable::new().unwrap();
    let ladder = NoiseLadder::SnrDb(vec![12.0, 8.0]);

    let single = Sweep::new(config(ladder.clone(), 700, Some(1)), &table)
        .unwrap()
        .run();
    let multi = Sweep::new(config(ladder, 700, Some(4)), &table)
        .unwrap()
        .run();

    assert_eq!(single.levels.len(), 2);
    for (a, b) in single.levels.iter().zip(multi.levels.iter()) {
        assert_eq!(a.counters, b.counters);
    }
}

#[test]
fn noisier_levels_see_more_bit_errors() {
    let table = SyndromeTable::new().unwrap();
    let report = Sweep::new(
        config(NoiseLadder::Sigma(vec![0.2, 0.5]), 2000, None),
        &table,
    )
    .unwrap()
    .run();

    let quiet = report.levels[0].counters;
    let loud = report.levels[1].counters;
    assert!(loud.bit_errors > quiet.bit_errors);
    assert!(loud.bad_crc >= quiet.bad_crc);
    for counters in [quiet, loud] {
        assert_eq!(counters.trials, 2000);
        assert_eq!(counters.good_crc + counters.bad_crc, counters.trials);
        assert!(counters.fixed_crc <= counters.good_crc);
    }
}

#[test]
fn report_serializes_to_json() {
    let table = SyndromeTable::new().unwrap();
    let report = Sweep::new(config(NoiseLadder::SnrDb(vec![10.0]), 50, None), &table)
        .unwrap()
        .run();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["polynomial"], 0xC1E5_2417u32);
    assert_eq!(json["sign_bits"], 544);
    assert_eq!(json["levels"][0]["counters"]["trials"], 50);
    assert_eq!(json["interrupted"], false);
}
