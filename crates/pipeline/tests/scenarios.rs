//! End-to-end scenarios over single partitions.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use infobar_core::{
    Bar, BarConfig, BarKind, ErrorKind, LabelConfig, OutcomeClass, PartitionKey, PipelineConfig,
    Tick, WeightConfig,
};
use infobar_labeling::label_anchor;
use infobar_pipeline::{process_partition, PartitionOutput};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn key(symbol: &str, day: u32) -> PartitionKey {
    PartitionKey::new(symbol, NaiveDate::from_ymd_opt(2024, 5, day).unwrap())
}

fn make_ticks(prices: &[f64], sizes: &[u64]) -> Vec<Tick> {
    prices
        .iter()
        .zip(sizes)
        .enumerate()
        .map(|(i, (&price, &size))| Tick::new(34_200_000 + 250 * i as i64, price, size))
        .collect()
}

/// Deterministic random-walk session.
fn session_ticks(seed: u64, n: usize) -> Vec<Tick> {
    let mut state = seed;
    let mut price = 50.0_f64;
    let mut ts = 34_200_000i64;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let step = ((state >> 33) % 5) as f64 - 2.0;
            price = (price + step * 0.01).max(0.01);
            ts += 1 + ((state >> 50) % 400) as i64;
            Tick::new(ts, (price * 100.0).round() / 100.0, 1 + (state >> 56) % 300)
        })
        .collect()
}

fn session_config() -> PipelineConfig {
    PipelineConfig {
        bars: BarConfig::new(BarKind::Dollar, 20_000.0, 10),
        labels: LabelConfig {
            volatility_window: 10,
            profit_multiplier: 1.5,
            stop_multiplier: 1.0,
            horizon_bars: 5,
        },
        weights: WeightConfig {
            use_uniqueness: true,
            use_abs_return_weight: true,
            half_life_bars: Some(30),
        },
    }
}

#[test]
fn scenario_a_dollar_bar_construction() -> anyhow::Result<()> {
    init_tracing();
    let ticks = make_ticks(&[10.00, 10.50, 10.40, 11.00, 12.00], &[100; 5]);
    let mut config = PipelineConfig::default();
    config.bars = BarConfig::new(BarKind::Dollar, 500.0, 1);

    let output = process_partition(&key("A", 1), &ticks, &config)?;

    // Directions [0, +1, −1, +1, +1]; flows [0, +1050, −1040, +1100, +1200].
    let first = &output.bars[0];
    assert_eq!(first.tick_count, 2);
    assert_relative_eq!(first.closing_imbalance, 1050.0);
    assert_eq!(first.close_ts_ms, ticks[1].ts_ms);

    let counts: Vec<u64> = output.bars.iter().map(|b| b.tick_count).collect();
    assert_eq!(counts, vec![2, 1, 1, 1]);
    assert_eq!(output.direction_stats.up_ticks, 3);
    assert_eq!(output.direction_stats.down_ticks, 1);
    assert_eq!(output.direction_stats.zero_ticks, 1);
    Ok(())
}

#[test]
fn scenario_b_upper_barrier_wins_tie() {
    let bar = |ts: i64, high: f64, low: f64, close: f64| Bar {
        open_ts_ms: ts - 100,
        close_ts_ms: ts,
        open: close,
        high,
        low,
        close,
        volume: 10,
        dollar_volume: close * 10.0,
        tick_count: 1,
        closing_imbalance: 0.0,
        threshold: 1.0,
        is_flushed: false,
    };
    let bars = vec![bar(1_000, 10.0, 10.0, 10.0), bar(2_000, 12.0, 8.0, 9.5)];
    let config = LabelConfig {
        volatility_window: 3,
        profit_multiplier: 1.0,
        stop_multiplier: 1.0,
        horizon_bars: 3,
    };

    // σ = 0.1 puts the barriers at 11 and 9.
    let label = label_anchor(&bars, 0, 0.1, &config);
    assert_eq!(label.outcome, OutcomeClass::UpperBarrier);
    assert_eq!(label.outcome.as_int(), 1);
    assert_eq!(label.horizon_ts_ms, 2_000);
    assert_relative_eq!(label.realized_return, -0.05, epsilon = 1e-12);
}

#[test]
fn scenario_c_empty_partition() -> anyhow::Result<()> {
    init_tracing();
    let output = process_partition(&key("C", 3), &[], &PipelineConfig::default())?;

    assert!(output.is_empty());
    assert!(output.bars.is_empty());
    assert!(output.labels.is_empty());
    assert!(output.weights.is_empty());
    assert_eq!(output.label_stats.total, 0);
    Ok(())
}

#[test]
fn full_session_invariants() -> anyhow::Result<()> {
    init_tracing();
    let ticks = session_ticks(7, 5_000);
    let output = process_partition(&key("RW", 6), &ticks, &session_config())?;

    assert!(output.bars.len() > 10);
    assert_eq!(output.labels.len(), output.bars.len());
    assert_eq!(output.weights.len(), output.labels.len());

    let total: f64 = output.weights.iter().map(|w| w.weight).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);

    let last = output.labels.last().unwrap();
    assert_eq!(last.anchor_ts_ms, last.horizon_ts_ms);
    assert_eq!(last.outcome, OutcomeClass::VerticalBarrier);
    assert_eq!(output.label_stats.degenerate_count, 1);
    Ok(())
}

#[test]
fn repeated_runs_are_bit_identical() -> anyhow::Result<()> {
    let ticks = session_ticks(11, 3_000);
    let config = session_config();

    let first = process_partition(&key("DET", 7), &ticks, &config)?;
    let second = process_partition(&key("DET", 7), &ticks, &config)?;
    assert_eq!(first, second);

    for (a, b) in first.weights.iter().zip(&second.weights) {
        assert_eq!(a.weight.to_bits(), b.weight.to_bits());
    }
    for (a, b) in first.labels.iter().zip(&second.labels) {
        assert_eq!(a.realized_return.to_bits(), b.realized_return.to_bits());
        assert_eq!(a.volatility.to_bits(), b.volatility.to_bits());
    }
    Ok(())
}

#[test]
fn failed_partition_does_not_affect_siblings() {
    init_tracing();
    let config = session_config();
    let mut partitions: Vec<(PartitionKey, Vec<Tick>)> = (0..4)
        .map(|i| (key("ISO", 10 + i), session_ticks(100 + i as u64, 1_500)))
        .collect();
    partitions[2].1[700].size = 0;

    let shared = &config;
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = partitions
            .iter()
            .map(|(k, ticks)| scope.spawn(move || process_partition(k, ticks, shared)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, result) in results.iter().enumerate() {
        let (k, ticks) = &partitions[i];
        if i == 2 {
            let err = result.as_ref().unwrap_err();
            assert_eq!(&err.partition, k);
            assert_eq!(err.kind(), ErrorKind::Data);
        } else {
            let output: &PartitionOutput = result.as_ref().unwrap();
            let alone = process_partition(k, ticks, &config).unwrap();
            assert_eq!(output, &alone);
        }
    }
}

#[test]
fn shared_timestamps_never_split_across_bars() -> anyhow::Result<()> {
    let ticks: Vec<Tick> = [1_000, 1_000, 1_000, 1_000, 2_000]
        .iter()
        .zip([10.0, 10.1, 10.2, 10.3, 10.4])
        .map(|(&ts, price)| Tick::new(ts, price, 10))
        .collect();
    let mut config = PipelineConfig::default();
    config.bars = BarConfig::new(BarKind::Volume, 5.0, 1);

    let output = process_partition(&key("TIES", 13), &ticks, &config)?;

    let close_ts: Vec<i64> = output.bars.iter().map(|b| b.close_ts_ms).collect();
    assert_eq!(close_ts, vec![1_000, 2_000]);
    assert_eq!(output.bars[0].tick_count, 4);

    let first = &output.labels[0];
    assert_eq!(first.anchor_ts_ms, 1_000);
    assert_eq!(first.horizon_ts_ms, 2_000);
    Ok(())
}

#[test]
fn volume_bars_conserve_size() -> anyhow::Result<()> {
    let ticks = session_ticks(3, 2_000);
    let mut config = session_config();
    config.bars = BarConfig::new(BarKind::Volume, 1_500.0, 25);

    let output = process_partition(&key("VOL", 8), &ticks, &config)?;
    let volume: u64 = output.bars.iter().map(|b| b.volume).sum();
    let ticks_in_bars: u64 = output.bars.iter().map(|b| b.tick_count).sum();
    assert_eq!(volume, ticks.iter().map(|t| t.size).sum::<u64>());
    assert_eq!(ticks_in_bars, ticks.len() as u64);
    Ok(())
}

#[test]
fn config_loaded_from_json_drives_pipeline() -> anyhow::Result<()> {
    let config = PipelineConfig::from_json_str(
        r#"{
            "bars": { "bar_kind": "dollar", "target_threshold": 500.0, "ema_window": 1 },
            "labels": { "horizon_bars": 2 }
        }"#,
    )?;
    let ticks = make_ticks(&[10.00, 10.50, 10.40, 11.00, 12.00], &[100; 5]);
    let output = process_partition(&key("JSON", 9), &ticks, &config)?;
    assert_eq!(output.bars.len(), 4);
    Ok(())
}
