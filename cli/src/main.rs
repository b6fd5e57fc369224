//! trade_stats - compare simulated and historical trade series
//!
//! Resamples a simulated trade log and a historical trade series onto a
//! common time-bucket grid and prints a merged CSV to stdout, for checking
//! how closely a simulated market tracks the real one.
//!
//! Inputs:
//! - bucket width in whole seconds
//! - simulated trade log: JSON lines, one
//!   `{"time": <ns>, "price": <minor units>, "size": <shares>}` per line
//! - historical trades: CSV, either tick data (`time,price,size`) or
//!   aggregated bars (`time,open,high,low,close,volume`), detected from
//!   the header
//!
//! With tick-level history the output holds size-weighted price means and
//! deviations for both series; with aggregated history it holds OHLC and
//! volume side by side. Both series are clipped to the 09:30-16:30
//! comparison window and empty buckets are forward-filled.
//!
//! Diagnostics go to stderr; the CSV goes to stdout. Bad usage exits 1,
//! unreadable or empty input exits 2.

use serde::Deserialize;
use std::env;
use std::fs;
use std::process::ExitCode;
use thiserror::Error;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// 09:30, in nanoseconds from midnight: start of the comparison window.
const WINDOW_START_NS: u64 = 34_200 * NANOS_PER_SEC;

/// 16:30, in nanoseconds from midnight: end of the comparison window.
const WINDOW_END_NS: u64 = 59_400 * NANOS_PER_SEC;

/// Errors that abort the comparison
#[derive(Debug, Error)]
enum StatsError {
    #[error("usage")]
    Usage,

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("{path}:{line}: bad record: {detail}")]
    BadRecord {
        path: String,
        line: usize,
        detail: String,
    },

    #[error("unrecognized historical header: {0}")]
    UnknownHeader(String),

    #[error("there appear to be no simulated trades")]
    NoSimulatedTrades,

    #[error("there appear to be no historical trades")]
    NoHistoricalTrades,

    #[error("bucket width must be a positive number of seconds")]
    BadBucketWidth,
}

/// One simulated trade as persisted by the exchange's trade log.
#[derive(Debug, Clone, Copy, Deserialize)]
struct TradeRecord {
    /// Nanoseconds from midnight
    time: u64,
    /// Price in minor currency units
    price: i64,
    /// Shares traded
    size: i64,
}

/// One trade observation in comparison units (currency, shares).
#[derive(Debug, Clone, Copy)]
struct Tick {
    time: u64,
    price: f64,
    size: f64,
}

/// One aggregated bar of historical data.
#[derive(Debug, Clone, Copy)]
struct Bar {
    time: u64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Historical input, whichever shape the file carried.
enum Historical {
    Ticks(Vec<Tick>),
    Bars(Vec<Bar>),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(StatsError::Usage) => {
            let program = env::args().next().unwrap_or_else(|| "trade_stats".to_string());
            eprintln!("Usage: {} <bucket seconds> <simulated trade log> <historical trades CSV>", program);
            eprintln!("    Example: {} 60 logs/exchange_trades.jsonl data/trades_20140128.csv", program);
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<(), StatsError> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        return Err(StatsError::Usage);
    }

    let bucket_secs: u64 = args[1].parse().map_err(|_| StatsError::BadBucketWidth)?;
    if bucket_secs == 0 {
        return Err(StatsError::BadBucketWidth);
    }
    let width_ns = bucket_secs * NANOS_PER_SEC;

    eprintln!("[+] Loading {}", args[2]);
    let simulated = read_simulated(&args[2])?;
    eprintln!("[+] Loading {}", args[3]);
    let historical = read_historical(&args[3])?;

    let simulated = clip_window(simulated);
    if simulated.is_empty() {
        return Err(StatsError::NoSimulatedTrades);
    }

    let mut stdout = String::new();
    match historical {
        Historical::Ticks(hist) => {
            let hist = clip_window(hist);
            if hist.is_empty() {
                return Err(StatsError::NoHistoricalTrades);
            }
            render_tick_comparison(&mut stdout, &simulated, &hist, width_ns);
        }
        Historical::Bars(bars) => {
            let bars: Vec<Bar> = bars
                .into_iter()
                .filter(|b| (WINDOW_START_NS..WINDOW_END_NS).contains(&b.time))
                .collect();
            if bars.is_empty() {
                return Err(StatsError::NoHistoricalTrades);
            }
            render_bar_comparison(&mut stdout, &simulated, &bars, width_ns);
        }
    }
    print!("{}", stdout);
    Ok(())
}

/// Read the simulated trade log: one JSON record per line.
fn read_simulated(path: &str) -> Result<Vec<Tick>, StatsError> {
    let text = fs::read_to_string(path).map_err(|source| StatsError::Read {
        path: path.to_string(),
        source,
    })?;

    let mut ticks = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: TradeRecord =
            serde_json::from_str(line).map_err(|err| StatsError::BadRecord {
                path: path.to_string(),
                line: index + 1,
                detail: err.to_string(),
            })?;
        ticks.push(Tick {
            time: record.time,
            // minor units → currency, to match the historical series
            price: record.price as f64 / 100.0,
            size: record.size as f64,
        });
    }
    Ok(ticks)
}

/// Read historical trades, sniffing tick vs. aggregated format from the
/// CSV header.
fn read_historical(path: &str) -> Result<Historical, StatsError> {
    let text = fs::read_to_string(path).map_err(|source| StatsError::Read {
        path: path.to_string(),
        source,
    })?;

    let mut lines = text.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line.trim().to_ascii_lowercase(),
            None => return Err(StatsError::NoHistoricalTrades),
        }
    };

    let columns: Vec<&str> = header.split(',').map(|c| c.trim()).collect();
    let is_ticks = columns == ["time", "price", "size"];
    let is_bars = columns == ["time", "open", "high", "low", "close", "volume"];
    if !is_ticks && !is_bars {
        return Err(StatsError::UnknownHeader(header));
    }

    let mut ticks = Vec::new();
    let mut bars = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        let bad = |detail: &str| StatsError::BadRecord {
            path: path.to_string(),
            line: index + 1,
            detail: detail.to_string(),
        };
        if fields.len() != columns.len() {
            return Err(bad("wrong number of fields"));
        }

        let time: u64 = fields[0].parse().map_err(|_| bad("bad time"))?;
        let number = |field: &str| -> Result<f64, StatsError> {
            field.parse::<f64>().map_err(|_| bad("bad number"))
        };

        if is_ticks {
            ticks.push(Tick {
                time,
                price: number(fields[1])?,
                size: number(fields[2])?,
            });
        } else {
            bars.push(Bar {
                time,
                open: number(fields[1])?,
                high: number(fields[2])?,
                low: number(fields[3])?,
                close: number(fields[4])?,
                volume: number(fields[5])?,
            });
        }
    }

    if is_ticks {
        Ok(Historical::Ticks(ticks))
    } else {
        Ok(Historical::Bars(bars))
    }
}

/// Keep only trades inside the comparison window.
fn clip_window(ticks: Vec<Tick>) -> Vec<Tick> {
    ticks
        .into_iter()
        .filter(|t| (WINDOW_START_NS..WINDOW_END_NS).contains(&t.time))
        .collect()
}

/// Bucket index grid covering the comparison window.
fn bucket_range(width_ns: u64) -> std::ops::Range<u64> {
    (WINDOW_START_NS / width_ns)..((WINDOW_END_NS - 1) / width_ns + 1)
}

/// Size-weighted mean price of a bucket.
fn weighted_mean(ticks: &[Tick]) -> Option<f64> {
    let total_size: f64 = ticks.iter().map(|t| t.size).sum();
    if total_size == 0.0 {
        return None;
    }
    let weighted: f64 = ticks.iter().map(|t| t.price * t.size).sum();
    Some(weighted / total_size)
}

/// Deviation statistic of a bucket: sample standard deviation of the
/// size-weighted prices, normalized by total size.
fn weighted_std(ticks: &[Tick]) -> Option<f64> {
    if ticks.len() < 2 {
        return None;
    }
    let total_size: f64 = ticks.iter().map(|t| t.size).sum();
    if total_size == 0.0 {
        return None;
    }

    let products: Vec<f64> = ticks.iter().map(|t| t.price * t.size).collect();
    let mean = products.iter().sum::<f64>() / products.len() as f64;
    let variance = products
        .iter()
        .map(|p| (p - mean) * (p - mean))
        .sum::<f64>()
        / (products.len() - 1) as f64;
    Some(variance.sqrt() / total_size)
}

/// Collect the ticks of each bucket on the window grid.
fn bucketize(ticks: &[Tick], width_ns: u64) -> Vec<Vec<Tick>> {
    let range = bucket_range(width_ns);
    let first = range.start;
    let mut buckets: Vec<Vec<Tick>> = range.map(|_| Vec::new()).collect();
    for tick in ticks {
        let index = (tick.time / width_ns - first) as usize;
        buckets[index].push(*tick);
    }
    buckets
}

/// Replace each missing value with the last seen one.
fn forward_fill(column: &mut [Option<f64>]) {
    let mut last = None;
    for value in column.iter_mut() {
        match value {
            Some(v) => last = Some(*v),
            None => *value = last,
        }
    }
}

/// Render a CSV cell, empty when no value has been seen yet.
fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Tick-mode output: weighted mean/std for both series per bucket.
fn render_tick_comparison(out: &mut String, sim: &[Tick], hist: &[Tick], width_ns: u64) {
    let sim_buckets = bucketize(sim, width_ns);
    let hist_buckets = bucketize(hist, width_ns);

    let mut columns: [Vec<Option<f64>>; 4] = Default::default();
    for (sim_bucket, hist_bucket) in sim_buckets.iter().zip(hist_buckets.iter()) {
        columns[0].push(weighted_mean(sim_bucket));
        columns[1].push(weighted_std(sim_bucket));
        columns[2].push(weighted_mean(hist_bucket));
        columns[3].push(weighted_std(hist_bucket));
    }
    for column in columns.iter_mut() {
        forward_fill(column);
    }

    out.push_str("bucket_start_ns,SimPriceMean,SimPriceStd,HistPriceMean,HistPriceStd\n");
    for (row, bucket) in bucket_range(width_ns).enumerate() {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            bucket * width_ns,
            cell(columns[0][row]),
            cell(columns[1][row]),
            cell(columns[2][row]),
            cell(columns[3][row]),
        ));
    }
}

/// OHLC per bucket of a tick series; volume is 0 for empty buckets.
fn aggregate_bars(ticks: &[Tick], width_ns: u64) -> Vec<(Option<Bar>, f64)> {
    bucketize(ticks, width_ns)
        .into_iter()
        .map(|bucket| {
            let volume: f64 = bucket.iter().map(|t| t.size).sum();
            let bar = bucket.first().map(|first| {
                let mut bar = Bar {
                    time: first.time,
                    open: first.price,
                    high: first.price,
                    low: first.price,
                    close: first.price,
                    volume,
                };
                for tick in &bucket {
                    bar.high = bar.high.max(tick.price);
                    bar.low = bar.low.min(tick.price);
                    bar.close = tick.price;
                }
                bar
            });
            (bar, volume)
        })
        .collect()
}

/// Bar-mode output: simulated OHLC/volume next to historical aggregates.
fn render_bar_comparison(out: &mut String, sim: &[Tick], hist: &[Bar], width_ns: u64) {
    let sim_bars = aggregate_bars(sim, width_ns);

    // Combine historical bars landing in the same bucket.
    let range = bucket_range(width_ns);
    let first = range.start;
    let mut hist_buckets: Vec<Option<Bar>> = range.map(|_| None).collect();
    for bar in hist {
        let index = (bar.time / width_ns - first) as usize;
        hist_buckets[index] = Some(match hist_buckets[index] {
            None => *bar,
            Some(existing) => Bar {
                time: existing.time,
                open: existing.open,
                high: existing.high.max(bar.high),
                low: existing.low.min(bar.low),
                close: bar.close,
                volume: existing.volume + bar.volume,
            },
        });
    }

    let mut columns: [Vec<Option<f64>>; 9] = Default::default();
    for ((sim_bar, _), hist_bar) in sim_bars.iter().zip(hist_buckets.iter()) {
        columns[0].push(sim_bar.map(|b| b.open));
        columns[1].push(sim_bar.map(|b| b.high));
        columns[2].push(sim_bar.map(|b| b.low));
        columns[3].push(sim_bar.map(|b| b.close));
        columns[4].push(hist_bar.map(|b| b.open));
        columns[5].push(hist_bar.map(|b| b.high));
        columns[6].push(hist_bar.map(|b| b.low));
        columns[7].push(hist_bar.map(|b| b.close));
        columns[8].push(hist_bar.map(|b| b.volume));
    }
    for column in columns.iter_mut() {
        forward_fill(column);
    }

    out.push_str(
        "bucket_start_ns,SimOpen,SimHigh,SimLow,SimClose,SimVolume,HistOpen,HistHigh,HistLow,HistClose,HistVolume\n",
    );
    for (row, bucket) in bucket_range(width_ns).enumerate() {
        let sim_volume = sim_bars[row].1;
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            bucket * width_ns,
            cell(columns[0][row]),
            cell(columns[1][row]),
            cell(columns[2][row]),
            cell(columns[3][row]),
            sim_volume,
            cell(columns[4][row]),
            cell(columns[5][row]),
            cell(columns[6][row]),
            cell(columns[7][row]),
            cell(columns[8][row]),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(time: u64, price: f64, size: f64) -> Tick {
        Tick { time, price, size }
    }

    #[test]
    fn test_weighted_mean_weights_by_size() {
        let ticks = vec![tick(0, 10.0, 1.0), tick(1, 20.0, 3.0)];
        // (10*1 + 20*3) / 4 = 17.5
        assert_eq!(weighted_mean(&ticks), Some(17.5));
    }

    #[test]
    fn test_weighted_mean_of_empty_bucket() {
        assert_eq!(weighted_mean(&[]), None);
    }

    #[test]
    fn test_weighted_std_needs_two_points() {
        assert_eq!(weighted_std(&[tick(0, 10.0, 1.0)]), None);
        let two = vec![tick(0, 10.0, 1.0), tick(1, 20.0, 1.0)];
        assert!(weighted_std(&two).unwrap() > 0.0);
    }

    #[test]
    fn test_bucket_grid_covers_window() {
        let width = 60 * NANOS_PER_SEC;
        let range = bucket_range(width);
        // 09:30 to 16:30 is seven hours of one-minute buckets
        assert_eq!(range.end - range.start, 7 * 60);
    }

    #[test]
    fn test_bucketize_places_ticks_on_grid() {
        let width = 60 * NANOS_PER_SEC;
        let ticks = vec![
            tick(WINDOW_START_NS, 10.0, 1.0),
            tick(WINDOW_START_NS + 59 * NANOS_PER_SEC, 11.0, 1.0),
            tick(WINDOW_START_NS + 60 * NANOS_PER_SEC, 12.0, 1.0),
        ];
        let buckets = bucketize(&ticks, width);
        assert_eq!(buckets[0].len(), 2);
        assert_eq!(buckets[1].len(), 1);
    }

    #[test]
    fn test_forward_fill() {
        let mut column = vec![None, Some(1.0), None, None, Some(2.0), None];
        forward_fill(&mut column);
        assert_eq!(
            column,
            vec![None, Some(1.0), Some(1.0), Some(1.0), Some(2.0), Some(2.0)]
        );
    }

    #[test]
    fn test_aggregate_bars_ohlc() {
        let width = 60 * NANOS_PER_SEC;
        let ticks = vec![
            tick(WINDOW_START_NS, 10.0, 1.0),
            tick(WINDOW_START_NS + 1, 14.0, 2.0),
            tick(WINDOW_START_NS + 2, 8.0, 1.0),
            tick(WINDOW_START_NS + 3, 12.0, 1.0),
        ];
        let bars = aggregate_bars(&ticks, width);
        let (bar, volume) = (bars[0].0.unwrap(), bars[0].1);
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.high, 14.0);
        assert_eq!(bar.low, 8.0);
        assert_eq!(bar.close, 12.0);
        assert_eq!(volume, 5.0);

        // Empty bucket: no bar, zero volume
        assert!(bars[1].0.is_none());
        assert_eq!(bars[1].1, 0.0);
    }

    #[test]
    fn test_clip_window_bounds() {
        let ticks = vec![
            tick(WINDOW_START_NS - 1, 1.0, 1.0),
            tick(WINDOW_START_NS, 2.0, 1.0),
            tick(WINDOW_END_NS - 1, 3.0, 1.0),
            tick(WINDOW_END_NS, 4.0, 1.0),
        ];
        let clipped = clip_window(ticks);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0].price, 2.0);
        assert_eq!(clipped[1].price, 3.0);
    }
}
