#![allow(dead_code)]

use chrono::NaiveDate;
pub use barrier_returns::domain::ohlcv::PriceBar;
use barrier_returns::domain::config::SimulationConfig;
use barrier_returns::domain::signal::SignalStream;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from 2024-01-01 with high/low half a point around the close.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            high: close + 0.5,
            low: close - 0.5,
            close: *close,
        })
        .collect()
}

/// Sparse stream of length `n` with the given `(index, code)` values.
pub fn stream(n: usize, values: &[(usize, i8)]) -> SignalStream {
    let mut s = vec![None; n];
    for &(i, code) in values {
        s[i] = Some(code);
    }
    s
}

/// take_profit 0.02, stop_loss 0.03, fee 0.001, no delay, no minimum.
pub fn sample_config() -> SimulationConfig {
    SimulationConfig::new(0.03, 0.02, 0.001, 0, 0.0)
}

/// Long entries on 0, 3, 6 and short entries on 4, 9, 12. Every entry
/// closes at 100; longs take profit on 2, 5 and 8, shorts stop out on 5
/// and take profit on 11 and 14.
pub const DUAL_CLOSES: [f64; 15] = [
    100.0, 101.0, 103.0, 100.0, 100.0, 103.0, 100.0, 101.0, 103.0, 100.0, 99.0, 97.0, 100.0,
    99.0, 97.0,
];

pub fn dual_side_inputs() -> (Vec<PriceBar>, SignalStream, SignalStream) {
    let n = DUAL_CLOSES.len();
    (
        make_bars(&DUAL_CLOSES),
        stream(n, &[(0, -1), (3, -1), (6, -1)]),
        stream(n, &[(4, -2), (9, -2), (12, -2)]),
    )
}

pub const SAMPLE_INI: &str = r#"
[simulation]
stop_loss = 0.03
take_profit = 0.02
fee = 0.001
minimum_trades = 0
delay = 0
"#;

/// `dual_side_inputs` as CSV, rows deliberately out of order.
pub fn dual_side_csv() -> String {
    let (bars, long, short) = dual_side_inputs();
    let cell = |v: Option<i8>| v.map(|c| c.to_string()).unwrap_or_default();
    let mut rows: Vec<String> = bars
        .iter()
        .zip(long.iter().zip(short.iter()))
        .map(|(b, (l, s))| {
            format!(
                "{},{},{},{},{},{}",
                b.date.format("%Y-%m-%d"),
                b.high,
                b.low,
                b.close,
                cell(*l),
                cell(*s)
            )
        })
        .collect();
    rows.reverse();
    format!(
        "date,high,low,close,long_entries,short_entries\n{}\n",
        rows.join("\n")
    )
}
