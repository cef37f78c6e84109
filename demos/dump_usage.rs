// Print one chart's datasets for a usage log as JSON, streaming the whole file.
//
// Usage: cargo run --example dump_usage -- [LOG_PATH] [KIND]
//   LOG_PATH  default: ./log/log_daily
//   KIND      cpu | memory | io | net (default: cpu)

use cephylas::datasets::{DOWNSAMPLE_COUNT, build_chart};
use cephylas::log_reader::SnapshotCursor;
use cephylas::models::ChartKind;
use cephylas::usage::UsageCalculator;
use futures_util::{StreamExt, pin_mut};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("./log/log_daily");
    let kind = args.get(2).map(String::as_str).unwrap_or("cpu");
    let kind = ChartKind::parse(kind).ok_or_else(|| anyhow::anyhow!("unknown chart: {kind}"))?;

    let stream = SnapshotCursor::open(path).await?.into_stream();
    pin_mut!(stream);
    let mut calc = UsageCalculator::default();
    while let Some(snapshot) = stream.next().await {
        calc.push(snapshot?);
    }

    let chart = build_chart(&calc.finish(), kind, DOWNSAMPLE_COUNT);
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}
