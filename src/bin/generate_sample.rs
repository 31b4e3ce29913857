use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const MONTHS: usize = 12;

fn month_label(i: usize) -> String {
    format!("2024-{:02}", i + 1)
}

/// Revenue drifts down while cost climbs, with one cost spike in month 9.
fn write_finance_parquet(rng: &mut SimpleRng, output_path: &str) -> anyhow::Result<()> {
    let mut months = Vec::with_capacity(MONTHS);
    let mut revenue = Vec::with_capacity(MONTHS);
    let mut cost = Vec::with_capacity(MONTHS);
    let mut headcount = Vec::with_capacity(MONTHS);

    for i in 0..MONTHS {
        months.push(month_label(i));
        revenue.push(120_000.0 - 1_500.0 * i as f64 + rng.gauss(0.0, 1_000.0));
        let spike = if i == 8 { 60_000.0 } else { 0.0 };
        cost.push(70_000.0 + 2_000.0 * i as f64 + spike + rng.gauss(0.0, 800.0));
        headcount.push(40 + (i as i64) / 4);
    }
    let profit: Vec<f64> = revenue.iter().zip(&cost).map(|(r, c)| r - c).collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("month", DataType::Utf8, false),
        Field::new("revenue", DataType::Float64, false),
        Field::new("cost", DataType::Float64, false),
        Field::new("profit", DataType::Float64, false),
        Field::new("headcount", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(months)),
            Arc::new(Float64Array::from(revenue)),
            Arc::new(Float64Array::from(cost)),
            Arc::new(Float64Array::from(profit)),
            Arc::new(Int64Array::from(headcount)),
        ],
    )?;
    println!("{}", pretty_format_batches(std::slice::from_ref(&batch))?);

    let file = std::fs::File::create(output_path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[derive(Serialize)]
struct MarketingRow {
    date: String,
    channel: &'static str,
    traffic: f64,
    leads: f64,
    conversion: f64,
    churn: f64,
}

/// Traffic grows, conversion erodes and churn creeps up.
fn write_marketing_csv(rng: &mut SimpleRng, output_path: &str) -> anyhow::Result<()> {
    let channels = ["search", "social", "email"];
    let mut writer = csv::Writer::from_path(output_path)?;

    for i in 0..MONTHS {
        let traffic = 50_000.0 * (1.0 + 0.03 * i as f64) + rng.gauss(0.0, 500.0);
        writer.serialize(MarketingRow {
            date: format!("{}-01", month_label(i)),
            channel: channels[i % channels.len()],
            traffic: traffic.round(),
            leads: (traffic * 0.02).round(),
            conversion: ((0.12 - 0.004 * i as f64) * 1000.0).round() / 1000.0,
            churn: ((0.021 + 0.001 * i as f64) * 1000.0).round() / 1000.0,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let finance_path = "sample_finance.parquet";
    write_finance_parquet(&mut rng, finance_path)?;
    println!("Wrote {MONTHS} months of finance data to {finance_path}");

    let marketing_path = "sample_marketing.csv";
    write_marketing_csv(&mut rng, marketing_path)?;
    println!("Wrote {MONTHS} months of marketing data to {marketing_path}");

    Ok(())
}
