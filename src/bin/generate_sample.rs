use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

const ROWS: usize = 1000;
const PRODUCTS: &[&str] = &["Electronics", "Clothing", "Home Goods", "Grocery"];
const REGIONS: &[&str] = &["North", "South", "East", "West"];

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

    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date");
    let span_days = (end - start).num_days() as u64 + 1;

    let mut dates: Vec<String> = Vec::with_capacity(ROWS);
    let mut products: Vec<&str> = Vec::with_capacity(ROWS);
    let mut regions: Vec<&str> = Vec::with_capacity(ROWS);
    let mut sales: Vec<f64> = Vec::with_capacity(ROWS);
    let mut units: Vec<i64> = Vec::with_capacity(ROWS);
    let mut customers: Vec<i64> = Vec::with_capacity(ROWS);

    for _ in 0..ROWS {
        let date = start
            .checked_add_days(Days::new(rng.below(span_days)))
            .expect("date within sample span");
        dates.push(date.format("%Y-%m-%d").to_string());
        products.push(PRODUCTS[rng.below(PRODUCTS.len() as u64) as usize]);
        regions.push(REGIONS[rng.below(REGIONS.len() as u64) as usize]);
        sales.push((rng.gauss(100.0, 30.0) * 100.0).round() / 100.0);
        units.push(1 + rng.below(9) as i64);
        customers.push(1000 + rng.below(9000) as i64);
    }

    // ---- CSV ----
    let csv_path = "sample_sales.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "date",
            "product",
            "region",
            "sales_amount",
            "units_sold",
            "customer_id",
        ])
        .expect("Failed to write CSV header");
    for i in 0..ROWS {
        writer
            .write_record([
                dates[i].as_str(),
                products[i],
                regions[i],
                &format!("{:.2}", sales[i]),
                &units[i].to_string(),
                &customers[i].to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("product", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("sales_amount", DataType::Float64, false),
        Field::new("units_sold", DataType::Int64, false),
        Field::new("customer_id", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                dates.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(products.clone())),
            Arc::new(StringArray::from(regions.clone())),
            Arc::new(Float64Array::from(sales.clone())),
            Arc::new(Int64Array::from(units.clone())),
            Arc::new(Int64Array::from(customers.clone())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_sales.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {ROWS} rows to {csv_path} and {parquet_path}");
}
