use chrono::{Days, NaiveDate};

use super::model::{Column, ColumnData, Table};

/// Rows in the generated sample dataset.
pub const SAMPLE_ROWS: usize = 1000;

const PRODUCTS: &[&str] = &["Electronics", "Clothing", "Home Goods", "Grocery"];
const REGIONS: &[&str] = &["North", "South", "East", "West"];

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
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

    /// Uniform integer in `[0, bound)`.
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Generate the fallback sales dataset used when no file is loaded:
/// random daily sales over 2022–2023 across four products and regions.
/// Deterministic for a given seed.
pub fn generate_sample_table(seed: u64) -> Table {
    let mut rng = SimpleRng::new(seed);

    let start = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date");
    let span_days = (end - start).num_days() as u64 + 1;

    let mut dates = Vec::with_capacity(SAMPLE_ROWS);
    let mut products = Vec::with_capacity(SAMPLE_ROWS);
    let mut regions = Vec::with_capacity(SAMPLE_ROWS);
    let mut sales = Vec::with_capacity(SAMPLE_ROWS);
    let mut units = Vec::with_capacity(SAMPLE_ROWS);
    let mut customers = Vec::with_capacity(SAMPLE_ROWS);

    for _ in 0..SAMPLE_ROWS {
        let offset = rng.below(span_days);
        // start + offset stays within 2022..=2023 by construction
        let date = start
            .checked_add_days(Days::new(offset))
            .expect("date within sample span");

        dates.push(Some(date));
        products.push(Some(
            PRODUCTS[rng.below(PRODUCTS.len() as u64) as usize].to_string(),
        ));
        regions.push(Some(
            REGIONS[rng.below(REGIONS.len() as u64) as usize].to_string(),
        ));
        sales.push(Some((rng.gauss(100.0, 30.0) * 100.0).round() / 100.0));
        units.push(Some(1.0 + rng.below(9) as f64));
        customers.push(Some(1000.0 + rng.below(9000) as f64));
    }

    Table::new(vec![
        Column {
            name: "date".into(),
            data: ColumnData::Date(dates),
        },
        Column {
            name: "product".into(),
            data: ColumnData::Categorical(products),
        },
        Column {
            name: "region".into(),
            data: ColumnData::Categorical(regions),
        },
        Column {
            name: "sales_amount".into(),
            data: ColumnData::Numeric(sales),
        },
        Column {
            name: "units_sold".into(),
            data: ColumnData::Numeric(units),
        },
        Column {
            name: "customer_id".into(),
            data: ColumnData::Numeric(customers),
        },
    ])
}
