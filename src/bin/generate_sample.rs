use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Menu with list prices.
const MENU: [(&str, f64); 8] = [
    ("Latte", 38.7),
    ("Americano with Milk", 33.8),
    ("Cappuccino", 38.7),
    ("Americano", 28.9),
    ("Hot Chocolate", 38.7),
    ("Cortado", 28.9),
    ("Espresso", 24.0),
    ("Cocoa", 38.7),
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn time_of_day(hour: usize) -> &'static str {
    match hour {
        0..=11 => "Morning",
        12..=16 => "Afternoon",
        _ => "Night",
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid start date");
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");

    let mut dates: Vec<i32> = Vec::new();
    let mut times: Vec<&str> = Vec::new();
    let mut months: Vec<String> = Vec::new();
    let mut weekdays: Vec<String> = Vec::new();
    let mut cash_types: Vec<&str> = Vec::new();
    let mut cards: Vec<Option<String>> = Vec::new();
    let mut coffees: Vec<&str> = Vec::new();
    let mut money: Vec<f64> = Vec::new();

    // Five months of trading, 5-15 cups a day.
    for day in 0..153 {
        let date = start + Days::new(day);
        let cups = 5 + rng.below(11);
        for _ in 0..cups {
            let (coffee, price) = MENU[rng.below(MENU.len())];
            let hour = 7 + rng.below(16);
            let paid_cash = rng.next_f64() < 0.08;

            dates.push((date - epoch).num_days() as i32);
            times.push(time_of_day(hour));
            months.push(date.format("%b").to_string());
            weekdays.push(date.weekday().to_string());
            cash_types.push(if paid_cash { "cash" } else { "card" });
            cards.push((!paid_cash).then(|| format!("ANON-0000-0000-{:04}", 1 + rng.below(400))));
            coffees.push(coffee);
            money.push(price);
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("time_of_day", DataType::Utf8, false),
        Field::new("month_name", DataType::Utf8, false),
        Field::new("weekday", DataType::Utf8, false),
        Field::new("cash_type", DataType::Utf8, false),
        Field::new("card", DataType::Utf8, true),
        Field::new("coffee_name", DataType::Utf8, false),
        Field::new("money", DataType::Float64, false),
    ]));

    let rows = dates.len();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(dates)),
        Arc::new(StringArray::from(times)),
        Arc::new(StringArray::from_iter_values(months)),
        Arc::new(StringArray::from_iter_values(weekdays)),
        Arc::new(StringArray::from(cash_types)),
        Arc::new(StringArray::from(cards)),
        Arc::new(StringArray::from(coffees)),
        Arc::new(Float64Array::from(money)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "Coffee_sales.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {rows} transactions to {output_path}");
}
