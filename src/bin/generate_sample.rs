use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            // splitmix64
            x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = x;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            *slot = z ^ (z >> 31);
        }
        Self { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
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

/// One generated row. `None` marks a missing value.
struct Row {
    id: i64,
    hours: Option<f64>,
    score: Option<f64>,
    city: &'static str,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let cities = ["Lisbon", "Porto", "Recife", "Salvador"];

    // score ≈ 4.5 · hours + 38, with noise and a few gaps
    let rows: Vec<Row> = (0..120)
        .map(|i| {
            let hours = (rng.next_f64() * 10.0 * 100.0).round() / 100.0;
            let score = 4.5 * hours + 38.0 + rng.gauss(0.0, 3.0);
            Row {
                id: i,
                hours: (i % 37 != 5).then_some(hours),
                score: (i % 41 != 7).then_some((score * 10.0).round() / 10.0),
                city: cities[i as usize % cities.len()],
            }
        })
        .collect();

    write_csv("sample_data.csv", b',', &rows);
    write_csv("sample_data_semicolon.csv", b';', &rows);
    write_parquet("sample_data.parquet", &rows);

    println!(
        "Wrote {} rows to sample_data.csv, sample_data_semicolon.csv and sample_data.parquet",
        rows.len()
    );
}

fn write_csv(path: &str, delimiter: u8, rows: &[Row]) {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .expect("Failed to create CSV file");
    writer
        .write_record(["id", "hours_studied", "exam_score", "city"])
        .expect("Failed to write header");
    let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string());
    for row in rows {
        writer
            .write_record([
                row.id.to_string(),
                fmt(row.hours),
                fmt(row.score),
                row.city.to_string(),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &str, rows: &[Row]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("hours_studied", DataType::Float64, true),
        Field::new("exam_score", DataType::Float64, true),
        Field::new("city", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.hours).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.score).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.city).collect::<Vec<_>>())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
