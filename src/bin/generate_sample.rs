use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
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

    /// Uniform in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const GENRES: [&str; 12] = [
    "Dramas",
    "Comedies",
    "Documentaries",
    "International Movies",
    "Action & Adventure",
    "Kids' TV",
    "TV Dramas",
    "Crime TV Shows",
    "Horror Movies",
    "Romantic Movies",
    "Stand-Up Comedy",
    "Anime Series",
];
const COUNTRIES: [&str; 8] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "Brazil",
    "Portugal",
    "Spain",
];
const WORDS: [&str; 10] = [
    "Midnight", "River", "Echo", "Last", "Golden", "City", "Silent", "Summer", "Kingdom", "Road",
];

/// The genre cell in one of the encodings seen in real exports.
fn genre_cell(rng: &mut SimpleRng) -> Option<String> {
    let n = 1 + rng.below(3);
    let tags: Vec<&str> = (0..n).map(|_| rng.pick(&GENRES)).collect();
    match rng.below(10) {
        0 => None,
        1 => Some("[]".to_string()),
        2 => Some(format!("['{}'", tags.join("', '"))),
        3..=5 => Some(tags.join(", ")),
        _ => {
            let quoted: Vec<String> = tags
                .iter()
                .map(|t| {
                    if t.contains('\'') {
                        format!("\"{t}\"")
                    } else {
                        format!("'{t}'")
                    }
                })
                .collect();
            Some(format!("[{}]", quoted.join(", ")))
        }
    }
}

fn year_cell(rng: &mut SimpleRng) -> Option<String> {
    match rng.below(25) {
        0 => None,
        1 => Some("unknown".to_string()),
        2 => Some(format!("{}.0", 1990 + rng.below(35))),
        _ => Some((1942 + rng.below(80)).to_string()),
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_titles = 500;

    let mut titles: Vec<Option<String>> = Vec::with_capacity(n_titles);
    let mut types: Vec<Option<String>> = Vec::with_capacity(n_titles);
    let mut countries: Vec<Option<String>> = Vec::with_capacity(n_titles);
    let mut years: Vec<Option<String>> = Vec::with_capacity(n_titles);
    let mut genres: Vec<Option<String>> = Vec::with_capacity(n_titles);

    for i in 0..n_titles {
        titles.push(Some(format!(
            "{} {} {i}",
            rng.pick(&WORDS),
            rng.pick(&WORDS)
        )));
        types.push(match rng.below(20) {
            0 => None,
            1..=6 => Some("TV Show".to_string()),
            _ => Some("Movie".to_string()),
        });
        countries.push((rng.below(12) != 0).then(|| rng.pick(&COUNTRIES).to_string()));
        years.push(year_cell(&mut rng));
        genres.push(genre_cell(&mut rng));
    }

    let column = |values: Vec<Option<String>>| -> ArrayRef { Arc::new(StringArray::from(values)) };

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, true),
        Field::new("type", DataType::Utf8, true),
        Field::new("country", DataType::Utf8, true),
        Field::new("release_year", DataType::Utf8, true),
        Field::new("listed_in", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            column(titles),
            column(types),
            column(countries),
            column(years),
            column(genres),
        ],
    )
    .context("building record batch")?;

    let output_path = "sample_catalog.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!("Wrote {n_titles} titles to {output_path}");
    Ok(())
}
