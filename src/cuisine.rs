//! Cuisine labels and the keyword tagger used to prepare a corpus.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{RecommenderError, Result};
use crate::search::data_loader::{open_dataset, DatasetEncoding};

pub const CUISINE_COL: &str = "Cuisine";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cuisine {
    Indian,
    Japanese,
    Italian,
    Mexican,
    Chinese,
    Thai,
    Mediterranean,
    French,
    American,
    Asian,
    #[serde(rename = "Middle Eastern")]
    MiddleEastern,
    #[default]
    Other,
}

impl Cuisine {
    pub const ALL: [Cuisine; 12] = [
        Cuisine::Indian,
        Cuisine::Japanese,
        Cuisine::Italian,
        Cuisine::Mexican,
        Cuisine::Chinese,
        Cuisine::Thai,
        Cuisine::Mediterranean,
        Cuisine::French,
        Cuisine::American,
        Cuisine::Asian,
        Cuisine::MiddleEastern,
        Cuisine::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Cuisine::Indian => "Indian",
            Cuisine::Japanese => "Japanese",
            Cuisine::Italian => "Italian",
            Cuisine::Mexican => "Mexican",
            Cuisine::Chinese => "Chinese",
            Cuisine::Thai => "Thai",
            Cuisine::Mediterranean => "Mediterranean",
            Cuisine::French => "French",
            Cuisine::American => "American",
            Cuisine::Asian => "Asian",
            Cuisine::MiddleEastern => "Middle Eastern",
            Cuisine::Other => "Other",
        }
    }

    /// Lenient parse used for dataset cells: unknown or blank labels are `Other`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Cuisine::Other)
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cuisine {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Cuisine::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| RecommenderError::InvalidInput(format!("unknown cuisine '{s}'")))
    }
}

/// Keyword table used by the tagger. Order decides ties.
const CUISINE_PATTERNS: &[(Cuisine, &[&str])] = &[
    (
        Cuisine::Indian,
        &[
            "curry", "masala", "tikka", "tandoori", "biryani", "dal", "paneer", "naan", "samosa",
            "chutney", "raita", "korma", "vindaloo", "garam", "cardamom", "turmeric", "indian",
        ],
    ),
    (
        Cuisine::Japanese,
        &[
            "sushi", "sashimi", "teriyaki", "miso", "wasabi", "ramen", "udon", "tempura", "katsu",
            "edamame", "dashi", "japanese", "sake",
        ],
    ),
    (
        Cuisine::Italian,
        &[
            "pasta", "spaghetti", "linguine", "penne", "fettuccine", "lasagna", "pizza", "risotto",
            "pesto", "marinara", "parmesan", "mozzarella", "italian", "ravioli", "gnocchi",
            "carbonara", "alfredo",
        ],
    ),
    (
        Cuisine::Mexican,
        &[
            "taco", "burrito", "enchilada", "quesadilla", "fajita", "salsa", "guacamole",
            "tortilla", "mexican", "nacho", "tamale", "chipotle", "jalapeño", "poblano",
            "cilantro",
        ],
    ),
    (
        Cuisine::Chinese,
        &[
            "chow mein", "lo mein", "fried rice", "spring roll", "wonton", "szechuan", "hunan",
            "chinese", "stir fry", "hoisin", "oyster sauce",
        ],
    ),
    (
        Cuisine::Thai,
        &[
            "thai", "pad thai", "tom yum", "green curry", "red curry", "lemongrass", "galangal",
            "kaffir lime", "basil thai",
        ],
    ),
    (
        Cuisine::Mediterranean,
        &[
            "hummus", "falafel", "tahini", "greek", "mediterranean", "tzatziki", "kebab", "gyro",
            "couscous", "tabbouleh", "pita", "olive",
        ],
    ),
    (
        Cuisine::French,
        &[
            "french", "béarnaise", "hollandaise", "roux", "quiche", "crêpe", "croissant", "brie",
            "camembert", "provence",
        ],
    ),
    (
        Cuisine::American,
        &[
            "burger", "bbq", "barbecue", "fried chicken", "mac and cheese", "american", "southern",
            "cajun", "buffalo",
        ],
    ),
];

/// Tags a recipe from its name and raw ingredient text.
///
/// The best-scoring cuisine is accepted with two or more keyword hits, or with a
/// single hit when the cuisine label itself appears in the recipe name.
pub fn detect_cuisine(name: &str, ingredient_text: &str) -> Cuisine {
    let text = format!("{name} {ingredient_text}").to_lowercase();

    let mut best: Option<(Cuisine, usize)> = None;
    for (cuisine, keywords) in CUISINE_PATTERNS {
        let score = keywords.iter().filter(|k| text.contains(*k)).count();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((*cuisine, score));
        }
    }

    match best {
        Some((cuisine, score)) if score >= 2 => cuisine,
        Some((cuisine, _)) if name.to_lowercase().contains(&cuisine.label().to_lowercase()) => {
            cuisine
        }
        _ => Cuisine::Other,
    }
}

/// Rewrites a recipe CSV with a `Cuisine` column, replacing an existing one.
/// A gzipped input produces a gzipped output. Returns the number of tagged rows.
pub fn tag_corpus_file(input: &Path, output: &Path) -> Result<usize> {
    let (encoding, source) = open_dataset(input)?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(source);
    let mut headers = rdr.headers()?.clone();

    let name_idx = column_index(&headers, "Name")?;
    let parts_idx = column_index(&headers, "RecipeIngredientParts")?;
    let cuisine_idx = headers.iter().position(|h| h == CUISINE_COL);
    if cuisine_idx.is_none() {
        headers.push_field(CUISINE_COL);
    }

    let records = rdr.records().collect::<std::result::Result<Vec<StringRecord>, _>>()?;

    let tagged: Vec<StringRecord> = records
        .into_par_iter()
        .map(|record| {
            let cuisine = detect_cuisine(
                record.get(name_idx).unwrap_or_default(),
                record.get(parts_idx).unwrap_or_default(),
            );
            let mut fields: Vec<&str> = record.iter().collect();
            match cuisine_idx {
                Some(idx) if idx < fields.len() => fields[idx] = cuisine.label(),
                _ => fields.push(cuisine.label()),
            }
            StringRecord::from(fields)
        })
        .collect();

    let file = File::create(output)?;
    match encoding {
        DatasetEncoding::Plain => {
            write_records(file, &headers, &tagged)?;
        }
        DatasetEncoding::Gzip => {
            let encoder = write_records(GzEncoder::new(file, Compression::default()), &headers, &tagged)?;
            encoder.finish()?;
        }
    }

    info!(rows = tagged.len(), output = ?output, ?encoding, "tagged corpus with cuisines");
    Ok(tagged.len())
}

fn write_records<W: Write>(sink: W, headers: &StringRecord, records: &[StringRecord]) -> Result<W> {
    let mut wtr = WriterBuilder::new().from_writer(sink);
    wtr.write_record(headers)?;
    for record in records {
        wtr.write_record(record)?;
    }
    wtr.into_inner().map_err(|e| RecommenderError::Io(e.into_error()))
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RecommenderError::MissingColumn(name.to_string()))
}
