use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ByteRecord, ReaderBuilder};
use tracing::info;

use crate::catalog::{Catalog, FoodFilter};
use crate::error::{NutriError, Result};
use crate::models::{FoodId, FoodItem, Nutrient, NutrientAmount, NutrientId};

const NUTRIENT_DEFINITIONS: &str = "NUTR_DEF.txt";
const FOOD_DESCRIPTIONS: &str = "FOOD_DES.txt";
const NUTRIENT_DATA: &str = "NUT_DATA.txt";

/// The SR release describes both energy rows as "Energy".
const ENERGY_KCAL_ID: NutrientId = 208;
const ENERGY_KJ_ID: NutrientId = 268;

/// Paths to the three SR flat files used to build a catalog.
#[derive(Debug, Clone)]
pub struct UsdaFiles {
    pub nutrient_definitions: PathBuf,
    pub food_descriptions: PathBuf,
    pub nutrient_data: PathBuf,
}

impl UsdaFiles {
    /// Standard file names inside an extracted SR release directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            nutrient_definitions: dir.join(NUTRIENT_DEFINITIONS),
            food_descriptions: dir.join(FOOD_DESCRIPTIONS),
            nutrient_data: dir.join(NUTRIENT_DATA),
        }
    }
}

/// Build a catalog from SR flat files on disk.
pub fn load_usda(files: &UsdaFiles, filter: &FoodFilter) -> Result<Catalog> {
    let catalog = read_usda(
        File::open(&files.nutrient_definitions)?,
        File::open(&files.food_descriptions)?,
        File::open(&files.nutrient_data)?,
        filter,
    )?;

    info!(
        "Imported {} nutrients and {} foods from SR files",
        catalog.len_nutrients(),
        catalog.len_foods()
    );
    Ok(catalog)
}

/// Build a catalog from SR records: `^`-separated, text wrapped in `~`.
pub fn read_usda<A: Read, B: Read, C: Read>(
    nutrient_definitions: A,
    food_descriptions: B,
    nutrient_data: C,
    filter: &FoodFilter,
) -> Result<Catalog> {
    let nutrients = read_nutrient_definitions(nutrient_definitions)?;
    let known: HashSet<NutrientId> = nutrients.iter().map(|n| n.id).collect();

    let mut foods = read_food_descriptions(food_descriptions, filter)?;
    read_nutrient_data(nutrient_data, &known, &mut foods)?;

    Catalog::new(nutrients, foods.into_values().collect())
}

fn sr_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'^')
        .quote(b'~')
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

fn line_of(record: &ByteRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Latin-1 maps each byte to the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Text field, decoded from Latin-1.
fn text(record: &ByteRecord, idx: usize, file: &str) -> Result<String> {
    record
        .get(idx)
        .map(|bytes| latin1(bytes).trim().to_string())
        .ok_or_else(|| NutriError::MalformedRecord {
            file: file.to_string(),
            line: line_of(record),
            reason: format!("missing field {}", idx),
        })
}

fn number<T: FromStr>(record: &ByteRecord, idx: usize, file: &str) -> Result<T> {
    let raw = text(record, idx, file)?;
    raw.parse().map_err(|_| NutriError::MalformedRecord {
        file: file.to_string(),
        line: line_of(record),
        reason: format!("field {} is not a number: {:?}", idx, raw),
    })
}

/// Descriptions such as "18:1 undifferentiated" start with a lipid code.
fn is_lipid_code(description: &str) -> bool {
    let mut parts = description.splitn(2, ':');
    let head = parts.next().unwrap_or("");
    let tail = match parts.next() {
        Some(t) => t,
        None => return false,
    };
    !head.is_empty()
        && head.bytes().all(|b| b.is_ascii_digit())
        && tail.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Contains a parenthesised three-letter abbreviation such as "(DHA)".
fn has_abbreviation(description: &str) -> bool {
    description.as_bytes().windows(5).any(|w| {
        w[0] == b'('
            && w[4] == b')'
            && w[1..4]
                .iter()
                .all(|&b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

fn read_nutrient_definitions<R: Read>(input: R) -> Result<Vec<Nutrient>> {
    let mut nutrients = Vec::new();

    for record in sr_reader(input).byte_records() {
        let record = record?;
        let id: NutrientId = number(&record, 0, NUTRIENT_DEFINITIONS)?;
        let units = text(&record, 1, NUTRIENT_DEFINITIONS)?;
        let mut description = text(&record, 3, NUTRIENT_DEFINITIONS)?;

        // Keep only the lipid codes that carry a common abbreviation
        if is_lipid_code(&description) && !has_abbreviation(&description) {
            continue;
        }

        if id == ENERGY_KCAL_ID {
            description = "Energy, kcal".to_string();
        } else if id == ENERGY_KJ_ID {
            description = "Energy, kJ".to_string();
        }

        nutrients.push(Nutrient {
            id,
            units,
            description,
        });
    }

    Ok(nutrients)
}

fn read_food_descriptions<R: Read>(
    input: R,
    filter: &FoodFilter,
) -> Result<BTreeMap<FoodId, FoodItem>> {
    let mut foods = BTreeMap::new();

    for record in sr_reader(input).byte_records() {
        let record = record?;
        let id: FoodId = number(&record, 0, FOOD_DESCRIPTIONS)?;
        let group = text(&record, 1, FOOD_DESCRIPTIONS)?;
        let description = text(&record, 2, FOOD_DESCRIPTIONS)?;
        let manufacturer = text(&record, 5, FOOD_DESCRIPTIONS).unwrap_or_default();

        if filter.excludes(&group, &description, &manufacturer) {
            continue;
        }

        if foods.contains_key(&id) {
            return Err(NutriError::DuplicateFood(id));
        }

        foods.insert(
            id,
            FoodItem {
                id,
                group,
                description,
                manufacturer,
                nutrients: Vec::new(),
            },
        );
    }

    Ok(foods)
}

fn read_nutrient_data<R: Read>(
    input: R,
    known: &HashSet<NutrientId>,
    foods: &mut BTreeMap<FoodId, FoodItem>,
) -> Result<()> {
    for record in sr_reader(input).byte_records() {
        let record = record?;
        let food_id: FoodId = number(&record, 0, NUTRIENT_DATA)?;
        let nutrient_id: NutrientId = number(&record, 1, NUTRIENT_DATA)?;
        let per_100g: f64 = number(&record, 2, NUTRIENT_DATA)?;
        let data_points: u32 = number(&record, 3, NUTRIENT_DATA)?;

        if !known.contains(&nutrient_id) {
            continue;
        }

        if let Some(food) = foods.get_mut(&food_id) {
            food.nutrients.push(NutrientAmount::from_per_100g(
                nutrient_id,
                per_100g,
                data_points,
            ));
        }
    }

    Ok(())
}
