use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::{Destination, OfferGroup, TripPoint};

/// Contents of the trip data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub points: Vec<TripPoint>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub offers: Vec<OfferGroup>,
}

pub fn load_seed(path: &Path) -> anyhow::Result<SeedData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read trip data '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse trip data '{}'", path.display()))
}

pub fn save_seed(path: &Path, seed: &SeedData) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(seed)?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write trip data '{}'", path.display()))
}
