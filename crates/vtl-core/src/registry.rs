//! Competency name → display color registry.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::ValidationError;

/// Label reserved for trash segments.
pub const TRASH_LABEL: &str = "Relleno";

/// Fixed color of the trash label.
pub const TRASH_COLOR: &str = "#64748b";

/// Categories every registry starts with.
pub const DEFAULT_COMPETENCIES: [(&str, &str); 6] = [
    ("Liderazgo", "#38bdf8"),
    ("Comunicación", "#a855f7"),
    ("Trabajo en Equipo", "#4ade80"),
    ("Pensamiento Crítico", "#f97316"),
    ("Adaptabilidad", "#f472b6"),
    (TRASH_LABEL, TRASH_COLOR),
];

/// Colors handed out to categories that were not seeded.
pub const PALETTE: [&str; 8] = [
    "#38bdf8", "#a855f7", "#4ade80", "#f97316", "#f472b6", "#fbbf24", "#22d3ee", "#ef4444",
];

/// Append-only mapping from competency name to color.
///
/// Lookups of unknown names assign a random palette color and keep it, so
/// the same name always resolves to the same color afterward.
#[derive(Debug, Clone)]
pub struct CompetencyRegistry {
    entries: BTreeMap<String, String>,
    rng: StdRng,
}

impl Default for CompetencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CompetencyRegistry {
    /// Creates a registry seeded with the defaults and an entropy-seeded
    /// color picker.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a registry whose fallback colors are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let entries = DEFAULT_COMPETENCIES
            .iter()
            .map(|&(name, color)| (name.to_string(), color.to_string()))
            .collect();
        Self { entries, rng }
    }

    /// Color of `name` if it is registered.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Color of `name`, registering it with a random palette color on a miss.
    pub fn lookup(&mut self, name: &str) -> Result<&str, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "competency name",
            });
        }
        let rng = &mut self.rng;
        let color = self.entries.entry(name.to_string()).or_insert_with(|| {
            let color = PALETTE[rng.gen_range(0..PALETTE.len())];
            debug!(name, color, "registered competency");
            color.to_string()
        });
        Ok(color.as_str())
    }

    /// Registers `name` with an explicit color.
    ///
    /// Existing entries are never recolored; returns `false` if `name` was
    /// already present.
    pub fn insert(&mut self, name: &str, color: &str) -> Result<bool, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "competency name",
            });
        }
        if self.entries.contains_key(name) {
            return Ok(false);
        }
        self.entries.insert(name.to_string(), color.to_string());
        Ok(true)
    }

    /// Every entry, including the trash label.
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Names offered for competency tagging (the trash label excluded).
    pub fn competency_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|name| *name != TRASH_LABEL)
    }
}
