//! Wave domain: the composition table mapping stage phase and wave
//! number to raw per-type counts.
//!
//! The table ships compiled in and can be overridden from
//! `assets/data/waves.ron`. A broken override logs and falls back.

use bevy::prelude::{Commands, Resource, error, info};
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::StagePhase;
use crate::enemies::Archetype;

pub const WAVE_TABLE_PATH: &str = "assets/data/waves.ron";

/// Raw counts for one (phase, wave) slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveRow {
    pub phase: StagePhase,
    pub wave: u32,
    #[serde(default)]
    pub melee: u32,
    #[serde(default)]
    pub dasher: u32,
    #[serde(default)]
    pub bomber: u32,
    #[serde(default)]
    pub shooter: u32,
    #[serde(default)]
    pub mage: u32,
}

impl WaveRow {
    pub fn counts(&self) -> Vec<(Archetype, u32)> {
        vec![
            (Archetype::Melee, self.melee),
            (Archetype::Dasher, self.dasher),
            (Archetype::Bomber, self.bomber),
            (Archetype::Shooter, self.shooter),
            (Archetype::Mage, self.mage),
        ]
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WaveTable {
    pub rows: Vec<WaveRow>,
}

impl WaveTable {
    pub fn lookup(&self, phase: StagePhase, wave: u32) -> Option<&WaveRow> {
        self.rows
            .iter()
            .find(|row| row.phase == phase && row.wave == wave)
    }

    /// Counts for a slot, grown with the stage. Stage 1 reads the table
    /// verbatim.
    pub fn raw_counts(&self, phase: StagePhase, wave: u32, stage: u32) -> Vec<(Archetype, u32)> {
        let Some(row) = self.lookup(phase, wave) else {
            return Vec::new();
        };
        let factor = 1.0 + 0.15 * (stage.saturating_sub(1)) as f32;
        row.counts()
            .into_iter()
            .map(|(archetype, count)| {
                if count == 0 {
                    (archetype, 0)
                } else {
                    (archetype, ((count as f32 * factor).round() as u32).max(1))
                }
            })
            .collect()
    }

    pub fn compiled_default() -> Self {
        let mut rows = Vec::new();
        for (phase, bump) in [
            (StagePhase::Early, 0),
            (StagePhase::Mid, 2),
            (StagePhase::Late, 4),
        ] {
            rows.push(WaveRow {
                phase,
                wave: 1,
                melee: 10 + bump,
                ..WaveRow::empty(phase, 1)
            });
            rows.push(WaveRow {
                phase,
                wave: 2,
                melee: 8 + bump,
                dasher: 4,
                ..WaveRow::empty(phase, 2)
            });
            rows.push(WaveRow {
                phase,
                wave: 3,
                melee: 6 + bump,
                dasher: 4,
                shooter: 4,
                ..WaveRow::empty(phase, 3)
            });
            rows.push(WaveRow {
                phase,
                wave: 4,
                melee: 6 + bump,
                dasher: 4,
                bomber: 3,
                shooter: 3,
                mage: 2,
                ..WaveRow::empty(phase, 4)
            });
            // The boss wave spawns no trash from the table.
            rows.push(WaveRow::empty(phase, 5));
        }
        Self { rows }
    }
}

impl WaveRow {
    fn empty(phase: StagePhase, wave: u32) -> Self {
        Self {
            phase,
            wave,
            melee: 0,
            dasher: 0,
            bomber: 0,
            shooter: 0,
            mage: 0,
        }
    }
}

#[derive(Debug)]
pub enum WaveTableError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
}

impl fmt::Display for WaveTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveTableError::Io(err) => write!(f, "failed to read wave table: {}", err),
            WaveTableError::Parse(err) => write!(f, "failed to parse wave table: {}", err),
        }
    }
}

impl std::error::Error for WaveTableError {}

pub fn load_wave_table(path: impl AsRef<Path>) -> Result<WaveTable, WaveTableError> {
    let text = fs::read_to_string(path).map_err(WaveTableError::Io)?;
    let options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
    options.from_str(&text).map_err(WaveTableError::Parse)
}

/// Loads the wave table override, falling back to the compiled table.
pub(crate) fn setup_wave_table(mut commands: Commands) {
    let table = match load_wave_table(WAVE_TABLE_PATH) {
        Ok(table) => {
            info!("Loaded wave table from {}", WAVE_TABLE_PATH);
            table
        }
        Err(err) => {
            error!("{}; using compiled wave table", err);
            WaveTable::compiled_default()
        }
    };
    commands.insert_resource(table);
}
