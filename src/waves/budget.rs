//! Wave domain: per-type spawn budgets and weighted archetype draws.

use rand::Rng;

use crate::enemies::Archetype;

/// Global scale applied to every raw wave count before a wave starts.
pub const BUDGET_SCALE: f32 = 0.7;

/// Remaining spawn counts per archetype for the current wave. Order is
/// preserved from the wave table so draws stay reproducible under a
/// fixed seed.
#[derive(Debug, Clone, Default)]
pub struct TypeBudget {
    entries: Vec<(Archetype, u32)>,
}

impl TypeBudget {
    pub fn new(entries: Vec<(Archetype, u32)>) -> Self {
        Self { entries }
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.total() == 0
    }

    pub fn count_of(&self, archetype: Archetype) -> u32 {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == archetype)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Consumes one spawn of the archetype. Returns false when the type
    /// has no budget left.
    pub fn decrement(&mut self, archetype: Archetype) -> bool {
        for (kind, count) in &mut self.entries {
            if *kind == archetype && *count > 0 {
                *count -= 1;
                return true;
            }
        }
        false
    }

    pub fn entries(&self) -> &[(Archetype, u32)] {
        &self.entries
    }
}

/// Scales raw wave counts by the global budget factor. Rounding can zero
/// out a small count; any type that was nonzero before scaling keeps at
/// least one spawn so late-phase variety survives the scale.
pub fn scale_budget(raw: &[(Archetype, u32)]) -> TypeBudget {
    let entries = raw
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(archetype, count)| {
            let scaled = ((*count as f32) * BUDGET_SCALE).round() as u32;
            (*archetype, scaled.max(1))
        })
        .collect();
    TypeBudget::new(entries)
}

/// Draws an archetype weighted by remaining budget. Falls back to the
/// basic melee type when the budget is already exhausted.
pub fn pick_archetype<R: Rng + ?Sized>(rng: &mut R, budget: &TypeBudget) -> Archetype {
    let total = budget.total();
    if total == 0 {
        return Archetype::Melee;
    }

    let mut roll = rng.random_range(0..total);
    for (archetype, count) in budget.entries() {
        if roll < *count {
            return *archetype;
        }
        roll -= count;
    }
    Archetype::Melee
}
