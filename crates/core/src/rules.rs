use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ChipMult {
    /// Fractional after a chip scaling step; only the final total is floored.
    pub chips: f64,
    pub mult: f64,
}

impl ChipMult {
    pub fn new(chips: f64, mult: f64) -> Self {
        Self { chips, mult }
    }

    pub fn total_raw(&self) -> f64 {
        self.chips * self.mult
    }

    /// `floor(chips * mult)`, never negative.
    pub fn total(&self) -> i64 {
        (self.total_raw().floor() as i64).max(0)
    }

    /// Returns the folded value; chips and mult are floored at zero.
    pub fn apply(self, op: EffectOp) -> Self {
        let next = match op {
            EffectOp::AddChips(value) => Self {
                chips: self.chips + value as f64,
                ..self
            },
            EffectOp::AddMult(value) => Self {
                mult: self.mult + value,
                ..self
            },
            EffectOp::MultiplyMult(value) => Self {
                mult: self.mult * value,
                ..self
            },
            EffectOp::MultiplyChips(value) => Self {
                chips: self.chips * value,
                ..self
            },
        };
        next.clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            chips: non_negative(self.chips),
            mult: non_negative(self.mult),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum EffectOp {
    AddChips(i64),
    AddMult(f64),
    MultiplyMult(f64),
    MultiplyChips(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringEffect {
    pub op: EffectOp,
    pub source: String,
}

impl ScoringEffect {
    pub fn add_chips(value: i64, source: impl Into<String>) -> Self {
        Self {
            op: EffectOp::AddChips(value),
            source: source.into(),
        }
    }

    pub fn add_mult(value: f64, source: impl Into<String>) -> Self {
        Self {
            op: EffectOp::AddMult(value),
            source: source.into(),
        }
    }

    pub fn multiply_mult(value: f64, source: impl Into<String>) -> Self {
        Self {
            op: EffectOp::MultiplyMult(value),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoneyEffect {
    pub amount: i64,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreTraceStep {
    pub source: String,
    pub op: EffectOp,
    pub before: ChipMult,
    pub after: ChipMult,
}

/// Left fold; order matters.
pub fn apply_effects(base: ChipMult, effects: &[ScoringEffect]) -> ChipMult {
    effects
        .iter()
        .fold(base, |acc, effect| acc.apply(effect.op))
}

/// Same fold as [`apply_effects`], recording each step.
pub fn apply_effects_traced(
    base: ChipMult,
    effects: &[ScoringEffect],
    trace: &mut Vec<ScoreTraceStep>,
) -> ChipMult {
    effects.iter().fold(base, |before, effect| {
        let after = before.apply(effect.op);
        trace.push(ScoreTraceStep {
            source: effect.source.clone(),
            op: effect.op,
            before,
            after,
        });
        after
    })
}
