use crate::{AutoAction, AutoplayError};
use pokerun_core::PokerHandType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    /// Cleared every blind up to the target ante.
    Won,
    Failed,
    MaxSteps,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    pub step: u32,
    pub ante: u32,
    pub blind: String,
    pub action: AutoAction,
    /// Cards as shown to a player, in action order.
    pub cards: Vec<String>,
    #[serde(default)]
    pub hand: Option<PokerHandType>,
    #[serde(default)]
    pub hand_score: Option<i64>,
    pub round_score: i64,
    pub score_goal: i64,
    pub money: i64,
    pub event_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlindRecord {
    pub ante: u32,
    pub blind: String,
    pub score_goal: i64,
    pub score: i64,
    pub won: bool,
    #[serde(default)]
    pub reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub steps: u32,
    pub hands_played: u32,
    pub discards_used: u32,
    pub blinds_cleared: u32,
    pub best_hand_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoplayResult {
    pub seed: u64,
    pub status: RunStatus,
    pub final_ante: u32,
    pub final_money: i64,
    pub blinds: Vec<BlindRecord>,
    pub steps: Vec<StepRecord>,
    pub summary: SummaryStats,
}

impl AutoplayResult {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("seed: {}", self.seed),
            format!("status: {}", run_status_label(self.status)),
            format!(
                "final: ante={} money={}",
                self.final_ante, self.final_money
            ),
            format!(
                "summary: steps={} hands={} discards={} cleared={} best_hand={}",
                self.summary.steps,
                self.summary.hands_played,
                self.summary.discards_used,
                self.summary.blinds_cleared,
                self.summary.best_hand_score
            ),
            String::new(),
            "blinds:".to_string(),
        ];
        if self.blinds.is_empty() {
            lines.push("  (none)".to_string());
        }
        for blind in &self.blinds {
            lines.push(format!(
                "  ante {:>2} {:<20} {:>8}/{:<8} {} reward={}",
                blind.ante,
                blind.blind,
                blind.score,
                blind.score_goal,
                if blind.won { "cleared" } else { "failed" },
                blind.reward
            ));
        }
        lines.push(String::new());
        lines.push("steps:".to_string());
        for step in &self.steps {
            lines.push(format!(
                "  step {:>4} | ante {} {} | {} [{}]",
                step.step,
                step.ante,
                step.blind,
                action_name(&step.action),
                step.cards.join(", ")
            ));
            if let (Some(hand), Some(score)) = (step.hand, step.hand_score) {
                lines.push(format!("    hand: {} for {score}", hand.name()));
            }
            lines.push(format!(
                "    score {}/{} money {} events {}",
                step.round_score, step.score_goal, step.money, step.event_count
            ));
        }
        lines.join("\n")
    }
}

fn action_name(action: &AutoAction) -> &'static str {
    match action {
        AutoAction::Play { .. } => "Play",
        AutoAction::Discard { .. } => "Discard",
    }
}

fn run_status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Won => "Won",
        RunStatus::Failed => "Failed",
        RunStatus::MaxSteps => "MaxSteps",
    }
}

pub fn write_json(path: &Path, result: &AutoplayResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, result: &AutoplayResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, result.to_text_report())?;
    Ok(())
}
