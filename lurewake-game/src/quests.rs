//! Quest board: generation, progress tracking and completion.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::QUEST_SLOTS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestGoal {
    CatchCount { target: u64 },
    CatchRarity { min_rarity: u8, target: u64 },
    EarnMoney { target: u64 },
    CatchAtLocation { location_id: String, target: u64 },
}

impl QuestGoal {
    #[must_use]
    pub const fn target(&self) -> u64 {
        match self {
            Self::CatchCount { target }
            | Self::CatchRarity { target, .. }
            | Self::EarnMoney { target }
            | Self::CatchAtLocation { target, .. } => *target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u64,
    pub goal: QuestGoal,
    #[serde(default)]
    pub progress: u64,
    pub reward_money: u64,
    pub reward_xp: u64,
}

impl Quest {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= self.goal.target()
    }
}

/// Progress signal emitted by the orchestrator.
#[derive(Debug, Clone, Copy)]
pub enum QuestEvent<'a> {
    Catch {
        rarity: u8,
        junk: bool,
        location_id: &'a str,
    },
    Earned(u64),
}

/// Advance every matching quest; returns the ids that became complete.
pub fn record_progress(quests: &mut [Quest], event: QuestEvent<'_>) -> Vec<u64> {
    let mut completed = Vec::new();
    for quest in quests.iter_mut() {
        if quest.is_complete() {
            continue;
        }
        let delta = match (&quest.goal, event) {
            (QuestGoal::CatchCount { .. }, QuestEvent::Catch { junk: false, .. }) => 1,
            (
                QuestGoal::CatchRarity { min_rarity, .. },
                QuestEvent::Catch {
                    rarity,
                    junk: false,
                    ..
                },
            ) if rarity >= *min_rarity => 1,
            (
                QuestGoal::CatchAtLocation { location_id, .. },
                QuestEvent::Catch {
                    location_id: here,
                    junk: false,
                    ..
                },
            ) if location_id == here => 1,
            (QuestGoal::EarnMoney { .. }, QuestEvent::Earned(amount)) => amount,
            _ => 0,
        };
        if delta == 0 {
            continue;
        }
        quest.progress = quest.progress.saturating_add(delta).min(quest.goal.target());
        if quest.is_complete() {
            completed.push(quest.id);
        }
    }
    completed
}

/// Fixed starter board used for fresh saves and unreadable ones.
#[must_use]
pub fn default_quests(next_id: &mut u64) -> Vec<Quest> {
    let goals = [
        (QuestGoal::CatchCount { target: 5 }, 100, 30),
        (
            QuestGoal::CatchRarity {
                min_rarity: 2,
                target: 2,
            },
            150,
            40,
        ),
        (QuestGoal::EarnMoney { target: 200 }, 120, 30),
    ];
    goals
        .into_iter()
        .map(|(goal, reward_money, reward_xp)| new_quest(next_id, goal, reward_money, reward_xp))
        .collect()
}

/// Roll a fresh board scaled to the player's level and unlocked locations.
pub fn generate_quests(
    level: u32,
    unlocked_locations: &[String],
    next_id: &mut u64,
    rng: &mut impl Rng,
) -> Vec<Quest> {
    let scale = u64::from(level.max(1));
    (0..QUEST_SLOTS)
        .map(|_| {
            let goal = match rng.gen_range(0..4_u8) {
                0 => QuestGoal::CatchCount {
                    target: 4 + scale + rng.gen_range(0..4),
                },
                1 => QuestGoal::CatchRarity {
                    min_rarity: rng.gen_range(2..=3),
                    target: 1 + scale / 4,
                },
                2 => QuestGoal::EarnMoney {
                    target: 150 * scale + rng.gen_range(0..100),
                },
                _ => {
                    let idx = rng.gen_range(0..unlocked_locations.len().max(1));
                    let location_id = unlocked_locations
                        .get(idx)
                        .cloned()
                        .unwrap_or_else(|| String::from("pond"));
                    QuestGoal::CatchAtLocation {
                        location_id,
                        target: 3 + scale / 2,
                    }
                }
            };
            let reward_money = goal_reward(&goal, scale);
            new_quest(next_id, goal, reward_money, 20 + 10 * scale)
        })
        .collect()
}

fn goal_reward(goal: &QuestGoal, scale: u64) -> u64 {
    match goal {
        QuestGoal::CatchCount { target } => target * 15 + 20 * scale,
        QuestGoal::CatchRarity { min_rarity, target } => {
            target * 60 * u64::from(*min_rarity) + 20 * scale
        }
        QuestGoal::EarnMoney { target } => target / 2,
        QuestGoal::CatchAtLocation { target, .. } => target * 25 + 20 * scale,
    }
}

fn new_quest(next_id: &mut u64, goal: QuestGoal, reward_money: u64, reward_xp: u64) -> Quest {
    let id = *next_id;
    *next_id = next_id.saturating_add(1);
    Quest {
        id,
        goal,
        progress: 0,
        reward_money,
        reward_xp,
    }
}
