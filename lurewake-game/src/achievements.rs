//! Milestone achievements unlocked from lifetime counters.
use crate::state::GameState;

struct Achievement {
    id: &'static str,
    unlocked: fn(&GameState) -> bool,
}

const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_catch",
        unlocked: |s| s.lifetime.catches >= 1,
    },
    Achievement {
        id: "seasoned_angler",
        unlocked: |s| s.lifetime.catches >= 100,
    },
    Achievement {
        id: "perfectionist",
        unlocked: |s| s.lifetime.perfect >= 10,
    },
    Achievement {
        id: "golden_touch",
        unlocked: |s| s.lifetime.golden >= 1,
    },
    Achievement {
        id: "shiny_hunter",
        unlocked: |s| s.lifetime.shiny >= 1,
    },
    Achievement {
        id: "boss_slayer",
        unlocked: |s| s.lifetime.bosses >= 1,
    },
    Achievement {
        id: "collector",
        unlocked: |s| s.pedia.len() >= 10,
    },
    Achievement {
        id: "combo_master",
        unlocked: |s| s.lifetime.best_combo >= 10,
    },
    Achievement {
        id: "tycoon",
        unlocked: |s| s.lifetime.money_earned >= 100_000,
    },
    Achievement {
        id: "junk_collector",
        unlocked: |s| s.lifetime.junk >= 50,
    },
];

/// Unlock every newly satisfied achievement; returns the new ids.
pub fn evaluate(state: &mut GameState) -> Vec<&'static str> {
    let newly: Vec<&'static str> = ACHIEVEMENTS
        .iter()
        .filter(|a| !state.achievements.contains(a.id) && (a.unlocked)(state))
        .map(|a| a.id)
        .collect();
    for id in &newly {
        state.achievements.insert((*id).to_string());
    }
    newly
}
