// src/cooldown.rs - Per-spell cooldown gate and cast dispatch
use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::loadout::{Loadout, SpellDef};
use crate::templates::GestureLabel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellCast {
    pub cast_id: Uuid,
    pub spell: SpellDef,
    pub gesture: GestureLabel,
    /// Time of the cast on the caller's clock.
    pub at: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Cast(SpellCast),
    /// The spell is still cooling down; nothing was recorded.
    RejectedCooldown {
        spell: SpellDef,
        gesture: GestureLabel,
        remaining: Duration,
    },
    /// The active loadout has no spell for this gesture.
    RejectedUnmapped { gesture: GestureLabel },
}

impl DispatchOutcome {
    pub fn is_cast(&self) -> bool {
        matches!(self, DispatchOutcome::Cast(_))
    }

    pub fn gesture(&self) -> GestureLabel {
        match self {
            DispatchOutcome::Cast(cast) => cast.gesture,
            DispatchOutcome::RejectedCooldown { gesture, .. } => *gesture,
            DispatchOutcome::RejectedUnmapped { gesture } => *gesture,
        }
    }

    pub fn spell(&self) -> Option<&SpellDef> {
        match self {
            DispatchOutcome::Cast(cast) => Some(&cast.spell),
            DispatchOutcome::RejectedCooldown { spell, .. } => Some(spell),
            DispatchOutcome::RejectedUnmapped { .. } => None,
        }
    }
}

/// Last successful cast time per spell id. Entries appear on a spell's first
/// cast and are dropped wholesale by [`CooldownGate::reset`].
#[derive(Debug, Clone, Default)]
pub struct CooldownGate {
    last_cast: HashMap<String, Duration>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_cast<L: Loadout + ?Sized>(
        &mut self,
        gesture: GestureLabel,
        loadout: &L,
        now: Duration,
    ) -> DispatchOutcome {
        let Some(spell) = loadout.spell_for(gesture) else {
            debug!(%gesture, "no spell bound to gesture");
            return DispatchOutcome::RejectedUnmapped { gesture };
        };

        let remaining = self.remaining(spell, now);
        if !remaining.is_zero() {
            debug!(spell = %spell.id, ?remaining, "spell on cooldown");
            return DispatchOutcome::RejectedCooldown {
                spell: spell.clone(),
                gesture,
                remaining,
            };
        }

        self.last_cast.insert(spell.id.clone(), now);
        info!(spell = %spell.id, %gesture, "spell cast");

        DispatchOutcome::Cast(SpellCast {
            cast_id: Uuid::new_v4(),
            spell: spell.clone(),
            gesture,
            at: now,
        })
    }

    /// Time left before `spell` may be cast again; zero when ready.
    pub fn remaining(&self, spell: &SpellDef, now: Duration) -> Duration {
        match self.last_cast.get(&spell.id) {
            // A clock that ran backwards counts as no time elapsed.
            Some(last) => spell.cooldown().saturating_sub(now.saturating_sub(*last)),
            None => Duration::ZERO,
        }
    }

    /// Cooldown progress in [0, 1], 1 meaning ready.
    pub fn progress(&self, spell: &SpellDef, now: Duration) -> f64 {
        let cooldown = spell.cooldown();
        if cooldown.is_zero() {
            return 1.0;
        }
        let remaining = self.remaining(spell, now);
        1.0 - remaining.as_secs_f64() / cooldown.as_secs_f64()
    }

    pub fn last_cast(&self, spell_id: &str) -> Option<Duration> {
        self.last_cast.get(spell_id).copied()
    }

    pub fn reset(&mut self) {
        self.last_cast.clear();
    }
}
