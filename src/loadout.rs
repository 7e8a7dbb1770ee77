// src/loadout.rs - Mapping from gestures to spells
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::templates::GestureLabel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDef {
    /// Stable identity; cooldowns are tracked per id.
    pub id: String,
    pub name: String,
    pub cooldown_ms: u64,
    pub damage: u32,
    pub heal: u32,
}

impl SpellDef {
    pub fn new(id: &str, name: &str, cooldown_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cooldown_ms,
            damage: 0,
            heal: 0,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_heal(mut self, heal: u32) -> Self {
        self.heal = heal;
        self
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// The game layer's active gesture → spell mapping.
pub trait Loadout {
    fn spell_for(&self, gesture: GestureLabel) -> Option<&SpellDef>;
}

impl Loadout for HashMap<GestureLabel, SpellDef> {
    fn spell_for(&self, gesture: GestureLabel) -> Option<&SpellDef> {
        self.get(&gesture)
    }
}

impl Loadout for BTreeMap<GestureLabel, SpellDef> {
    fn spell_for(&self, gesture: GestureLabel) -> Option<&SpellDef> {
        self.get(&gesture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Lightning,
    Air,
}

impl Element {
    pub const ALL: [Element; 4] = [
        Element::Fire,
        Element::Water,
        Element::Lightning,
        Element::Air,
    ];
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Lightning => "lightning",
            Element::Air => "air",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown element '{0}' (expected fire, water, lightning or air)")]
pub struct ParseElementError(String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(Element::Fire),
            "water" => Ok(Element::Water),
            "lightning" => Ok(Element::Lightning),
            "air" => Ok(Element::Air),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

/// The spells available with one element selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementKit {
    pub element: Element,
    spells: BTreeMap<GestureLabel, SpellDef>,
}

impl ElementKit {
    pub fn empty(element: Element) -> Self {
        Self {
            element,
            spells: BTreeMap::new(),
        }
    }

    pub fn with_spell(mut self, gesture: GestureLabel, spell: SpellDef) -> Self {
        self.spells.insert(gesture, spell);
        self
    }

    pub fn spells(&self) -> impl Iterator<Item = (&GestureLabel, &SpellDef)> {
        self.spells.iter()
    }

    /// The built-in kit for an element.
    pub fn stock(element: Element) -> Self {
        use GestureLabel::*;

        let kit = Self::empty(element);
        match element {
            Element::Fire => kit
                .with_spell(Triangle, SpellDef::new("fireball", "Fireball", 1_000).with_damage(15))
                .with_spell(Checkmark, SpellDef::new("meteor", "Meteor", 15_000).with_damage(40))
                .with_spell(Circle, SpellDef::new("flame_shield", "Flame Shield", 8_000))
                .with_spell(
                    VerticalLine,
                    SpellDef::new("incinerate", "Incinerate", 500).with_damage(8),
                ),
            Element::Water => kit
                .with_spell(
                    VerticalLine,
                    SpellDef::new("frostbolt", "Frostbolt", 600).with_damage(10),
                )
                .with_spell(
                    HorizontalLine,
                    SpellDef::new("tsunami", "Tsunami", 5_000).with_damage(20),
                )
                .with_spell(Circle, SpellDef::new("bubble_shield", "Bubble Shield", 8_000))
                .with_spell(
                    Square,
                    SpellDef::new("restoration", "Restoration", 12_000).with_heal(25),
                ),
            Element::Lightning => kit
                .with_spell(VerticalLine, SpellDef::new("zap", "Zap", 200).with_damage(5))
                .with_spell(
                    Zigzag,
                    SpellDef::new("chain_lightning", "Chain Lightning", 6_000).with_damage(30),
                )
                .with_spell(Circle, SpellDef::new("static_field", "Static Field", 8_000))
                .with_spell(
                    Triangle,
                    SpellDef::new("thunderclap", "Thunderclap", 3_000).with_damage(20),
                ),
            Element::Air => kit
                .with_spell(
                    HorizontalLine,
                    SpellDef::new("wind_slash", "Wind Slash", 300).with_damage(8),
                )
                .with_spell(SCurve, SpellDef::new("tornado", "Tornado", 10_000).with_damage(15))
                .with_spell(Circle, SpellDef::new("air_barrier", "Air Barrier", 8_000))
                .with_spell(Triangle, SpellDef::new("vacuum", "Vacuum", 5_000).with_damage(25)),
        }
    }
}

impl Loadout for ElementKit {
    fn spell_for(&self, gesture: GestureLabel) -> Option<&SpellDef> {
        self.spells.get(&gesture)
    }
}
