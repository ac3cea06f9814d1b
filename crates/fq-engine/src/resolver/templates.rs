//! Message templates for resolved beats.
//!
//! Placeholders: `{mob}`, `{level}`, `{xp}`, `{gold}`.

use rand::Rng;
use rand::rngs::StdRng;

pub const MOB_WIN: &[&str] = &[
    "You defeat {mob} (Lv {level}). +{xp} XP, +{gold} gold.",
    "{mob} (Lv {level}) falls before you. +{xp} XP, +{gold} gold.",
    "After a short scuffle, {mob} (Lv {level}) yields. +{xp} XP, +{gold} gold.",
    "{mob} (Lv {level}) never saw you coming. +{xp} XP, +{gold} gold.",
];

pub const MOB_FLEE: &str = "{mob} (Lv {level}) is too strong. You retreat with dignity. +{xp} XP.";

pub const CHEST_RICH: &[&str] = &[
    "A gilded chest! Inside: +{gold} gold.",
    "Jackpot. A rich chest holds +{gold} gold.",
    "Behind a loose stone, a heavy chest: +{gold} gold.",
];

pub const CHEST_PLAIN: &[&str] = &[
    "You pry open a chest. +{gold} gold.",
    "A dusty chest rattles. +{gold} gold.",
    "A small coffer by the road. +{gold} gold.",
];

pub const CHEST_EMPTY: &[&str] = &[
    "The chest is empty. Only cobwebs inside.",
    "Someone got here first. The chest is empty.",
];

pub const QUIRKY: &[&str] = &[
    "A talking goose offers sage advice. +{xp} XP.",
    "You help a lost snail find its way home. +{xp} XP.",
    "A bored sphinx tells you a riddle. +{xp} XP.",
    "You win a staring contest with a statue. +{xp} XP.",
];

pub const TRINKET: &[&str] = &[
    "You pocket a curious button.",
    "A shiny pebble catches your eye.",
    "You find a tiny painted soldier.",
    "A feather drifts down. You keep it.",
];

pub const AMBIENT: &[&str] = &[
    "The road winds on.",
    "A cool breeze passes.",
    "Somewhere, a bell rings twice.",
];

/// A template from `pool`. Consumes one draw.
pub fn pick(rng: &mut StdRng, pool: &'static [&'static str]) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

/// Substitute `{key}` placeholders.
pub fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}
