use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestId(pub Uuid);

impl QuestId {
    /// Generate a new random quest ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Fold the 128-bit id into 64 bits, for seeding and hashing.
    pub fn fold(&self) -> u64 {
        fold_uuid(&self.0)
    }
}

impl Default for QuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Unique identifier of a hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroId(pub Uuid);

impl HeroId {
    /// Generate a new random hero ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Fold the 128-bit id into 64 bits, for seeding.
    pub fn fold(&self) -> u64 {
        fold_uuid(&self.0)
    }
}

impl Default for HeroId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

fn fold_uuid(id: &Uuid) -> u64 {
    let (hi, lo) = id.as_u64_pair();
    hi ^ lo.rotate_left(32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_is_stable() {
        let id = QuestId(Uuid::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210));
        assert_eq!(id.fold(), id.fold());
        assert_eq!(id.fold(), 0x0123_4567_89ab_cdef ^ 0xfedc_ba98_7654_3210u64.rotate_left(32));
    }

    #[test]
    fn display_is_short() {
        let id = HeroId(Uuid::from_u128(0xdead_beef_0000_0000_0000_0000_0000_0000));
        assert_eq!(id.to_string(), "deadbeef");
    }
}
