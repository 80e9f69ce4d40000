//! Scratch-context slots.
//!
//! Slots are the named mutable fields a parent node writes immediately
//! before evaluating a child, so that transient values (the current
//! iteration site, the move destination under consideration) do not have
//! to travel through every node's interface. Each node declares which
//! slots it reads and writes; the preprocessing pass unions the sets
//! bottom-up and the evaluator asserts against them in debug builds.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// One scratch slot. Closed enumeration; the discriminant doubles as the
/// bit index inside [`SlotSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EvalSlot {
    /// Origin site of the move under construction.
    From,
    /// Destination site of the move under construction.
    To,
    /// Intermediate site between origin and destination.
    Between,
    /// Current site of a per-site iteration.
    Site,
    /// Stacking level at the current site.
    Level,
    /// Player the current computation concerns.
    Player,
    /// Region pushed by an iterating parent.
    Region,
    /// Generic integer value pushed by a parent.
    Value,
}

impl EvalSlot {
    /// Grammar keyword for this slot.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::From => "from",
            Self::To => "to",
            Self::Between => "between",
            Self::Site => "site",
            Self::Level => "level",
            Self::Player => "player",
            Self::Region => "region",
            Self::Value => "value",
        }
    }

    /// Parse a grammar keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            "between" => Some(Self::Between),
            "site" => Some(Self::Site),
            "level" => Some(Self::Level),
            "player" => Some(Self::Player),
            "region" => Some(Self::Region),
            "value" => Some(Self::Value),
            _ => None,
        }
    }
}

/// A fixed-width set of scratch slots.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct SlotSet(u16);

impl SlotSet {
    pub const EMPTY: Self = Self(0);

    fn bit(slot: EvalSlot) -> u16 {
        1u16 << (slot as u32)
    }

    /// Build a set from the given slots.
    pub fn of(slots: &[EvalSlot]) -> Self {
        let mut set = Self::EMPTY;
        for &s in slots {
            set.insert(s);
        }
        set
    }

    pub fn insert(&mut self, slot: EvalSlot) {
        self.0 |= Self::bit(slot);
    }

    pub fn contains(self, slot: EvalSlot) -> bool {
        self.0 & Self::bit(slot) != 0
    }

    pub fn union(self, other: SlotSet) -> SlotSet {
        SlotSet(self.0 | other.0)
    }

    pub fn is_subset_of(self, other: SlotSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = EvalSlot> {
        EvalSlot::iter().filter(move |&s| self.contains(s))
    }
}

impl std::ops::BitOr for SlotSet {
    type Output = SlotSet;
    fn bitor(self, rhs: SlotSet) -> SlotSet {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for SlotSet {
    fn bitor_assign(&mut self, rhs: SlotSet) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_fit_fixed_width() {
        for slot in EvalSlot::iter() {
            assert!((slot as u32) < 16);
        }
    }

    #[test]
    fn insert_and_contains() {
        let mut set = SlotSet::EMPTY;
        set.insert(EvalSlot::Site);
        set.insert(EvalSlot::Region);
        assert!(set.contains(EvalSlot::Site));
        assert!(set.contains(EvalSlot::Region));
        assert!(!set.contains(EvalSlot::From));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn union_and_subset() {
        let a = SlotSet::of(&[EvalSlot::From, EvalSlot::To]);
        let b = SlotSet::of(&[EvalSlot::To, EvalSlot::Site]);
        let ab = a | b;
        assert!(a.is_subset_of(ab));
        assert!(b.is_subset_of(ab));
        assert!(!ab.is_subset_of(a));
        assert_eq!(ab | a, ab);
    }
}
