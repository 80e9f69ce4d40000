//! Game-wide feature flags.
//!
//! Flags are derived statically from the compiled tree, once, during
//! preprocessing. Downstream consumers (move generation, search, UI)
//! read them for fast feature checks without walking the tree again.
//! Union is the only combining operation, so aggregation is monotonic:
//! adding a subtree can never clear a flag.

use bitflags::bitflags;

bitflags! {
    /// Boolean game-wide properties contributed by individual nodes and
    /// unioned bottom-up over the whole tree.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct GameFlags: u32 {
        /// The game uses cell sites.
        const USES_CELL = 1 << 0;
        /// The game uses vertex sites.
        const USES_VERTEX = 1 << 1;
        /// The game uses edge sites.
        const USES_EDGE = 1 << 2;
        /// Some rule inspects the last move of the trial.
        const USES_LAST_MOVE = 1 << 3;
        /// Some rule refers to a named equipment region.
        const USES_NAMED_REGION = 1 << 4;
        /// Some rule combines regions with union/intersection/difference.
        const USES_REGION_ALGEBRA = 1 << 5;
        /// The play rules can place new pieces.
        const PLACEMENT_MOVES = 1 << 6;
        /// The play rules can move existing pieces between sites.
        const MOVEMENT_MOVES = 1 << 7;
        /// The play rules include passing.
        const PASS_MOVES = 1 << 8;
        /// Move generation branches on a runtime condition.
        const CONDITIONAL_MOVES = 1 << 9;
        /// Move generation iterates over the sites of a region.
        const SITE_ITERATION = 1 << 10;
        /// Some rule counts the sites of a region.
        const COUNTING = 1 << 11;
        /// Some rule performs integer arithmetic.
        const ARITHMETIC = 1 << 12;
    }
}

impl GameFlags {
    /// Names of the set flags, in declaration order. Used for structured
    /// output; hosts must not parse `Debug` formatting instead.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_monotonic() {
        let mut acc = GameFlags::empty();
        acc |= GameFlags::USES_CELL;
        acc |= GameFlags::PASS_MOVES;
        let before = acc;
        acc |= GameFlags::USES_CELL; // re-union must not change anything
        assert_eq!(acc, before);
        assert!(acc.contains(GameFlags::USES_CELL | GameFlags::PASS_MOVES));
        assert!(!acc.contains(GameFlags::USES_EDGE));
    }

    #[test]
    fn names_reports_set_flags() {
        let flags = GameFlags::USES_LAST_MOVE | GameFlags::COUNTING;
        let names = flags.names();
        assert_eq!(names, vec!["USES_LAST_MOVE", "COUNTING"]);
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(GameFlags::default(), GameFlags::empty());
        assert!(GameFlags::default().names().is_empty());
    }
}
