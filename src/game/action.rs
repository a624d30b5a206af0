//! Actions returned to the host.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::spatial::Direction;

/// What a unit does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum UnitAction {
    /// Hold position (mines the current cell).
    Stay,
    /// Step one cell.
    Move(Direction),
    /// Turn into a base.
    Convert,
}

impl UnitAction {
    /// Number of distinct unit actions.
    pub const COUNT: usize = 6;

    /// Every unit action, ordered by [`slot`](Self::slot).
    pub const ALL: [UnitAction; Self::COUNT] = [
        UnitAction::Stay,
        UnitAction::Move(Direction::North),
        UnitAction::Move(Direction::East),
        UnitAction::Move(Direction::South),
        UnitAction::Move(Direction::West),
        UnitAction::Convert,
    ];

    /// Dense index used for per-action score arrays.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            UnitAction::Stay => 0,
            UnitAction::Move(dir) => 1 + dir.index(),
            UnitAction::Convert => 5,
        }
    }

    /// Host command string, `None` for the implicit stay.
    #[must_use]
    pub const fn host_command(self) -> Option<&'static str> {
        match self {
            UnitAction::Stay => None,
            UnitAction::Move(dir) => Some(dir.host_name()),
            UnitAction::Convert => Some("CONVERT"),
        }
    }
}

/// What a base does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BaseAction {
    /// Nothing.
    Idle,
    /// Build a new unit on the base cell.
    Spawn,
}

/// One action per owned unit and per owned base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Actions {
    /// Unit id → action.
    pub units: BTreeMap<String, UnitAction>,
    /// Base id → action.
    pub bases: BTreeMap<String, BaseAction>,
}

impl Actions {
    /// Translate into the host's action map.
    ///
    /// Stays and idles are omitted; the host treats absence as a no-op.
    #[must_use]
    pub fn to_host(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (id, action) in &self.units {
            if let Some(command) = action.host_command() {
                out.insert(id.clone(), command.to_string());
            }
        }
        for (id, action) in &self.bases {
            if *action == BaseAction::Spawn {
                out.insert(id.clone(), "SPAWN".to_string());
            }
        }
        out
    }

    /// Number of spawn orders.
    #[must_use]
    pub fn spawn_count(&self) -> usize {
        self.bases
            .values()
            .filter(|&&a| a == BaseAction::Spawn)
            .count()
    }

    /// Number of conversion orders.
    #[must_use]
    pub fn convert_count(&self) -> usize {
        self.units
            .values()
            .filter(|&&a| a == UnitAction::Convert)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_dense() {
        for (i, action) in UnitAction::ALL.iter().enumerate() {
            assert_eq!(action.slot(), i);
        }
    }

    #[test]
    fn test_to_host_omits_noops() {
        let mut actions = Actions::default();
        actions.units.insert("a".into(), UnitAction::Stay);
        actions
            .units
            .insert("b".into(), UnitAction::Move(Direction::West));
        actions.units.insert("c".into(), UnitAction::Convert);
        actions.bases.insert("s1".into(), BaseAction::Idle);
        actions.bases.insert("s2".into(), BaseAction::Spawn);

        let host = actions.to_host();
        assert_eq!(host.len(), 3);
        assert_eq!(host["b"], "WEST");
        assert_eq!(host["c"], "CONVERT");
        assert_eq!(host["s2"], "SPAWN");
        assert_eq!(actions.spawn_count(), 1);
        assert_eq!(actions.convert_count(), 1);
    }
}
