//! Control abstraction: raw input identifiers → named actions.
//!
//! The simulation only ever sees a [`ControlSet`]. Whatever produces key
//! or button names (a terminal, a browser, a test) resolves them through
//! [`Bindings`]; names without a binding are dropped.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    /// Speed modifier: turns walking into running.
    Run,
    Attack,
    Dash,
    SelfDestruct,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Crouch,
        Action::Run,
        Action::Attack,
        Action::Dash,
        Action::SelfDestruct,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// The set of actions held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControlSet(u8);

impl ControlSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Action> for ControlSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(ControlSet::empty(), ControlSet::with)
    }
}

/// Raw identifier → action table.
#[derive(Clone, Debug, PartialEq)]
pub struct Bindings {
    map: HashMap<String, Action>,
}

impl Default for Bindings {
    /// Keyboard and mouse layout of the stock game.
    fn default() -> Self {
        let table: &[(&[&str], Action)] = &[
            (&["ArrowUp", "KeyW", "Space"], Action::Jump),
            (&["ArrowDown", "KeyS"], Action::Crouch),
            (&["ArrowLeft", "KeyA"], Action::MoveLeft),
            (&["ArrowRight", "KeyD"], Action::MoveRight),
            (&["ShiftLeft", "ShiftRight"], Action::Run),
            (&["Enter", "NumpadEnter", "MouseClick"], Action::Attack),
            (&["KeyQ"], Action::Dash),
            (&["NumpadMultiply"], Action::SelfDestruct),
        ];
        let map = table
            .iter()
            .flat_map(|(names, action)| names.iter().map(move |n| (n.to_string(), *action)))
            .collect();
        Self { map }
    }
}

impl Bindings {
    pub fn action_for(&self, name: &str) -> Option<Action> {
        self.map.get(name).copied()
    }

    /// Resolve held identifiers into actions, ignoring unknown ones.
    pub fn resolve<'a, I>(&self, held: I) -> ControlSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        held.into_iter()
            .filter_map(|name| self.action_for(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_identifiers_are_ignored() {
        let set = Bindings::default().resolve(["KeyZ", "Escape", "ArrowRight"]);
        assert_eq!(set, ControlSet::empty().with(Action::MoveRight));
    }

    #[test]
    fn aliases_map_to_the_same_action() {
        let b = Bindings::default();
        assert_eq!(b.action_for("KeyW"), Some(Action::Jump));
        assert_eq!(b.action_for("Space"), Some(Action::Jump));
        assert_eq!(b.action_for("MouseClick"), Some(Action::Attack));
    }

    #[test]
    fn insert_remove_roundtrip() {
        let mut set = ControlSet::empty();
        set.insert(Action::Dash);
        set.insert(Action::Run);
        assert!(set.contains(Action::Dash));
        set.remove(Action::Dash);
        assert!(!set.contains(Action::Dash));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Action::Run]);
    }
}
