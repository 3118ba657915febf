use serde::{Deserialize, Serialize};

/// A CRUD capability on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    const fn bit(self) -> u8 {
        match self {
            Action::Create => 0b0001,
            Action::Read => 0b0010,
            Action::Update => 0b0100,
            Action::Delete => 0b1000,
        }
    }
}

/// A set of [`Action`]s, packed so permission tables can be built in `const`
/// context.
///
/// The empty set is a legitimate table cell: a role may be allowed to *see* a
/// module without holding any CRUD capability on it. Use [`ActionSet::NONE`]
/// for those cells rather than omitting the entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const NONE: ActionSet = ActionSet(0);

    /// Build a set from a list of actions. Usable in `const` tables.
    pub const fn of(actions: &[Action]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < actions.len() {
            bits |= actions[i].bit();
            i += 1;
        }
        ActionSet(bits)
    }

    pub const fn with(self, action: Action) -> Self {
        ActionSet(self.0 | action.bit())
    }

    pub const fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub const fn union(self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL
            .into_iter()
            .filter(move |action| self.contains(*action))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(ActionSet::NONE, ActionSet::with)
    }
}

impl core::fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ActionSet(")?;
        if self.is_empty() {
            f.write_str("-")?;
        } else {
            for action in self.iter() {
                f.write_str(match action {
                    Action::Create => "c",
                    Action::Read => "r",
                    Action::Update => "u",
                    Action::Delete => "d",
                })?;
            }
        }
        f.write_str(")")
    }
}
