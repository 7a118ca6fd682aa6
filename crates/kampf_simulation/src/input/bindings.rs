//! Control bindings (action → input code) и их нормализация.

use serde::{Deserialize, Serialize};

use super::{keys, ControlAction, InputCode, InputSnapshot, PlayerSlot};

/// One input code per [`ControlAction`], indexed by `ControlAction::index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBindings {
    codes: [InputCode; 6],
}

impl ControlBindings {
    pub fn new(codes: [InputCode; 6]) -> Self {
        Self { codes }
    }

    /// Default layout for a player slot.
    pub fn defaults(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self::new([keys::A, keys::D, keys::W, keys::F, keys::G, keys::H]),
            PlayerSlot::Two => Self::new([
                keys::LEFT,
                keys::RIGHT,
                keys::UP,
                keys::K,
                keys::L,
                keys::O,
            ]),
        }
    }

    pub fn code(&self, action: ControlAction) -> InputCode {
        self.codes[action.index()]
    }

    pub fn is_pressed(&self, action: ControlAction, snapshot: &InputSnapshot) -> bool {
        snapshot.is_pressed(self.code(action))
    }

    /// Resolves configured overrides against `defaults` so that no two actions
    /// share a code.
    ///
    /// Actions are processed in [`ControlAction::ALL`] order. Each action tries
    /// its configured code (or its default), then every default code in action
    /// order, and takes the first one not yet used. When every candidate is
    /// taken the desired code is kept.
    pub fn normalized(configured: &[(ControlAction, InputCode)], defaults: &ControlBindings) -> Self {
        let default_sequence: Vec<InputCode> =
            ControlAction::ALL.iter().map(|action| defaults.code(*action)).collect();
        let mut used: Vec<InputCode> = Vec::with_capacity(ControlAction::ALL.len());
        let mut codes = defaults.codes;

        for action in ControlAction::ALL {
            // Последний override побеждает
            let desired = configured
                .iter()
                .rev()
                .find(|(candidate, _)| *candidate == action)
                .map(|(_, code)| *code)
                .unwrap_or_else(|| defaults.code(action));

            let chosen = std::iter::once(desired)
                .chain(default_sequence.iter().copied())
                .find(|candidate| !used.contains(candidate))
                .unwrap_or(desired);

            if chosen != desired {
                crate::logger::log_warning(&format!(
                    "🎮 Binding conflict: {:?} wanted {:?}, falling back to {:?}",
                    action, desired, chosen
                ));
            }

            codes[action.index()] = chosen;
            used.push(chosen);
        }

        Self { codes }
    }
}
