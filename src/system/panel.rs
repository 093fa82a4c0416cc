//! Control Panel
//!
//! Maps gestures on the single control button to radar commands:
//! - short press toggles patrol power (`POWER_ON` / `POWER_OFF`)
//! - hold requests a full scan report
//!
//! The panel only tracks what it last sent. Commands from other producers are
//! not reflected, so a press after a remote `POWER_OFF` may send `POWER_OFF`
//! again, which the radar handles as a no-op beyond the status publish.

use crate::system::event;

/// Button gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    Press,
    Hold,
}

/// What a gesture asks of the radar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelAction {
    /// Control message text
    Control(&'static str),
    FullScan,
}

/// Power toggle state behind the control button
#[derive(Debug, Default)]
pub struct ControlPanel {
    powered: bool,
}

impl ControlPanel {
    pub const fn new() -> Self {
        Self { powered: false }
    }

    pub fn on_gesture(&mut self, gesture: Gesture) -> PanelAction {
        match gesture {
            Gesture::Press => {
                self.powered = !self.powered;
                PanelAction::Control(if self.powered { "POWER_ON" } else { "POWER_OFF" })
            }
            Gesture::Hold => PanelAction::FullScan,
        }
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }
}

/// Hands an action to the radar task
///
/// Returns `false` if the control queue was full and the message was dropped.
pub fn dispatch(action: PanelAction) -> bool {
    match action {
        PanelAction::Control(message) => event::try_send_control(message),
        PanelAction::FullScan => {
            event::request_scan();
            true
        }
    }
}
