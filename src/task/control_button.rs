//! Control button
//!
//! Local input for the radar: short press toggles patrol power, holding the
//! button requests a full scan report. See [`ControlPanel`].

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Pull};
use embassy_time::{Duration, Timer};
use radar_sweep::system::panel::{self, ControlPanel, Gesture};

use crate::task::resources::ControlButtonResources;

/// Button hold threshold (ms)
const HOLD_DURATION: Duration = Duration::from_millis(700);

/// Button debounce delay (ms)
const DEBOUNCE_DURATION: Duration = Duration::from_millis(30);

/// Control button handler
#[embassy_executor::task]
pub async fn control_button(r: ControlButtonResources) {
    let mut button = Input::new(r.button, Pull::Down);
    let mut panel = ControlPanel::new();
    loop {
        let gesture = next_gesture(&mut button).await;
        let action = panel.on_gesture(gesture);
        info!("{} -> {}", gesture, action);
        if !panel::dispatch(action) {
            warn!("control queue full, {} dropped", action);
        }
    }
}

/// Waits for a complete press or hold
async fn next_gesture(button: &mut Input<'static>) -> Gesture {
    loop {
        if debounce(button).await != Level::High {
            continue;
        }

        match select(Timer::after(HOLD_DURATION), debounce(button)).await {
            Either::First(()) => {
                button.wait_for_low().await;
                return Gesture::Hold;
            }
            Either::Second(_) => return Gesture::Press,
        }
    }
}

/// Ensures stable button state
async fn debounce(button: &mut Input<'static>) -> Level {
    loop {
        let st_level = button.get_level();
        button.wait_for_any_edge().await;
        Timer::after(DEBOUNCE_DURATION).await;
        let end_level = button.get_level();
        if st_level != end_level {
            break end_level;
        }
    }
}
