//! Drive a telephony manager through a script

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use nexum_uicc_core::{
    CardAbsent, SwapEvent, SwapMonitor, ToolkitBinding, ToolkitService, swap_mailbox,
};
use nexum_uicc_manager::TelephonyManager;
use tracing::{info, warn};

use crate::config::Config;
use crate::script::{Action, Step};

/// How long to wait for the prompt after a hot-swap edge
const PROMPT_TIMEOUT: Duration = Duration::from_secs(1);

/// Toolkit stand-in that logs its lifecycle
struct LoggedToolkit {
    slot: usize,
}

impl ToolkitService for LoggedToolkit {
    fn reinitialize(&mut self, binding: &ToolkitBinding) {
        info!(slot = self.slot, app = %binding.application.app_type(), "Toolkit reinitialized");
    }

    fn dispose(&mut self) {
        info!(slot = self.slot, "Toolkit disposed");
    }
}

fn start_toolkit(binding: &ToolkitBinding) -> Box<dyn ToolkitService> {
    info!(slot = binding.slot, app = %binding.application.app_type(), "Toolkit started");
    Box::new(LoggedToolkit { slot: binding.slot })
}

/// Replay `steps` and print the state of each touched slot
///
/// Returns the swap events the restart prompt was shown for.
pub(crate) fn replay(
    config: &Config,
    steps: &[Step],
    auto_restart: bool,
) -> eyre::Result<Vec<SwapEvent>> {
    let manager_config = config.manager_config();
    let (swap_tx, swap_rx) = swap_mailbox();
    let (answer_tx, answer_rx) = unbounded();
    let monitor = SwapMonitor::spawn(
        swap_rx,
        move |event: SwapEvent| {
            let verb = if event.is_added() { "added" } else { "removed" };
            if auto_restart {
                info!("SIM card {verb}, restarting");
            } else {
                info!("SIM card {verb}, restart declined");
            }
            let _ = answer_tx.send(event);
        },
        manager_config.card.swap_poll_interval,
    );

    let mut prompts = Vec::new();
    let mut manager = TelephonyManager::new(manager_config, swap_tx)
        .with_toolkit(Arc::new(start_toolkit));

    for (index, step) in steps.iter().enumerate() {
        let had_card = manager.has_icc_card(step.slot);
        let existed = manager.card(step.slot).is_some();

        match &step.action {
            Action::Report(status) => manager.on_card_status(step.slot, status)?,
            Action::Dispose => {
                manager.dispose_card(step.slot)?;
            }
        }

        if let Some(card) = manager.card_mut(step.slot) {
            if !existed {
                card.register_for_absent(|event: CardAbsent| {
                    warn!(slot = event.slot, "Card absent");
                });
            }
            if existed && had_card != !card.card_state().is_absent() {
                prompts.extend(await_prompt(&answer_rx));
            }
        }

        print_slot(&manager, index, step.slot);
    }

    drop(manager);
    monitor.join();
    Ok(prompts)
}

fn await_prompt(answers: &Receiver<SwapEvent>) -> Option<SwapEvent> {
    let answer = answers.recv_timeout(PROMPT_TIMEOUT).ok();
    if answer.is_none() {
        warn!("No restart prompt observed");
    }
    answer
}

fn print_slot(manager: &TelephonyManager, index: usize, slot: usize) {
    let state = manager.sim_state(slot);
    match manager.card(slot) {
        Some(card) => {
            let apps = card
                .applications()
                .map(|app| format!("{}:{}", app.app_type(), app.state()))
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "[{index}] slot {slot}: card {} | sim {state} | apps {}/{} [{apps}] | toolkit {}",
                card.card_state(),
                card.application_count(),
                manager.config().card.max_apps,
                if card.toolkit_active() { "on" } else { "off" },
            );
        }
        None => println!("[{index}] slot {slot}: no card | sim {state}"),
    }
}
