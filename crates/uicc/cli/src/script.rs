//! Status report scripts

use std::path::Path;

use eyre::WrapErr;
use nexum_uicc_core::CardStatus;
use serde::Deserialize;

/// What a step does to its slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Deliver a status report
    Report(CardStatus),
    /// Dispose the card
    Dispose,
}

/// One scripted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) slot: usize,
    pub(crate) action: Action,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    slot: usize,
    #[serde(default)]
    status: Option<CardStatus>,
    #[serde(default)]
    dispose: bool,
}

/// Parse a JSON array of steps
pub(crate) fn parse_script(json: &str) -> eyre::Result<Vec<Step>> {
    let raw: Vec<RawStep> = serde_json::from_str(json).wrap_err("invalid script")?;
    raw.into_iter()
        .enumerate()
        .map(|(index, step)| {
            let action = match (step.status, step.dispose) {
                (Some(status), false) => Action::Report(status),
                (None, true) => Action::Dispose,
                (Some(_), true) => eyre::bail!("step {index}: both status and dispose given"),
                (None, false) => eyre::bail!("step {index}: neither status nor dispose given"),
            };
            Ok(Step {
                slot: step.slot,
                action,
            })
        })
        .collect()
}

/// Read and parse a script file
pub(crate) fn load_script(path: &Path) -> eyre::Result<Vec<Step>> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    parse_script(&json)
}
