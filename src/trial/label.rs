use super::{BASELINE_LABEL, SEARCH_LABEL_PREFIX};

const MAGNITUDE_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Helpers for agent labels of the form `MCTS_<budget>`.
pub struct AgentLabel;

impl AgentLabel {
    /// The label for an agent with the given search budget.
    pub fn for_budget(search_budget: u64) -> String {
        if search_budget == 0 {
            BASELINE_LABEL.to_string()
        } else {
            format!("{}_{}", SEARCH_LABEL_PREFIX, search_budget)
        }
    }

    /// Parse the budget out of a label, `None` if the label has no
    /// `_<integer>` suffix.
    pub fn budget(label: &str) -> Option<u64> {
        let (_, num) = label.split_once('_')?;
        num.parse().ok()
    }

    /// A short human label, `MCTS_1000000` becomes `MCTS 1M`.
    pub fn display(label: &str) -> String {
        match label.split_once('_') {
            Some((name, num)) => match num.parse::<u64>() {
                Ok(budget) => format!("{} {}", name, human_format(budget)),
                Err(_) => label.to_string(),
            },
            None => label.to_string(),
        }
    }
}

/// Three significant digits and a magnitude suffix.
fn human_format(value: u64) -> String {
    let mut num = round_significant(value as f64, 3);
    let mut magnitude = 0;
    while num.abs() >= 1000.0 && magnitude < MAGNITUDE_SUFFIXES.len() - 1 {
        magnitude += 1;
        num /= 1000.0;
    }
    // Clear the noise the divisions leave behind
    let num = (num * 1000.0).round() / 1000.0;
    format!("{}{}", num, MAGNITUDE_SUFFIXES[magnitude])
}

fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let exponent = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(exponent - digits + 1);
    (value / factor).round() * factor
}
