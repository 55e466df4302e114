//! Per-tick delta computation
//!
//! A previous baseline only applies when its sport list matches the current
//! one element for element. When it applies, each delta is taken against the
//! previous *delta* of that sport, not the previous raw value:
//!
//! ```text
//! tick 1: raw 10 -> delta 10
//! tick 2: raw 12 -> delta 12 - 10 = 2
//! tick 3: raw 12 -> delta 12 - 2  = 10
//! ```

use super::{Baseline, SampleEntry};
use crate::sport::Sport;

/// Compute the next baseline from this tick's cache readings
///
/// `readings` holds one entry per requested sport in request order; `None`
/// marks a failed cache read, which yields a zero entry for that sport.
pub fn compute_tick(previous: Option<&Baseline>, readings: &[(Sport, Option<f64>)]) -> Baseline {
    let sports: Vec<Sport> = readings.iter().map(|(sport, _)| *sport).collect();
    let prior = previous.filter(|prev| prev.sports == sports);

    let entries = readings
        .iter()
        .map(|(sport, raw)| {
            let entry = match raw {
                Some(raw) => {
                    let delta = match prior.and_then(|p| p.entries.get(sport)) {
                        Some(prev) => raw - prev.delta,
                        None => *raw,
                    };
                    SampleEntry { raw: *raw, delta }
                }
                None => SampleEntry::default(),
            };
            (*sport, entry)
        })
        .collect();

    Baseline { sports, entries }
}
