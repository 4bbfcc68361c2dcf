//! The priority engine.
//!
//! Maps an entry's economic attributes to a single ranking integer
//! (`final_prio`, higher sorts first). Deterministic and side-effect-free:
//! callers resolve "keep existing value on partial update" before calling,
//! so the engine only ever sees a fully merged attribute set.

use crate::models::entry::{Effort, Entry, UpdateEntryRequest};

/// The fully merged attribute set the priority computation runs over.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriorityInput {
    /// User-supplied additive bias term.
    pub manual_override: i64,
    /// Hours saved per year, if estimated.
    pub time_saved_per_year: Option<i64>,
    /// Gross profit per year in currency units, if estimated.
    pub gross_profit_per_year: Option<i64>,
    pub effort: Option<Effort>,
}

impl PriorityInput {
    /// Input matching an entry's current attributes.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            manual_override: entry.manual_override_prio,
            time_saved_per_year: entry.time_saved_per_year,
            gross_profit_per_year: entry.gross_profit_per_year,
            effort: entry.effort,
        }
    }

    /// Input for a partial update merged over an entry's current attributes.
    ///
    /// Fields absent from the payload contribute their existing values; the
    /// engine itself never defaults anything.
    pub fn merged(entry: &Entry, update: &UpdateEntryRequest) -> Self {
        Self {
            manual_override: update
                .manual_override_prio
                .unwrap_or(entry.manual_override_prio),
            time_saved_per_year: update.time_saved_per_year.or(entry.time_saved_per_year),
            gross_profit_per_year: update
                .gross_profit_per_year
                .or(entry.gross_profit_per_year),
            effort: update.effort.or(entry.effort),
        }
    }
}

/// Computes the ranking score for an entry.
///
/// The accumulator starts at the manual override. The computed term
/// `(time_saved/100 + profit/1000) * effort_factor` is added only when all
/// three of time-saved, profit, and effort are present and the two numbers
/// are non-zero; a zero in either numeric field disables the term entirely.
/// That treats a legitimate estimate of 0 as absent, which is preserved
/// deliberately for compatibility with existing stored rankings.
///
/// Arithmetic is real-valued until the final truncation toward zero.
pub fn compute_priority(input: PriorityInput) -> i64 {
    let mut total = input.manual_override as f64;

    if let (Some(time_saved), Some(profit), Some(effort)) = (
        input.time_saved_per_year,
        input.gross_profit_per_year,
        input.effort,
    ) {
        if time_saved != 0 && profit != 0 {
            let time_factor = time_saved as f64 / 100.0;
            let profit_factor = profit as f64 / 1000.0;
            total += (time_factor + profit_factor) * effort.factor();
        }
    }

    total.trunc() as i64
}
