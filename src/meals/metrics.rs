use serde::Serialize;

use super::repo::Meal;

/// Adherence summary for one session's meals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietReport {
    pub meals: usize,
    pub meals_in_diet: usize,
    pub meals_off_diet: usize,
    pub best_diet_sequence: Vec<Meal>,
}

/// `meals` must already be in creation order.
pub fn summarize(meals: &[Meal]) -> DietReport {
    let meals_in_diet = meals.iter().filter(|m| m.in_diet).count();
    DietReport {
        meals: meals.len(),
        meals_in_diet,
        meals_off_diet: meals.len() - meals_in_diet,
        best_diet_sequence: longest_run(meals, |m| m.in_diet).to_vec(),
    }
}

/// Longest contiguous slice whose elements all satisfy `keep`.
///
/// Single left-to-right pass. A run only replaces the best one when it is
/// strictly longer, so the earliest of several equally long runs wins.
pub fn longest_run<T>(items: &[T], mut keep: impl FnMut(&T) -> bool) -> &[T] {
    let mut best = 0..0;
    let mut start = 0;

    for (i, item) in items.iter().enumerate() {
        if !keep(item) {
            start = i + 1;
            continue;
        }
        if i + 1 - start > best.len() {
            best = start..i + 1;
        }
    }

    &items[best]
}
