use std::collections::HashMap;

use crate::scoring::normalize::normalize_tokens;

fn token_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in normalize_tokens(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Multiset bag-of-words F1 between a prediction and the reference text.
///
/// Both sides are normalized before counting. Returns 0.0 when either
/// precision or recall is undefined.
pub fn f1_bag_of_words(pred: &str, truth: &str) -> f64 {
    let pred_counts = token_counts(pred);
    let truth_counts = token_counts(truth);

    let mut tp = 0usize;
    let mut fp = 0usize;
    for (token, &pred_count) in &pred_counts {
        let truth_count = truth_counts.get(token).copied().unwrap_or(0);
        tp += pred_count.min(truth_count);
        fp += pred_count.saturating_sub(truth_count);
    }
    let fn_ = truth_counts
        .iter()
        .map(|(token, &truth_count)| {
            truth_count.saturating_sub(pred_counts.get(token).copied().unwrap_or(0))
        })
        .sum::<usize>();

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };

    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}
