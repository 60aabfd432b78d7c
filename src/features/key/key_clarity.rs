//! Key clarity scoring
//!
//! Estimates how clearly one key stands out from the rest.

use crate::analysis::result::Key;

/// Compute key clarity from key scores
///
/// # Arguments
///
/// * `scores` - Key correlations in any order
///
/// # Returns
///
/// Gap between the best and second-best correlation, clamped to 0.0-1.0.
/// Fewer than two scores gives 0.0.
pub fn compute_key_clarity(scores: &[(Key, f32)]) -> f32 {
    if scores.len() < 2 {
        return 0.0;
    }

    let mut best = f32::NEG_INFINITY;
    let mut second = f32::NEG_INFINITY;
    for &(_, s) in scores {
        if s > best {
            second = best;
            best = s;
        } else if s > second {
            second = s;
        }
    }

    let clarity = (best - second).clamp(0.0, 1.0);
    log::debug!("Key clarity {:.4} from {} scores", clarity, scores.len());
    clarity
}
