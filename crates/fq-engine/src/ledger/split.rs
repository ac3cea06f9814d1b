//! Largest-remainder apportionment.

/// Split `total` across `weights` in proportion, exactly.
///
/// Each share is floored, then the leftover units go one at a time to the
/// shares with the largest fractional parts (ties to the lower index). Any
/// residual left by float error lands on the highest-index positive weight.
/// Non-positive or non-finite weights get zero. A non-positive total or an
/// all-zero weight vector yields all zeros.
pub fn largest_remainder(total: i64, weights: &[f64]) -> Vec<i64> {
    let mut shares = vec![0i64; weights.len()];
    if total <= 0 {
        return shares;
    }

    let eligible: Vec<usize> = (0..weights.len()).filter(|&i| is_positive(weights[i])).collect();
    let weight_sum: f64 = eligible.iter().map(|&i| weights[i]).sum();
    if eligible.is_empty() || weight_sum <= 0.0 {
        return shares;
    }

    let mut fractions = Vec::with_capacity(eligible.len());
    let mut assigned = 0i64;
    for &i in &eligible {
        let exact = total as f64 * weights[i] / weight_sum;
        let floor = exact.floor();
        shares[i] = floor as i64;
        assigned += shares[i];
        fractions.push((i, exact - floor));
    }

    fractions.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut remaining = total - assigned;
    for (i, _) in &fractions {
        if remaining <= 0 {
            break;
        }
        shares[*i] += 1;
        remaining -= 1;
    }

    if remaining != 0
        && let Some(&last) = eligible.last()
    {
        shares[last] = (shares[last] + remaining).max(0);
    }
    shares
}

fn is_positive(w: f64) -> bool {
    w.is_finite() && w > 0.0
}
