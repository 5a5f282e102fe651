//! Long/short stream merging.
//!
//! Both sides are resolved independently, so their positions may overlap.
//! The merge folds them into a single trade stream in which at most one
//! position is open at a time, giving the primary side (the one that
//! entered first) precedence.

use tracing::debug;

use crate::domain::signal::{Side, SignalStream, collapse_same_sign, forward_fill};

/// Number of reconciliation passes applied after admission. Inputs needing
/// more passes come out under-reconciled.
pub const RECONCILE_PASSES: usize = 3;

/// Remove secondary values that collide with a primary entry.
///
/// Only bars where both streams hold a value are considered. A secondary
/// entry on the same bar as a primary entry is dropped, and so is any
/// secondary value on the next such bar.
pub fn suppress_secondary(
    primary: &[Option<i8>],
    secondary: &[Option<i8>],
    primary_side: Side,
) -> SignalStream {
    let secondary_side = primary_side.opposite();
    let both_entered = |i: usize| {
        primary[i] == Some(primary_side.entry()) && secondary[i] == Some(secondary_side.entry())
    };

    let shared: Vec<usize> = (0..primary.len().min(secondary.len()))
        .filter(|&i| primary[i].is_some() && secondary[i].is_some())
        .collect();

    let mut out = secondary.to_vec();
    for (k, &i) in shared.iter().enumerate() {
        let follows_double_entry = k > 0 && both_entered(shared[k - 1]);
        if follows_double_entry || both_entered(i) {
            out[i] = None;
        }
    }
    out
}

/// Build the initial merged stream from entries only.
///
/// Every secondary entry is admitted. A primary entry is admitted on a free
/// bar unless the secondary side is still open there, i.e. the last
/// secondary signal at or before the bar is an entry.
pub fn admit_entries(
    primary: &[Option<i8>],
    secondary: &[Option<i8>],
    primary_side: Side,
) -> SignalStream {
    let secondary_side = primary_side.opposite();
    let secondary_track = forward_fill(secondary);

    (0..primary.len().min(secondary.len()))
        .map(|i| {
            let primary_entry = primary[i] == Some(primary_side.entry());
            let secondary_open = secondary_track[i] == Some(secondary_side.entry());
            if primary_entry && secondary_open {
                None
            } else if secondary[i] == Some(secondary_side.entry()) {
                secondary[i]
            } else if primary_entry {
                primary[i]
            } else {
                None
            }
        })
        .collect()
}

/// One reconciliation pass over the merged stream.
///
/// Exits are cleared, then each bar takes whichever side's value belongs to
/// the entry currently open in the merged stream (primary first, secondary
/// overriding). Same-signed repeats are then collapsed so only position
/// changes remain.
pub fn reconcile_pass(
    trade: &[Option<i8>],
    primary: &[Option<i8>],
    secondary: &[Option<i8>],
) -> SignalStream {
    let entries: SignalStream = trade.iter().map(|v| v.filter(|code| *code < 0)).collect();
    let open = forward_fill(&entries);

    let mut next = entries;
    for (i, slot) in next.iter_mut().enumerate() {
        let Some(open_code) = open[i] else {
            continue;
        };
        for candidate in [primary[i], secondary[i]] {
            if let Some(code) = candidate
                && code.abs() == open_code.abs()
            {
                *slot = Some(code);
            }
        }
    }
    collapse_same_sign(&next)
}

/// Merge a resolved primary stream with a resolved secondary stream.
pub fn merge_streams(
    primary: &[Option<i8>],
    secondary: &[Option<i8>],
    primary_side: Side,
) -> SignalStream {
    let secondary = suppress_secondary(primary, secondary, primary_side);
    let mut trade = admit_entries(primary, &secondary, primary_side);

    for pass in 1..=RECONCILE_PASSES {
        trade = reconcile_pass(&trade, primary, &secondary);
        debug!(
            pass,
            signals = trade.iter().flatten().count(),
            "merge reconciliation pass"
        );
    }
    trade
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::is_alternating;

    fn stream(n: usize, values: &[(usize, i8)]) -> SignalStream {
        let mut s = vec![None; n];
        for &(i, v) in values {
            s[i] = Some(v);
        }
        s
    }

    #[test]
    fn same_bar_entries_drop_the_secondary() {
        let primary = stream(4, &[(0, -1), (3, 1)]);
        let secondary = stream(4, &[(0, -2), (2, 2)]);
        let out = suppress_secondary(&primary, &secondary, Side::Long);
        assert_eq!(out, stream(4, &[(2, 2)]));
    }

    #[test]
    fn value_after_double_entry_is_dropped() {
        let primary = stream(5, &[(0, -1), (3, 1)]);
        let secondary = stream(5, &[(0, -2), (3, 2), (4, -2)]);
        let out = suppress_secondary(&primary, &secondary, Side::Long);
        assert_eq!(out, stream(5, &[(4, -2)]));
    }

    #[test]
    fn unshared_bars_are_untouched() {
        let primary = stream(4, &[(0, -2), (2, 2)]);
        let secondary = stream(4, &[(1, -1), (3, 1)]);
        assert_eq!(suppress_secondary(&primary, &secondary, Side::Short), secondary);
    }

    #[test]
    fn primary_entry_blocked_while_secondary_open() {
        let primary = stream(4, &[(2, -1)]);
        let secondary = stream(4, &[(0, -2), (3, 2)]);
        let trade = admit_entries(&primary, &secondary, Side::Long);
        assert_eq!(trade, stream(4, &[(0, -2)]));
    }

    #[test]
    fn primary_entry_admitted_after_secondary_closes() {
        let primary = stream(5, &[(3, -1)]);
        let secondary = stream(5, &[(0, -2), (2, 2)]);
        let trade = admit_entries(&primary, &secondary, Side::Long);
        assert_eq!(trade, stream(5, &[(0, -2), (3, -1)]));
    }

    #[test]
    fn reconcile_attaches_exits_of_the_open_side() {
        let primary = stream(6, &[(0, -1), (5, 1)]);
        let secondary = stream(6, &[(2, -2), (4, 2)]);
        let trade = stream(6, &[(0, -1), (2, -2)]);
        let once = reconcile_pass(&trade, &primary, &secondary);
        assert_eq!(once, stream(6, &[(0, -1), (4, 2)]));
        let twice = reconcile_pass(&once, &primary, &secondary);
        assert_eq!(twice, stream(6, &[(0, -1), (5, 1)]));
    }

    #[test]
    fn secondary_entry_suppressed_while_primary_open() {
        let primary = stream(6, &[(0, -1), (5, 1)]);
        let secondary = stream(6, &[(2, -2), (4, 2)]);
        let trade = merge_streams(&primary, &secondary, Side::Long);
        assert_eq!(trade, stream(6, &[(0, -1), (5, 1)]));
    }

    #[test]
    fn secondary_trades_after_primary_closes() {
        let primary = stream(10, &[(0, -1), (5, 1)]);
        let secondary = stream(10, &[(2, -2), (4, 2), (7, -2), (9, 2)]);
        let trade = merge_streams(&primary, &secondary, Side::Long);
        assert_eq!(trade, stream(10, &[(0, -1), (5, 1), (7, -2), (9, 2)]));
        assert!(is_alternating(&trade));
    }

    #[test]
    fn short_primary_mirrors_long_primary() {
        let primary = stream(8, &[(0, -2), (3, 2)]);
        let secondary = stream(8, &[(1, -1), (2, 1), (5, -1), (7, 1)]);
        let trade = merge_streams(&primary, &secondary, Side::Short);
        assert_eq!(trade, stream(8, &[(0, -2), (3, 2), (5, -1), (7, 1)]));
    }

    #[test]
    fn empty_streams_merge_to_empty() {
        let trade = merge_streams(&[None, None], &[None, None], Side::Long);
        assert_eq!(trade, vec![None, None]);
    }
}
