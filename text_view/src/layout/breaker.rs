// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking over analyzed items.

use core::ops::Range;

use smallvec::SmallVec;

use super::analysis::Item;
use crate::style::BreakStrategy;

/// Reason that a line was ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BreakReason {
    /// The last line of the text.
    #[default]
    None,
    /// A line break opportunity was taken because the next word did not fit.
    Regular,
    /// A mandatory break (newline, carriage return or paragraph separator).
    Explicit,
    /// No break opportunity fit; the line was broken between characters.
    Emergency,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LineBreak {
    pub(crate) items: Range<usize>,
    pub(crate) reason: BreakReason,
}

/// Break `items` into lines no wider than `max_advance`.
///
/// With `None` lines only end at mandatory breaks. Text ending in a newline produces a final
/// empty line; empty input produces no lines at all.
pub(crate) fn break_lines(
    items: &[Item],
    max_advance: Option<f32>,
    strategy: BreakStrategy,
) -> Vec<LineBreak> {
    let mut lines = Vec::new();
    if items.is_empty() {
        return lines;
    }
    let mut start = 0;
    while start < items.len() {
        let end = items[start..]
            .iter()
            .position(Item::is_newline)
            .map_or(items.len(), |ix| start + ix + 1);
        let paragraph = start..end;
        let greedy = break_greedy(items, paragraph.clone(), max_advance);
        let chosen = match (strategy, max_advance) {
            (BreakStrategy::Simple, _) | (_, None) => greedy,
            (_, Some(_)) if greedy.len() < 2 || has_emergency(&greedy) => greedy,
            (BreakStrategy::HighQuality, Some(max)) => {
                break_optimal(items, paragraph, max, false).unwrap_or(greedy)
            }
            (BreakStrategy::Balanced, Some(max)) => {
                break_optimal(items, paragraph, max, true).unwrap_or(greedy)
            }
        };
        lines.extend(chosen);
        start = end;
    }
    if items.last().is_some_and(Item::is_newline) {
        lines.push(LineBreak {
            items: items.len()..items.len(),
            reason: BreakReason::None,
        });
    }
    lines
}

type ParagraphLines = SmallVec<[LineBreak; 4]>;

fn has_emergency(lines: &ParagraphLines) -> bool {
    lines.iter().any(|line| line.reason == BreakReason::Emergency)
}

fn last_reason(items: &[Item], paragraph: &Range<usize>) -> BreakReason {
    if paragraph.end > paragraph.start && items[paragraph.end - 1].is_newline() {
        BreakReason::Explicit
    } else {
        BreakReason::None
    }
}

/// Fill each line as far as it goes, backing up to the last break opportunity on overflow.
fn break_greedy(
    items: &[Item],
    paragraph: Range<usize>,
    max_advance: Option<f32>,
) -> ParagraphLines {
    let mut lines = ParagraphLines::new();
    let mut start = paragraph.start;
    let mut x = 0.0;
    let mut last_opportunity: Option<usize> = None;
    let mut ix = start;
    while ix < paragraph.end {
        let item = &items[ix];
        let next_x = x + item.advance();
        let overflows = max_advance.is_some_and(|max| next_x > max);
        // Whitespace hangs past the edge; a lone item that cannot fit anywhere stays put.
        if overflows && !item.hangs() && ix > start {
            let (end, reason) = match last_opportunity {
                Some(end) => (end, BreakReason::Regular),
                None => (ix, BreakReason::Emergency),
            };
            lines.push(LineBreak {
                items: start..end,
                reason,
            });
            start = end;
            ix = end;
            x = 0.0;
            last_opportunity = None;
            continue;
        }
        x = next_x;
        if item.break_after && ix + 1 < paragraph.end {
            last_opportunity = Some(ix + 1);
        }
        ix += 1;
    }
    lines.push(LineBreak {
        items: start..paragraph.end,
        reason: last_reason(items, &paragraph),
    });
    lines
}

/// Choose breaks minimizing the sum of squared free space over the paragraph.
///
/// The last line is free unless `balance_last` is set. Returns `None` when no arrangement
/// fits, in which case the caller keeps the greedy result.
fn break_optimal(
    items: &[Item],
    paragraph: Range<usize>,
    max_advance: f32,
    balance_last: bool,
) -> Option<ParagraphLines> {
    let base = paragraph.start;
    let n = paragraph.end - base;

    // prefix[i]: advance of items base..base + i.
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0_f32);
    // content_end[i]: end of the content of base..base + i once trailing whitespace hangs.
    let mut content_end = Vec::with_capacity(n + 1);
    content_end.push(0_usize);
    for (i, item) in items[paragraph.clone()].iter().enumerate() {
        prefix.push(prefix[i] + item.advance());
        content_end.push(if item.hangs() { content_end[i] } else { i + 1 });
    }

    let mut candidates: SmallVec<[usize; 32]> = SmallVec::new();
    candidates.push(0);
    for (i, pair) in items[paragraph.clone()].windows(2).enumerate() {
        if pair[0].break_after && !pair[1].is_newline() {
            candidates.push(i + 1);
        }
    }
    candidates.push(n);

    let mut cost = vec![f32::INFINITY; candidates.len()];
    let mut previous = vec![0_usize; candidates.len()];
    cost[0] = 0.0;
    for j in 1..candidates.len() {
        let end = candidates[j];
        let is_last = j + 1 == candidates.len();
        // Lines only widen as their start moves back, so stop at the first one that overflows.
        for i in (0..j).rev() {
            let start = candidates[i];
            let width = prefix[content_end[end].max(start)] - prefix[start];
            if width > max_advance {
                break;
            }
            if !cost[i].is_finite() {
                continue;
            }
            let slack = max_advance - width;
            let line_cost = if is_last && !balance_last {
                0.0
            } else {
                slack * slack
            };
            let total = cost[i] + line_cost;
            if total < cost[j] {
                cost[j] = total;
                previous[j] = i;
            }
        }
    }
    if !cost[candidates.len() - 1].is_finite() {
        return None;
    }

    let mut ends: SmallVec<[usize; 8]> = SmallVec::new();
    let mut j = candidates.len() - 1;
    while j > 0 {
        ends.push(j);
        j = previous[j];
    }
    let mut lines = ParagraphLines::new();
    let mut start = base;
    for &j in ends.iter().rev() {
        let end = base + candidates[j];
        let reason = if j + 1 == candidates.len() {
            last_reason(items, &paragraph)
        } else {
            BreakReason::Regular
        };
        lines.push(LineBreak {
            items: start..end,
            reason,
        });
        start = end;
    }
    Some(lines)
}
