// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{BreakReason, Line};
use crate::style::{ParagraphStyle, TextAlign};

/// Position each line horizontally within `alignment_width`.
///
/// Lines that overflow the alignment width are not shifted. When the paragraph justifies,
/// free space on wrapped lines is spread over their inner spaces; the last line of a
/// paragraph, lines ended by a newline and ellipsized lines are aligned as if not justified.
pub(crate) fn align(lines: &mut [Line], alignment_width: f32, paragraph: &ParagraphStyle) {
    for line in lines {
        line.x = 0.0;
        line.justification_gap = 0.0;
        let free = alignment_width - line.width;
        if free.is_nan() || free <= 0.0 {
            continue;
        }
        let wrapped = matches!(
            line.break_reason,
            BreakReason::Regular | BreakReason::Emergency
        );
        if paragraph.justifies() && wrapped && !line.ellipsized && line.spaces > 0 {
            line.justification_gap = free / line.spaces as f32;
            line.width = alignment_width;
            continue;
        }
        line.x = match paragraph.text_align {
            TextAlign::Auto | TextAlign::Left | TextAlign::Justify => 0.0,
            TextAlign::Center => free * 0.5,
            TextAlign::Right => free,
        };
    }
}
