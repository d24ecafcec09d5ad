// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run-level style attributes and paragraph-level directives.

use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Font size used when a run does not specify one.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Line height as a multiple of the font size, when a run does not specify one.
pub const DEFAULT_LINE_HEIGHT_SCALE: f32 = 1.2;

/// Visual weight of a font, on the usual 1..=1000 scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Weight 400.
    pub const NORMAL: Self = Self(400);
    /// Weight 700.
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Style of a single text run.
///
/// The measurement engine reads `font_size`, `letter_spacing` and `line_height`. The
/// remaining attributes only travel with the run to the view.
#[derive(Clone, Debug)]
pub struct TextStyle {
    /// Font size in layout units.
    pub font_size: f32,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Italic style.
    pub italic: bool,
    /// Foreground color as `0xAARRGGBB`.
    pub color: u32,
    /// Extra advance added after every visible character.
    pub letter_spacing: f32,
    /// Explicit line height. `None` uses [`DEFAULT_LINE_HEIGHT_SCALE`] × `font_size`.
    pub line_height: Option<f32>,
    /// Underline decoration.
    pub underline: bool,
    /// Strikethrough decoration.
    pub strikethrough: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TextStyle {
    /// Opaque black text at [`DEFAULT_FONT_SIZE`] with no decorations.
    pub const DEFAULT: Self = Self {
        font_size: DEFAULT_FONT_SIZE,
        font_weight: FontWeight::NORMAL,
        italic: false,
        color: 0xFF00_0000,
        letter_spacing: 0.0,
        line_height: None,
        underline: false,
        strikethrough: false,
    };

    /// Style with the given font size and defaults elsewhere.
    pub fn with_font_size(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    /// The line height this style contributes to a line box.
    pub fn resolved_line_height(&self) -> f32 {
        self.line_height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(self.font_size * DEFAULT_LINE_HEIGHT_SCALE)
    }

    /// Apply the attributes set in `over` on top of this style.
    pub fn merge_from(&mut self, over: &TextStyleOverride) {
        if let Some(v) = over.font_size {
            self.font_size = v;
        }
        if let Some(v) = over.font_weight {
            self.font_weight = v;
        }
        if let Some(v) = over.italic {
            self.italic = v;
        }
        if let Some(v) = over.color {
            self.color = v;
        }
        if let Some(v) = over.letter_spacing {
            self.letter_spacing = v;
        }
        if let Some(v) = over.line_height {
            self.line_height = Some(v);
        }
        if let Some(v) = over.underline {
            self.underline = v;
        }
        if let Some(v) = over.strikethrough {
            self.strikethrough = v;
        }
    }

    fn key(&self) -> (u32, u16, bool, u32, u32, Option<u32>, bool, bool) {
        (
            self.font_size.to_bits(),
            self.font_weight.0,
            self.italic,
            self.color,
            self.letter_spacing.to_bits(),
            self.line_height.map(f32::to_bits),
            self.underline,
            self.strikethrough,
        )
    }
}

// Float attributes compare bitwise so that equal styles always hash equally.
impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TextStyle {}

impl Hash for TextStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A partial style applied by a nested span. Unset fields inherit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyleOverride {
    /// Font size.
    pub font_size: Option<f32>,
    /// Font weight.
    pub font_weight: Option<FontWeight>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Color as `0xAARRGGBB`.
    pub color: Option<u32>,
    /// Letter spacing.
    pub letter_spacing: Option<f32>,
    /// Line height.
    pub line_height: Option<f32>,
    /// Underline decoration.
    pub underline: Option<bool>,
    /// Strikethrough decoration.
    pub strikethrough: Option<bool>,
}

/// Horizontal alignment of lines within the layout width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    /// Start of the line, which is the left edge for the left-to-right text handled here.
    #[default]
    Auto,
    /// Align content to the left edge.
    Left,
    /// Center each line.
    Center,
    /// Align content to the right edge.
    Right,
    /// Justify each line except the last line of a paragraph.
    Justify,
}

/// How a paragraph chooses its line breaks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakStrategy {
    /// Greedy: fill each line as far as it goes.
    Simple,
    /// Minimize raggedness over the whole paragraph; the last line may stay short.
    #[default]
    HighQuality,
    /// Make all lines of a paragraph, including the last, as even as possible.
    Balanced,
}

/// Whether free space on wrapped lines is distributed between words.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JustificationMode {
    /// No justification.
    #[default]
    None,
    /// Stretch the spaces of every wrapped line to fill the layout width.
    InterWord,
}

/// What happens to the last visible line when text is cut off by `max_lines`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EllipsizeMode {
    /// Shorten the last visible line and end it with an ellipsis.
    #[default]
    Tail,
    /// Drop the remaining lines without marking the cut.
    Clip,
}

/// Paragraph-level directives handed to the layout engine with every request.
///
/// The engine never substitutes defaults for these; [`ParagraphStyle::default`] is for
/// callers that have no value of their own.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParagraphStyle {
    /// Line alignment.
    pub text_align: TextAlign,
    /// Line breaking strategy.
    pub break_strategy: BreakStrategy,
    /// Justification of wrapped lines.
    pub justification_mode: JustificationMode,
    /// Maximum number of lines, if limited.
    pub max_lines: Option<u32>,
    /// Treatment of the last line when `max_lines` cuts text off.
    pub ellipsize_mode: EllipsizeMode,
}

impl ParagraphStyle {
    /// Returns `true` if wrapped lines should be stretched to the layout width.
    pub fn justifies(&self) -> bool {
        self.text_align == TextAlign::Justify
            || self.justification_mode == JustificationMode::InterWord
    }
}
