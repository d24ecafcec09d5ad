// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text view props as they arrive from the host's key/value style map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::style::{BreakStrategy, EllipsizeMode, JustificationMode, ParagraphStyle, TextAlign};
use crate::update::Padding;

/// Props of a text view. Keys missing from the map take their documented defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    /// Leading padding. Default `0`.
    pub padding_start: f32,
    /// Top padding. Default `0`.
    pub padding_top: f32,
    /// Trailing padding. Default `0`.
    pub padding_end: f32,
    /// Bottom padding. Default `0`.
    pub padding_bottom: f32,
    /// Line alignment. Default `auto`.
    pub text_align: TextAlign,
    /// Break strategy. Default `highQuality`.
    pub text_break_strategy: BreakStrategy,
    /// Justification. Default `none`.
    pub justification_mode: JustificationMode,
    /// Generation marker of the update. Default `-1` (none).
    pub generation: i32,
    /// Script code owns the text content. Default `false`.
    pub js_responsible: bool,
    /// Maximum number of lines; `0` or absent means unlimited.
    pub number_of_lines: Option<u32>,
    /// Cut-off treatment when `numberOfLines` applies. Default `tail`.
    pub ellipsize_mode: EllipsizeMode,
    /// Label of the custom selection action. Absent or empty disables the action.
    pub custom_action_item: Option<String>,
    /// Emit layout events after measuring. Default `false`.
    pub on_text_layout: bool,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            padding_start: 0.0,
            padding_top: 0.0,
            padding_end: 0.0,
            padding_bottom: 0.0,
            text_align: TextAlign::Auto,
            text_break_strategy: BreakStrategy::HighQuality,
            justification_mode: JustificationMode::None,
            generation: -1,
            js_responsible: false,
            number_of_lines: None,
            ellipsize_mode: EllipsizeMode::Tail,
            custom_action_item: None,
            on_text_layout: false,
        }
    }
}

impl TextProps {
    /// Reads props from a style map.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        Self::deserialize(value).map_err(Error::InvalidProps)
    }

    /// Reads props from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::InvalidProps)
    }

    /// Paragraph directives for the layout engine.
    pub fn paragraph_style(&self) -> ParagraphStyle {
        ParagraphStyle {
            text_align: self.text_align,
            break_strategy: self.text_break_strategy,
            justification_mode: self.justification_mode,
            max_lines: self.number_of_lines.filter(|n| *n > 0),
            ellipsize_mode: self.ellipsize_mode,
        }
    }

    /// Content padding.
    pub fn padding(&self) -> Padding {
        Padding {
            start: self.padding_start,
            top: self.padding_top,
            end: self.padding_end,
            bottom: self.padding_bottom,
        }
    }

    /// The custom action label, if the feature is enabled.
    pub fn custom_action_label(&self) -> Option<&str> {
        self.custom_action_item
            .as_deref()
            .filter(|label| !label.is_empty())
    }
}
