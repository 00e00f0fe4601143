//! Label page layout.
//!
//! A label carries the product title, the description (heading plus a body
//! wrapped on two lines), a validity text, the production date and the
//! manufacturer notice. Coordinates are PDF points from the bottom-left
//! corner.

use super::metrics::Font;
use crate::models::config::LayoutConfig;
use crate::order::patterns::LABEL_DESCRIPTION;

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge.
    Left,
    /// `x` is the centre.
    Center,
}

/// One line of text placed on a label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub align: Align,
}

impl TextRun {
    fn new(text: impl Into<String>, font: Font, size: f32, x: f32, y: f32, align: Align) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            x,
            y,
            align,
        }
    }

    /// Left edge of the run after alignment.
    pub fn left(&self) -> f32 {
        match self.align {
            Align::Left => self.x,
            Align::Center => self.x - self.font.text_width(&self.text, self.size) / 2.0,
        }
    }
}

/// Which arrangement a label uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Title only, for products whose details are printed on the package.
    Compact,
    /// Title, description heading and a two-line description body.
    Detailed,
}

/// A laid-out label page.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPage {
    pub style: LabelStyle,
    pub runs: Vec<TextRun>,
}

/// The three parts of a label description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionParts {
    pub heading: String,
    pub body: String,
    pub validity: String,
}

/// Split `"heading: body. validity"`. A description without two separators
/// becomes the heading alone.
pub fn split_description(description: &str) -> DescriptionParts {
    match LABEL_DESCRIPTION.captures(description) {
        Some(caps) => DescriptionParts {
            heading: caps["heading"].trim().to_string(),
            body: caps["body"].trim().to_string(),
            validity: caps["validity"].trim().to_string(),
        },
        None => DescriptionParts {
            heading: description.to_string(),
            ..Default::default()
        },
    }
}

// Split at a character count; the tail is not re-wrapped
fn wrap_two_lines(body: &str, width: usize) -> (String, String) {
    let split = body
        .char_indices()
        .nth(width)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    (
        body[..split].trim().to_string(),
        body[split..].trim().to_string(),
    )
}

/// Lay out one label.
pub fn layout_label(
    title: &str,
    description: &str,
    production_date: &str,
    config: &LayoutConfig,
) -> LabelPage {
    let width = config.page_width_pt();
    let height = config.page_height_pt();
    let parts = split_description(description);

    let validity = if parts.validity.chars().any(|c| c.is_ascii_digit()) {
        parts.validity.clone()
    } else {
        config.daily_consumption_notice.clone()
    };

    let compact = parts.body.is_empty() || parts.body == config.package_info_marker;
    let mut runs = Vec::with_capacity(7);

    let (style, notice) = if compact {
        runs.push(TextRun::new(title, Font::Bold, 10.0, width / 2.0, height - 20.0, Align::Center));
        (LabelStyle::Compact, &config.compact_manufacturer_notice)
    } else {
        let (first, second) = wrap_two_lines(&parts.body, config.description_line_width);
        runs.push(TextRun::new(title, Font::Bold, 10.0, 140.0, 60.0, Align::Center));
        runs.push(TextRun::new(
            format!("{}:", parts.heading),
            Font::Regular,
            7.0,
            140.0,
            50.0,
            Align::Center,
        ));
        runs.push(TextRun::new(first, Font::Regular, 6.0, width / 2.0, height - 30.0, Align::Center));
        runs.push(TextRun::new(second, Font::Regular, 6.0, width / 2.0, height - 40.0, Align::Center));
        (LabelStyle::Detailed, &config.manufacturer_notice)
    };

    runs.push(TextRun::new(validity, Font::Regular, 7.0, 30.0, 15.0, Align::Left));
    runs.push(TextRun::new(
        format!("Fab.: {}", production_date),
        Font::Bold,
        7.0,
        width - 80.0,
        15.0,
        Align::Left,
    ));
    runs.push(TextRun::new(
        notice.clone(),
        Font::Regular,
        7.0,
        140.0,
        5.0,
        Align::Center,
    ));

    runs.retain(|run| !run.text.is_empty());
    LabelPage { style, runs }
}
