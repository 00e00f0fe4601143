//! Merged label PDF rendering using lopdf.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use super::layout::{layout_label, LabelPage};
use super::metrics::{encode_win_ansi, Font};
use crate::error::RenderError;
use crate::models::catalog::Catalog;
use crate::models::config::LayoutConfig;
use crate::models::order::OrderExtraction;

/// A rendered labels document.
#[derive(Debug, Clone)]
pub struct RenderedLabels {
    /// PDF file contents.
    pub bytes: Vec<u8>,
    /// Number of label pages.
    pub page_count: usize,
}

/// Renders one page per required label into a single PDF.
pub struct LabelRenderer {
    layout: LayoutConfig,
}

impl LabelRenderer {
    /// Create a renderer with the given page layout.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Lay out each item with labels once, paired with its label count.
    pub fn layout_items(
        &self,
        extraction: &OrderExtraction,
        catalog: &Catalog,
        production_date: NaiveDate,
    ) -> Vec<(LabelPage, u32)> {
        let date = production_date.format(&self.layout.date_format).to_string();

        extraction
            .items
            .iter()
            .filter(|item| item.labels > 0)
            .map(|item| {
                let description = catalog
                    .get(item.id)
                    .map(|product| product.label_description())
                    .unwrap_or_else(|| item.name.clone());
                let page = layout_label(&item.name, &description, &date, &self.layout);
                (page, item.labels)
            })
            .collect()
    }

    /// Render all labels of an order.
    pub fn render(
        &self,
        extraction: &OrderExtraction,
        catalog: &Catalog,
        production_date: NaiveDate,
    ) -> Result<RenderedLabels, RenderError> {
        self.render_with_progress(extraction, catalog, production_date, |_, _| {})
    }

    /// Render all labels, calling `progress(rendered, total)` after each page.
    pub fn render_with_progress<F>(
        &self,
        extraction: &OrderExtraction,
        catalog: &Catalog,
        production_date: NaiveDate,
        mut progress: F,
    ) -> Result<RenderedLabels, RenderError>
    where
        F: FnMut(usize, usize),
    {
        let items = self.layout_items(extraction, catalog, production_date);
        if items.is_empty() {
            return Err(RenderError::NoLabels);
        }

        let total: usize = items.iter().map(|(_, labels)| *labels as usize).sum();
        info!("Rendering {} labels", total);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in [Font::Regular, Font::Bold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        // Repeated labels of an item share one content stream.
        let mut kids: Vec<Object> = Vec::new();
        for (page, labels) in &items {
            let content_id = add_content(&mut doc, page)?;
            for _ in 0..*labels {
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                });
                kids.push(page_id.into());
                progress(kids.len(), total);
            }
        }

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            self.layout.page_width_pt().into(),
            self.layout.page_height_pt().into(),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total as i64,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal("labelgen"),
        };
        if let Some(customer) = &extraction.customer {
            info.set("Title", Object::string_literal(encode_win_ansi(customer)));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Write(e.to_string()))?;

        debug!("Rendered {} pages into {} bytes", total, bytes.len());
        Ok(RenderedLabels {
            bytes,
            page_count: total,
        })
    }
}

fn add_content(doc: &mut Document, page: &LabelPage) -> Result<ObjectId, RenderError> {
    let mut operations = Vec::with_capacity(page.runs.len() * 5);
    for run in &page.runs {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![run.font.resource_name().into(), run.size.into()],
        ));
        operations.push(Operation::new("Td", vec![run.left().into(), run.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&run.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| RenderError::Write(e.to_string()))?;
    Ok(doc.add_object(Stream::new(dictionary! {}, content)))
}
