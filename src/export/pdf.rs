use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfLayerReference, Pt};

use crate::export::layout::{PAGE_HEIGHT, PAGE_WIDTH};

/// A piece of text placed on a page. `y` is the baseline, measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub items: Vec<TextItem>,
}

/// Laid-out A4 pages of Helvetica text, ready to be written with `printpdf`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDocument {
    pub pages: Vec<PdfPage>,
}

const LAYER: &str = "Layer 1";

impl PdfDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the whole document into memory.
    pub fn to_bytes(&self, title: &str) -> Result<Vec<u8>, printpdf::Error> {
        let width = Mm::from(Pt(PAGE_WIDTH));
        let height = Mm::from(Pt(PAGE_HEIGHT));

        let (doc, first_page, first_layer) =
            printpdf::PdfDocument::new(title, width, height, LAYER);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        for (i, page) in self.pages.iter().enumerate() {
            let (page_index, layer_index) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, LAYER)
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);
            write_items(&layer, &page.items, &regular, &bold);
        }

        doc.save_to_bytes()
    }
}

fn write_items(
    layer: &PdfLayerReference,
    items: &[TextItem],
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for item in items {
        let font = if item.bold { bold } else { regular };
        layer.use_text(
            winansi_text(&item.text),
            item.size,
            Mm::from(Pt(item.x)),
            // PDF user space grows upwards from the bottom edge
            Mm::from(Pt(PAGE_HEIGHT - item.y)),
            font,
        );
    }
}

/// Replace characters the built-in fonts cannot show with `?`.
pub fn winansi_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c,
            '\u{2022}' | '\u{2013}' | '\u{2014}' | '\u{2018}' | '\u{2019}' | '\u{201C}'
            | '\u{201D}' | '\u{20AC}' | '\u{2026}' => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_is_kept() {
        assert_eq!(winansi_text("Caf\u{E9} \u{2022} (x)"), "Caf\u{E9} \u{2022} (x)");
    }

    #[test]
    fn unsupported_characters_are_replaced() {
        assert_eq!(winansi_text("\u{4E2D}\u{6587} ok"), "?? ok");
    }

    #[test]
    fn one_pdf_page_per_laid_out_page() {
        let doc = PdfDocument {
            pages: vec![PdfPage::default(), PdfPage::default()],
        };
        let bytes = doc.to_bytes("Two pages").unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }
}
