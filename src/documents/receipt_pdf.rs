// src/documents/receipt_pdf.rs
use owned_ttf_parser::Face;
use printpdf::{
    Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
    Rgb,
};
use tracing::warn;

use crate::errors::ServerError;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const PT_TO_MM: f32 = 25.4 / 72.0;

// DejaVu Sans, see assets/fonts/LICENSE.
const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Drawn in place of characters the embedded fonts have no glyph for.
const MISSING_GLYPH: char = '?';

/// Everything printed on a rent receipt, already formatted for display.
#[derive(Debug, Clone)]
pub struct ReceiptData {
    pub receipt_no: String,
    pub issued: String,
    pub tenant_name: String,
    pub landlord_name: String,
    pub property_name: String,
    pub rent_start_date: String,
    pub next_rent_date: String,
    /// e.g. "950.00"
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    Brand,
    Title,
    Heading,
    Body,
    Centered,
}

impl Style {
    fn size(self) -> f32 {
        match self {
            Style::Brand => 20.0,
            Style::Title => 22.0,
            Style::Heading => 14.0,
            Style::Body => 12.0,
            Style::Centered => 14.0,
        }
    }

    /// Vertical space taken by the line, in mm.
    fn advance(self) -> f32 {
        match self {
            Style::Brand => 16.0,
            Style::Title => 16.0,
            Style::Heading => 9.0,
            Style::Body => 7.0,
            Style::Centered => 10.0,
        }
    }
}

/// Line-by-line content of the receipt, top to bottom. `None` is a gap or separator.
pub fn receipt_lines(data: &ReceiptData) -> Vec<Option<(Style, String)>> {
    vec![
        Some((Style::Brand, "RentWave".to_string())),
        Some((Style::Title, "RENT PAYMENT RECEIPT".to_string())),
        Some((Style::Body, format!("Receipt No: {}", data.receipt_no))),
        Some((Style::Body, format!("Date Issued: {}", data.issued))),
        None,
        Some((Style::Heading, "Tenant Details".to_string())),
        Some((Style::Body, format!("Tenant Name: {}", data.tenant_name))),
        Some((Style::Body, format!("Landlord: {}", data.landlord_name))),
        Some((Style::Body, format!("Property: {}", data.property_name))),
        None,
        Some((Style::Heading, "Payment Information".to_string())),
        Some((Style::Body, format!("Rent Start Date: {}", data.rent_start_date))),
        Some((Style::Body, format!("Next Rent Due: {}", data.next_rent_date))),
        Some((Style::Body, format!("Amount Paid: £{}", data.amount))),
        Some((Style::Body, "Payment Status: Successful".to_string())),
        None,
        Some((Style::Centered, "Thank you for your payment!".to_string())),
    ]
}

/// An embedded font plus the metrics needed to measure and check text against it.
struct Typeface {
    font: IndirectFontRef,
    face: Face<'static>,
}

impl Typeface {
    fn embed(doc: &PdfDocumentReference, ttf: &'static [u8]) -> Result<Self, ServerError> {
        let face = Face::parse(ttf, 0).map_err(|e| ServerError::DocumentError(e.to_string()))?;
        let font = doc
            .add_external_font(ttf)
            .map_err(|e| ServerError::DocumentError(e.to_string()))?;
        Ok(Typeface { font, face })
    }

    /// `text` with every character the face cannot draw replaced by [`MISSING_GLYPH`],
    /// plus whether any replacement happened.
    fn drawable(&self, text: &str) -> (String, bool) {
        let mut replaced = false;
        let out = text
            .chars()
            .map(|c| {
                if c.is_whitespace() || self.face.glyph_index(c).is_some() {
                    c
                } else {
                    replaced = true;
                    MISSING_GLYPH
                }
            })
            .collect();
        (out, replaced)
    }

    /// Rendered width of `text` at `size` points, in mm.
    fn width_mm(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .filter_map(|c| self.face.glyph_index(c))
            .filter_map(|g| self.face.glyph_hor_advance(g))
            .map(u32::from)
            .sum();
        units as f32 / f32::from(self.face.units_per_em()) * size * PT_TO_MM
    }

    /// Left edge that centres `text` between `left` and `right`.
    fn centred_x(&self, text: &str, size: f32, left: f32, right: f32) -> f32 {
        left + ((right - left) - self.width_mm(text, size)).max(0.0) / 2.0
    }
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_W - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn paid_stamp(layer: &PdfLayerReference, bold: &Typeface) {
    let (x0, y0, w, h) = (135.0, 40.0, 50.0, 22.0);
    let size = 28.0;
    layer.set_outline_color(Color::Rgb(Rgb::new(0.75, 0.1, 0.1, None)));
    layer.set_outline_thickness(2.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x0), Mm(y0)), false),
            (Point::new(Mm(x0 + w), Mm(y0)), false),
            (Point::new(Mm(x0 + w), Mm(y0 + h)), false),
            (Point::new(Mm(x0), Mm(y0 + h)), false),
        ],
        is_closed: true,
    });
    layer.set_fill_color(Color::Rgb(Rgb::new(0.75, 0.1, 0.1, None)));
    let x = bold.centred_x("PAID", size, x0, x0 + w);
    layer.use_text("PAID", size, Mm(x), Mm(y0 + 7.0), &bold.font);
}

/// Single A4 page. Text is set in embedded DejaVu Sans so names outside Latin-1 print
/// as written. Characters the font has no glyph for print as `?` and are logged.
pub fn render_receipt_pdf(data: &ReceiptData) -> Result<Vec<u8>, ServerError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Rent receipt {}", data.receipt_no),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Receipt".to_string(),
    );
    let regular = Typeface::embed(&doc, REGULAR_TTF)?;
    let bold = Typeface::embed(&doc, BOLD_TTF)?;
    let layer = doc.get_page(page).get_layer(layer);

    let brand = Color::Rgb(Rgb::new(0.373, 0.573, 0.875, None));
    let ink = Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None));

    let mut y = PAGE_H - 25.0;
    for line in receipt_lines(data) {
        let Some((style, text)) = line else {
            y -= 4.0;
            rule(&layer, y);
            y -= 8.0;
            continue;
        };

        let face = match style {
            Style::Brand | Style::Title | Style::Heading => &bold,
            Style::Body | Style::Centered => &regular,
        };
        let (text, replaced) = face.drawable(&text);
        if replaced {
            warn!(receipt = %data.receipt_no, "receipt text has characters without a glyph");
        }
        let x = match style {
            Style::Title | Style::Centered => {
                face.centred_x(&text, style.size(), MARGIN, PAGE_W - MARGIN)
            }
            Style::Brand | Style::Heading | Style::Body => MARGIN,
        };
        let color = if style == Style::Brand { &brand } else { &ink };
        layer.set_fill_color(color.clone());
        layer.use_text(text, style.size(), Mm(x), Mm(y), &face.font);
        y -= style.advance();
    }

    paid_stamp(&layer, &bold);

    doc.save_to_bytes().map_err(|e| ServerError::DocumentError(e.to_string()))
}
