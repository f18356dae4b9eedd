//! Paginated PDF report.
//!
//! [`PdfLayout::paginate`] decides what goes on every page; [`to_pdf`] hands the
//! prepared pages to `printpdf` for drawing. A4 portrait, millimetre units,
//! offsets measured from the top edge.

use chrono::{DateTime, Utc};
use printpdf::{
    path::PaintMode, BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rect, Rgb,
};

use spendlog_core::SummaryService;
use spendlog_domain::Expense;

use crate::{csv_export::export_date, ExportError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TABLE_TOP_FIRST_PAGE: f32 = 48.0;
const HEADER_ROW_HEIGHT: f32 = 8.0;
const ROW_HEIGHT: f32 = 7.0;
const FOOTER_OFFSET: f32 = 10.0;
const FOOTER_RESERVE: f32 = 20.0;
const CELL_PADDING: f32 = 2.0;
const BODY_FONT_SIZE: f32 = 9.0;
const PT_TO_MM: f32 = 0.352_778;
const HEADER_FILL: [u8; 3] = [79, 70, 229];
const STRIPE_FILL: [u8; 3] = [249, 250, 251];

pub const TABLE_COLUMNS: [&str; 4] = ["Date", "Category", "Amount", "Description"];
/// Fixed widths for Date, Category and Amount; Description takes the rest.
const FIXED_COLUMN_WIDTHS: [f32; 3] = [30.0, 35.0, 25.0];

/// Presentation settings for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    pub title: String,
    pub currency_symbol: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            title: "Expense Report".into(),
            currency_symbol: "$".into(),
        }
    }
}

/// Cell text for one table row, in [`TABLE_COLUMNS`] order.
pub type TableRow = [String; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    pub number: usize,
    /// Distance from the top edge to the table header of this page.
    pub table_top: f32,
    pub rows: Vec<TableRow>,
}

/// Fully prepared report content.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub title: String,
    pub metadata: Vec<String>,
    pub pages: Vec<PdfPage>,
}

impl PdfLayout {
    /// Splits `expenses` into pages. The first page carries the title block,
    /// every page repeats the table header, and an empty input still yields
    /// one page with a header-only table.
    pub fn paginate(
        expenses: &[Expense],
        options: &PdfOptions,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let total = SummaryService::total_amount(expenses);
        let metadata = vec![
            format!("Generated: {}", generated_at.format("%b %d, %Y %H:%M")),
            format!("Total Records: {}", expenses.len()),
            format!(
                "Total Amount: {}",
                currency(&options.currency_symbol, total)
            ),
        ];

        let description_width = description_column_width() - 2.0 * CELL_PADDING;
        let mut rows = expenses.iter().map(|expense| {
            [
                export_date(&expense.date).into_owned(),
                expense.category.to_string(),
                currency(&options.currency_symbol, expense.amount),
                fit_text(&expense.description, description_width, BODY_FONT_SIZE),
            ]
        });

        let mut pages = Vec::new();
        let mut table_top = TABLE_TOP_FIRST_PAGE;
        loop {
            let page_rows: Vec<TableRow> = rows.by_ref().take(rows_fitting(table_top)).collect();
            pages.push(PdfPage {
                number: pages.len() + 1,
                table_top,
                rows: page_rows,
            });
            if rows.len() == 0 {
                break;
            }
            table_top = MARGIN;
        }

        Self {
            title: options.title.clone(),
            metadata,
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn footer(&self, page: &PdfPage) -> String {
        format!("Page {} of {}", page.number, self.page_count())
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|page| page.rows.len()).sum()
    }
}

/// Renders the report for `expenses` as PDF bytes.
pub fn to_pdf(
    expenses: &[Expense],
    options: &PdfOptions,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let layout = PdfLayout::paginate(expenses, options, generated_at);
    render(&layout)
}

fn render(layout: &PdfLayout) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc)?;

    for page in &layout.pages {
        let layer = if page.number == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (index, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(index).get_layer(layer)
        };

        if page.number == 1 {
            draw_title_block(&layer, layout, &fonts);
        }
        draw_table(&layer, page, &fonts);

        layer.set_fill_color(gray(150));
        let footer = layout.footer(page);
        let width = text_width(&footer, 8.0);
        layer.use_text(
            footer,
            8.0,
            Mm((PAGE_WIDTH - width) / 2.0),
            from_top(PAGE_HEIGHT - FOOTER_OFFSET),
            &fonts.regular,
        );
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, ExportError> {
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| ExportError::Pdf(err.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| ExportError::Pdf(err.to_string()))?;
        Ok(Self { regular, bold })
    }
}

fn draw_title_block(layer: &PdfLayerReference, layout: &PdfLayout, fonts: &Fonts) {
    layer.set_fill_color(gray(0));
    layer.use_text(layout.title.as_str(), 18.0, Mm(MARGIN), from_top(20.0), &fonts.bold);
    for (line, text) in layout.metadata.iter().enumerate() {
        layer.use_text(
            text.as_str(),
            10.0,
            Mm(MARGIN),
            from_top(28.0 + 6.0 * line as f32),
            &fonts.regular,
        );
    }
}

fn draw_table(layer: &PdfLayerReference, page: &PdfPage, fonts: &Fonts) {
    let lefts = column_lefts();
    let header_baseline = page.table_top + HEADER_ROW_HEIGHT - 2.5;

    fill_band(layer, page.table_top, HEADER_ROW_HEIGHT, HEADER_FILL);
    layer.set_fill_color(gray(255));
    for (column, label) in TABLE_COLUMNS.iter().enumerate() {
        place_cell(layer, column, label, lefts[column], header_baseline, &fonts.bold);
    }

    for (index, row) in page.rows.iter().enumerate() {
        let row_top = page.table_top + HEADER_ROW_HEIGHT + ROW_HEIGHT * index as f32;
        if is_striped(index) {
            fill_band(layer, row_top, ROW_HEIGHT, STRIPE_FILL);
        }
        layer.set_fill_color(gray(0));
        let baseline = row_top + ROW_HEIGHT - 2.0;
        for (column, text) in row.iter().enumerate() {
            place_cell(layer, column, text, lefts[column], baseline, &fonts.regular);
        }
    }
}

/// Every second body row on a page gets the light stripe.
fn is_striped(index: usize) -> bool {
    index % 2 == 1
}

/// Fills a full-width band of the table starting `top` mm below the top edge.
fn fill_band(layer: &PdfLayerReference, top: f32, height: f32, color: [u8; 3]) {
    layer.set_fill_color(rgb(color));
    let band = Rect::new(
        Mm(MARGIN),
        from_top(top + height),
        Mm(PAGE_WIDTH - MARGIN),
        from_top(top),
    )
    .with_mode(PaintMode::Fill);
    layer.add_rect(band);
}

/// Left-aligns every column except Amount, which hugs its right edge.
fn place_cell(
    layer: &PdfLayerReference,
    column: usize,
    text: &str,
    left: f32,
    baseline: f32,
    font: &IndirectFontRef,
) {
    let x = if column == 2 {
        left + FIXED_COLUMN_WIDTHS[2] - CELL_PADDING - text_width(text, BODY_FONT_SIZE)
    } else {
        left + CELL_PADDING
    };
    layer.use_text(text, BODY_FONT_SIZE, Mm(x), from_top(baseline), font);
}

fn column_lefts() -> [f32; 4] {
    let mut lefts = [MARGIN; 4];
    for column in 1..4 {
        lefts[column] = lefts[column - 1] + FIXED_COLUMN_WIDTHS[column - 1];
    }
    lefts
}

fn description_column_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN - FIXED_COLUMN_WIDTHS.iter().sum::<f32>()
}

fn rows_fitting(table_top: f32) -> usize {
    let available = PAGE_HEIGHT - FOOTER_RESERVE - table_top - HEADER_ROW_HEIGHT;
    (available / ROW_HEIGHT).floor().max(1.0) as usize
}

fn from_top(offset: f32) -> Mm {
    Mm(PAGE_HEIGHT - offset)
}

fn gray(level: u8) -> Color {
    rgb([level; 3])
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    let channel = |value: u8| f32::from(value) / 255.0;
    Color::Rgb(Rgb::new(channel(r), channel(g), channel(b), None))
}

fn currency(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

/// Approximate Helvetica advance widths in thousandths of an em.
fn glyph_width(ch: char) -> f32 {
    match ch {
        '0'..='9' | '$' | '_' | '#' | '?' => 556.0,
        '.' | ',' | ' ' | ':' | ';' | '!' | '/' | '\\' | 'i' | 'j' | 'l' | '|' | '\'' => 278.0,
        '-' | '(' | ')' | 'r' | 't' | 'f' => 333.0,
        'm' | 'M' | 'W' | '%' => 889.0,
        'w' => 722.0,
        'A'..='Z' => 667.0,
        _ => 556.0,
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() / 1000.0 * font_size * PT_TO_MM
}

/// Truncates `text` with an ellipsis so it fits within `max_width` millimetres.
fn fit_text(text: &str, max_width: f32, font_size: f32) -> String {
    if text_width(text, font_size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - text_width("...", font_size);
    let mut used = 0.0;
    let mut fitted = String::new();
    for ch in text.chars() {
        let width = glyph_width(ch) / 1000.0 * font_size * PT_TO_MM;
        if used + width > budget {
            break;
        }
        used += width;
        fitted.push(ch);
    }
    format!("{}...", fitted.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spendlog_domain::{Category, ExpenseInput};

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 20, 9, 5, 0).unwrap()
    }

    fn expenses(count: usize) -> Vec<Expense> {
        (0..count)
            .map(|index| {
                Expense::new(
                    ExpenseInput::new(
                        "2024-02-01",
                        1.0 + index as f64,
                        Category::Shopping,
                        format!("item {index}"),
                    ),
                    generated_at(),
                )
            })
            .collect()
    }

    #[test]
    fn stripes_alternate_body_rows_and_render() {
        let shaded: Vec<bool> = (0..4).map(is_striped).collect();
        assert_eq!(shaded, vec![false, true, false, true]);

        let bytes = to_pdf(&expenses(5), &PdfOptions::default(), generated_at()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn empty_input_is_one_header_only_page() {
        let layout = PdfLayout::paginate(&[], &PdfOptions::default(), generated_at());
        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].rows.is_empty());
        assert_eq!(layout.footer(&layout.pages[0]), "Page 1 of 1");
        assert_eq!(
            layout.metadata,
            vec![
                "Generated: Feb 20, 2024 09:05".to_string(),
                "Total Records: 0".to_string(),
                "Total Amount: $0.00".to_string(),
            ]
        );
    }

    #[test]
    fn rows_spill_onto_following_pages() {
        let first_page = rows_fitting(TABLE_TOP_FIRST_PAGE);
        let later_pages = rows_fitting(MARGIN);
        assert!(later_pages > first_page);

        let count = first_page + later_pages + 1;
        let layout = PdfLayout::paginate(&expenses(count), &PdfOptions::default(), generated_at());
        assert_eq!(layout.page_count(), 3);
        assert_eq!(layout.pages[0].rows.len(), first_page);
        assert_eq!(layout.pages[1].rows.len(), later_pages);
        assert_eq!(layout.pages[2].rows.len(), 1);
        assert_eq!(layout.row_count(), count);
        assert_eq!(layout.footer(&layout.pages[1]), "Page 2 of 3");
        assert_eq!(layout.pages[0].rows[0][0], "2024-02-01");
    }

    #[test]
    fn exactly_full_first_page_does_not_add_an_empty_page() {
        let count = rows_fitting(TABLE_TOP_FIRST_PAGE);
        let layout = PdfLayout::paginate(&expenses(count), &PdfOptions::default(), generated_at());
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn amounts_carry_the_currency_prefix() {
        let options = PdfOptions {
            currency_symbol: "€".into(),
            ..PdfOptions::default()
        };
        let layout = PdfLayout::paginate(&expenses(2), &options, generated_at());
        assert_eq!(layout.pages[0].rows[1][2], "€2.00");
        assert_eq!(layout.metadata[2], "Total Amount: €3.00");
    }

    #[test]
    fn long_descriptions_are_truncated_to_the_column() {
        let long = "a".repeat(400);
        let width = description_column_width() - 2.0 * CELL_PADDING;
        let fitted = fit_text(&long, width, BODY_FONT_SIZE);
        assert!(fitted.ends_with("..."));
        assert!(text_width(&fitted, BODY_FONT_SIZE) <= width);
        assert_eq!(fit_text("short", width, BODY_FONT_SIZE), "short");
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = to_pdf(&expenses(3), &PdfOptions::default(), generated_at()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let empty = to_pdf(&[], &PdfOptions::default(), generated_at()).unwrap();
        assert!(empty.starts_with(b"%PDF-"));
    }
}
