//! Page layout: turns a snapshot into positioned drawing operations.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.

use super::text::{fit, text_width, wrap};
use crate::core::InvoiceSnapshot;

pub(crate) const PAGE_WIDTH: f32 = 595.28;
pub(crate) const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 30.0;
const FOOTER_HEIGHT: f32 = 20.0;
const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const LINE_HEIGHT: f32 = 14.0;
const ROW_HEIGHT: f32 = 18.0;
const CELL_PADDING: f32 = 4.0;
const LOGO_MAX_WIDTH: f32 = 150.0;
const LOGO_MAX_HEIGHT: f32 = 80.0;
const HEADER_GRAY: f32 = 0.9;

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Page {
    pub ops: Vec<Op>,
}

impl Page {
    #[cfg(test)]
    pub(crate) fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn push(&mut self, op: Op) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Start a new page unless `height` still fits. Returns true on a break.
    fn ensure(&mut self, height: f32) -> bool {
        if self.y - height >= MARGIN + FOOTER_HEIGHT {
            return false;
        }
        self.pages.push(Page::default());
        self.y = PAGE_HEIGHT - MARGIN;
        true
    }

    fn text(&mut self, x: f32, size: f32, bold: bool, text: String) {
        self.push(Op::Text {
            x,
            y: self.y - size,
            size,
            bold,
            text,
        });
    }

    fn centered(&mut self, size: f32, bold: bool, text: String) {
        let x = (PAGE_WIDTH - text_width(&text, size, bold)) / 2.0;
        self.text(x.max(MARGIN), size, bold, text);
    }
}

/// Lay out `snapshot` on as many A4 pages as the table needs.
///
/// `logo_size` is the pixel size of a logo the caller can embed, if any.
pub(crate) fn layout(snapshot: &InvoiceSnapshot, logo_size: Option<(u32, u32)>) -> Vec<Page> {
    let mut cur = Cursor::new();
    let content_width = PAGE_WIDTH - 2.0 * MARGIN;

    if let Some((width, height)) = logo_size.filter(|(w, h)| *w > 0 && *h > 0) {
        let scale = (LOGO_MAX_WIDTH / width as f32).min(LOGO_MAX_HEIGHT / height as f32);
        let (w, h) = (width as f32 * scale, height as f32 * scale);
        cur.push(Op::Logo {
            x: (PAGE_WIDTH - w) / 2.0,
            y: cur.y - h,
            width: w,
            height: h,
        });
        cur.y -= h + 10.0;
    }

    cur.centered(
        TITLE_SIZE,
        true,
        fit(
            &format!("Invoice #{}", snapshot.invoice_number()),
            content_width,
            TITLE_SIZE,
            true,
        ),
    );
    cur.y -= TITLE_SIZE + 6.0;
    cur.centered(FONT_SIZE, false, format!("Date: {}", snapshot.issue_date()));
    cur.y -= LINE_HEIGHT + 10.0;

    party(&mut cur, "Supplier:", snapshot.supplier(), content_width);
    party(&mut cur, "Client:", snapshot.client(), content_width);

    let mut labels: Vec<&str> = snapshot.columns().iter().map(|c| c.label.as_str()).collect();
    labels.push("Total");
    let col_width = content_width / labels.len() as f32;

    cur.ensure(2.0 * ROW_HEIGHT);
    table_header(&mut cur, &labels, col_width);
    for row in snapshot.rows() {
        if cur.ensure(ROW_HEIGHT) {
            table_header(&mut cur, &labels, col_width);
        }
        let cells = row.cells().iter().map(String::as_str).chain([row.total()]);
        for (i, cell) in cells.enumerate() {
            let x = MARGIN + i as f32 * col_width + CELL_PADDING;
            cur.push(Op::Text {
                x,
                y: cur.y - ROW_HEIGHT + 5.0,
                size: FONT_SIZE,
                bold: false,
                text: fit(cell, col_width - 2.0 * CELL_PADDING, FONT_SIZE, false),
            });
        }
        cur.y -= ROW_HEIGHT;
        cur.push(Op::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH - MARGIN,
            y: cur.y,
        });
    }

    cur.ensure(ROW_HEIGHT + 10.0);
    cur.y -= 10.0;
    let grand = format!("Grand Total: {}", snapshot.grand_total());
    let x = PAGE_WIDTH - MARGIN - text_width(&grand, FONT_SIZE, true);
    cur.text(x.max(MARGIN), FONT_SIZE, true, grand);

    let mut pages = cur.pages;
    let count = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        let footer = format!("Page {} of {count}", i + 1);
        page.ops.push(Op::Text {
            x: (PAGE_WIDTH - text_width(&footer, 8.0, false)) / 2.0,
            y: MARGIN / 2.0,
            size: 8.0,
            bold: false,
            text: footer,
        });
    }
    pages
}

fn party(cur: &mut Cursor, title: &str, text: &str, width: f32) {
    cur.ensure(2.0 * LINE_HEIGHT);
    cur.text(MARGIN, FONT_SIZE, true, title.to_string());
    cur.y -= LINE_HEIGHT;
    for paragraph in text.lines().chain(text.is_empty().then_some("")) {
        for line in wrap(paragraph, width, FONT_SIZE) {
            cur.ensure(LINE_HEIGHT);
            cur.text(MARGIN, FONT_SIZE, false, line);
            cur.y -= LINE_HEIGHT;
        }
    }
    cur.y -= 8.0;
}

fn table_header(cur: &mut Cursor, labels: &[&str], col_width: f32) {
    cur.push(Op::Fill {
        x: MARGIN,
        y: cur.y - ROW_HEIGHT,
        width: PAGE_WIDTH - 2.0 * MARGIN,
        height: ROW_HEIGHT,
        gray: HEADER_GRAY,
    });
    for (i, label) in labels.iter().enumerate() {
        cur.push(Op::Text {
            x: MARGIN + i as f32 * col_width + CELL_PADDING,
            y: cur.y - ROW_HEIGHT + 5.0,
            size: FONT_SIZE,
            bold: true,
            text: fit(label, col_width - 2.0 * CELL_PADDING, FONT_SIZE, true),
        });
    }
    cur.y -= ROW_HEIGHT;
}
