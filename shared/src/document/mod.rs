//! Printable projections
//!
//! Read-only renderings of already-fetched orders and credit memos. Nothing
//! here mutates state; callers decide where the [`Document`] goes.

pub mod credit_memo;
pub mod csv;
pub mod invoice;
pub mod statement;

pub use self::csv::export_orders_csv;
pub use credit_memo::render_credit_memo;
pub use invoice::render_invoice;
pub use statement::render_statement;

use crate::order::money::{Money, format_money};
use serde::Serialize;

/// Default text width in characters
pub const DEFAULT_WIDTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Statement,
    CreditMemo,
    OrderExport,
}

/// Rendered artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub file_name: String,
    pub title: String,
    pub content: String,
}

impl Document {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// File-name safe version of an identifier
pub(crate) fn file_stem(value: &str) -> String {
    let stem: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "unnamed".to_string() } else { stem }
}

/// Struck-through audit value next to the figure in force, e.g. `~~90.00~~ 30.00`
pub(crate) fn struck(original: Money, current: Money) -> String {
    format!("~~{}~~ {}", format_money(original), format_money(current))
}

/// Fluent plain-text layout builder
pub struct TextBuilder {
    buf: String,
    width: usize,
}

impl TextBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::with_capacity(2048),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Centered line
    pub fn title(&mut self, s: &str) -> &mut Self {
        let w = s.chars().count();
        let pad = self.width.saturating_sub(w) / 2;
        self.buf.push_str(&" ".repeat(pad));
        self.line(s)
    }

    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    /// Left and right text on the same line, gap filled with spaces
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = left.chars().count();
        let rw = right.chars().count();
        if lw + rw >= self.width {
            self.buf.push_str(left);
            self.buf.push(' ');
            self.line(right)
        } else {
            self.buf.push_str(left);
            self.buf.push_str(&" ".repeat(self.width - lw - rw));
            self.line(right)
        }
    }

    pub fn build(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_line_lr_pads_to_width() {
        let mut b = TextBuilder::new(20);
        b.line_lr("Total", "12.00");
        let out = b.build();
        assert_eq!(out, format!("Total{}12.00\n", " ".repeat(10)));
    }

    #[test]
    fn test_line_lr_overflow() {
        let mut b = TextBuilder::new(8);
        b.line_lr("Long label", "1.00");
        assert_eq!(b.build(), "Long label 1.00\n");
    }

    #[test]
    fn test_file_stem_and_struck() {
        assert_eq!(file_stem("CM-2024/05 #1"), "CM-2024_05__1");
        assert_eq!(file_stem(""), "unnamed");
        assert_eq!(struck(Decimal::from(90), Decimal::from(30)), "~~90.00~~ 30.00");
    }
}
