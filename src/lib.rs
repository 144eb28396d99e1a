//! # tabfaktura
//!
//! Invoice model with a user-defined line-item table: columns can be added,
//! renamed and removed at runtime, and every row always carries exactly the
//! keys of the current column set.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Row totals are `quantity × unit price`; unparsable cells count as zero.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabfaktura::core::*;
//! use tabfaktura::export::CsvRenderer;
//!
//! let mut session = InvoiceSession::new();
//! session.apply(Command::SetInvoiceNumber("INV-001".into()), false).unwrap();
//! session.apply(Command::SetCurrency(Currency::Eur), false).unwrap();
//! session.add_column("unit", "Unit").unwrap();
//!
//! session.set_field(0, "description", "Consulting");
//! session.set_field(0, "unit", "h");
//! session.set_field(0, "quantity", "3");
//! session.set_field(0, "price", "2.50");
//!
//! assert_eq!(session.grand_total_display(), "€7.50");
//!
//! let doc = session.export(&CsvRenderer::default()).unwrap();
//! assert_eq!(doc.file_name, "invoice_INV-001.csv");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Column schema, rows, totals, sessions, CSV export |
//! | `pdf` | A4 PDF rendering via `lopdf` |
//! | `json` | JSON serialisation of export snapshots |
//! | `async` | Reading logo files with `tokio` |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
