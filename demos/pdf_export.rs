//! Render an invoice to PDF and write it to the current directory.
//!
//! Run with: `cargo run --example pdf_export --features pdf [logo.png]`

use tabfaktura::core::*;
use tabfaktura::export::PdfRenderer;

fn main() {
    let mut session = InvoiceSession::new();
    session
        .apply(Command::SetSupplier("ACME Ltd".into()), false)
        .expect("supplier");
    session
        .apply(Command::SetClient("Kunde AG".into()), false)
        .expect("client");
    session
        .apply(Command::SetInvoiceNumber("INV-2024-002".into()), false)
        .expect("number");
    session
        .apply(Command::SetCurrency(Currency::Eur), false)
        .expect("currency");

    for i in 0..60 {
        if i > 0 {
            session.add_row().expect("row limit not reached");
        }
        session.set_field(i, "description", format!("Consulting, week {}", i + 1));
        session.set_field(i, "quantity", "38.5");
        session.set_field(i, "price", "95");
    }

    if let Some(path) = std::env::args().nth(1) {
        let ticket = session.begin_logo_upload();
        let result = std::fs::read(&path)
            .map_err(|e| InvoiceError::Logo(format!("failed to read {path}: {e}")))
            .and_then(|bytes| Logo::from_bytes(bytes));
        if let Err(err) = session.finish_logo_upload(ticket, result) {
            eprintln!("logo skipped: {err}");
        }
    }

    match session.export(&PdfRenderer::new()) {
        Ok(doc) => {
            std::fs::write(&doc.file_name, &doc.bytes).expect("write PDF");
            println!(
                "wrote {} ({} bytes, grand total {})",
                doc.file_name,
                doc.bytes.len(),
                session.grand_total_display()
            );
        }
        Err(notice) => eprintln!("{notice}"),
    }
}
