#![no_main]

use libfuzzer_sys::fuzz_target;
use tabfaktura::core::*;
use tabfaktura::export::PdfRenderer;

// Arbitrary bytes as a logo must never make rendering panic.
fuzz_target!(|data: &[u8]| {
    let Ok(logo) = Logo::from_bytes(data.to_vec()) else {
        return;
    };
    let _ = logo.dimensions();
    let mut s = InvoiceSession::new();
    let _ = s.apply(Command::SetLogo(logo), false);
    if let Ok(snapshot) = s.snapshot() {
        let _ = PdfRenderer::new().compress(false).to_pdf(&snapshot);
    }
});
