use tabfaktura::core::*;
use tabfaktura::export::*;

fn session() -> InvoiceSession {
    let mut s = InvoiceSession::new();
    s.apply(Command::SetInvoiceNumber("INV-001".into()), false)
        .unwrap();
    s.apply(Command::SetCurrency(Currency::Eur), false).unwrap();
    s.set_field(0, "description", "Widget");
    s.set_field(0, "quantity", "3");
    s.set_field(0, "price", "2.50");
    s.add_row().unwrap();
    s.set_field(1, "description", "Gadget, \"large\"");
    s.set_field(1, "quantity", "2");
    s.set_field(1, "price", "6");
    s
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn extension(&self) -> &str {
        "bin"
    }

    fn render(&self, _: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Failed("disk full".into()))
    }
}

struct PanickingRenderer;

impl Renderer for PanickingRenderer {
    fn extension(&self) -> &str {
        "bin"
    }

    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError> {
        let missing = snapshot.rows().get(99).map(|r| r.total().len());
        panic!("no such row: {missing:?}");
    }
}

// --- Failure containment ---

#[test]
fn renderer_error_becomes_notice() {
    let s = session();
    let notice = s.export(&FailingRenderer).unwrap_err();
    assert_eq!(
        notice,
        ExportNotice::RenderFailed("render failed: disk full".into())
    );
    assert!(notice.to_string().starts_with("Error generating document. Please try again."));
}

#[test]
fn renderer_panic_becomes_notice_and_model_survives() {
    let mut s = session();
    let before = s.table().clone();

    let notice = s.export(&PanickingRenderer).unwrap_err();
    assert!(matches!(notice, ExportNotice::RenderFailed(ref m) if m.contains("no such row")));

    assert_eq!(s.table(), &before);
    assert_eq!(s.grand_total_display(), "€19.50");
    // the session keeps working after the failed export
    s.add_row().unwrap();
    assert!(s.export(&CsvRenderer::default()).is_ok());
}

#[test]
fn pending_logo_is_not_ready() {
    let mut s = session();
    let _ticket = s.begin_logo_upload();
    let notice = s.export(&CsvRenderer::default()).unwrap_err();
    assert!(matches!(notice, ExportNotice::NotReady(_)));
}

#[test]
fn renderer_trait_objects() {
    let renderers: Vec<Box<dyn Renderer>> =
        vec![Box::new(CsvRenderer::default()), Box::new(FailingRenderer)];
    let snap = session().snapshot().unwrap();
    let results: Vec<_> = renderers
        .iter()
        .map(|r| export_with(r.as_ref(), &snap).is_ok())
        .collect();
    assert_eq!(results, [true, false]);
}

// --- CSV ---

#[test]
fn csv_file_name_uses_extension() {
    let doc = session().export(&CsvRenderer::default()).unwrap();
    assert_eq!(doc.file_name, "invoice_INV-001.csv");
}

#[test]
fn csv_snapshot() {
    let doc = session().export(&CsvRenderer::default()).unwrap();
    let csv = String::from_utf8(doc.bytes).unwrap().replace("\r\n", "\n");
    insta::assert_snapshot!("csv_export", csv.trim_end());
}

#[test]
fn csv_follows_column_order() {
    let mut s = session();
    s.add_column("unit", "Unit").unwrap();
    s.set_field(0, "unit", "pcs");
    let csv = CsvRenderer::with_delimiter(';')
        .to_csv_string(&s.snapshot().unwrap())
        .unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some(r#""Unit";"Item";"Quantity";"Unit Price";"Total""#)
    );
    assert_eq!(
        lines.next(),
        Some(r#""pcs";"Widget";"3";"2.50";"€7.50""#)
    );
    assert_eq!(
        csv.lines().last(),
        Some(r#""";"";"";"Grand Total";"€19.50""#)
    );
}
