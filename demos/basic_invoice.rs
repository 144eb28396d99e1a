use tabfaktura::core::*;
use tabfaktura::export::CsvRenderer;

fn main() {
    let mut session = InvoiceSession::new();
    for command in [
        Command::SetSupplier("ACME Ltd\nMoi Avenue 12, Nairobi".into()),
        Command::SetClient("Kunde AG\nMarienplatz 1, München".into()),
        Command::SetInvoiceNumber("INV-2024-001".into()),
        Command::SetIssueDate("2024-06-15".into()),
        Command::SetCurrency(Currency::Kes),
        Command::AddColumn {
            key: "unit".into(),
            label: "Unit".into(),
        },
    ] {
        session
            .apply(command, false)
            .expect("command should apply");
    }

    let lines = [
        ("Software development", "h", "80", "1200"),
        ("Hosting (monthly)", "month", "1", "4990.50"),
    ];
    for (i, (item, unit, quantity, price)) in lines.into_iter().enumerate() {
        if i > 0 {
            session.add_row().expect("row limit not reached");
        }
        session.set_field(i, "description", item);
        session.set_field(i, "unit", unit);
        session.set_field(i, "quantity", quantity);
        session.set_field(i, "price", price);
    }

    // destructive edits go through a confirmation callback
    session
        .remove_column("unit", |removal: &Removal| {
            println!("confirming: {removal}");
            true
        })
        .expect("column should be removable");

    let header = session.header();
    println!("Invoice: {}", header.invoice_number);
    println!("Date:    {}", header.issue_date_display());
    println!("Currency: {}", header.currency);
    println!("---");
    for (i, row) in session.table().rows().iter().enumerate() {
        println!(
            "  {} x {} @ {} = {}",
            row.value_or_empty("quantity"),
            row.value_or_empty("description"),
            row.value_or_empty("price"),
            session.row_total_display(i).unwrap_or_default()
        );
    }
    println!("---");
    println!("Grand total: {}", session.grand_total_display());

    match session.export(&CsvRenderer::default()) {
        Ok(doc) => {
            println!("\n{} ({} bytes):", doc.file_name, doc.bytes.len());
            print!("{}", String::from_utf8_lossy(&doc.bytes));
        }
        Err(notice) => eprintln!("{notice}"),
    }
}
