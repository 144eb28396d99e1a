use rust_decimal_macros::dec;
use tabfaktura::core::*;
use tabfaktura::export::{CsvRenderer, ExportNotice};

fn two_line_session() -> InvoiceSession {
    let mut s = InvoiceSession::new();
    s.set_field(0, "quantity", "3");
    s.set_field(0, "price", "2.5");
    s.add_row().unwrap();
    s.set_field(1, "quantity", "2");
    s.set_field(1, "price", "6");
    s
}

#[test]
fn row_total_is_quantity_times_price() {
    let s = two_line_session();
    assert_eq!(s.row_total_display(0).as_deref(), Some("$7.50"));
    assert_eq!(s.row_total_display(1).as_deref(), Some("$12.00"));
    assert_eq!(s.row_total_display(2), None);
}

#[test]
fn grand_total_sums_rows() {
    let mut s = two_line_session();
    // a blank line in the middle contributes 0.00
    s.add_row().unwrap();
    s.set_field(2, "quantity", "2");
    s.set_field(2, "price", "6");
    s.set_field(1, "quantity", "");
    s.set_field(1, "price", "");

    let rows: Vec<_> = (0..3).filter_map(|i| s.row_total_display(i)).collect();
    assert_eq!(rows, ["$7.50", "$0.00", "$12.00"]);
    assert_eq!(s.grand_total_display(), "$19.50");
    let totals = s.totals();
    assert_eq!(totals.row_totals, [Some(dec!(7.5)), Some(dec!(0)), Some(dec!(12))]);
    assert_eq!(totals.grand_total, Some(dec!(19.5)));
}

#[test]
fn unparsable_values_count_as_zero() {
    let mut s = InvoiceSession::new();
    s.set_field(0, "quantity", "abc");
    s.set_field(0, "price", "5");
    assert_eq!(s.row_total_display(0).as_deref(), Some("$0.00"));

    s.set_field(0, "quantity", "");
    assert_eq!(s.grand_total_display(), "$0.00");
}

#[test]
fn currency_changes_only_the_symbol() {
    let mut s = two_line_session();
    s.apply(Command::SetCurrency(Currency::Eur), false).unwrap();
    assert_eq!(s.grand_total_display(), "€19.50");
    s.apply(Command::SetCurrency(Currency::Kes), false).unwrap();
    assert_eq!(s.grand_total_display(), "ksh19.50");
    s.apply(Command::SetCurrency(Currency::Inr), false).unwrap();
    assert_eq!(s.row_total_display(0).as_deref(), Some("₹7.50"));
}

#[test]
fn every_supported_currency_has_a_symbol() {
    let symbols: Vec<_> = Currency::ALL.iter().map(Currency::symbol).collect();
    assert_eq!(symbols, ["$", "€", "ksh", "£", "₹", "¥"]);
    for currency in Currency::ALL {
        assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
    }
}

#[test]
fn grand_total_rounds_once() {
    // three rows of 0.335 each: rounding per row would give 1.02
    let mut s = InvoiceSession::new();
    s.add_row().unwrap();
    s.add_row().unwrap();
    for i in 0..3 {
        s.set_field(i, "quantity", "1");
        s.set_field(i, "price", "0.335");
    }
    assert_eq!(s.row_total_display(0).as_deref(), Some("$0.34"));
    assert_eq!(s.grand_total_display(), "$1.01");
}

#[test]
fn signs_and_decimals_are_accepted() {
    assert_eq!(parse_amount("  2.50 "), dec!(2.50));
    assert_eq!(parse_amount("+4"), dec!(4));
    assert_eq!(parse_amount("-1.5"), dec!(-1.5));
    assert_eq!(parse_amount("1e2"), dec!(100));
    assert_eq!(parse_amount("1,5"), dec!(0));
    assert_eq!(parse_amount("12abc"), dec!(0));
    assert_eq!(parse_amount("1_000"), dec!(0));
}

// --- Amounts beyond the Decimal range ---

#[test]
fn out_of_range_product_is_not_shown_as_zero() {
    let mut s = InvoiceSession::new();
    s.set_field(0, "quantity", "100000000000000");
    s.set_field(0, "price", "1000000000000000");
    assert_eq!(s.row_total_display(0).as_deref(), Some(OUT_OF_RANGE));
    assert_eq!(s.grand_total_display(), OUT_OF_RANGE);
    assert_eq!(s.totals().grand_total, None);

    let err = s.snapshot().unwrap_err();
    assert!(matches!(err, InvoiceError::Validation(ref v) if v.field == "rows[0]"), "{err}");
    assert!(matches!(s.export(&CsvRenderer::default()), Err(ExportNotice::NotReady(_))));

    // back in range, export works again
    s.set_field(0, "price", "1");
    assert_eq!(s.grand_total_display(), "$100000000000000.00");
    assert!(s.snapshot().is_ok());
}

#[test]
fn grand_total_never_drops_a_row() {
    let mut s = InvoiceSession::new();
    s.add_row().unwrap();
    for i in 0..2 {
        s.set_field(i, "quantity", "1");
        s.set_field(i, "price", "50000000000000000000000000000");
    }
    assert_eq!(
        s.row_total_display(1).as_deref(),
        Some("$50000000000000000000000000000.00")
    );
    assert_eq!(s.grand_total_display(), OUT_OF_RANGE);

    let err = s.snapshot().unwrap_err();
    assert!(matches!(err, InvoiceError::Validation(ref v) if v.field == "grand_total"), "{err}");
}

#[test]
fn huge_literals_are_out_of_range_not_invalid() {
    assert_eq!(try_parse_amount("1e28"), Ok(dec!(10000000000000000000000000000)));
    assert_eq!(try_parse_amount("1e30"), Err(AmountError::OutOfRange));
    assert_eq!(try_parse_amount("1_000"), Err(AmountError::Invalid));

    let mut s = InvoiceSession::new();
    s.set_field(0, "quantity", "1e30");
    s.set_field(0, "price", "0");
    assert_eq!(s.row_total_display(0).as_deref(), Some(OUT_OF_RANGE));
}

#[test]
fn negative_lines_reduce_the_total() {
    let mut s = two_line_session();
    s.add_row().unwrap();
    s.set_field(2, "quantity", "-1");
    s.set_field(2, "price", "4.50");
    assert_eq!(s.row_total_display(2).as_deref(), Some("$-4.50"));
    assert_eq!(s.grand_total_display(), "$15.00");
}

#[test]
fn custom_designated_keys() {
    let config = SessionConfig::default()
        .with_starter_columns(vec![
            ColumnDef::new("hours", "Hours"),
            ColumnDef::new("rate", "Rate"),
        ])
        .with_designated_keys("hours", "rate");
    let mut s = InvoiceSession::with_config(config).unwrap();
    s.set_field(0, "hours", "8");
    s.set_field(0, "rate", "95");
    assert_eq!(s.grand_total_display(), "$760.00");
}

#[test]
fn calculator_on_plain_rows() {
    let calc = TotalCalculator::default();
    let rows: Vec<Row> = vec![
        [("quantity", "2"), ("price", "1.25")].into_iter().collect(),
        [("quantity", "x"), ("price", "1.25")].into_iter().collect(),
    ];
    assert_eq!(calc.row_total(&rows[0]), "2.50");
    assert_eq!(calc.row_total(&rows[1]), "0.00");
    assert_eq!(calc.grand_total(&rows), "2.50");
}
