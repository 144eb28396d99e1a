use tabfaktura::core::*;

fn keys(session: &InvoiceSession) -> Vec<String> {
    session.table().schema().keys().map(String::from).collect()
}

fn filled_session() -> InvoiceSession {
    let mut s = InvoiceSession::new();
    s.set_field(0, "description", "Widget");
    s.set_field(0, "quantity", "3");
    s.set_field(0, "price", "2.5");
    s
}

// --- Starter shape ---

#[test]
fn fresh_session_has_starter_columns_and_one_blank_row() {
    let s = InvoiceSession::new();
    assert_eq!(keys(&s), ["description", "quantity", "price"]);
    let labels: Vec<_> = s.table().columns().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["Item", "Quantity", "Unit Price"]);
    assert_eq!(s.table().rows().len(), 1);
    assert!(s.table().row(0).unwrap().is_blank());
}

// --- Adding columns ---

#[test]
fn new_column_goes_first_and_rows_gain_empty_value() {
    let mut s = filled_session();
    s.add_row().unwrap();
    s.add_column("unit", "Unit").unwrap();

    assert_eq!(keys(&s), ["unit", "description", "quantity", "price"]);
    for row in s.table().rows() {
        assert_eq!(row.get("unit"), Some(""));
    }
    // existing values survive
    assert_eq!(s.table().row(0).unwrap().get("description"), Some("Widget"));
    assert!(s.table().check_parity().is_empty());
}

#[test]
fn add_column_trims_input() {
    let mut s = InvoiceSession::new();
    s.add_column("  sku ", " SKU  ").unwrap();
    let first = &s.table().columns()[0];
    assert_eq!(first.key, "sku");
    assert_eq!(first.label, "SKU");
}

#[test]
fn blank_or_duplicate_columns_are_rejected_without_change() {
    let mut s = filled_session();
    let before = s.table().clone();

    for (key, label) in [("", "Empty key"), ("unit", "  "), ("price", "Again")] {
        let err = s.add_column(key, label).unwrap_err();
        assert!(matches!(err, InvoiceError::Validation(_)), "{key:?}: {err}");
    }
    assert_eq!(s.table(), &before);
}

#[test]
fn column_limit_is_enforced() {
    let config = SessionConfig::default().with_limits(TableLimits {
        max_columns: 4,
        ..TableLimits::default()
    });
    let mut s = InvoiceSession::with_config(config).unwrap();
    s.add_column("unit", "Unit").unwrap();
    assert!(s.add_column("tax", "Tax").is_err());
    assert_eq!(s.table().columns().len(), 4);
}

// --- Removing columns ---

#[test]
fn removing_a_column_drops_the_key_from_every_row() {
    let mut s = filled_session();
    s.add_row().unwrap();
    s.remove_column("description", true).unwrap();

    assert_eq!(keys(&s), ["quantity", "price"]);
    for row in s.table().rows() {
        assert!(!row.contains_key("description"));
    }
    assert!(s.table().check_parity().is_empty());
}

#[test]
fn add_then_remove_column_preserves_other_values() {
    let mut s = filled_session();
    let before = s.table().clone();
    s.add_column("tax", "Tax").unwrap();
    s.set_field(0, "tax", "16%");
    s.remove_column("tax", true).unwrap();
    assert_eq!(s.table(), &before);
}

#[test]
fn declined_column_removal_changes_nothing() {
    let mut s = filled_session();
    let before = s.table().clone();
    let err = s.remove_column("description", false).unwrap_err();
    assert!(matches!(err, InvoiceError::Declined(_)));
    assert_eq!(s.table(), &before);
}

#[test]
fn confirmation_sees_the_column_being_removed() {
    let mut s = filled_session();
    let mut asked = Vec::new();
    s.remove_column("price", |r: &Removal| {
        asked.push(r.to_string());
        true
    })
    .unwrap();
    assert_eq!(asked, ["removing column 'Unit Price'"]);
}

#[test]
fn last_column_cannot_be_removed_and_confirm_is_not_asked() {
    let mut s = InvoiceSession::new();
    s.remove_column("description", true).unwrap();
    s.remove_column("quantity", true).unwrap();

    let mut asked = false;
    let err = s
        .remove_column("price", |_: &Removal| {
            asked = true;
            true
        })
        .unwrap_err();
    assert!(err.to_string().contains("at least one column"));
    assert!(!asked);
    assert_eq!(keys(&s), ["price"]);
}

#[test]
fn unknown_column_removal_is_rejected() {
    let mut s = InvoiceSession::new();
    assert!(s.remove_column("nope", true).is_err());
    assert_eq!(s.table().columns().len(), 3);
}

#[test]
fn removing_quantity_zeroes_totals() {
    let mut s = filled_session();
    assert_eq!(s.grand_total_display(), "$7.50");
    s.remove_column("quantity", true).unwrap();
    assert_eq!(s.grand_total_display(), "$0.00");
    // a re-added column starts empty
    s.add_column("quantity", "Quantity").unwrap();
    assert_eq!(s.grand_total_display(), "$0.00");
}

// --- Renaming ---

#[test]
fn rename_keeps_key_and_values() {
    let mut s = filled_session();
    s.apply(
        Command::RenameColumn {
            key: "description".into(),
            label: "Service".into(),
        },
        false,
    )
    .unwrap();
    assert_eq!(s.table().columns()[0].label, "Service");
    assert_eq!(s.table().row(0).unwrap().get("description"), Some("Widget"));
}

// --- Rows ---

#[test]
fn new_rows_are_blank_over_current_schema() {
    let mut s = InvoiceSession::new();
    s.add_column("unit", "Unit").unwrap();
    let idx = s.add_row().unwrap();
    assert_eq!(idx, 1);
    let row = s.table().row(1).unwrap();
    assert!(row.is_blank());
    assert_eq!(row.len(), 4);
}

#[test]
fn remove_row_shifts_later_rows_up() {
    let mut s = InvoiceSession::new();
    s.add_row().unwrap();
    s.add_row().unwrap();
    for (i, name) in ["A", "B", "C"].iter().enumerate() {
        s.set_field(i, "description", *name);
    }
    s.remove_row(1, true).unwrap();

    let names: Vec<_> = s
        .table()
        .rows()
        .iter()
        .map(|r| r.value_or_empty("description"))
        .collect();
    assert_eq!(names, ["A", "C"]);
}

#[test]
fn last_row_cannot_be_removed() {
    let mut s = InvoiceSession::new();
    let err = s.remove_row(0, true).unwrap_err();
    assert!(err.to_string().contains("at least one row"));
    assert_eq!(s.table().rows().len(), 1);
}

#[test]
fn row_removal_out_of_range_is_rejected() {
    let mut s = InvoiceSession::new();
    s.add_row().unwrap();
    assert!(s.remove_row(5, true).is_err());
    assert_eq!(s.table().rows().len(), 2);
}

#[test]
fn declined_row_removal_changes_nothing() {
    let mut s = InvoiceSession::new();
    s.add_row().unwrap();
    let err = s.remove_row(1, false).unwrap_err();
    assert_eq!(err.to_string(), "removing row 2 was not confirmed");
    assert_eq!(s.table().rows().len(), 2);
}

// --- Cell writes ---

#[test]
fn writes_to_unknown_cells_are_ignored() {
    let mut s = filled_session();
    let before = s.table().clone();
    assert!(!s.set_field(3, "price", "9"));
    assert!(!s.set_field(0, "colour", "red"));
    assert_eq!(s.table(), &before);
}

#[test]
fn cell_values_are_stored_verbatim() {
    let mut s = InvoiceSession::new();
    assert!(s.set_field(0, "quantity", " 3 pcs "));
    assert_eq!(s.table().row(0).unwrap().get("quantity"), Some(" 3 pcs "));
}

// --- Building tables from existing rows ---

#[test]
fn from_rows_conforms_to_schema() {
    let schema = ColumnSchema::starter();
    let row: Row = [("description", "Widget"), ("colour", "red")].into_iter().collect();
    let table = LineTable::from_rows(schema, vec![row]).unwrap();
    let row = table.row(0).unwrap();
    assert_eq!(row.get("description"), Some("Widget"));
    assert_eq!(row.get("price"), Some(""));
    assert!(!row.contains_key("colour"));
    assert!(table.check_parity().is_empty());
}

#[test]
fn from_rows_needs_a_row() {
    assert!(LineTable::from_rows(ColumnSchema::starter(), Vec::new()).is_err());
}
