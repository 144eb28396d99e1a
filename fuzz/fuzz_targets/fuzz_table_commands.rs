#![no_main]

use libfuzzer_sys::fuzz_target;
use tabfaktura::core::*;
use tabfaktura::export::CsvRenderer;

// Each input byte pair selects a command and an argument.
fuzz_target!(|data: &[u8]| {
    let mut s = InvoiceSession::new();
    for pair in data.chunks(2) {
        let (op, arg) = (pair[0], pair.get(1).copied().unwrap_or(0));
        let keys: Vec<String> = s.table().schema().keys().map(String::from).collect();
        let key = keys[usize::from(arg) % keys.len()].clone();
        let command = match op % 6 {
            0 => Command::AddColumn {
                key: format!("c{arg}"),
                label: format!("Column {arg}"),
            },
            1 => Command::RemoveColumn { key },
            2 => Command::AddRow,
            3 => Command::RemoveRow {
                index: usize::from(arg % 8),
            },
            4 => Command::SetField {
                index: usize::from(arg % 8),
                key,
                value: String::from_utf8_lossy(pair).into_owned(),
            },
            _ => Command::SetCurrency(Currency::ALL[usize::from(arg) % Currency::ALL.len()]),
        };
        let _ = s.apply(command, op & 0x80 == 0);

        assert!(s.table().check_parity().is_empty());
        assert!(!s.table().columns().is_empty());
        assert!(!s.table().rows().is_empty());
    }
    let _ = s.grand_total_display();
    let _ = s.export(&CsvRenderer::default());
});
