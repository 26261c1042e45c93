//! Shared fixtures for integration tests

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Write `rows` to the first worksheet of a new .xlsx file. Empty strings
/// leave the cell blank.
pub fn write_workbook(path: &Path, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

/// A realistic translation sheet: header, comment rows, two keys
pub fn write_labels_workbook(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    write_workbook(
        &path,
        &[
            &["key", "Default Language", "GR", "fr"],
            &["Checkout page", "", "", ""],
            &["checkout.title", "Checkout", "Ολοκλήρωση", "Paiement"],
            &["Σχόλιο για μεταφραστές", "", "", ""],
            &[" checkout.pay.button ;", "Pay; now", "Πληρωμή", "Payer"],
        ],
    );
    path
}

pub const LABELS_IMPEX: &str = "INSERT_UPDATE LocalizationEntry; code[unique=true];translation[lang=en];translation[lang=el];translation[lang=fr]
;checkout.title;Checkout;Ολοκλήρωση;Paiement
;checkout.pay.button;Pay  now;Πληρωμή;Payer";

/// A sheet with a header and notes but no translation keys
pub fn write_keyless_workbook(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    write_workbook(
        &path,
        &[&["key", "en"], &["Nothing to translate here.", "Rien."]],
    );
    path
}

pub fn write_corrupt_workbook(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"PK\x03\x04 this is not really a workbook").unwrap();
    path
}
