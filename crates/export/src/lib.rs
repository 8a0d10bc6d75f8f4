//! Flat-file export: uniform rows plus the CSV serializer and the
//! canonical report shapes (invoice, inventory snapshot, history, period
//! report views).

mod shapes;
mod table;

pub use shapes::{
    history_rows, inventory_rows, invoice_rows, period_report_rows, personal_report_rows,
    purchase_report_rows, sold_report_rows, PeriodView,
};
pub use table::{to_csv_string, write_csv, ExportError, Row};
