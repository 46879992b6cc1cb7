use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use vod_dashboard::data::TableRow;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Filtered titles table
// ---------------------------------------------------------------------------

/// Title / type / year / country of every filtered title, catalog order.
pub fn titles_table(ui: &mut Ui, rows: &[TableRow], limit: usize) {
    ui.heading("Filtered titles");
    let shown = rows.len().min(limit);
    if shown < rows.len() {
        ui.weak(format!("showing the first {shown} of {} titles", rows.len()));
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(180.0).clip(true))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder().at_least(120.0).clip(true))
        .max_scroll_height(300.0)
        .header(20.0, |mut header| {
            for name in ["Title", "Type", "Release year", "Country"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, shown, |mut row| {
                let rec = &rows[row.index()];
                row.col(|ui| {
                    ui.label(rec.title.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.kind.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.release_year.to_string());
                });
                row.col(|ui| {
                    ui.label(rec.country.as_str());
                });
            });
        });
}
