use eframe::egui::{self, RichText, Ui};

use vod_dashboard::data::{EmptyResult, Insights, TypeCounts};

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

pub fn kpi_cards(ui: &mut Ui, counts: &TypeCounts) {
    ui.columns(3, |cols| {
        kpi_card(&mut cols[0], "Total titles", counts.total);
        kpi_card(&mut cols[1], "Movies", counts.movies);
        kpi_card(&mut cols[2], "TV shows", counts.tv_shows);
    });
}

fn kpi_card(ui: &mut Ui, label: &str, value: usize) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(label);
            ui.label(RichText::new(value.to_string()).size(28.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

pub fn insights_box(ui: &mut Ui, insights: &Result<Insights, EmptyResult>) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.heading("Insights");
        match insights {
            Ok(found) => {
                ui.label(format!("Country with most titles: {}", found.top_country));
                ui.label(format!("Most common release year: {}", found.top_year_label()));
                ui.label(format!("Total titles: {}", found.total));
            }
            Err(empty) => {
                ui.label(format!("{}.", capitalize(&empty.to_string())));
            }
        }
    });
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
