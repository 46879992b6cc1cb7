use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

const ALL_GENRES: &str = "All genres";
const ALL_TYPES: &str = "Movie or TV Show";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // The Arc clone lets us mutate `state` while reading the domain.
    let Some(catalog) = state.catalog.clone() else {
        ui.label("No catalog loaded.");
        return;
    };
    let domain = catalog.domain();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Genre ----
            ui.strong("Genre");
            let mut genre = state.spec.genre.clone();
            egui::ComboBox::from_id_salt("genre_filter")
                .selected_text(genre.as_deref().unwrap_or(ALL_GENRES))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut genre, None, ALL_GENRES);
                    for g in &domain.genre_universe {
                        ui.selectable_value(&mut genre, Some(g.clone()), g.as_str());
                    }
                });
            state.set_genre(genre);
            ui.add_space(8.0);

            // ---- Type ----
            ui.strong("Type");
            let mut kind = state.spec.kind.clone();
            egui::ComboBox::from_id_salt("type_filter")
                .selected_text(kind.as_deref().unwrap_or(ALL_TYPES))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut kind, None, ALL_TYPES);
                    for t in &domain.type_universe {
                        let mut text = RichText::new(t.as_str());
                        if let Some(colors) = &state.type_colors {
                            text = text.color(colors.color_for(t));
                        }
                        ui.selectable_value(&mut kind, Some(t.clone()), text);
                    }
                });
            state.set_type(kind);
            ui.add_space(8.0);

            // ---- Release year ----
            ui.strong("Release year");
            let (mut low, mut high) = state
                .spec
                .year_range
                .unwrap_or_else(|| domain.full_year_range());
            let bounds = domain.year_min..=domain.year_max;
            ui.add(egui::Slider::new(&mut low, bounds.clone()).text("from"));
            ui.add(egui::Slider::new(&mut high, bounds).text("to"));
            state.set_year_range(low, high);

            let marks: Vec<&str> = domain.year_marks.values().map(String::as_str).collect();
            ui.label(RichText::new(marks.join("  ")).small().weak());
            ui.add_space(8.0);

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.snapshot.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(catalog), Some(snapshot)) = (&state.catalog, &state.snapshot) {
            ui.label(format!(
                "{} titles loaded, {} matching",
                catalog.len(),
                snapshot.counts.total
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open title catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("summary.json")
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };

    let written = snapshot
        .to_json()
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
    match written {
        Ok(()) => {
            log::info!("Exported summary to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
