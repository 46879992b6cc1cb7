use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use vod_dashboard::data::{EmptyResult, Histogram};

use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;
const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(229, 9, 20);

// ---------------------------------------------------------------------------
// Titles per year
// ---------------------------------------------------------------------------

/// Histogram of valid release years of the filtered titles.
pub fn year_histogram(ui: &mut Ui, histogram: &Result<Histogram, EmptyResult>) {
    ui.strong("Titles per year");
    let hist = match histogram {
        Ok(hist) => hist,
        Err(empty) => {
            no_data(ui, empty);
            return;
        }
    };

    let bars: Vec<Bar> = hist
        .bins()
        .map(|(start, end, count)| {
            Bar::new((start + end) / 2.0, count as f64)
                .width(end - start)
                .name(format!("{start:.0}–{end:.0}"))
        })
        .collect();

    Plot::new("year_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Titles")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_COLOR).name("Titles"));
        });
}

// ---------------------------------------------------------------------------
// Genre distribution
// ---------------------------------------------------------------------------

/// Most frequent genres as labelled rows, one bar per genre.
pub fn genre_distribution(ui: &mut Ui, genres: &[(String, usize)], limit: usize) {
    ui.strong("Genre distribution");
    if genres.is_empty() {
        no_data(ui, &EmptyResult::NoRows);
        return;
    }

    let max = genres.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f32;
    egui::ScrollArea::vertical()
        .id_salt("genre_rows")
        .max_height(CHART_HEIGHT)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("genre_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (genre, count) in genres.iter().take(limit) {
                        ui.label(genre.as_str());
                        ui.add(
                            egui::ProgressBar::new(*count as f32 / max)
                                .desired_width(160.0)
                                .text(count.to_string()),
                        );
                        ui.end_row();
                    }
                });
            if genres.len() > limit {
                ui.weak(format!("+{} more genres", genres.len() - limit));
            }
        });
}

// ---------------------------------------------------------------------------
// Type distribution
// ---------------------------------------------------------------------------

/// Share of each content type, one coloured bar per type.
pub fn type_distribution(ui: &mut Ui, state: &AppState, types: &[(String, usize)]) {
    ui.strong("Movies vs TV shows");
    if types.is_empty() {
        no_data(ui, &EmptyResult::NoRows);
        return;
    }

    let total: usize = types.iter().map(|(_, n)| n).sum();
    Plot::new("type_distribution")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Titles")
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (kind, count)) in types.iter().enumerate() {
                let color = state
                    .type_colors
                    .as_ref()
                    .map_or(Color32::GRAY, |c| c.color_for(kind));
                let share = 100.0 * *count as f64 / total as f64;
                let bar = Bar::new(i as f64, *count as f64)
                    .width(0.7)
                    .name(format!("{kind}: {count} ({share:.1}%)"));
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(kind.as_str()));
            }
        });
}

fn no_data(ui: &mut Ui, reason: &EmptyResult) {
    ui.add_sized(
        [ui.available_width(), CHART_HEIGHT],
        egui::Label::new(egui::RichText::new(format!("No data: {reason}")).weak()),
    );
}
