use eframe::egui::{self, Ui};

use vod_dashboard::config::DashboardConfig;

use crate::state::AppState;
use crate::ui::{panels, plot, summary, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app, opening the configured catalog if there is one.
    pub fn new(config: DashboardConfig) -> Self {
        let dataset = config.dataset_path.clone();
        let mut state = AppState::new(config);
        if let Some(path) = dataset {
            state.open_path(&path);
        }
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table, insights ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a title catalog to start  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::vertical()
        .id_salt("dashboard")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            summary::kpi_cards(ui, &snapshot.counts);
            ui.add_space(12.0);

            ui.columns(3, |cols| {
                plot::year_histogram(&mut cols[0], &snapshot.histogram);
                plot::genre_distribution(
                    &mut cols[1],
                    &snapshot.genres,
                    state.config.genre_chart_limit,
                );
                plot::type_distribution(&mut cols[2], state, &snapshot.types);
            });
            ui.add_space(12.0);

            table::titles_table(ui, &snapshot.table, state.config.table_row_limit);
            ui.add_space(12.0);

            summary::insights_box(ui, &snapshot.insights);
        });
}
