use eframe::egui;
use egui_dnd_grid::{Atom, DragDropResponse, GridConfig, ReorderGrid, SortableItem};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SOURCES: [&str; 9] = [
    "hacker-news",
    "github",
    "v2ex",
    "weibo",
    "zhihu",
    "producthunt",
    "lobsters",
    "solidot",
    "ithome",
];

struct SourcesApp {
    sources: Atom<Vec<&'static str>>,
    grid: ReorderGrid<&'static str>,
}

impl eframe::App for SourcesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Sources");
            ui.label("Drag a card by its handle to reorder, Esc cancels.");
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                let response = self.grid.ui(ui, &mut self.sources, source_card);
                if let DragDropResponse::Completed(indices) = response {
                    ui.ctx().request_repaint();
                    info!(from = indices.source, to = indices.target, "drop handled");
                }
            });
        });
    }
}

fn source_card(ui: &mut egui::Ui, mut card: SortableItem<'_, &'static str>) {
    let fill = if card.is_overlay() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().extreme_bg_color
    };

    egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            card.handle(ui, |ui| {
                ui.label(egui::RichText::new("::").strong().monospace());
            });
            ui.heading(*card.item());
        });
        ui.label(format!("#{}", card.index() + 1));

        let (transform, transition) = card.style().to_css();
        ui.weak(transform);
        if let Some(transition) = transition {
            ui.weak(transition);
        }
    });
}

/// Reads a grid config from the TOML file given as first argument, falling back to defaults.
fn load_config() -> GridConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GridConfig::default();
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!(%path, "Failed to read grid config: {err}");
            return GridConfig::default();
        }
    };
    match GridConfig::from_toml_str(&text) {
        Ok(config) => {
            info!(%path, "Loaded grid config");
            config
        }
        Err(err) => {
            warn!(%path, "{err}, using defaults");
            GridConfig::default()
        }
    }
}

fn main() -> eframe::Result {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,egui_dnd_grid=debug")),
        )
        .init();

    let config = load_config();
    let mut sources = Atom::new(SOURCES.to_vec());
    sources.subscribe(|order: &Vec<&'static str>| info!(?order, "sources reordered"));

    eframe::run_native(
        "Sources",
        eframe::NativeOptions::default(),
        Box::new(move |_cc| {
            Ok(Box::new(SourcesApp {
                sources,
                grid: ReorderGrid::new(config),
            }))
        }),
    )
}
