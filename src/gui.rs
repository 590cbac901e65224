//! Graphical shell: the egui window around a [`Controller`].

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use eframe::{egui, App, Frame};
use egui::{ColorImage, TextureOptions, Visuals};
use rfd::FileDialog;
use tokio::runtime::Handle;

use crate::controller::Controller;
use crate::extractor::Extractor;
use crate::session::{Dialog, ShellState};
use crate::thumbnail;

const TITLE: &str = "DownTube";

/// Opens the window and blocks until it is closed
pub fn run(
    extractor: Arc<dyn Extractor>,
    runtime: Handle,
    output_dir: Option<PathBuf>,
) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([800.0, 500.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            // Use dark theme visuals
            cc.egui_ctx.set_visuals(Visuals::dark());
            // Workers wake the window whenever they post a message
            let ctx = cc.egui_ctx.clone();
            let controller = Controller::new(extractor, runtime.clone(), output_dir)
                .with_notify(move || ctx.request_repaint());
            Box::new(DownTubeApp::new(controller, runtime))
        }),
    )
}

pub struct DownTubeApp {
    /// Contents of the URL field
    url_input: String,
    controller: Controller,
    runtime: Handle,
    /// Cached textures keyed by thumbnail URL
    thumbnails: HashMap<String, egui::TextureHandle>,
    /// Incoming thumbnail fetch results (url, image)
    thumbnail_results: Arc<Mutex<Vec<(String, ColorImage)>>>,
    /// Thumbnail URL already handed to a fetch task
    requested_thumbnail: Option<String>,
}

impl DownTubeApp {
    pub fn new(controller: Controller, runtime: Handle) -> Self {
        Self {
            url_input: String::new(),
            controller,
            runtime,
            thumbnails: HashMap::new(),
            thumbnail_results: Arc::new(Mutex::new(Vec::new())),
            requested_thumbnail: None,
        }
    }

    fn request_thumbnail(&mut self, ctx: &egui::Context) {
        let Some(url) = self
            .controller
            .session()
            .info()
            .and_then(|info| info.thumbnail.clone())
        else {
            return;
        };
        if self.requested_thumbnail.as_deref() == Some(url.as_str()) {
            return;
        }
        self.requested_thumbnail = Some(url.clone());

        // Spawn thumbnail fetch in blocking task
        let results = Arc::clone(&self.thumbnail_results);
        let ctx_c = ctx.clone();
        self.runtime.spawn_blocking(move || {
            if let Some(img) = thumbnail::fetch_thumbnail(&url) {
                if let Ok(mut pending) = results.lock() {
                    pending.push((url, img));
                }
                ctx_c.request_repaint();
            }
        });
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.controller.session().dialog().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(dialog.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let text = match &dialog {
                    Dialog::Warning(m) => egui::RichText::new(m).color(egui::Color32::YELLOW),
                    Dialog::Error(m) => egui::RichText::new(m).color(egui::Color32::LIGHT_RED),
                    Dialog::Info(m) => egui::RichText::new(m),
                };
                ui.label(text);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.controller.session_mut().dismiss_dialog();
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownTubeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Apply worker results on the interface thread
        self.controller.poll();

        // Handle completed thumbnail fetches
        {
            if let Ok(mut pending) = self.thumbnail_results.lock() {
                for (url, img) in pending.drain(..) {
                    let tex = ctx.load_texture(&url, img, TextureOptions::default());
                    self.thumbnails.insert(url, tex);
                }
            }
        }
        self.request_thumbnail(ctx);

        // Modal message on top; the panel below is disabled while it is open
        self.show_dialog(ctx);

        // Clicks are collected here and applied after drawing
        let mut search_clicked = false;
        let mut download_clicked = false;
        let mut clicked_row = None;
        let mut picked_folder = None;

        let session = self.controller.session();
        let blocked = session.dialog().is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.heading(TITLE);

                // URL input field
                ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text("Enter the video URL...")
                        .desired_width(f32::INFINITY),
                );

                // Search button, relabelled and disabled while a lookup runs
                let label = if session.state() == ShellState::Searching {
                    "Searching..."
                } else {
                    "Search formats"
                };
                if ui.add_enabled(session.can_search(), egui::Button::new(label)).clicked() {
                    search_clicked = true;
                }

                // Title and thumbnail of the looked-up video
                if let Some(info) = session.info() {
                    ui.separator();
                    ui.horizontal(|ui| {
                        let tex = info.thumbnail.as_ref().and_then(|u| self.thumbnails.get(u));
                        if let Some(tex) = tex {
                            ui.add(egui::Image::new(tex).max_width(160.0));
                        }
                        ui.strong(&info.title);
                    });
                }

                // Folder selection
                ui.horizontal(|ui| {
                    ui.label("Save to:");
                    let folder = session
                        .output_dir()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| ".".to_string());
                    ui.monospace(&folder);
                    if ui.button("Browse…").clicked() {
                        picked_folder = FileDialog::new().set_directory(&folder).pick_folder();
                    }
                });

                // Format table; clicking any cell selects the row
                ui.separator();
                egui::ScrollArea::vertical()
                    .max_height((ui.available_height() - 70.0).max(120.0))
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        egui::Grid::new("formats")
                            .striped(true)
                            .num_columns(5)
                            .show(ui, |ui| {
                                for header in ["ID", "Extension", "Resolution", "Size", "Note"] {
                                    ui.strong(header);
                                }
                                ui.end_row();

                                for (row, f) in session.formats().iter().enumerate() {
                                    let selected = session.selected() == Some(row);
                                    let cells = [
                                        f.id.clone(),
                                        f.container_extension.clone(),
                                        f.resolution_label().to_string(),
                                        f.size_label(),
                                        f.note.clone(),
                                    ];
                                    for cell in cells {
                                        if ui.selectable_label(selected, cell).clicked() {
                                            clicked_row = Some(row);
                                        }
                                    }
                                    ui.end_row();
                                }
                            });
                    });

                // Progress bar and Download button
                ui.add(egui::ProgressBar::new(session.progress()).show_percentage());

                if ui
                    .add_enabled(session.can_download(), egui::Button::new("Download"))
                    .clicked()
                {
                    download_clicked = true;
                }
            });
        });

        // Apply the collected clicks now that drawing is done
        if let Some(folder) = picked_folder {
            self.controller.session_mut().set_output_dir(folder);
        }
        if let Some(row) = clicked_row {
            self.controller.session_mut().select(row);
        }
        if search_clicked {
            let url = self.url_input.clone();
            self.controller.search(&url);
        }
        if download_clicked {
            self.controller.download();
        }

        // Request periodic repaint for progress updates
        if matches!(
            self.controller.session().state(),
            ShellState::Searching | ShellState::Downloading
        ) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
