//! Main application UI.

use std::path::PathBuf;
use std::time::Instant;

use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::client::RosterClient;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::roster::{Effect, FetchRequest, FetchStatus, ListOutcome, Mutation, MutationKind, RosterView};

use super::components::colors;
use super::roster_panel;

/// Messages from async tasks to UI.
pub enum UiMessage {
    ListLoaded { generation: u64, result: Result<ListOutcome> },
    MutationFinished { kind: MutationKind, result: Result<()> },
    ConnectionTested(std::result::Result<u64, String>),
}

/// Backend connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success(u64),
    Failed(String),
}

/// Pending delete awaiting confirmation.
#[derive(Clone)]
pub struct DeleteTarget {
    pub id: i64,
    pub name: String,
}

/// Main application state.
pub struct RosterApp {
    // Runtime and backend
    rt: tokio::runtime::Runtime,
    ctx: egui::Context,
    client: Option<RosterClient>,

    // Message channel for async communication
    tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    // Configuration
    pub config: AppConfig,
    config_path: PathBuf,

    // Roster state
    pub view: RosterView,

    // Dialogs
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Backend dialog
    backend_dialog_open: bool,
    backend_url_input: String,
    backend_test: ConnectionTestState,
}

impl RosterApp {
    pub fn new(
        ctx: egui::Context,
        config: AppConfig,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
        initial_error: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let view = RosterView::new(&config.roster);

        let mut error_message = initial_error;
        let client = match RosterClient::new(&config.api) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!("Failed to create backend client: {}", e);
                error_message = Some(e.to_string());
                None
            }
        };

        let mut app = Self {
            rt,
            ctx,
            client,
            tx,
            rx,
            backend_url_input: config.api.base_url.clone(),
            config,
            config_path,
            view,
            delete_target: None,
            error_message,
            success_message: None,
            backend_dialog_open: false,
            backend_test: ConnectionTestState::default(),
        };

        // Load initial data
        let effect = app.view.load();
        app.run_effect(effect);

        app
    }

    /// Execute an effect requested by the view model.
    pub fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch(request) => self.spawn_fetch(request),
            Effect::Mutate(mutation) => self.spawn_mutation(mutation),
        }
    }

    /// Run an optional effect.
    pub fn run(&mut self, effect: Option<Effect>) {
        if let Some(effect) = effect {
            self.run_effect(effect);
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let Some(client) = self.client.clone() else {
            self.view
                .apply_list(request.generation, Err(AppError::config("Backend is not configured")));
            return;
        };
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();

        self.rt.spawn(async move {
            let result = client.execute_query(request.query).await;
            let _ = tx.send(UiMessage::ListLoaded {
                generation: request.generation,
                result,
            });
            ctx.request_repaint();
        });
    }

    fn spawn_mutation(&mut self, mutation: Mutation) {
        let kind = mutation.kind();
        let Some(client) = self.client.clone() else {
            let effect = self
                .view
                .apply_mutation(kind, Err(AppError::config("Backend is not configured")));
            self.run(effect);
            return;
        };
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();

        self.rt.spawn(async move {
            let result = client.execute_mutation(mutation).await;
            let _ = tx.send(UiMessage::MutationFinished { kind, result });
            ctx.request_repaint();
        });
    }

    /// Export the rows currently on screen to Excel.
    pub fn export_employees(&mut self) {
        let filename = crate::export::generate_export_filename("employees");
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        match crate::export::export_employees_to_excel(self.view.employees(), &path) {
            Ok(()) => {
                self.success_message = Some(format!("Exported to: {}", path.display()));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.error_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Open the backend connection dialog.
    pub fn open_backend_dialog(&mut self) {
        self.backend_dialog_open = true;
        self.backend_url_input = self.config.api.base_url.clone();
        self.backend_test = ConnectionTestState::NotTested;
    }

    /// Start a backend connection test against the URL being edited.
    fn test_backend_connection(&mut self) {
        let api = crate::config::ApiConfig {
            base_url: self.backend_url_input.trim().to_string(),
            ..self.config.api.clone()
        };
        if let Err(e) = api.validate() {
            self.backend_test = ConnectionTestState::Failed(e.to_string());
            return;
        }
        let client = match RosterClient::new(&api) {
            Ok(client) => client,
            Err(e) => {
                self.backend_test = ConnectionTestState::Failed(e.to_string());
                return;
            }
        };

        self.backend_test = ConnectionTestState::Testing;
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();

        self.rt.spawn(async move {
            let result = client.test_connection().await.map_err(|e| e.to_string());
            let _ = tx.send(UiMessage::ConnectionTested(result));
            ctx.request_repaint();
        });
    }

    /// Save the backend URL, rebuild the client and reload the list.
    fn save_backend_config(&mut self) -> bool {
        let mut api = self.config.api.clone();
        api.base_url = self.backend_url_input.trim().to_string();

        if let Err(e) = api.validate() {
            self.backend_test = ConnectionTestState::Failed(e.to_string());
            return false;
        }
        let client = match RosterClient::new(&api) {
            Ok(client) => client,
            Err(e) => {
                self.backend_test = ConnectionTestState::Failed(e.to_string());
                return false;
            }
        };

        self.config.api = api;
        if let Err(e) = self.config.save(&self.config_path) {
            tracing::error!("Failed to save config: {}", e);
            self.error_message = Some(format!("Failed to save config: {}", e));
        } else {
            tracing::info!("Backend set to {}", self.config.api.base_url);
        }

        self.client = Some(client);
        let effect = self.view.refresh();
        self.run_effect(effect);
        true
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::ListLoaded { generation, result } => {
                    self.view.apply_list(generation, result);
                }
                UiMessage::MutationFinished { kind, result } => {
                    let effect = self.view.apply_mutation(kind, result);
                    self.run(effect);
                }
                UiMessage::ConnectionTested(result) => {
                    self.backend_test = match result {
                        Ok(total) => ConnectionTestState::Success(total),
                        Err(e) => ConnectionTestState::Failed(e),
                    };
                }
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Tools", |ui| {
                    if ui.button("Backend Connection").clicked() {
                        self.open_backend_dialog();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Reload List").clicked() {
                        let effect = self.view.refresh();
                        self.run_effect(effect);
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (color, text) = match self.client {
                        Some(ref client) => (colors::NEUTRAL, client.base_url().to_string()),
                        None => (colors::ERROR, "Not configured".to_string()),
                    };
                    ui.colored_label(color, format!("Backend: {}", text));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| match self.view.status() {
                        FetchStatus::Loading => {
                            ui.label("Loading...");
                            ui.spinner();
                        }
                        FetchStatus::Error => {
                            ui.colored_label(colors::WARNING, "Last request failed");
                        }
                        FetchStatus::Idle => {
                            let shown = self.view.employees().len();
                            let total = self.view.pagination().total_elements();
                            ui.colored_label(colors::SUCCESS, format!("{} of {} loaded", shown, total));
                        }
                    });
                });
            });
    }

    /// Render backend configuration dialog.
    fn show_backend_dialog(&mut self, ctx: &egui::Context) {
        if !self.backend_dialog_open {
            return;
        }

        let mut open = true;
        egui::Window::new("Backend Connection")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                egui::Grid::new("backend_grid")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("API base URL:");
                        if ui
                            .add(egui::TextEdit::singleline(&mut self.backend_url_input).desired_width(260.0))
                            .changed()
                        {
                            self.backend_test = ConnectionTestState::NotTested;
                        }
                        ui.end_row();

                        ui.label("Name lookup:");
                        ui.label(self.config.roster.query_lookup.label());
                        ui.end_row();

                        ui.label("Search lookup:");
                        ui.label(self.config.roster.search_lookup.label());
                        ui.end_row();
                    });

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    let testing = matches!(self.backend_test, ConnectionTestState::Testing);
                    if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
                        self.test_backend_connection();
                    }

                    ui.add_space(10.0);

                    match &self.backend_test {
                        ConnectionTestState::NotTested => {}
                        ConnectionTestState::Testing => {
                            ui.spinner();
                            ui.label("Testing...");
                        }
                        ConnectionTestState::Success(total) => {
                            ui.colored_label(colors::SUCCESS, format!("Connected ({} employees)", total));
                        }
                        ConnectionTestState::Failed(e) => {
                            ui.colored_label(colors::ERROR, format!("Failed: {}", e));
                        }
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.backend_dialog_open = false;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() && self.save_backend_config() {
                            self.backend_dialog_open = false;
                        }
                    });
                });
            });

        if !open {
            self.backend_dialog_open = false;
        }
    }

    /// Render modal dialogs (validation alert, error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Validation alert blocks the form until acknowledged
        if let Some(alert) = self.view.alert().map(str::to_string) {
            let modal = egui::Modal::new(egui::Id::new("validation_alert")).show(ctx, |ui| {
                ui.set_width(280.0);
                ui.heading("Missing field");
                ui.add_space(8.0);
                ui.label(alert.as_str());
                ui.add_space(12.0);
                ui.button("OK").clicked()
            });
            if modal.inner || modal.should_close() {
                self.view.dismiss_alert();
            }
        }

        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if let Some(target) = self.delete_target.clone() {
            let modal = egui::Modal::new(egui::Id::new("delete_confirm")).show(ctx, |ui| {
                ui.set_width(300.0);
                ui.heading("Delete Employee");
                ui.add_space(8.0);
                ui.label(format!("Delete employee '{}' (id {})?", target.name, target.id));
                ui.add_space(12.0);

                let mut confirmed = None;
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        confirmed = Some(false);
                    }
                    if ui.button("Delete").clicked() {
                        confirmed = Some(true);
                    }
                });
                confirmed
            });

            match modal.inner {
                Some(true) => {
                    self.delete_target = None;
                    tracing::info!("Deleting employee: {}", target.name);
                    let effect = self.view.delete_employee(target.id);
                    self.run_effect(effect);
                }
                Some(false) => self.delete_target = None,
                None if modal.should_close() => self.delete_target = None,
                None => {}
            }
        }
    }
}

impl eframe::App for RosterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Fire the debounced search once its quiet period has elapsed
        let now = Instant::now();
        let effect = self.view.tick(now);
        self.run(effect);
        if let Some(remaining) = self.view.debounce_remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        // Menu bar
        self.show_menu_bar(ctx);

        // Status bar
        self.show_status_bar(ctx);

        // Backend dialog
        self.show_backend_dialog(ctx);

        // Modal dialogs
        self.show_dialogs(ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            roster_panel::show(self, ui);
        });
    }
}
