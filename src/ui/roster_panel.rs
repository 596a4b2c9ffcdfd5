//! Employee roster panel: draft form, search fields, table and pagination.

use std::time::Instant;

use eframe::egui::{self, Align, Key, Layout, Response, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular::{
    ARROWS_CLOCKWISE, CARET_DOUBLE_LEFT, CARET_DOUBLE_RIGHT, CARET_LEFT, CARET_RIGHT, FILE_XLS, FLOPPY_DISK,
    PENCIL, PLUS, TRASH, X,
};

use super::app::{DeleteTarget, RosterApp};
use super::components::{
    action_button, colors, danger_action_button, panel_header, primary_button_with_icon, section_header,
    styled_button, styled_button_with_icon,
};

/// Show the roster panel.
pub fn show(app: &mut RosterApp, ui: &mut Ui) {
    ScrollArea::vertical().id_salt("roster_scroll").show(ui, |ui| {
        ui.set_max_width(720.0);

        panel_header(ui, "Employee Management");

        show_form(app, ui);

        ui.add_space(15.0);

        show_search(app, ui);

        ui.add_space(10.0);

        if let Some(message) = app.view.error_message() {
            ui.colored_label(colors::ERROR, message);
            ui.add_space(5.0);
        }

        ui.horizontal(|ui| {
            section_header(ui, "Employee List");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
                    app.export_employees();
                }
                if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                    let effect = app.view.refresh();
                    app.run_effect(effect);
                }
            });
        });

        show_table(app, ui);

        ui.add_space(8.0);

        show_pagination(app, ui);
    });
}

/// Was Enter pressed while this field had focus?
fn submitted(ui: &Ui, response: &Response) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter))
}

fn show_form(app: &mut RosterApp, ui: &mut Ui) {
    let mut submit = false;

    ui.group(|ui| {
        ui.set_width(ui.available_width());

        egui::Grid::new("employee_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                let draft = &mut app.view.draft.employee;

                ui.label("Name:");
                let response = ui.add(egui::TextEdit::singleline(&mut draft.name).desired_width(f32::INFINITY));
                submit |= submitted(ui, &response);
                ui.end_row();

                ui.label("Position:");
                let response =
                    ui.add(egui::TextEdit::singleline(&mut draft.position).desired_width(f32::INFINITY));
                submit |= submitted(ui, &response);
                ui.end_row();

                ui.label("Department:");
                let response =
                    ui.add(egui::TextEdit::singleline(&mut draft.department).desired_width(f32::INFINITY));
                submit |= submitted(ui, &response);
                ui.end_row();
            });

        ui.add_space(10.0);

        if app.view.draft.is_editing {
            ui.weak(format!("Editing employee #{}", app.view.draft.employee.id));
            if primary_button_with_icon(ui, FLOPPY_DISK, "Update Employee").clicked() {
                submit = true;
            }
            ui.add_space(4.0);
            if styled_button_with_icon(ui, X, "Cancel").clicked() {
                app.view.cancel_edit();
            }
        } else if primary_button_with_icon(ui, PLUS, "Add Employee").clicked() {
            submit = true;
        }
    });

    if submit {
        let effect = app.view.submit();
        app.run(effect);
    }
}

fn show_search(app: &mut RosterApp, ui: &mut Ui) {
    egui::Grid::new("search_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            ui.label("Find by name:");
            let mut query = app.view.search_query().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .desired_width(f32::INFINITY)
                    .hint_text("Exact name, looked up as you type"),
            );
            if response.changed() {
                let effect = app.view.set_search_query(query);
                app.run(effect);
            }
            ui.end_row();

            ui.label("Search:");
            let mut data = app.view.search_data().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut data)
                    .desired_width(f32::INFINITY)
                    .hint_text("Name..."),
            );
            if response.changed() {
                let now = Instant::now();
                app.view.set_search_data(data, now);
                // Wake up when the quiet period ends even if nothing else repaints
                if let Some(delay) = app.view.debounce_remaining(now) {
                    ui.ctx().request_repaint_after(delay);
                }
            }
            ui.end_row();
        });

    if !app.view.search_query().is_empty() || !app.view.search_data().is_empty() {
        ui.add_space(4.0);
        if styled_button(ui, "Clear").clicked() {
            let effect = app.view.clear_search();
            app.run_effect(effect);
        }
    }
}

fn show_table(app: &mut RosterApp, ui: &mut Ui) {
    let rows = app.view.employees().to_vec();
    let mut edit_id = None;
    let mut delete_target = None;

    ui.push_id("employees_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::exact(50.0))
            .column(Column::initial(180.0).resizable(true))
            .column(Column::initial(160.0).resizable(true))
            .column(Column::initial(160.0).resizable(true))
            .column(Column::remainder().at_least(70.0))
            .header(26.0, |mut header| {
                for title in ["ID", "Name", "Position", "Department", "Actions"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for emp in &rows {
                    body.row(28.0, |mut row| {
                        row.col(|ui| {
                            ui.label(emp.id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&emp.name);
                        });
                        row.col(|ui| {
                            ui.label(&emp.position);
                        });
                        row.col(|ui| {
                            ui.label(&emp.department);
                        });
                        row.col(|ui| {
                            if action_button(ui, PENCIL, "Edit").clicked() {
                                edit_id = Some(emp.id);
                            }
                            ui.add_space(4.0);
                            if danger_action_button(ui, TRASH, "Delete").clicked() {
                                delete_target = Some(DeleteTarget {
                                    id: emp.id,
                                    name: emp.name.clone(),
                                });
                            }
                        });
                    });
                }
            });
    });

    if rows.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.weak("No employees to show");
        });
    }

    if let Some(id) = edit_id {
        app.view.edit_employee(id);
    }
    if delete_target.is_some() {
        app.delete_target = delete_target;
    }
}

fn show_pagination(app: &mut RosterApp, ui: &mut Ui) {
    let pagination = app.view.pagination().clone();
    let mut new_page = None;
    let mut new_size = None;

    ui.horizontal(|ui| {
        ui.label("Rows per page:");
        egui::ComboBox::from_id_salt("rows_per_page")
            .width(60.0)
            .selected_text(pagination.page_size().to_string())
            .show_ui(ui, |ui| {
                for &size in app.view.page_size_options() {
                    if ui
                        .selectable_label(pagination.page_size() == size, size.to_string())
                        .clicked()
                    {
                        new_size = Some(size);
                    }
                }
            });

        ui.add_space(20.0);
        ui.label(pagination.range_label());
        ui.add_space(20.0);

        if ui
            .add_enabled(pagination.has_previous(), egui::Button::new(CARET_DOUBLE_LEFT))
            .on_hover_text("First page")
            .clicked()
        {
            new_page = Some(0);
        }
        if ui
            .add_enabled(pagination.has_previous(), egui::Button::new(CARET_LEFT))
            .on_hover_text("Previous page")
            .clicked()
        {
            new_page = Some(pagination.page() - 1);
        }
        ui.label(format!("Page {} of {}", pagination.page() + 1, pagination.page_count()));
        if ui
            .add_enabled(pagination.has_next(), egui::Button::new(CARET_RIGHT))
            .on_hover_text("Next page")
            .clicked()
        {
            new_page = Some(pagination.page() + 1);
        }
        if ui
            .add_enabled(pagination.has_next(), egui::Button::new(CARET_DOUBLE_RIGHT))
            .on_hover_text("Last page")
            .clicked()
        {
            new_page = Some(pagination.last_page());
        }
    });

    if let Some(size) = new_size {
        let effect = app.view.set_page_size(size);
        app.run(effect);
    } else if let Some(page) = new_page {
        let effect = app.view.set_page(page);
        app.run(effect);
    }
}
