//! Excel export functionality.

use crate::error::Result;
use crate::models::employee::Employee;
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use std::path::{Path, PathBuf};

/// Export employees to Excel file.
pub fn export_employees_to_excel(employees: &[Employee], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Employees")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4B6F44))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let headers = ["ID", "Name", "Position", "Department"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    worksheet.set_column_width(0, 8)?; // ID
    worksheet.set_column_width(1, 30)?; // Name
    worksheet.set_column_width(2, 25)?; // Position
    worksheet.set_column_width(3, 25)?; // Department

    for (idx, emp) in employees.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_number(row, 0, emp.id as f64)?;
        worksheet.write_string(row, 1, &emp.name)?;
        worksheet.write_string(row, 2, &emp.position)?;
        worksheet.write_string(row, 3, &emp.department)?;
    }

    if !employees.is_empty() {
        let last_row = employees.len() as u32;
        worksheet.autofilter(0, 0, last_row, 3)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    tracing::info!("Exported {} employees to {:?}", employees.len(), path);
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_shape() {
        let name = generate_export_filename("employees");
        assert!(name.starts_with("employees_"));
        assert!(name.ends_with(".xlsx"));
        // employees_YYYYmmdd_HHMMSS.xlsx
        assert_eq!(name.len(), "employees_".len() + 15 + ".xlsx".len());
    }

    #[test]
    fn test_export_writes_workbook() {
        let path = std::env::temp_dir().join(format!("employee-roster-export-{}.xlsx", std::process::id()));
        let employees = vec![
            Employee {
                id: 1,
                name: "Alice".to_string(),
                position: "Engineer".to_string(),
                department: "R&D".to_string(),
            },
            Employee {
                id: 2,
                name: "Bob".to_string(),
                position: "Analyst".to_string(),
                department: "Finance".to_string(),
            },
        ];

        export_employees_to_excel(&employees, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
        let _ = std::fs::remove_file(&path);
    }
}
