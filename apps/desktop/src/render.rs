//! Plain-text views of the store and the open workflows.

use std::fmt::Write as _;

use client_core::{CreateWorkflow, DeleteWorkflow, EditWorkflow, FilterState};
use shared::domain::{Freelancer, FreelancerFields, RecordField};

const HEADERS: [&str; 6] = ["User ID", "Username", "Email", "Phone Number", "Skillsets", "Hobby"];

pub fn render_page(filters: &FilterState, records: &[Freelancer]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "page {} (size {}) | username='{}' phone='{}' email='{}'",
        filters.page_number, filters.page_size, filters.username, filters.phone_number, filters.email
    );

    if records.is_empty() {
        out.push_str("(no users)\n");
        return out;
    }

    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|record| {
            let f = &record.fields;
            [
                record.id.to_string(),
                f.username.clone(),
                f.email.clone(),
                f.phone_number.clone(),
                f.skillsets.clone(),
                f.hobby.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

pub fn render_create(state: &CreateWorkflow) -> String {
    match state {
        CreateWorkflow::Hidden => "add user form is closed\n".to_string(),
        CreateWorkflow::Submitting(_) => "adding user...\n".to_string(),
        CreateWorkflow::Editing(form) => {
            let mut out = String::from("Add User\n");
            if let Some(err) = &form.server_error {
                let _ = writeln!(out, "  error: {err}");
            }
            push_fields(&mut out, &form.draft.fields, |field| form.draft.errors.get(field));
            out.push_str("  (set <field> <value>, save, cancel)\n");
            out
        }
    }
}

pub fn render_edit(state: &EditWorkflow) -> String {
    match state {
        EditWorkflow::Closed => "edit dialog is closed\n".to_string(),
        EditWorkflow::Submitting(record) => format!("saving user {}...\n", record.id),
        EditWorkflow::Open(dialog) => {
            let mut out = format!("Edit User {}\n", dialog.record.id);
            if let Some(err) = &dialog.error {
                let _ = writeln!(out, "  error: {err}");
            }
            push_fields(&mut out, &dialog.record.fields, |_| None);
            out.push_str("  (set <field> <value>, save, cancel)\n");
            out
        }
    }
}

pub fn render_delete(state: &DeleteWorkflow) -> String {
    match state {
        DeleteWorkflow::Closed => "no delete pending\n".to_string(),
        DeleteWorkflow::ConfirmOpen(id) => format!(
            "Confirm Delete: are you sure you want to delete user {id}? (confirm | cancel)\n"
        ),
        DeleteWorkflow::Deleting(id) => format!("deleting user {id}...\n"),
    }
}

fn push_fields<'a>(
    out: &mut String,
    fields: &FreelancerFields,
    error_for: impl Fn(RecordField) -> Option<&'a str>,
) {
    for field in RecordField::ALL {
        let _ = writeln!(out, "  {:<13} {}", format!("{}:", field.label()), fields.get(field));
        if let Some(message) = error_for(field) {
            let _ = writeln!(out, "    ! {message}");
        }
    }
}
