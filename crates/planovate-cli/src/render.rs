//! Text output for projects.

use std::fmt::Write;

use planovate_core::{ProjectDisplay, ProjectRecord, ProjectRepository};

/// One history line: title, city, budget and creation date.
pub fn project_line(record: &ProjectRecord) -> String {
    let view = ProjectDisplay::new(record);
    format!(
        "{}  {} | {} | {} | {}",
        view.id(),
        view.title(),
        view.city(),
        view.budget(),
        view.created()
    )
}

/// Full detail of one project, with photo URLs when the repository has them.
pub fn project_detail(record: &ProjectRecord, repo: &dyn ProjectRepository) -> String {
    let view = ProjectDisplay::new(record);
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.title());
    let _ = writeln!(out, "  Id:       {}", view.id());
    let _ = writeln!(out, "  City:     {}", view.city());
    let _ = writeln!(out, "  Budget:   {}", view.budget());
    let _ = writeln!(out, "  Created:  {}", view.created());
    let _ = writeln!(out, "  Updated:  {}", view.updated());

    for (label, asset) in [
        ("Current", record.current_photo.as_ref()),
        ("Ideal", record.ideal_photo.as_ref()),
    ] {
        let Some(id) = asset else { continue };
        if let Some(url) = repo.asset_url(id) {
            let _ = writeln!(out, "  {:<9} {}", format!("{}:", label), url);
        }
        if let Some(url) = repo.asset_preview_url(id) {
            let _ = writeln!(out, "  {:<9} {}", "Preview:", url);
        }
    }

    let _ = writeln!(out);
    let _ = write!(out, "{}", view.description());
    out
}
