use std::path::Path;

use console::Style;
use panelcut_core::batch::BatchReport;
use panelcut_core::extract::ExtractedPanel;
use panelcut_core::ordering::PanelNaming;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    failed: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            failed: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

fn print_panels(s: &Styles, panels: &[ExtractedPanel], naming: PanelNaming, indent: &str) {
    for panel in panels {
        println!(
            "{indent}{:<14}{}",
            s.label.apply_to(naming.file_name(panel.index)),
            s.value.apply_to(format!(
                "{}x{} at ({}, {})",
                panel.width(),
                panel.height(),
                panel.native_rect.x,
                panel.native_rect.y
            ))
        );
    }
}

pub fn print_crop_summary(
    source_name: &str,
    size: (u32, u32),
    panels: &[ExtractedPanel],
    naming: PanelNaming,
    output: &Path,
) {
    let s = Styles::new();
    print_title(&s, "Panelcut Export");

    println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(source_name));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{}x{}", size.0, size.1))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Archive"),
        s.path.apply_to(output.display())
    );
    println!();

    println!(
        "  {}",
        s.header.apply_to(format!("Panels ({})", panels.len()))
    );
    print_panels(&s, panels, naming, "    ");
    println!();
}

pub fn print_batch_summary(report: &BatchReport, naming: PanelNaming, output: &Path) {
    let s = Styles::new();
    print_title(&s, "Panelcut Batch");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(report.items.len() + report.failures.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Panels"),
        s.value.apply_to(report.panel_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Archive"),
        s.path.apply_to(output.display())
    );
    println!();

    for item in &report.items {
        if item.panels.is_empty() {
            println!(
                "  {:<14}{}",
                s.header.apply_to(&item.source_name),
                s.failed.apply_to("no panels")
            );
            continue;
        }
        println!("  {}", s.header.apply_to(&item.source_name));
        print_panels(&s, &item.panels, naming, "    ");
    }

    if !report.failures.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Failed"));
        for failure in &report.failures {
            println!(
                "    {:<14}{}",
                s.label.apply_to(&failure.source_name),
                s.failed.apply_to(&failure.reason)
            );
        }
    }
    println!();
}
