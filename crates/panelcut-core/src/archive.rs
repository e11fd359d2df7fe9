use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{PanelcutError, Result};
use crate::extract::ExtractedPanel;
use crate::ordering::PanelNaming;
use crate::source::file_stem;

/// Panels extracted from one source file, for batch archives.
#[derive(Clone, Debug)]
pub struct BatchItem {
    /// Original file name of the source image.
    pub source_name: String,
    pub panels: Vec<ExtractedPanel>,
}

/// Every entry gets the same timestamp so rebuilding an unchanged export
/// yields identical bytes.
fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

fn write_panels(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    prefix: &str,
    panels: &[ExtractedPanel],
    naming: PanelNaming,
) -> Result<()> {
    let options = entry_options();
    for (i, panel) in panels.iter().enumerate() {
        let name = format!("{prefix}{}", naming.file_name(i + 1));
        zip.start_file(name, options)?;
        zip.write_all(&panel.png)?;
    }
    Ok(())
}

/// Build a flat archive with one entry per panel, numbered in the given
/// order. Empty input is rejected.
pub fn build_archive(panels: &[ExtractedPanel], naming: PanelNaming) -> Result<Vec<u8>> {
    if panels.is_empty() {
        return Err(PanelcutError::EmptyExport);
    }
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    write_panels(&mut zip, "", panels, naming)?;
    let bytes = zip.finish()?.into_inner();
    info!(entries = panels.len(), bytes = bytes.len(), "Archive built");
    Ok(bytes)
}

/// Build an archive with one folder per source image, named after the
/// source file without its extension. Sources without panels get no folder.
pub fn build_batch_archive(items: &[BatchItem], naming: PanelNaming) -> Result<Vec<u8>> {
    let non_empty: Vec<&BatchItem> = items.iter().filter(|i| !i.panels.is_empty()).collect();
    if non_empty.is_empty() {
        return Err(PanelcutError::EmptyExport);
    }

    let folders = folder_names(&non_empty);
    let options = entry_options();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut entries = 0;

    for (item, folder) in non_empty.iter().zip(&folders) {
        let prefix = format!("{folder}/");
        zip.add_directory(prefix.as_str(), options)?;
        write_panels(&mut zip, &prefix, &item.panels, naming)?;
        entries += item.panels.len();
    }

    let bytes = zip.finish()?.into_inner();
    info!(
        folders = folders.len(),
        entries,
        bytes = bytes.len(),
        "Batch archive built"
    );
    Ok(bytes)
}

/// Folder name per item: the file stem, with `_2`, `_3`, ... appended when
/// the name is already taken.
fn folder_names(items: &[&BatchItem]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    items
        .iter()
        .map(|item| {
            let stem = sanitize(file_stem(&item.source_name));
            let mut name = stem.clone();
            let mut n = 1;
            while taken.contains(&name) {
                n += 1;
                name = format!("{stem}_{n}");
            }
            if n > 1 {
                warn!(source = %item.source_name, folder = %name, "Duplicate folder name");
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// Keep folder names to a single path component.
fn sanitize(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "image".to_string()
    } else {
        cleaned
    }
}
