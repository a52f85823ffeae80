use std::{collections::BTreeMap, path::Path};

use serde::Serialize;
use symremap::{
    remap::remap_documents,
    symbols::{DebugInfoSource, DocumentId},
};

use crate::{
    app::GlobalOptions,
    input::{read_map, TreeFile},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct DocumentEntry {
    id: usize,
    path: String,
    language: String,
    functions: usize,
    sequence_points: usize,
}

pub fn run(path: &Path, map: Option<&Path>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut info = TreeFile::read(path)?.load()?;
    if let Some(map) = map {
        let map = read_map(map)?;
        let remapped = remap_documents(&mut info, &map);
        log::info!("{remapped} of {} documents remapped", info.documents.len());
    }

    // (functions, sequence points) per document
    let mut usage: BTreeMap<DocumentId, (usize, usize)> = BTreeMap::new();
    for function in &info.functions {
        let mut seen = Vec::new();
        for group in &function.lines {
            let entry = usage.entry(group.document).or_default();
            entry.1 += group.lines.len();
            if !seen.contains(&group.document) {
                seen.push(group.document);
                entry.0 += 1;
            }
        }
    }

    let entries: Vec<DocumentEntry> = info
        .documents
        .iter()
        .enumerate()
        .map(|(index, document)| {
            let (functions, sequence_points) =
                usage.get(&DocumentId(index)).copied().unwrap_or_default();
            DocumentEntry {
                id: index,
                path: document.path.clone(),
                language: document.language.to_string(),
                functions,
                sequence_points,
            }
        })
        .collect();

    print_output(&entries, opts, |entries| {
        if entries.is_empty() {
            println!("No documents.");
            return;
        }
        let mut writer = TabWriter::new(&[
            ("ID", Align::Right),
            ("FUNCTIONS", Align::Right),
            ("POINTS", Align::Right),
            ("PATH", Align::Left),
        ]);
        for entry in entries {
            writer.row(vec![
                entry.id.to_string(),
                entry.functions.to_string(),
                entry.sequence_points.to_string(),
                entry.path.clone(),
            ]);
        }
        writer.print();
    })
}
