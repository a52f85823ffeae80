use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::Serialize;
use symremap::{RewriteOptions, RewriteSummary, SymbolRewriter, XmlSink};

use crate::{
    app::GlobalOptions,
    input::{read_map, TreeFile},
    output::{print_output, Align, TabWriter},
};

pub struct RewriteFlags {
    pub trusted: bool,
    pub entry_point: bool,
}

#[derive(Debug, Serialize)]
struct RewriteOutput {
    output: String,
    functions: usize,
    documents_remapped: usize,
    documents_registered: usize,
    sequence_points: usize,
    scopes: usize,
    attributes: usize,
}

impl RewriteOutput {
    fn new(output: &Path, summary: RewriteSummary) -> Self {
        RewriteOutput {
            output: output.display().to_string(),
            functions: summary.functions,
            documents_remapped: summary.documents_remapped,
            documents_registered: summary.documents_registered,
            sequence_points: summary.sequence_points,
            scopes: summary.scopes,
            attributes: summary.attributes,
        }
    }
}

/// An output file that is deleted again unless the rewrite finished.
///
/// A failed rewrite leaves a truncated store behind; it must never be mistaken for a
/// complete one.
struct PendingOutput<'a> {
    path: &'a Path,
    finished: bool,
}

impl<'a> PendingOutput<'a> {
    fn create(path: &'a Path) -> anyhow::Result<(Self, File)> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output: {}", path.display()))?;
        Ok((
            PendingOutput {
                path,
                finished: false,
            },
            file,
        ))
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for PendingOutput<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(error) = fs::remove_file(self.path) {
                log::warn!(
                    "Failed to remove incomplete output {}: {error}",
                    self.path.display()
                );
            }
        }
    }
}

pub fn run(
    path: &Path,
    map: &Path,
    output: Option<&Path>,
    flags: RewriteFlags,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let mut tree = TreeFile::read(path)?;
    let map = read_map(map)?;

    let options = if flags.trusted {
        RewriteOptions::trusted()
    } else {
        RewriteOptions::default()
    }
    .with_entry_point(flags.entry_point);

    let names = tree.names().clone();
    let rewriter = SymbolRewriter::new(options).with_resolver(&names);

    let Some(output) = output else {
        // XML owns stdout; the summary only goes to the log
        let sink = XmlSink::new(io::stdout().lock())?.with_resolver(&names);
        rewriter.rewrite_from(&mut tree, &map, sink)?;
        return Ok(());
    };

    let (pending, file) = PendingOutput::create(output)?;
    let sink = XmlSink::new(BufWriter::new(file))?.with_resolver(&names);
    let summary = rewriter
        .rewrite_from(&mut tree, &map, sink)
        .with_context(|| format!("rewrite failed, removed {}", output.display()))?;
    pending.finish();

    let data = RewriteOutput::new(output, summary);
    print_output(&data, opts, |data| {
        let mut writer = TabWriter::new(&[("", Align::Left), ("", Align::Right)]);
        for (label, value) in [
            ("Functions", data.functions),
            ("Documents remapped", data.documents_remapped),
            ("Documents registered", data.documents_registered),
            ("Sequence points", data.sequence_points),
            ("Scopes", data.scopes),
            ("Attributes", data.attributes),
        ] {
            writer.row(vec![label.to_string(), value.to_string()]);
        }
        println!("Wrote {}", data.output);
        writer.print();
    })?;

    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("symremap_{}_{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    const MAP: &str = r#"{ "/build/a.cs": "/src/a.cs" }"#;

    fn options() -> GlobalOptions {
        GlobalOptions {
            json: true,
            verbose: false,
        }
    }

    fn flags() -> RewriteFlags {
        RewriteFlags {
            trusted: false,
            entry_point: true,
        }
    }

    #[test]
    fn failed_rewrite_removes_output() {
        // The child scope leaks out of its parent
        let tree = temp_file(
            "bad_tree.json",
            r#"{
                "documents": [{ "path": "/build/a.cs" }],
                "functions": [{
                    "token": "0x06000001",
                    "lines": [{ "document": 0, "points": [[0, 1, 1, 1, 2]] }],
                    "scope": { "offset": 0, "length": 8, "scopes": [{ "offset": 4, "length": 8 }] }
                }]
            }"#,
        );
        let map = temp_file("bad_map.json", MAP);
        let output = std::env::temp_dir().join(format!("symremap_{}_bad.xml", std::process::id()));

        let result = run(&tree, &map, Some(&output), flags(), &options());

        assert!(result.is_err());
        assert!(!output.exists());

        fs::remove_file(tree).unwrap();
        fs::remove_file(map).unwrap();
    }

    #[test]
    fn finished_rewrite_keeps_output() {
        let tree = temp_file(
            "good_tree.json",
            r#"{
                "documents": [{ "path": "/build/a.cs" }],
                "functions": [{
                    "token": "0x06000001",
                    "lines": [{ "document": 0, "points": [[0, 1, 1, 1, 2]] }],
                    "scope": { "offset": 0, "length": 8 }
                }]
            }"#,
        );
        let map = temp_file("good_map.json", MAP);
        let output = std::env::temp_dir().join(format!("symremap_{}_good.xml", std::process::id()));

        run(&tree, &map, Some(&output), flags(), &options()).unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("path=\"/src/a.cs\""));
        assert!(xml.trim_end().ends_with("</symbols>"));

        fs::remove_file(tree).unwrap();
        fs::remove_file(map).unwrap();
        fs::remove_file(output).unwrap();
    }
}
