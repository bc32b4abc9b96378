use crate::prelude::{eprintln, println, *};
use crate::{Global, OutputFormat};
use pdfscan::OutlineNode;

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: std::path::PathBuf,
}

pub fn run(options: Options, global: Global) -> Result<()> {
    let doc = open_document(&options.path)?;
    let bookmarks = doc.bookmarks();

    match global.format {
        // `null` for a document without an outline, `[]` for an empty one.
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bookmarks)?),
        OutputFormat::Table => {
            let Some(nodes) = bookmarks else {
                eprintln!("{} has no outline", options.path.display());
                return Ok(());
            };

            let mut table = new_table();
            table.add_row(prettytable::row!["Title", "Page", "Offset"]);
            for (depth, node) in flatten(&nodes) {
                table.add_row(prettytable::row![
                    f!("{}{}", "  ".repeat(depth), node.name),
                    node.page_number.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                    node.y_offset.map(|y| f!("{:.2}", y)).unwrap_or_else(|| "-".into())
                ]);
            }
            table.printstd();
        }
    }

    Ok(())
}

/// Pre-order walk paired with nesting depth.
fn flatten(nodes: &[OutlineNode]) -> Vec<(usize, &OutlineNode)> {
    fn walk<'a>(nodes: &'a [OutlineNode], depth: usize, out: &mut Vec<(usize, &'a OutlineNode)>) {
        for node in nodes {
            out.push((depth, node));
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            name: name.to_string(),
            page_number: Some(1),
            y_offset: Some(0.0),
            children,
        }
    }

    #[test]
    fn test_flatten_is_preorder_with_depth() {
        let nodes = vec![
            node("A", vec![node("A.1", vec![node("A.1.a", vec![])])]),
            node("B", vec![]),
        ];
        let flat: Vec<(usize, &str)> = flatten(&nodes)
            .into_iter()
            .map(|(d, n)| (d, n.name.as_str()))
            .collect();
        assert_eq!(flat, vec![(0, "A"), (1, "A.1"), (2, "A.1.a"), (0, "B")]);
    }
}
