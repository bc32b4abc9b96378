use crate::prelude::{println, *};
use crate::{Global, OutputFormat};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: std::path::PathBuf,
}

pub fn run(options: Options, global: Global) -> Result<()> {
    let doc = open_document(&options.path)?;
    let glyphs = doc.text_positions().map_err(|e| eyre!(e))?;

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&glyphs)?),
        OutputFormat::Table => {
            let mut table = new_table();
            table.add_row(prettytable::row![
                "Page", "Text", "X", "Y", "Size", "Width", "Height", "Font", "Style"
            ]);
            for g in &glyphs {
                table.add_row(prettytable::row![
                    g.page_number,
                    g.text,
                    f!("{:.2}", g.x),
                    f!("{:.2}", g.y),
                    f!("{:.1}", g.font_size),
                    f!("{:.2}", g.width),
                    f!("{:.2}", g.height),
                    g.font_name.as_deref().unwrap_or("-"),
                    style_label(g.is_bold, g.is_italic)
                ]);
            }
            table.printstd();
            println!("{} glyph(s)", glyphs.len());
        }
    }

    Ok(())
}

fn style_label(is_bold: bool, is_italic: bool) -> &'static str {
    match (is_bold, is_italic) {
        (true, true) => "bold italic",
        (true, false) => "bold",
        (false, true) => "italic",
        (false, false) => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_label() {
        assert_eq!(style_label(true, true), "bold italic");
        assert_eq!(style_label(false, true), "italic");
        assert_eq!(style_label(false, false), "");
    }
}
