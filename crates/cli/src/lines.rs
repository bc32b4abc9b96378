use crate::prelude::{println, *};
use crate::{Global, OutputFormat};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: std::path::PathBuf,

    /// Minimum length a segment must exceed to be reported
    #[arg(long, env = "PDFSCAN_CUTOFF", default_value_t = pdfscan::DEFAULT_CUTOFF)]
    pub cutoff: f32,
}

pub fn run(options: Options, global: Global) -> Result<()> {
    let extract = extract_options(options.cutoff)?;
    let doc = open_document(&options.path)?;
    let segments = doc.line_segments_with(&extract).map_err(|e| eyre!(e))?;

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&segments)?),
        OutputFormat::Table => {
            let mut table = new_table();
            table.add_row(prettytable::row!["Page", "X0", "Y0", "X1", "Y1", "Length"]);
            for s in &segments {
                table.add_row(prettytable::row![
                    s.page_number,
                    f!("{:.2}", s.x0),
                    f!("{:.2}", s.y0),
                    f!("{:.2}", s.x1),
                    f!("{:.2}", s.y1),
                    f!("{:.2}", s.length())
                ]);
            }
            table.printstd();
            println!("{} segment(s)", segments.len());
        }
    }

    Ok(())
}

fn extract_options(cutoff: f32) -> Result<pdfscan::ExtractOptions> {
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(eyre!("--cutoff must be a non-negative number, got {}", cutoff));
    }
    Ok(pdfscan::ExtractOptions { cutoff })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_accepts_zero() {
        assert_eq!(extract_options(0.0).unwrap().cutoff, 0.0);
    }

    #[test]
    fn test_extract_options_rejects_negative_and_nan() {
        assert!(extract_options(-1.0).is_err());
        assert!(extract_options(f32::NAN).is_err());
    }
}
