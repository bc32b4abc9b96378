use crate::prelude::*;
use clap::Parser;

mod bookmarks;
mod lines;
mod prelude;
mod text;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Extract glyph positions, ruling lines and bookmarks from PDF files"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "PDFSCAN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,

    /// Output format
    #[clap(long, env = "PDFSCAN_FORMAT", global = true, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable table
    Table,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// Print one record per rendered glyph
    Text(crate::text::Options),

    /// Print ruling lines and rectangle edges
    Lines(crate::lines::Options),

    /// Print the bookmark (outline) tree
    Bookmarks(crate::bookmarks::Options),
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    init_logging(app.global.verbose);

    match app.command {
        SubCommands::Text(options) => crate::text::run(options, app.global),
        SubCommands::Lines(options) => crate::lines::run(options, app.global),
        SubCommands::Bookmarks(options) => crate::bookmarks::run(options, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

/// `RUST_LOG` wins; otherwise `--verbose` selects `debug` over `warn`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    log::debug!("verbose logging enabled");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_lines_with_cutoff() {
        let app = App::try_parse_from([
            "pdfscan", "--format", "table", "lines", "a.pdf", "--cutoff", "5",
        ])
        .unwrap();
        assert_eq!(app.global.format, OutputFormat::Table);
        match app.command {
            SubCommands::Lines(options) => {
                assert_eq!(options.path, std::path::PathBuf::from("a.pdf"));
                assert_eq!(options.cutoff, 5.0);
            }
            other => panic!("expected lines, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let app = App::try_parse_from(["pdfscan", "bookmarks", "b.pdf", "--verbose"]).unwrap();
        assert!(app.global.verbose);
        assert!(matches!(app.command, SubCommands::Bookmarks(_)));
    }

    #[test]
    fn test_path_is_required() {
        assert!(App::try_parse_from(["pdfscan", "text"]).is_err());
    }
}
