//! patterns-everywhere - page elements to WordPress blocks

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use patterns_everywhere::css::read_stylesheets;
use patterns_everywhere::{
    CaptureOptions, ComputedFallback, ConvertOptions, capture_html, convert_html, decode_page,
    to_json,
};

#[derive(Parser)]
#[command(name = "patterns-everywhere")]
#[command(version, about = "Capture page elements and rebuild them as WordPress blocks", long_about = None)]
#[command(after_help = "EXAMPLES:
    patterns-everywhere capture page.html -s '.hero' > hero.html
    patterns-everywhere convert hero.html --pretty
    patterns-everywhere capture page.html -s main | patterns-everywhere convert -")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print the styled HTML of the first element matching a selector
    Capture {
        /// Saved HTML page
        #[arg(value_name = "PAGE")]
        page: PathBuf,

        /// CSS selector of the element to capture
        #[arg(short, long, default_value = "body > *")]
        selector: String,

        /// URL the page was loaded from, for absolute src/href
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Keep only directly applied values (computed values only replace var())
        #[arg(long)]
        direct_only: bool,

        /// Linked stylesheet, applied before the page's own <style> elements
        #[arg(long, value_name = "CSS")]
        stylesheet: Vec<PathBuf>,
    },

    /// Print the block tree of styled HTML as JSON
    Convert {
        /// Styled HTML file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Class substring marking button-like anchors (repeatable)
        #[arg(long, value_name = "CLASS")]
        button_class: Vec<String>,

        /// Keep containers holding only text as text groups
        #[arg(long)]
        keep_text_containers: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Command::Capture {
            page,
            selector,
            base_url,
            direct_only,
            stylesheet,
        } => capture(&page, &selector, base_url.as_deref(), direct_only, &stylesheet),
        Command::Convert {
            input,
            button_class,
            keep_text_containers,
            pretty,
        } => convert(&input, button_class, keep_text_containers, pretty),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn capture(
    page: &Path,
    selector: &str,
    base_url: Option<&str>,
    direct_only: bool,
    stylesheets: &[PathBuf],
) -> patterns_everywhere::Result<String> {
    let html = decode_page(&std::fs::read(page)?);
    let extra_css = read_stylesheets(stylesheets);

    let mut options = CaptureOptions::default();
    if let Some(base_url) = base_url {
        options = options.with_base_url(base_url)?;
    }
    if direct_only {
        options.fallback = ComputedFallback::VariablesOnly;
    }

    capture_html(&html, selector, &extra_css, &options)
}

fn convert(
    input: &str,
    button_classes: Vec<String>,
    keep_text_containers: bool,
    pretty: bool,
) -> patterns_everywhere::Result<String> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(input)?
    };
    let html = decode_page(&bytes);

    let mut options = ConvertOptions {
        preserve_text_containers: keep_text_containers,
        ..ConvertOptions::default()
    };
    if !button_classes.is_empty() {
        options.button_classes = button_classes;
    }

    to_json(convert_html(&html, &options).as_ref(), pretty)
}
