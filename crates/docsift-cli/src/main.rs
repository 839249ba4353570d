use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docsift_core::Tool;
use docsift_core::config_file::{self, ConfigFile};
use docsift_ingest::{DocumentTextExtractor, ExtractorConfig, ExtractorConfigBuilder, OcrTool};
#[cfg(not(feature = "libtesseract"))]
use docsift_ocr::TesseractCli;
use docsift_pdf_mupdf::MupdfBackend;
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// docsift - Extract plain text from PDFs and images, with OCR for scans
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from a PDF, PNG or JPEG file
    Extract {
        /// Path to the PDF or image file
        file_path: PathBuf,

        /// Print the result as JSON ({"extracted_text": ...})
        #[arg(long)]
        json: bool,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Run an agent tool with a JSON input and print its JSON output
    Tool {
        /// Tool name, e.g. ocr_reader
        name: Option<String>,

        /// JSON input (read from stdin when omitted)
        #[arg(long)]
        input: Option<String>,

        /// List available tools and their input schemas
        #[arg(long)]
        list: bool,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Show the config file location and the merged configuration
    Config,
}

#[derive(Args, Debug)]
struct OcrArgs {
    /// Tesseract language(s), e.g. eng or eng+deu
    #[arg(long)]
    lang: Option<String>,

    /// Tesseract executable name or path
    #[arg(long)]
    tesseract_cmd: Option<String>,

    /// Resolution for rendering scanned PDF pages before OCR
    #[arg(long)]
    dpi: Option<f32>,

    /// Maximum pages to OCR when a PDF has no text layer (0 = all)
    #[arg(long)]
    max_ocr_pages: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Extract {
            file_path,
            json,
            output,
            no_color,
            ocr,
        } => extract(file_path, json, output, no_color, ocr),
        Command::Tool {
            name,
            input,
            list,
            ocr,
        } => run_tool(name, input, list, ocr),
        Command::Config => show_config(),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// OCR and extractor settings after layering every source.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    language: Option<String>,
    tesseract_cmd: Option<String>,
    tessdata_dir: Option<String>,
    extractor: ExtractorConfig,
}

/// Resolution order: CLI flags > env vars > config file > defaults.
fn resolve_settings(
    args: OcrArgs,
    config: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let ocr_config = config.ocr.clone().unwrap_or_default();

    let language = args
        .lang
        .or_else(|| env("DOCSIFT_OCR_LANG"))
        .or(ocr_config.language);
    let tesseract_cmd = args
        .tesseract_cmd
        .or_else(|| env("DOCSIFT_TESSERACT_CMD"))
        .or(ocr_config.tesseract_cmd);
    let dpi = args
        .dpi
        .or_else(|| env("DOCSIFT_RENDER_DPI").and_then(|v| v.parse().ok()));
    let max_ocr_pages = args
        .max_ocr_pages
        .or_else(|| env("DOCSIFT_MAX_OCR_PAGES").and_then(|v| v.parse().ok()));

    let mut builder = ExtractorConfigBuilder::from_config_file(config);
    if let Some(dpi) = dpi {
        builder = builder.render_dpi(dpi);
    }
    if let Some(pages) = max_ocr_pages {
        builder = builder.max_ocr_pages(pages);
    }

    Settings {
        language,
        tesseract_cmd,
        tessdata_dir: ocr_config.tessdata_dir,
        extractor: builder.build(),
    }
}

fn build_extractor(args: OcrArgs, config: &ConfigFile) -> DocumentTextExtractor {
    let settings = resolve_settings(args, config, |key| std::env::var(key).ok());

    let engine = ocr_engine(
        settings.language.as_deref(),
        settings.tesseract_cmd.as_deref(),
        settings.tessdata_dir.as_deref(),
    );

    tracing::debug!(
        language = settings
            .language
            .as_deref()
            .unwrap_or(docsift_ocr::DEFAULT_LANGUAGE),
        render_dpi = settings.extractor.render_dpi(),
        max_ocr_pages = ?settings.extractor.max_ocr_pages(),
        "resolved extractor settings"
    );
    DocumentTextExtractor::new(MupdfBackend::new(), engine).with_config(settings.extractor)
}

#[cfg(not(feature = "libtesseract"))]
fn ocr_engine(
    language: Option<&str>,
    tesseract_cmd: Option<&str>,
    tessdata_dir: Option<&str>,
) -> TesseractCli {
    let mut engine = TesseractCli::new();
    if let Some(language) = language {
        engine = engine.with_language(language);
    }
    if let Some(cmd) = tesseract_cmd {
        engine = engine.with_command(cmd);
    }
    if let Some(dir) = tessdata_dir {
        engine = engine.with_tessdata_dir(dir);
    }
    engine
}

#[cfg(feature = "libtesseract")]
fn ocr_engine(
    language: Option<&str>,
    tesseract_cmd: Option<&str>,
    tessdata_dir: Option<&str>,
) -> docsift_ocr::TesseractLib {
    if let Some(cmd) = tesseract_cmd {
        tracing::debug!(cmd, "ignoring tesseract command: libtesseract is linked in-process");
    }
    let mut engine = docsift_ocr::TesseractLib::new();
    if let Some(language) = language {
        engine = engine.with_language(language);
    }
    if let Some(dir) = tessdata_dir {
        engine = engine.with_tessdata_dir(dir);
    }
    engine
}

fn extract(
    file_path: PathBuf,
    json: bool,
    output: Option<PathBuf>,
    no_color: bool,
    ocr: OcrArgs,
) -> anyhow::Result<()> {
    let config = config_file::load_config();
    let extractor = build_extractor(ocr, &config);

    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let result = extractor.extract(&file_path)?;

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };
    output::write_result(&mut writer, &result, json)?;
    writer.flush()?;

    output::print_summary(&mut std::io::stderr(), &file_path, &result, color)?;
    Ok(())
}

fn run_tool(
    name: Option<String>,
    input: Option<String>,
    list: bool,
    ocr: OcrArgs,
) -> anyhow::Result<()> {
    let config = config_file::load_config();
    let tools: Vec<Box<dyn Tool>> = vec![Box::new(OcrTool::new(build_extractor(ocr, &config)))];

    let mut stdout = std::io::stdout();
    if list {
        let definitions: Vec<_> = tools.iter().map(|t| t.definition()).collect();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&definitions)?)?;
        return Ok(());
    }

    let Some(name) = name else {
        anyhow::bail!("No tool name given. Use --list to see available tools.");
    };
    let Some(tool) = tools.iter().find(|t| t.definition().name == name) else {
        anyhow::bail!("Unknown tool '{}'. Use --list to see available tools.", name);
    };

    let raw = match input {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let input: serde_json::Value = serde_json::from_str(&raw)?;

    let output = tool.run(input)?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    match config_file::config_path() {
        Some(path) => writeln!(stdout, "# platform config: {}", path.display())?,
        None => writeln!(stdout, "# platform config: unavailable on this system")?,
    }
    writeln!(stdout, "# working-directory override: .docsift.toml")?;
    writeln!(stdout)?;
    write!(
        stdout,
        "{}",
        toml::to_string_pretty(&config_file::load_config())?
    )?;
    Ok(())
}
