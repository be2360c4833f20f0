use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hover_docs::config::ConfigError;
use hover_docs::{
    BuiltinSyntax, DocError, DocProvider, DocRequest, DocResult, DocSettings, FsWorkspace, JsonSymbolIndex,
    SyntaxEngine, TaggedText, View,
};

#[derive(Parser, Debug)]
#[command(name = "hover-docs", version, about)]
struct Args {
    /// File containing the symbol reference.
    file: PathBuf,

    /// 1-based line of the cursor.
    line: usize,

    /// 1-based character column of the cursor.
    column: usize,

    /// Symbol index JSON: `{"name": [{"path", "line", "column", "kind"}]}`.
    #[arg(long)]
    index: PathBuf,

    /// Settings file, TOML or JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid symbol index: {0}")]
    Index(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{line}:{column} is outside {}", path.display())]
    Position { path: PathBuf, line: usize, column: usize },
    #[error(transparent)]
    Doc(#[from] DocError),
}

fn default_log_path() -> PathBuf {
    dirs_or_tmp().join("hover-docs.log")
}

fn dirs_or_tmp() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = PathBuf::from(home).join(".hover-docs");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

fn init_logging(
    args: &Args,
    settings: &DocSettings,
) {
    let stderr_filter = if args.verbose {
        EnvFilter::new("hover_docs=debug")
    } else {
        EnvFilter::new("hover_docs=warn")
    };

    let file_filter = if args.verbose {
        EnvFilter::new("hover_docs=debug")
    } else {
        EnvFilter::new(format!("hover_docs={}", settings.logging.level.as_directive()))
    };

    let log_path = args.log_file.as_ref().map(PathBuf::from).unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(std::ffi::OsStr::new("hover-docs.log")),
    );

    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false).with_target(false).with_filter(file_filter);

    let stderr_layer =
        fmt::layer().with_writer(std::io::stderr).with_ansi(false).with_target(false).with_filter(stderr_filter);

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();

    debug!("Log file: {}", log_path.display());
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(
    args: &Args,
    settings: DocSettings,
) -> Result<DocResult, CliError> {
    let index = JsonSymbolIndex::from_json_str(&read(&args.index)?)?;
    info!(symbols = index.len(), "symbol index loaded");

    let path = std::fs::canonicalize(&args.file).map_err(|source| CliError::Io {
        path: args.file.clone(),
        source,
    })?;
    let text = read(&path)?;
    let engine = BuiltinSyntax::new();
    let syntax = engine.detect(&path).ok_or_else(|| DocError::NoSyntax {
        path: path.clone(),
    })?;
    let runs = engine.tokenize(&syntax, &text);
    let buffer = TaggedText::with_runs(text, runs);

    let view = View::new(&path, buffer.clone());
    let point = view.offset_of(args.line, args.column).ok_or_else(|| CliError::Position {
        path: path.clone(),
        line: args.line,
        column: args.column,
    })?;

    let mut workspace = FsWorkspace::new();
    workspace.open_buffer(&path, buffer);
    let mut provider = DocProvider::new(index, workspace).with_engine(engine).with_settings(settings);
    Ok(provider.build_doc(&view, point, DocRequest::default())?)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (settings, config_error) = match args.config.as_deref().map(DocSettings::load) {
        Some(Ok(settings)) => (settings, None),
        Some(Err(err)) => (DocSettings::default(), Some(err)),
        None => (DocSettings::default(), None),
    };
    init_logging(&args, &settings);
    if let Some(err) = config_error {
        error!("{err}");
        eprintln!("hover-docs: {err}");
        return ExitCode::from(2);
    }

    match run(&args, settings) {
        Ok(doc) => {
            match args.format {
                Format::Html => println!("{}", doc.html),
                Format::Json => match serde_json::to_string_pretty(&doc) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("hover-docs: {err}");
                        return ExitCode::from(2);
                    },
                },
            }
            ExitCode::SUCCESS
        },
        Err(CliError::Doc(err)) if err.is_expected() => {
            eprintln!("{}", err.status_message());
            ExitCode::from(1)
        },
        Err(err) => {
            error!("{err}");
            eprintln!("hover-docs: {err}");
            ExitCode::from(2)
        },
    }
}
