/// CLI tool for drawing random items from a list
use clap::Parser;
use list_selector::app::{App, AppError, View};
use list_selector::diagnostic;
use list_selector::i18n;
use list_selector::loader::{self, ChainSource, FolderSource, ListSource};
use list_selector::persist::FileStorage;
use list_selector::prefs::{Lang, Theme};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Parser, Debug)]
#[command(version, about = "Upload a list and get random items from it")]
struct Args {
    /// Text file with one item per line, or `-` for stdin
    file: Option<PathBuf>,

    /// Load a predefined list instead of a file
    #[arg(long, conflicts_with = "file")]
    list: Option<String>,

    /// Items per select
    #[arg(short, long)]
    count: Option<String>,

    /// Deep-link style parameters, e.g. "?list=say-anything-en&count=3"
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    lang: Option<Lang>,

    /// Color mode preference (light or dark)
    #[arg(long)]
    mode: Option<Theme>,

    /// Seed for reproducible batches (default: random)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of batches to print
    #[arg(short, long, default_value_t = 1)]
    batches: usize,

    /// Draw a new batch on every Enter; `c` changes the list, `q` quits
    #[arg(short, long)]
    interactive: bool,

    /// Reset the stored list, name and count before doing anything else
    #[arg(long)]
    clear: bool,

    /// Directory holding extra `<id>.txt` predefined lists
    #[arg(long)]
    lists_dir: Option<PathBuf>,

    /// Where the session state is persisted
    #[arg(long, env = "LIST_SELECTOR_STATE_DIR", default_value = ".list-selector")]
    state_dir: PathBuf,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .expect("Fallback should be valid");

    let logger = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);
    Registry::default().with(logger).with(env_filter).init();
}

fn fail(app: Option<&App<StdRng>>, error: AppError) -> ! {
    eprintln!("Error: {}", error);
    if let Some(app) = app {
        if matches!(error, AppError::NoFile | AppError::MissingContent) {
            eprintln!("{} ({})", app.t(i18n::UPLOAD), app.t(i18n::UPLOAD_HINT));
        }
    }
    process::exit(1);
}

async fn read_upload(path: &Path) -> Result<(String, String), std::io::Error> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        return Ok(("<stdin>".to_string(), buffer));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, content))
}

fn print_batch(app: &App<StdRng>) {
    if let Some(batch) = app.batch() {
        for item in batch {
            println!("{}", item);
        }
    }
}

async fn interact(app: &mut App<StdRng>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_batch(app);
        eprintln!(
            "[Enter] {} · [c] {} · [q]",
            app.next_button_label(),
            app.t(i18n::CHANGE)
        );

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading from stdin: {}", e);
                process::exit(1);
            }
        };

        match line.trim() {
            "q" => break,
            "c" => {
                app.change_list();
                break;
            }
            _ => {
                if app.regenerate() == View::Configure {
                    break;
                }
                println!();
            }
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();
    debug!(?args, "starting");

    let mut source = ChainSource::new();
    if let Some(dir) = &args.lists_dir {
        source = source.with_source(Arc::new(FolderSource::new(dir.clone())));
    }
    let source: Arc<dyn ListSource> = Arc::new(source.with_source(loader::default_source()));

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let storage = Arc::new(FileStorage::new(args.state_dir.clone()));
    let mut app = App::open(storage, source, rng).unwrap_or_else(|e| fail(None, e));

    if args.clear {
        app.clear();
    }

    if let Some(query) = &args.query {
        let rejected = app
            .apply_query(query)
            .await
            .unwrap_or_else(|e| fail(None, e));
        eprint!("{}", diagnostic::report_query_errors("<query>", query, &rejected));
    }
    if let Some(lang) = args.lang {
        app.set_lang(lang);
    }
    if let Some(mode) = args.mode {
        app.set_theme(mode);
    }
    if let Some(count) = &args.count {
        app.set_items_per_select_input(count)
            .unwrap_or_else(|e| fail(None, e));
    }

    if let Some(id) = &args.list {
        app.load_predefined(id)
            .await
            .unwrap_or_else(|e| fail(None, e));
    }

    let view = if let Some(path) = &args.file {
        let (name, content) = read_upload(path).await.unwrap_or_else(|e| {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        });
        app.select_upload(name);
        app.finish_upload(Some(&content))
    } else {
        app.get_started()
    };
    if let Err(e) = view {
        fail(Some(&app), e);
    }

    if args.interactive {
        interact(&mut app).await;
        return;
    }

    for n in 0..args.batches.max(1) {
        if n > 0 {
            println!();
            if app.regenerate() == View::Configure {
                break;
            }
        }
        print_batch(&app);
    }
}
