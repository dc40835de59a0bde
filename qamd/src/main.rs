//! QAMD - Render question/answer pairs as HTML with copyable code blocks

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use qamd_core::{render_answer, Answer, Config};
use qamd_tui::App;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Render AI chat answers as HTML or browse them in the terminal
#[derive(Parser, Debug)]
#[command(name = "qamd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format and render an answer to HTML
    Render(AnswerArgs),
    /// Render the image variant of an answer
    Image {
        #[arg(short, long)]
        question: String,
        /// Image location
        #[arg(long)]
        url: String,
    },
    /// Render a JSON payload: {"question","answer"} or {"question","imageUrl"}
    Json {
        /// JSON file (reads stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Browse an answer in the terminal and copy its code blocks
    View {
        #[command(flatten)]
        answer: AnswerArgs,
        /// Write log output here instead of stderr
        #[arg(long, value_name = "FILE")]
        log_file: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct AnswerArgs {
    #[arg(short, long)]
    question: String,
    /// Answer markdown (reads stdin when neither this nor --answer-file is given)
    #[arg(short, long, conflicts_with = "answer_file")]
    answer: Option<String>,
    /// File holding the answer markdown
    #[arg(long, value_name = "FILE")]
    answer_file: Option<PathBuf>,
}

impl AnswerArgs {
    fn read_answer(&self) -> Result<String> {
        match (&self.answer, &self.answer_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => read_file(path),
            (None, None) => read_stdin(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = match &args.command {
        Command::View { log_file, .. } => log_file.as_deref(),
        _ => None,
    };
    init_logging(log_file)?;

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    match args.command {
        Command::Render(answer_args) => {
            let answer = Answer::Text {
                answer: answer_args.read_answer()?,
                question: answer_args.question,
            };
            println!("{}", render_answer(&answer, &config));
        }
        Command::Image { question, url } => {
            let answer = Answer::Image {
                question,
                image_url: url,
            };
            println!("{}", render_answer(&answer, &config));
        }
        Command::Json { file } => {
            let json = match file {
                Some(path) => read_file(&path)?,
                None => read_stdin()?,
            };
            let answer = Answer::from_json(&json).context("Invalid answer payload")?;
            println!("{}", render_answer(&answer, &config));
        }
        Command::View { answer, .. } => {
            let text = answer.read_answer()?;
            let app = App::new(config, &answer.question, &text);
            qamd_tui::run(app).context("TUI application error")?;
        }
    }

    Ok(())
}

/// Log to stderr, or to `log_file` while the terminal UI owns the screen
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}
