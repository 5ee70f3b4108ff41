//! wordpace - inspect how a document splits into words for speed reading

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordpace::{FileSource, MediaType, ReadableFile, load_file};

#[derive(Parser)]
#[command(name = "wordpace")]
#[command(version, about = "Load a document the way the speed reader sees it", long_about = None)]
#[command(after_help = "EXAMPLES:
    wordpace book.epub              Show title, author and sections
    wordpace notes.txt --words 20   Print the first 20 words
    wordpace book.epub --json       Dump the loaded document as JSON")]
struct Cli {
    /// Input file (EPUB or plain text)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Declared media type; guessed from the extension when omitted
    #[arg(short, long, value_name = "TYPE")]
    mime: Option<String>,

    /// Print the whole document as JSON
    #[arg(long, conflicts_with = "words")]
    json: bool,

    /// Print the first N words, one per line
    #[arg(short, long, value_name = "N")]
    words: Option<usize>,

    /// Reading speed used for the time estimate
    #[arg(long, default_value_t = 300)]
    wpm: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), String> {
    let path = Path::new(&cli.input);
    let mime = match &cli.mime {
        Some(mime) => mime.clone(),
        None => MediaType::from_path(path)
            .map(|media_type| media_type.to_string())
            .ok_or_else(|| format!("cannot guess media type of {}, pass --mime", cli.input))?,
    };
    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.clone());

    let file = load_file(&FileSource::new(path), &mime, &display_name)
        .await
        .map_err(|e| e.to_string())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&file).map_err(|e| e.to_string())?;
        println!("{json}");
    } else if let Some(count) = cli.words {
        for word in file.words().take(count) {
            println!("{word}");
        }
    } else {
        show_info(&file, cli.wpm);
    }

    Ok(())
}

fn show_info(file: &ReadableFile, wpm: u32) {
    println!("File: {}", file.display_name());
    println!("Title: {}", file.display_title());
    if let Some(author) = file.author() {
        println!("Author: {author}");
    }
    println!("Sections: {}", file.sections().len());
    for (index, section) in file.sections().iter().enumerate() {
        let label = file.section_label(index).unwrap_or_default();
        println!("  {:>4}. {} ({} words)", index + 1, label, section.len());
    }

    let total = file.word_count(None);
    println!("Words: {total}");
    if let Some(duration) = ReadableFile::estimated_duration(total, wpm) {
        println!("Reading time at {wpm} wpm: {}", format_duration(duration));
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
