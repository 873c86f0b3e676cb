// ABOUTME: CLI binary for simple-scraper.
// ABOUTME: Fetches a URL (or reads an HTML file) and prints records matching a CSS selector or XPath.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use simple_scraper::{ResultRecord, Scraper};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simple-scraper")]
#[command(about = "Extract text and attributes from a web page with CSS selectors or XPath")]
struct Args {
    /// CSS selector to match
    #[arg(long, conflicts_with = "xpath", required_unless_present = "xpath")]
    css: Option<String>,

    /// XPath 1.0 expression to match
    #[arg(long)]
    xpath: Option<String>,

    /// Print matched records as JSON instead of plain text
    #[arg(long = "json")]
    json_output: bool,

    /// Only report whether anything matched (prints true/false)
    #[arg(long)]
    exists: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to query instead of fetching (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL the HTML file was saved from (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Page to fetch
    #[arg()]
    target: Option<String>,
}

enum Query<'a> {
    Css(&'a str),
    XPath(&'a str),
}

impl Args {
    fn query(&self) -> Result<Query<'_>> {
        match (&self.css, &self.xpath) {
            (Some(css), None) => Ok(Query::Css(css)),
            (None, Some(xpath)) => Ok(Query::XPath(xpath)),
            _ => bail!("exactly one of --css or --xpath is required"),
        }
    }
}

fn load(args: &Args) -> Result<Scraper> {
    match (&args.html, &args.target) {
        (Some(_), Some(_)) => bail!("cannot use both --html and a positional URL"),
        (Some(path), None) => {
            let Some(url) = &args.url else {
                bail!("--url is required when using --html");
            };
            let html = fs::read_to_string(path)
                .map_err(|e| anyhow!("error reading file {:?}: {}", path, e))?;
            Ok(Scraper::from_html(&html, url)?)
        }
        (None, Some(target)) => Ok(Scraper::new(target)?),
        (None, None) => bail!("a URL is required, or use --html with --url"),
    }
}

/// Plain output is one cleaned text per record, separated by blank lines.
fn format_records(records: &[ResultRecord], json_output: bool) -> Result<String> {
    if json_output {
        return Ok(serde_json::to_string_pretty(records)?);
    }
    Ok(records
        .iter()
        .map(|r| r.text().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn run(args: &Args) -> Result<String> {
    let query = args.query()?;
    let scraper = load(args)?;

    if args.exists {
        let found = match query {
            Query::Css(css) => scraper.contains_selector(css)?,
            Query::XPath(xpath) => scraper.contains_xpath(xpath)?,
        };
        return Ok(found.to_string());
    }

    let records = match query {
        Query::Css(css) => scraper.by_selector(css)?,
        Query::XPath(xpath) => scraper.by_xpath(xpath)?,
    };
    format_records(&records, args.json_output)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let output = match run(&args) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(path) = &args.output {
        if let Err(e) = fs::write(path, &output) {
            eprintln!("error writing to {:?}: {}", path, e);
            return ExitCode::from(1);
        }
    } else {
        println!("{}", output);
    }

    ExitCode::SUCCESS
}
