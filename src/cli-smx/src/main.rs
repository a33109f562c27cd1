use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use url::Url;

use core_smx::common::logging::setup_logging;
use core_smx::sitemap::{
    ChangeFrequency, Entry, MAX_COMPLIANT_FILE_SIZE, MAX_COMPLIANT_URL_COUNT, SiteMap,
    SiteMapConfig, SiteMapIndex, parse_sitemap, parse_sitemap_index,
};

#[derive(Parser)]
#[command(name = "cli-smx")]
#[command(about = "The sitemap generation toolkit", long_about = None)]
struct SiteMapCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sitemap files and a sitemap index from a URL list
    Generate(GenerateArgs),

    /// Print a summary of an existing sitemap or sitemap index document
    Inspect {
        /// The sitemap XML file to inspect.
        #[arg(short, long, value_parser = validate_input_file)]
        file: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Plain-text file with one page URL per line; '#' starts a comment
    #[arg(short, long, value_parser = validate_input_file)]
    urls: PathBuf,

    /// Existing directory that receives sitemap1.xml, sitemap2.xml, ... and
    /// the sitemap.xml index
    #[arg(short, long, value_parser = validate_output_dir)]
    output: PathBuf,

    /// Base URL under which the generated files will be served
    #[arg(short, long)]
    base_url: Url,

    /// Change frequency recorded for every entry
    #[arg(long, default_value = "weekly")]
    changefreq: ChangeFrequency,

    /// Last-modified date (yyyy-MM-dd) recorded for every entry
    #[arg(long)]
    lastmod: Option<NaiveDate>,

    /// Priority in [0.0, 1.0] recorded for every entry
    #[arg(long)]
    priority: Option<f64>,

    /// Per-file byte cap; defaults to the compliant 50,000,000
    #[arg(long)]
    max_bytes: Option<usize>,

    /// Per-file URL cap; defaults to the compliant 50,000
    #[arg(long)]
    max_urls: Option<usize>,

    /// Disable both caps (produces a single file of any size)
    #[arg(long)]
    uncapped: bool,
}

fn validate_input_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Input path does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", path.display()));
    }

    Ok(path)
}

fn validate_output_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Output directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Output path is not a directory: {}", path.display()));
    }

    Ok(path)
}

/// Builds entries from a URL listing, one URL per line. Blank lines and
/// lines starting with '#' are skipped. Line order becomes document order:
/// the list is pushed onto the pending stack back-to-front so the LIFO
/// drain emits the first line first.
fn parse_url_list(
    listing: &str,
    changefreq: ChangeFrequency,
    lastmod: Option<NaiveDate>,
    priority: Option<f64>,
) -> core_smx::sitemap::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut entry = Entry::new(line, changefreq)?;
        if let Some(date) = lastmod {
            entry = entry.with_lastmod(date);
        }
        if let Some(priority) = priority {
            entry = entry.with_priority(priority)?;
        }
        entries.push(entry);
    }
    entries.reverse();
    Ok(entries)
}

fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let listing = fs::read_to_string(&args.urls)
        .with_context(|| format!("cannot read URL list {}", args.urls.display()))?;
    let mut entries = parse_url_list(&listing, args.changefreq, args.lastmod, args.priority)?;

    let config = if args.uncapped {
        SiteMapConfig::uncapped()
    } else {
        SiteMapConfig {
            max_file_size: args.max_bytes.unwrap_or(MAX_COMPLIANT_FILE_SIZE),
            max_url_count: args.max_urls.unwrap_or(MAX_COMPLIANT_URL_COUNT),
        }
    };
    let today = Utc::now().date_naive();

    let mut index = SiteMapIndex::new(args.base_url.join("sitemap.xml")?);
    let mut file_number = 0;
    loop {
        file_number += 1;
        let name = format!("sitemap{file_number}.xml");
        let mut sitemap = SiteMap::with_config(args.base_url.join(&name)?, config);
        sitemap.set_last_modified(today);

        let path = args.output.join(&name);
        let file = fs::File::create(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut sink = BufWriter::new(file);
        let summary = sitemap.write_into(&mut entries, &mut sink)?;
        sink.flush()?;

        info!(file = %path.display(), urls = summary.url_count, "wrote sitemap");
        index.add(sitemap.reference());

        if entries.is_empty() {
            break;
        }
    }

    let index_path = args.output.join("sitemap.xml");
    let file = fs::File::create(&index_path)
        .with_context(|| format!("cannot create {}", index_path.display()))?;
    let mut sink = BufWriter::new(file);
    index.write_into(&mut sink)?;
    sink.flush()?;

    println!(
        "wrote {} sitemap file(s) and index to {}",
        file_number,
        args.output.display()
    );
    Ok(())
}

fn inspect(file: &Path) -> anyhow::Result<()> {
    let xml = fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;

    if xml.contains("<sitemapindex") {
        let sitemaps = parse_sitemap_index(&xml)?;
        println!(
            "sitemap index: {} sitemap(s), {} bytes",
            sitemaps.len(),
            xml.len()
        );
        for sitemap in &sitemaps {
            match sitemap.lastmod {
                Some(date) => println!("  {} (lastmod {date})", sitemap.loc),
                None => println!("  {}", sitemap.loc),
            }
        }
    } else {
        let urls = parse_sitemap(&xml)?;
        println!("sitemap: {} URL(s), {} bytes", urls.len(), xml.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    setup_logging("info");
    let cli = SiteMapCli::parse();

    match &cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Inspect { file } => inspect(file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_list_skips_comments_and_blanks() {
        let listing = "# front page\nhttps://example.com/\n\nhttps://example.com/about\n";
        let entries =
            parse_url_list(listing, ChangeFrequency::Weekly, None, Some(0.5)).unwrap();
        assert_eq!(entries.len(), 2);
        // Reversed for the LIFO drain: last line sits at the bottom.
        assert_eq!(entries[0].url().as_str(), "https://example.com/about");
        assert_eq!(entries[1].url().as_str(), "https://example.com/");
    }

    #[test]
    fn test_parse_url_list_rejects_bad_url() {
        assert!(parse_url_list("not a url\n", ChangeFrequency::Weekly, None, None).is_err());
    }

    #[test]
    fn test_generate_splits_files_and_writes_index() {
        let dir = tempfile::tempdir().unwrap();
        let urls_path = dir.path().join("urls.txt");
        fs::write(
            &urls_path,
            "https://example.com/a\nhttps://example.com/b\nhttps://example.com/c\n",
        )
        .unwrap();

        let args = GenerateArgs {
            urls: urls_path,
            output: dir.path().to_path_buf(),
            base_url: Url::parse("https://example.com/").unwrap(),
            changefreq: ChangeFrequency::Daily,
            lastmod: None,
            priority: None,
            max_bytes: None,
            max_urls: Some(2),
            uncapped: false,
        };
        generate(&args).unwrap();

        let first = fs::read_to_string(dir.path().join("sitemap1.xml")).unwrap();
        let second = fs::read_to_string(dir.path().join("sitemap2.xml")).unwrap();
        let parsed_first = parse_sitemap(&first).unwrap();
        let parsed_second = parse_sitemap(&second).unwrap();
        assert_eq!(parsed_first.len(), 2);
        assert_eq!(parsed_second.len(), 1);
        // List order survives the LIFO handoff.
        assert_eq!(parsed_first[0].loc, "https://example.com/a");
        assert_eq!(parsed_first[1].loc, "https://example.com/b");
        assert_eq!(parsed_second[0].loc, "https://example.com/c");

        let index = fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
        let refs = parse_sitemap_index(&index).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].loc, "https://example.com/sitemap1.xml");
        assert_eq!(refs[1].loc, "https://example.com/sitemap2.xml");
    }

    #[test]
    fn test_generate_empty_list_still_produces_documents() {
        let dir = tempfile::tempdir().unwrap();
        let urls_path = dir.path().join("urls.txt");
        fs::write(&urls_path, "# nothing yet\n").unwrap();

        let args = GenerateArgs {
            urls: urls_path,
            output: dir.path().to_path_buf(),
            base_url: Url::parse("https://example.com/").unwrap(),
            changefreq: ChangeFrequency::Weekly,
            lastmod: None,
            priority: None,
            max_bytes: None,
            max_urls: None,
            uncapped: false,
        };
        generate(&args).unwrap();

        let first = fs::read_to_string(dir.path().join("sitemap1.xml")).unwrap();
        assert!(parse_sitemap(&first).unwrap().is_empty());
        assert_eq!(
            parse_sitemap_index(&fs::read_to_string(dir.path().join("sitemap.xml")).unwrap())
                .unwrap()
                .len(),
            1
        );
    }
}
