//! Golden-file runner.
//!
//! Every `fixtures/<name>/` holds one `input.<src>` and any number of
//! `expected.<dst>` files. The input is converted to each destination and
//! compared byte for byte; `--bless` rewrites the expectations instead.
//! An optional `fixture.json` overrides conversion settings.
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use regex::Regex;
use serde::Deserialize;

use schema_morph::{Config, Lang, convert, path_de};

#[derive(Parser, Debug)]
struct Args {
    /// fixture root
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures"))]
    fixtures: PathBuf,

    /// only run fixtures whose name matches this pattern
    #[arg(long)]
    filter: Option<Regex>,

    /// overwrite expected outputs with the current ones
    #[arg(long)]
    bless: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Manifest {
    root: Option<String>,
    acronyms: bool,
    xml_content_prefix: Option<String>,
    xml_attribute_prefix: Option<String>,
}

enum Outcome {
    Pass,
    Blessed,
    Fail(String),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&args.fixtures)
        .with_context(|| format!("failed to list {}", args.fixtures.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let (mut passed, mut failed) = (0usize, 0usize);
    for dir in dirs {
        let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if args.filter.as_ref().is_some_and(|re| !re.is_match(&name)) {
            continue;
        }
        for (dst, outcome) in run_fixture(&dir, args.bless)? {
            let label = format!("{name} → {dst}");
            match outcome {
                Outcome::Pass => {
                    passed += 1;
                    println!("{} {label}", "ok".green());
                }
                Outcome::Blessed => {
                    passed += 1;
                    println!("{} {label}", "blessed".yellow());
                }
                Outcome::Fail(diff) => {
                    failed += 1;
                    println!("{} {label}\n{diff}", "FAIL".red().bold());
                }
            }
        }
    }

    println!("\n{passed} passed, {failed} failed");
    if failed > 0 {
        bail!("{failed} fixture(s) failed");
    }
    Ok(())
}

fn run_fixture(dir: &Path, bless: bool) -> anyhow::Result<Vec<(Lang, Outcome)>> {
    let mut input = None;
    let mut expected = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        match (stem, Lang::from_path(&path)) {
            ("input", Some(lang)) => input = Some((lang, path)),
            ("expected", Some(lang)) => expected.push((lang, path)),
            _ => {}
        }
    }
    let Some((src, input)) = input else {
        bail!("{}: no input.<format> file", dir.display());
    };
    expected.sort_by_key(|(lang, _)| lang.token());

    let manifest = load_manifest(&dir.join("fixture.json"))?;
    let data = std::fs::read(&input)?;

    let mut results = Vec::new();
    for (dst, path) in expected {
        let mut config = Config { src: src.token().into(), dst: dst.token().into(), ..Config::default() };
        if let Some(root) = &manifest.root {
            config.root = root.clone();
        }
        if let Some(prefix) = &manifest.xml_content_prefix {
            config.xml.content_prefix = prefix.clone();
        }
        if let Some(prefix) = &manifest.xml_attribute_prefix {
            config.xml.attribute_prefix = prefix.clone();
        }
        config.acronyms = manifest.acronyms;

        let mut actual = Vec::new();
        let outcome = match convert(&config, data.as_slice(), &mut actual) {
            Err(err) => Outcome::Fail(format!("  conversion failed: {err}")),
            Ok(()) if bless => {
                std::fs::write(&path, &actual)?;
                Outcome::Blessed
            }
            Ok(()) => {
                let want = std::fs::read_to_string(&path)?;
                let got = String::from_utf8_lossy(&actual);
                if want == got { Outcome::Pass } else { Outcome::Fail(diff(&want, &got)) }
            }
        };
        results.push((dst, outcome));
    }
    Ok(results)
}

fn load_manifest(path: &Path) -> anyhow::Result<Manifest> {
    if !path.exists() {
        return Ok(Manifest::default());
    }
    let text = std::fs::read_to_string(path)?;
    path_de::from_json_str_with_path(&text).map_err(|message| anyhow::anyhow!("{}: {message}", path.display()))
}

/// Line-by-line; trailing whitespace is made visible.
fn diff(want: &str, got: &str) -> String {
    let want: Vec<&str> = want.split('\n').collect();
    let got: Vec<&str> = got.split('\n').collect();
    let mut out = String::new();
    for i in 0..want.len().max(got.len()) {
        let (w, g) = (want.get(i).copied(), got.get(i).copied());
        if w == g {
            continue;
        }
        if let Some(w) = w {
            out.push_str(&format!("  {:>4} {}\n", i + 1, format!("-{}", visible(w)).red()));
        }
        if let Some(g) = g {
            out.push_str(&format!("  {:>4} {}\n", i + 1, format!("+{}", visible(g)).green()));
        }
    }
    out
}

fn visible(line: &str) -> String {
    let trimmed = line.trim_end();
    format!("{trimmed}{}", "·".repeat(line.len() - trimmed.len()))
}
