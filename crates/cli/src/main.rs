use std::env;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use copy_paste_detect_core::{
    Error, FileId, LanguageRegistry, SourceEntry, detect_duplicates,
};

mod args;
mod json;
mod text;
mod walk;

use args::{HELP_TEXT, ParsedArgs, parse_args};
use json::{JsonReport, write_json};
use walk::{WalkStats, collect_files, read_source};

fn print_help() {
    print!("{HELP_TEXT}");
}

fn print_version() {
    println!("copy-paste-detect {}", env!("CARGO_PKG_VERSION"));
}

fn resolve_path(p: &Path) -> io::Result<PathBuf> {
    let base = if p.is_absolute() {
        PathBuf::new()
    } else {
        env::current_dir()?
    };
    Ok(normalize_path(&base.join(p)))
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn main() {
    let argv: Vec<String> = env::args().skip(1).collect();
    let parsed = match parse_args(&argv) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help();
            std::process::exit(2);
        }
    };

    if parsed.help {
        print_help();
        return;
    }
    if parsed.version {
        print_version();
        return;
    }

    let registry = LanguageRegistry::with_builtin_languages();
    if parsed.list_languages {
        for id in registry.language_ids() {
            println!("{id}");
        }
        return;
    }

    match run(&parsed, &registry) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    }
}

fn run(parsed: &ParsedArgs, registry: &LanguageRegistry) -> Result<i32, String> {
    let roots: Vec<PathBuf> = if parsed.roots.is_empty() {
        vec![env::current_dir().map_err(|e| format!("failed to get cwd: {e}"))?]
    } else {
        parsed
            .roots
            .iter()
            .map(|p| resolve_path(p).map_err(|e| format!("failed to resolve path: {e}")))
            .collect::<Result<Vec<_>, String>>()?
    };

    let mut walk_stats = WalkStats::default();
    let files = collect_files(
        &roots,
        &parsed.walk,
        parsed.language.as_deref(),
        &mut walk_stats,
    )?;

    let mut entries: Vec<SourceEntry> = Vec::with_capacity(files.len());
    for file in &files {
        let Some(content) = read_source(file, &mut walk_stats) else {
            continue;
        };
        entries.push(SourceEntry {
            file_id: FileId(entries.len() as u32),
            path: file.path.display().to_string(),
            text: content,
            language_id: file.language_id.clone(),
            language_version: None,
        });
    }

    let outcome = match detect_duplicates(&entries, &parsed.options, registry) {
        Ok(outcome) => outcome,
        Err(Error::InvalidConfiguration(message)) => {
            eprintln!("Error: {message}\n");
            print_help();
            std::process::exit(2);
        }
        Err(err) => return Err(err.to_string()),
    };

    if parsed.json {
        let report = JsonReport::new(&outcome, &walk_stats, parsed.stats);
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_json(&mut lock, &report).map_err(|e| format!("json output: {e}"))?;
        lock.flush().map_err(|e| format!("json output: {e}"))?;
    } else {
        print!("{}", text::format_findings(&outcome.findings));
        print!("{}", text::format_diagnostics(&outcome.diagnostics));
        if parsed.stats {
            eprint!("{}", text::format_run_stats(&outcome.stats, &walk_stats));
        }
    }

    Ok(0)
}
