use std::collections::HashSet;
use std::path::PathBuf;

use copy_paste_detect_core::DetectionOptions;

pub(crate) const HELP_TEXT: &str = concat!(
    "copy-paste-detect (duplicate token-span detection across source files)\n",
    "\n",
    "Usage:\n",
    "  copy-paste-detect [options] [root ...]\n",
    "\n",
    "Options:\n",
    "  --language <id>         Force one language for every file (default: by extension)\n",
    "  --min-tokens <n>        Minimum duplicated run length in tokens (default: 50)\n",
    "  --min-lines <n>         Drop findings narrower than n source lines (default: 0)\n",
    "  --ignore-literals       Treat differing number/string literals as equal\n",
    "  --ignore-identifiers    Treat differing identifiers as equal\n",
    "  --exclude-same-file     Drop findings confined to a single file\n",
    "  --threads <n>           Tokenization worker count (default: 4)\n",
    "  --max-report-items <n>  Limit reported findings (default: 200)\n",
    "  --json                  Output JSON\n",
    "  --stats                 Include run stats (JSON) or print to stderr\n",
    "  --no-gitignore          Do not respect .gitignore rules\n",
    "  --max-file-size <n>     Skip files larger than n bytes (default: 10485760)\n",
    "  --ignore-dir <name>     Add an ignored directory name (repeatable)\n",
    "  --list-languages        Print supported language ids and exit\n",
    "  -V, --version           Show version\n",
    "  -h, --help              Show help\n",
    "\n",
    "Examples:\n",
    "  copy-paste-detect .\n",
    "  copy-paste-detect --min-tokens 75 src/ vendor/\n",
    "  copy-paste-detect --language java --ignore-literals /repo\n",
    "  copy-paste-detect --json --stats . > report.json\n",
    "\n"
);

#[derive(Debug, Clone)]
pub(crate) struct WalkOptions {
    pub(crate) respect_gitignore: bool,
    pub(crate) max_file_size: u64,
    pub(crate) ignore_dirs: HashSet<String>,
}

pub(crate) const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

pub(crate) fn default_ignore_dirs() -> HashSet<String> {
    [
        ".git",
        ".hg",
        ".svn",
        "node_modules",
        "target",
        "dist",
        "build",
        "out",
        ".cache",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE_BYTES,
            ignore_dirs: default_ignore_dirs(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedArgs {
    pub(crate) json: bool,
    pub(crate) stats: bool,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) list_languages: bool,
    pub(crate) language: Option<String>,
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) options: DetectionOptions,
    pub(crate) walk: WalkOptions,
}

fn parse_usize(name: &str, raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|_| format!("{name} must be a non-negative integer"))
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("{name} must be a non-negative integer"))
}

fn parse_u32(name: &str, raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("{name} must be a non-negative integer"))
}

pub(crate) fn parse_args(argv: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs {
        json: false,
        stats: false,
        help: false,
        version: false,
        list_languages: false,
        language: None,
        roots: Vec::new(),
        options: DetectionOptions::default(),
        walk: WalkOptions::default(),
    };

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            parsed.roots.extend(argv[(i + 1)..].iter().map(PathBuf::from));
            break;
        }
        if arg == "-h" || arg == "--help" {
            parsed.help = true;
            i += 1;
            continue;
        }
        if arg == "-V" || arg == "--version" {
            parsed.version = true;
            i += 1;
            continue;
        }
        if arg == "--json" {
            parsed.json = true;
            i += 1;
            continue;
        }
        if arg == "--stats" {
            parsed.stats = true;
            i += 1;
            continue;
        }
        if arg == "--list-languages" {
            parsed.list_languages = true;
            i += 1;
            continue;
        }
        if arg == "--ignore-literals" {
            parsed.options.ignore_literals = true;
            i += 1;
            continue;
        }
        if arg == "--ignore-identifiers" {
            parsed.options.ignore_identifiers = true;
            i += 1;
            continue;
        }
        if arg == "--exclude-same-file" {
            parsed.options.exclude_same_file = true;
            i += 1;
            continue;
        }
        if arg == "--no-gitignore" {
            parsed.walk.respect_gitignore = false;
            i += 1;
            continue;
        }
        if arg == "--language" {
            let raw = argv
                .get(i + 1)
                .ok_or("--language requires a value")?;
            parsed.language = Some(raw.clone());
            i += 2;
            continue;
        }
        if arg == "--min-tokens" {
            let raw = argv
                .get(i + 1)
                .ok_or("--min-tokens requires a value")?;
            parsed.options.min_tokens = parse_usize("--min-tokens", raw)?;
            i += 2;
            continue;
        }
        if arg == "--min-lines" {
            let raw = argv.get(i + 1).ok_or("--min-lines requires a value")?;
            parsed.options.min_lines = parse_u32("--min-lines", raw)?;
            i += 2;
            continue;
        }
        if arg == "--threads" {
            let raw = argv.get(i + 1).ok_or("--threads requires a value")?;
            parsed.options.thread_count = parse_usize("--threads", raw)?;
            i += 2;
            continue;
        }
        if arg == "--max-report-items" {
            let raw = argv
                .get(i + 1)
                .ok_or("--max-report-items requires a value")?;
            parsed.options.max_report_items = parse_usize("--max-report-items", raw)?;
            i += 2;
            continue;
        }
        if arg == "--max-file-size" {
            let raw = argv
                .get(i + 1)
                .ok_or("--max-file-size requires a value")?;
            parsed.walk.max_file_size = parse_u64("--max-file-size", raw)?;
            i += 2;
            continue;
        }
        if arg == "--ignore-dir" {
            let raw = argv.get(i + 1).ok_or("--ignore-dir requires a value")?;
            parsed.walk.ignore_dirs.insert(raw.clone());
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            return Err(format!("unknown option: {arg}"));
        }
        parsed.roots.push(PathBuf::from(arg));
        i += 1;
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_values_and_roots() {
        let parsed = parse_args(&argv(&[
            "--ignore-literals",
            "--min-tokens",
            "75",
            "--threads",
            "2",
            "--ignore-dir",
            "vendor",
            "src",
            "lib",
        ]))
        .unwrap();

        assert!(parsed.options.ignore_literals);
        assert_eq!(parsed.options.min_tokens, 75);
        assert_eq!(parsed.options.thread_count, 2);
        assert!(parsed.walk.ignore_dirs.contains("vendor"));
        assert_eq!(
            parsed.roots,
            vec![PathBuf::from("src"), PathBuf::from("lib")]
        );
    }

    #[test]
    fn rejects_unknown_options_and_missing_values() {
        assert!(parse_args(&argv(&["--frobnicate"])).is_err());
        assert!(parse_args(&argv(&["--min-tokens"])).is_err());
        assert!(parse_args(&argv(&["--min-tokens", "abc"])).is_err());
    }

    #[test]
    fn double_dash_treats_the_rest_as_roots() {
        let parsed = parse_args(&argv(&["--", "--min-tokens"])).unwrap();
        assert_eq!(parsed.roots, vec![PathBuf::from("--min-tokens")]);
    }
}
