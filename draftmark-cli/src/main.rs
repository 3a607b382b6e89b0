// Command-line interface for draftmark
//
// This binary converts between rich-text documents (the raw JSON block
// model) and Markdown, in either direction.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected
// from the file extension, while being overwrittable by an explicit --from flag.
// Usage:
//  draftmark <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  draftmark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  draftmark --list-formats              - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format.
// Example:
//  draftmark doc.json --to markdown --extra-hard-breaks false

use clap::{Arg, ArgAction, Command, ValueHint};
use draftmark_babel::formats::markdown::MarkdownFormat;
use draftmark_babel::formats::raw::RawFormat;
use draftmark_babel::{Format, FormatRegistry};
use draftmark_config::{DraftmarkConfig, Loader};
use std::collections::HashMap;
use std::fs;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // Check if the next arg is a value or another flag/end
            let has_value = if i + 1 < args.len() {
                let next = &args[i + 1];
                !next.starts_with('-') && !next.starts_with("--")
            } else {
                false
            };

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                // No value, treat as boolean flag
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("draftmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting between rich-text documents and Markdown")
        .long_about(
            "draftmark converts between the raw JSON block model used by\n\
            rich-text editors and CommonMark Markdown, in both directions.\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            draftmark doc.json --to markdown            # Render blocks as markdown\n  \
            draftmark doc.md --to raw -o doc.json       # Parse markdown into blocks\n  \
            draftmark doc.md --to raw --extra-pretty    # Pretty-print the JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a draftmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - raw:      The JSON block model (.json)\n  \
                    - markdown: CommonMark Markdown (.md)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    draftmark convert doc.json --to markdown        # Blocks to markdown (stdout)\n  \
                    draftmark convert doc.md --to raw -o doc.json   # Markdown to blocks file\n  \
                    draftmark doc.json --to markdown                # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .long_help(
                            "Source format to convert from.\n\n\
                            If not specified, the format is auto-detected from the file extension.\n\
                            Use this option to override auto-detection.",
                        )
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: raw, markdown\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // Check if this is a "missing subcommand" error by seeing if the
            // first arg looks like a file
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                // Inject "convert" as the subcommand
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from_arg = sub_matches.get_one::<String>("from");
            let to = sub_matches.get_one::<String>("to").expect("to is required");

            // Auto-detect --from if not provided
            let from = if let Some(f) = from_arg {
                f.to_string()
            } else {
                let registry = FormatRegistry::default();
                match registry.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                }
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Registry whose formats carry the configured options.
fn registry_from_config(config: &DraftmarkConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(MarkdownFormat::with_options(
        (&config.convert.markdown).into(),
    ));
    registry.register(RawFormat {
        pretty: config.convert.raw.pretty,
    });
    registry
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &DraftmarkConfig,
) {
    let registry = registry_from_config(config);

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    // Read input file
    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    // Parse
    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    // Serialize (format-specific parameters allowed via --extra-*)
    let result = registry
        .serialize_with_options(&doc, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    // Output
    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => {
            print!("{result}");
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        let format = registry.get(&format_name).expect("listed format exists");
        println!("  {:<10} {}", format_name, format.description());
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> DraftmarkConfig {
    let loader = Loader::new().with_optional_file("draftmark.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Fold the extra parameters that correspond to configuration keys into
/// the configuration; everything else stays and is handed to the target
/// format, which rejects keys it does not know.
fn apply_config_overrides(config: &mut DraftmarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("hard-breaks") {
        config.convert.markdown.hard_breaks = parse_bool_arg("hard-breaks", &raw);
    }
    if let Some(raw) = extra_params.remove("pretty") {
        config.convert.raw.pretty = parse_bool_arg("pretty", &raw);
    }
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
