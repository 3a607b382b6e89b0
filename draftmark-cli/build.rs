use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the convert arguments from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("draftmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting between rich-text documents and Markdown")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Input file path")
                .required_unless_present("list-formats")
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .help("Source format (auto-detected from file extension if not specified)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .help("Target format")
                .required_unless_present("list-formats")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file path (defaults to stdout)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        );

    generate_to(Bash, &mut cmd, "draftmark", &outdir)?;
    generate_to(Zsh, &mut cmd, "draftmark", &outdir)?;
    generate_to(Fish, &mut cmd, "draftmark", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
