// Command-line interface for Oxiqoi.
//
// Explicit subcommands and long-form options around the file helpers
// in `io`: encode a raw pixel buffer file to QOI, decode a QOI file
// back to raw pixels, or print a parsed header.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::io::{decode_to_raw_file, encode_raw_file};
use crate::qoi::Header;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// QOI (Quite OK Image) encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "oxiqoi",
    version,
    about = "QOI lossless image encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode a raw pixel buffer file to QOI.
    Encode(EncodeArgs),
    /// Decode a QOI file to a raw pixel buffer file.
    Decode(DecodeArgs),
    /// Print the parsed header of a QOI file.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Raw pixel input file (row-major, channel-interleaved, 8 bpc).
    input: PathBuf,
    /// Output QOI file.
    output: PathBuf,
    /// Image width in pixels.
    #[arg(long)]
    width: u32,
    /// Image height in pixels.
    #[arg(long)]
    height: u32,
    /// Channel count: 3 (RGB) or 4 (RGBA).
    #[arg(long, default_value_t = 4)]
    channels: u8,
    /// Colorspace tag byte (0 = sRGB with linear alpha, 1 = all linear).
    #[arg(long, default_value_t = 0)]
    colorspace: u8,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Input QOI file.
    input: PathBuf,
    /// Output raw pixel file.
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// QOI file to inspect.
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Global options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct GlobalOpts {
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn refuse_overwrite(path: &Path, opts: &GlobalOpts) -> bool {
    if path.exists() && !opts.force {
        eprintln!(
            "oxiqoi: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return true;
    }
    false
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_encode(args: &EncodeArgs, opts: &GlobalOpts) -> i32 {
    if refuse_overwrite(&args.output, opts) {
        return 1;
    }

    let stats = match encode_raw_file(
        &args.input,
        &args.output,
        args.width,
        args.height,
        args.channels,
        args.colorspace,
    ) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxiqoi: encode: {e}");
            return 1;
        }
    };

    if opts.json_output {
        let json = serde_json::json!({
            "command": "encode",
            "pixels": stats.pixels,
            "raw_bytes": stats.raw_size,
            "qoi_bytes": stats.qoi_size,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else if !opts.quiet {
        eprintln!(
            "oxiqoi: encode: {} pixels, {} -> {} bytes",
            stats.pixels, stats.raw_size, stats.qoi_size
        );
    }

    0
}

fn cmd_decode(args: &DecodeArgs, opts: &GlobalOpts) -> i32 {
    if refuse_overwrite(&args.output, opts) {
        return 1;
    }

    let (image, stats) = match decode_to_raw_file(&args.input, &args.output) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("oxiqoi: decode: {e}");
            return 1;
        }
    };

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decode",
            "width": image.width,
            "height": image.height,
            "channels": image.channels,
            "colorspace": image.colorspace,
            "qoi_bytes": stats.qoi_size,
            "raw_bytes": stats.raw_size,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else if !opts.quiet {
        eprintln!(
            "oxiqoi: decode: {}x{} ({} channels), {} -> {} bytes",
            image.width, image.height, image.channels, stats.qoi_size, stats.raw_size
        );
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!("oxiqoi: decode: colorspace tag {}", image.colorspace);
    }

    0
}

fn cmd_info(args: &InfoArgs, opts: &GlobalOpts) -> i32 {
    let data = match fs::read(&args.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("oxiqoi: info: {}: {e}", args.input.display());
            return 1;
        }
    };

    let header = match Header::decode(&data) {
        Ok(header) => header,
        Err(e) => {
            eprintln!("oxiqoi: info: {e}");
            return 1;
        }
    };

    if opts.json_output {
        let json = serde_json::json!({
            "command": "info",
            "width": header.width,
            "height": header.height,
            "channels": header.channels,
            "colorspace": header.colorspace,
            "file_bytes": data.len(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        println!("width:      {}", header.width);
        println!("height:     {}", header.height);
        println!("channels:   {}", header.channels);
        println!("colorspace: {}", header.colorspace);
        println!("file size:  {} bytes", data.len());
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let opts = GlobalOpts {
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose,
        json_output: cli.json_output,
    };

    let exit_code = match &cli.command {
        Cmd::Encode(args) => cmd_encode(args, &opts),
        Cmd::Decode(args) => cmd_decode(args, &opts),
        Cmd::Info(args) => cmd_info(args, &opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
