use armeer::parser::Parser;
use armeer::serializer::serialize_eer;
use armeer::transform::{TransformConfig, Transformer};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn usage(program: &str) {
    eprintln!("Usage: {} <input.arm> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>   Output file (default: stdout)");
    eprintln!("  -f, --format <fmt>    Output format: text, notation (default: text)");
    eprintln!("      --show-arm        Print the loaded ARM model before the EER model");
    eprintln!("      --overlapping     Derive overlapping instead of disjoint subtypes");
    eprintln!("      --no-covering     Never mark specializations as covering");
    eprintln!("      --keep-multivalued  Emit weak entities instead of multi-valued attributes");
    eprintln!("      --no-composite    Do not group dotted attributes into composites");
    eprintln!("  -v, --verbose         Log transformation decisions");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut notation = false;
    let mut show_arm = false;
    let mut verbose = false;
    let mut config = TransformConfig::default();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-f" | "--format" => {
                i += 1;
                if i < args.len() {
                    notation = match args[i].as_str() {
                        "text" => false,
                        "notation" => true,
                        other => {
                            eprintln!("Invalid format: {}", other);
                            process::exit(1);
                        }
                    };
                }
            }
            "--show-arm" => show_arm = true,
            "--overlapping" => config.disjoint_subtypes = false,
            "--no-covering" => config.covering_abstract_supertypes = false,
            "--keep-multivalued" => config.fold_multivalued = false,
            "--no-composite" => config.composite_separator = None,
            "-v" | "--verbose" => verbose = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let mut parser = match Parser::new(&input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Load error: {}", e);
            process::exit(1);
        }
    };

    let arm = match parser.parse() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Load error: {}", e);
            process::exit(1);
        }
    };

    let eer = match Transformer::new(config).transform(&arm) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Transform error: {}", e);
            process::exit(1);
        }
    };

    let mut output = String::new();
    if show_arm {
        output.push_str(&arm.to_string());
        output.push_str("\n\n");
    }
    if notation {
        output.push_str(&serialize_eer(&eer));
    } else {
        output.push_str(&eer.to_string());
        output.push('\n');
    }

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &output) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", output),
    }
}
