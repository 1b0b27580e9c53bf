use std::env;
use std::io;
use std::process;
use toke::config::runtime::RuntimeConfig;
use toke::logging;
use toke::session::{Session, SessionError, TokenDefinitions};

#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    input: String,
    definitions: Vec<String>,
    config: Option<String>,
    html: bool,
    json: bool,
    summary: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("toke");

    if args.len() < 2 {
        eprintln!("Usage: {} <file|-> [options]", program);
        eprintln!("       {} --help", program);
        process::exit(1);
    }

    if args[1] == "--help" {
        print_help(program);
        return Ok(());
    }

    let options = match parse_options(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    let config = match &options.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::default(),
    };
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    if let Err(error) = run(&options, &config) {
        eprintln!("\nFAILED [{}]: {}", error.error_code(), error);
        logging::print_cargo_style_summary();
        process::exit(1);
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("toke v{}", env!("CARGO_PKG_VERSION"));
    println!("Table-driven lexical scanner");
    println!();
    println!("USAGE:");
    println!("    {} <file> [options]     # Scan a file", program_name);
    println!("    {} - [options]          # Scan standard input", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --tokens FILE       Load token definitions from a TOML file (repeatable)");
    println!("    --html              Load the built-in HTML token definitions");
    println!("    --config FILE       Load scanner and logging preferences from a TOML file");
    println!("    --json              Print tokens as JSON instead of the text dump");
    println!("    --summary           Print scan metrics and the collected diagnostics");
    println!();
    println!("DEFINITIONS FILE:");
    println!("    [[reserved]]");
    println!("    name = \"OPEN TAG\"");
    println!("    literal = \"<\"");
    println!();
    println!("    [[formats]]");
    println!("    name = \"FLOAT\"");
    println!("    validator = \"float\"   # integer, float, number, hex, alphabetic, alphanumeric");
    println!();
    println!("EXAMPLES:");
    println!("    {} demos/index.html --html", program_name);
    println!("    {} page.html --tokens demos/html.toml --json", program_name);
    println!("    cat notes.txt | {} - --tokens defs.toml --summary", program_name);
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut input = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--tokens" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--tokens requires a file path".to_string())?;
                options.definitions.push(path.clone());
                i += 1;
            }
            "--config" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a file path".to_string())?;
                options.config = Some(path.clone());
                i += 1;
            }
            "--html" => options.html = true,
            "--json" => options.json = true,
            "--summary" => options.summary = true,
            other if other.starts_with("--") => {
                eprintln!("Warning: Unknown option '{}'", other);
            }
            other => {
                if input.is_some() {
                    return Err(format!("unexpected extra input '{}'", other));
                }
                input = Some(other.to_string());
            }
        }
        i += 1;
    }

    options.input = input.ok_or_else(|| "no input file given".to_string())?;
    Ok(options)
}

fn build_definitions(options: &CliOptions) -> Result<TokenDefinitions, SessionError> {
    let mut definitions = if options.html {
        TokenDefinitions::html()
    } else {
        TokenDefinitions::default()
    };

    for path in &options.definitions {
        definitions.merge(TokenDefinitions::from_file(path)?);
    }
    Ok(definitions)
}

fn run(options: &CliOptions, config: &RuntimeConfig) -> Result<(), SessionError> {
    let definitions = build_definitions(options)?;
    if definitions.is_empty() {
        eprintln!("Warning: no token definitions loaded; every token will be untyped");
    }

    let mut session = Session::with_config(config);
    session.load_definitions(&definitions)?;

    if options.input == "-" {
        session.scan_reader(io::stdin().lock())?;
    } else {
        session.scan_file(&options.input)?;
    }

    if options.json {
        match session.tokens().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: failed to render JSON: {}", e),
        }
    } else {
        print!("{}", session.dump());
    }

    if options.summary {
        print_summary(&session);
    }

    Ok(())
}

fn print_summary(session: &Session) {
    let metrics = session.metrics();
    println!("\n----------------------");
    println!("Scan Summary:");
    println!("  Tokens: {}", metrics.total_tokens);
    println!(
        "  Reserved: {} ({} multi-byte)",
        metrics.reserved_tokens, metrics.multi_byte_reserved_tokens
    );
    println!("  Untyped after scan: {}", metrics.untyped_tokens);
    if let Some(post_typing) = session.last_post_typing() {
        println!(
            "  Format typed: {} of {} ({} still untyped)",
            post_typing.retyped, post_typing.examined, post_typing.still_untyped
        );
    }
    println!("  Lines: {}", metrics.lines);
    println!("  Bytes: {}", metrics.bytes_consumed);
    println!("  Longest run: {}", metrics.longest_run);

    let mut usage: Vec<_> = metrics.reserved_usage.iter().collect();
    usage.sort();
    for (name, count) in usage {
        println!("    {}: {}", name, count);
    }

    let files = logging::get_processing_summary();
    if files.total_files > 0 {
        println!(
            "  Files: {} ({} with warnings, {} failed)",
            files.total_files, files.files_with_warnings, files.failed_files
        );
    }

    logging::print_cargo_style_summary();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&[
            "index.html",
            "--tokens",
            "a.toml",
            "--html",
            "--tokens",
            "b.toml",
            "--json",
        ]))
        .unwrap();

        assert_eq!(options.input, "index.html");
        assert_eq!(options.definitions, vec!["a.toml", "b.toml"]);
        assert!(options.html);
        assert!(options.json);
        assert!(!options.summary);
        assert_eq!(options.config, None);

        let options = parse_options(&args(&["-", "--config", "toke.toml"])).unwrap();
        assert_eq!(options.config.as_deref(), Some("toke.toml"));
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(parse_options(&args(&["--html"])).is_err());
        assert!(parse_options(&args(&["a", "b"])).is_err());
        assert!(parse_options(&args(&["a", "--tokens"])).is_err());
        assert!(parse_options(&args(&["a", "--config"])).is_err());
    }

    #[test]
    fn test_stdin_marker_and_unknown_flags() {
        let options = parse_options(&args(&["-", "--verbose", "--summary"])).unwrap();
        assert_eq!(options.input, "-");
        assert!(options.summary);
    }

    #[test]
    fn test_html_definitions_without_files() {
        let options = CliOptions {
            input: "x".to_string(),
            html: true,
            ..Default::default()
        };
        assert_eq!(build_definitions(&options).unwrap(), TokenDefinitions::html());
    }
}
