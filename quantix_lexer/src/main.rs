use quantix_lexer::automaton::Lexicon;
use quantix_lexer::config::RuntimeConfig;
use quantix_lexer::{grammar, logging, pipeline};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliOptions {
    json: bool,
    all: bool,
    dump_automaton: bool,
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <rules.qx> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let dump_only = args[1] == "--dump-automaton";
    let options = parse_options(&args[if dump_only { 1 } else { 2 }..]);

    let runtime = match &options.config {
        Some(path) => match RuntimeConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("FAILED: {}", error);
                eprintln!("  Code: {}", error.error_code());
                eprintln!(
                    "  Action: {}",
                    logging::codes::get_action(error.error_code().as_str())
                );
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;

    let lexicon = grammar::bootstrap_lexicon_with_preferences(runtime.automaton.clone())?;

    if options.dump_automaton {
        println!("{}", lexicon.automaton().to_json()?);
    }
    if dump_only {
        return Ok(());
    }

    match pipeline::process_file_with_preferences(
        &args[1],
        &lexicon,
        &runtime.file_processor,
        runtime.lexical.clone(),
    ) {
        Ok(result) => {
            if options.json {
                print_json(&result, &lexicon, &options)?;
            } else {
                print_tokens(&result, &lexicon, &options);
            }

            let error_count = print_diagnostics(&result);
            if error_count > 0 {
                eprintln!("\nFAILED: {} unmatched input span(s)", error_count);
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("FAILED: {}", error);
            eprintln!("  Code: {}", error.error_code());
            eprintln!(
                "  Action: {}",
                logging::codes::get_action(error.error_code().as_str())
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("Quantix Lexer v{}", env!("CARGO_PKG_VERSION"));
    println!("Tokenizes Quantix lexical rule files with the table-driven scanner");
    println!();
    println!("USAGE:");
    println!("    {} <rules.qx> [options]", program_name);
    println!("    {} --dump-automaton [--config <file>]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print tokens as JSON records");
    println!("    --all               Include suppressed tokens (comments)");
    println!("    --dump-automaton    Print the rule-language automaton as JSON");
    println!("    --config <file>     Load runtime preferences from a TOML file");
    println!();
    println!("OUTPUT:");
    println!("    One token per line as `line:col TYPE text`");
    println!("    Unmatched input is reported with source context and a non-zero exit");
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => options.json = true,
            "--all" => options.all = true,
            "--dump-automaton" => options.dump_automaton = true,
            "--config" => {
                if i + 1 < args.len() {
                    options.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Warning: --config requires a file path");
                }
            }
            other => eprintln!("Warning: Unknown option '{}'", other),
        }
        i += 1;
    }

    options
}

fn visible(result: &pipeline::PipelineResult, lexicon: &Lexicon, options: &CliOptions) -> Vec<usize> {
    result
        .lexer
        .tokens()
        .iter()
        .enumerate()
        .filter(|(_, t)| options.all || !lexicon.registry().is_suppressed(t.typ()))
        .map(|(i, _)| i)
        .collect()
}

fn print_tokens(result: &pipeline::PipelineResult, lexicon: &Lexicon, options: &CliOptions) {
    let tokens = result.lexer.tokens();
    for i in visible(result, lexicon, options) {
        let token = &tokens[i];
        let (line, column) = result.lexer.line_column(token.lext());
        println!(
            "{}:{} {} {}",
            line,
            column,
            lexicon.type_name(token.typ()),
            token.literal().escape_debug()
        );
    }
}

fn print_json(
    result: &pipeline::PipelineResult,
    lexicon: &Lexicon,
    options: &CliOptions,
) -> Result<(), serde_json::Error> {
    let tokens = result.lexer.tokens();
    let records: Vec<serde_json::Value> = visible(result, lexicon, options)
        .into_iter()
        .map(|i| {
            let token = &tokens[i];
            let (line, column) = result.lexer.line_column(token.lext());
            serde_json::json!({
                "type": lexicon.type_name(token.typ()),
                "text": token.literal(),
                "lext": token.lext(),
                "rext": token.rext(),
                "line": line,
                "column": column,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn print_diagnostics(result: &pipeline::PipelineResult) -> usize {
    let source_map = result.lexer.source_map();
    let mut count = 0;

    for token in result.lexer.error_tokens() {
        let span = source_map.span(token.lext(), token.rext());
        let message = format!("no rule matches `{}`", token.literal().escape_debug());
        eprintln!("{}", source_map.format_error(&span, &message));
        count += 1;
    }

    count
}
