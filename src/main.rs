use minirel::cli::{help_text, Repl, ReplConfig, DEFAULT_PROMPT};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("minirel");

    let (config, rest) = match parse_flags(&args[1.min(args.len())..]) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            print_usage(program_name);
            process::exit(2);
        }
    };

    let mut repl = Repl::new(config);
    match rest.first().map(String::as_str) {
        None | Some("repl") => {
            if let Err(e) = repl.run() {
                eprintln!("Input error: {}", e);
                process::exit(1);
            }
        }
        Some("exec") => {
            if rest.len() < 2 {
                eprintln!("Usage: {} exec \"<statement>\" [\"<statement>\" ...]", program_name);
                process::exit(2);
            }
            for sql in &rest[1..] {
                match repl.execute_sql(sql) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        log::warn!("statement failed: {}", e);
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
            }
        }
        Some("help") | Some("--help") | Some("-h") => {
            print_usage(program_name);
            println!();
            println!("{}", help_text());
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage(program_name);
            process::exit(2);
        }
    }
}

/// Pulls `--json` and `--prompt <text>` out of `args`, returning what is left.
fn parse_flags(args: &[String]) -> Result<(ReplConfig, Vec<String>), String> {
    let mut config = ReplConfig {
        prompt: env::var("MINIREL_PROMPT").unwrap_or_else(|_| DEFAULT_PROMPT.to_string()),
        json: false,
    };
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => config.json = true,
            "--prompt" => match iter.next() {
                Some(prompt) => config.prompt = prompt.clone(),
                None => return Err("--prompt needs a value".to_string()),
            },
            _ => rest.push(arg.clone()),
        }
    }

    Ok((config, rest))
}

fn print_usage(program_name: &str) {
    println!("Usage:");
    println!("  {} [repl]                      interactive shell", program_name);
    println!("  {} exec \"<stmt>\" [\"<stmt>\" ...]  run statements, stop at first error", program_name);
    println!("  {} help                        show this help", program_name);
    println!();
    println!("Flags:");
    println!("  --json             print results as JSON");
    println!("  --prompt <text>    REPL prompt (default: $MINIREL_PROMPT or '{}')", DEFAULT_PROMPT.trim_end());
    println!();
    println!("Logging is controlled by RUST_LOG (default: warn).");
}
