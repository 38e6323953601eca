use bbcode_string::{BbError, Compiler, StyleSheet, StyledText};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let (style, files) = match args.first().map(String::as_str) {
        Some("--style") if args.len() >= 2 => (Some(args[1].clone()), args[2..].to_vec()),
        _ => (None, args),
    };

    if files.is_empty() {
        eprintln!("Usage: bbcode-render [--style <sheet.yaml>] <file.bbcode>...");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  bbcode-render post.bbcode");
        eprintln!("  bbcode-render --style forum.yaml *.bbcode");
        process::exit(1);
    }

    let sheet = match style {
        Some(path) => match StyleSheet::from_file(&path) {
            Ok(sheet) => sheet,
            Err(e) => {
                eprintln!("✗ {} has errors:", path);
                print_error(&e);
                process::exit(1);
            }
        },
        None => StyleSheet::standard(),
    };

    let compiler = match Compiler::new(sheet) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("✗ style sheet rejected:");
            print_error(&e);
            process::exit(1);
        }
    };

    let mut exit_code = 0;
    for file_path in files {
        match render_file(&compiler, &file_path) {
            Ok(styled) => {
                println!("# {}", file_path);
                match serde_yaml::to_string(&styled) {
                    Ok(yaml) => print!("{}", yaml),
                    Err(e) => {
                        eprintln!("✗ {}: {}", file_path, e);
                        exit_code = 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn render_file(compiler: &Compiler<StyleSheet>, path: &str) -> Result<StyledText, BbError> {
    let content = fs::read_to_string(path)?;
    compiler.compile(&content)
}

fn print_error(error: &BbError) {
    match error {
        BbError::MissingStyle { tag, start, end } => {
            eprintln!("  No style for [{}] at bytes {}..{}", tag, start, end);
            eprintln!("    Add a 'tags' entry for it or remove it from 'supported'");
        }
        BbError::InvalidTag { tag } => {
            eprintln!("  Invalid tag name '{}'", tag);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
