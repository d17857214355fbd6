use pybuiltins::objects::{new_bool, new_float, new_int, new_list, new_str, none, Module};
use pybuiltins::{builtins, itertools, protocol, Config, ObjRef, RtResult};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Debug)]
enum Command {
    Call { name: String, literals: Vec<String> },
    List,
}

#[derive(Debug)]
struct Cli {
    config: Option<PathBuf>,
    log_level: Option<String>,
    command: Command,
}

impl Cli {
    fn from_args(args: &[String]) -> Result<Self, String> {
        let prog = args.first().map(String::as_str).unwrap_or("pybuiltins");
        let mut config = None;
        let mut log_level = None;
        let mut rest = args.iter().skip(1);

        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(Self::usage(prog)),
                "--config" => {
                    let path = rest.next().ok_or("--config requires a file")?;
                    config = Some(PathBuf::from(path));
                }
                "--log-level" => {
                    let level = rest.next().ok_or("--log-level requires a level")?;
                    log_level = Some(level.clone());
                }
                "list" => {
                    if let Some(extra) = rest.next() {
                        return Err(format!("Unexpected argument: {}", extra));
                    }
                    return Ok(Self { config, log_level, command: Command::List });
                }
                "call" => {
                    let name = rest
                        .next()
                        .ok_or_else(|| format!("call requires a builtin name\n\n{}", Self::usage(prog)))?
                        .clone();
                    let literals = rest.cloned().collect();
                    return Ok(Self {
                        config,
                        log_level,
                        command: Command::Call { name, literals },
                    });
                }
                opt => return Err(format!("Unknown option: {}\n\n{}", opt, Self::usage(prog))),
            }
        }

        Err(Self::usage(prog))
    }

    fn usage(prog: &str) -> String {
        format!(
            "pybuiltins - Python builtins over a protocol-driven object model\n\n\
            USAGE:\n    {} [OPTIONS] call <name> <literal>...\n    {} [OPTIONS] list\n\n\
            OPTIONS:\n    \
            -h, --help          Print help information\n    \
            --config <FILE>     Load settings from a TOML file\n    \
            --log-level <L>     trace, debug, info, warn or error\n\n\
            LITERALS:\n    \
            42  -1.5  None  True  False  [1,2,[3]]  text\n\n\
            EXAMPLES:\n    \
            {} call max 3 9 4\n    \
            {} call sorted [3,1,2]\n    \
            {} call itertools.accumulate [1,2,3]",
            prog, prog, prog, prog, prog
        )
    }
}

/// Parse one command-line literal into a runtime value
fn parse_literal(text: &str) -> Result<ObjRef, String> {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| format!("unterminated list literal: {}", text))?;
        let items = split_items(inner)?
            .into_iter()
            .map(parse_literal)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(new_list(items));
    }
    if text.len() >= 2 {
        for quote in ['\'', '"'] {
            if text.starts_with(quote) && text.ends_with(quote) {
                return Ok(new_str(&text[1..text.len() - 1]));
            }
        }
    }
    Ok(match text {
        "None" => none(),
        "True" => new_bool(true),
        "False" => new_bool(false),
        _ => {
            if let Ok(value) = text.parse::<i64>() {
                new_int(value)
            } else if let Ok(value) = text.parse::<f64>() {
                new_float(value)
            } else {
                new_str(text)
            }
        }
    })
}

/// Split list contents on top-level commas
fn split_items(inner: &str) -> Result<Vec<&str>, String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (pos, ch) in inner.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced ']' in [{}]", inner))?;
            }
            ',' if depth == 0 => {
                items.push(&inner[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(format!("unbalanced '[' in [{}]", inner));
    }
    let last = &inner[start..];
    if !last.trim().is_empty() || !items.is_empty() {
        items.push(last);
    }
    Ok(items)
}

/// Resolve `name` or `itertools.name`
fn resolve(name: &str) -> Option<ObjRef> {
    match name.strip_prefix("itertools.") {
        Some(member) => itertools::module()
            .downcast_ref::<Module>()
            .and_then(|module| module.get(member)),
        None => builtins::lookup(name),
    }
}

fn exported_names() -> Vec<String> {
    let mut names = Vec::new();
    if let Some(module) = builtins::module().downcast_ref::<Module>() {
        names.extend(module.names());
    }
    if let Some(module) = itertools::module().downcast_ref::<Module>() {
        names.extend(module.names().into_iter().map(|n| format!("itertools.{}", n)));
    }
    names
}

fn evaluate(target: &ObjRef, args: Vec<ObjRef>) -> RtResult<String> {
    let result = protocol::call(target, &args)?;
    protocol::repr(&result)
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    let mut config = config.with_env().map_err(|e| e.to_string())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        config.validate().map_err(|e| e.to_string())?;
    }
    Ok(config)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let cli = match Cli::from_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };
    pybuiltins::init_with_config(&config);
    debug!(config = ?cli.config, command = ?cli.command, "Configuration loaded");

    match cli.command {
        Command::List => {
            for name in exported_names() {
                println!("{}", name);
            }
        }
        Command::Call { name, literals } => {
            let Some(target) = resolve(&name) else {
                error!(name = %name, "Unknown builtin");
                eprintln!("Unknown builtin: {}", name);
                std::process::exit(2);
            };
            let values = match literals.iter().map(|l| parse_literal(l)).collect::<Result<Vec<_>, _>>() {
                Ok(values) => values,
                Err(e) => {
                    eprintln!("Bad literal: {}", e);
                    std::process::exit(2);
                }
            };

            info!(name = %name, args = values.len(), "Evaluating builtin");
            match evaluate(&target, values) {
                Ok(repr) => println!("{}", repr),
                Err(exc) => {
                    debug!(kind = %exc.kind, "Builtin raised");
                    eprintln!("{}", exc);
                    std::process::exit(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr_of(text: &str) -> String {
        protocol::repr(&parse_literal(text).unwrap()).unwrap()
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(repr_of("42"), "42");
        assert_eq!(repr_of("-7"), "-7");
        assert_eq!(repr_of("None"), "None");
        assert_eq!(repr_of("True"), "True");
        assert_eq!(repr_of("hello"), "'hello'");
        assert_eq!(repr_of("'42'"), "'42'");
    }

    #[test]
    fn test_list_literals() {
        assert_eq!(repr_of("[]"), "[]");
        assert_eq!(repr_of("[1, 2,3]"), "[1, 2, 3]");
        assert_eq!(repr_of("[1,[2,3],x]"), "[1, [2, 3], 'x']");
        assert!(parse_literal("[1,2").is_err());
        assert!(parse_literal("[1]]").is_err());
    }

    #[test]
    fn test_parse_call() {
        let args: Vec<String> = ["pybuiltins", "--log-level", "debug", "call", "max", "1", "5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cli = Cli::from_args(&args).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Call { name, literals } => {
                assert_eq!(name, "max");
                assert_eq!(literals, vec!["1", "5"]);
            }
            Command::List => panic!("expected call"),
        }
    }

    #[test]
    fn test_rejects_unknown_option() {
        let args = vec!["pybuiltins".to_string(), "--fast".to_string()];
        assert!(Cli::from_args(&args).is_err());
    }

    #[test]
    fn test_evaluate_builtin() {
        let max = resolve("max").unwrap();
        let args = vec![parse_literal("[3,9,4]").unwrap()];
        assert_eq!(evaluate(&max, args).unwrap(), "9");
    }

    #[test]
    fn test_evaluate_type() {
        let chain = resolve("itertools.chain").unwrap();
        let args = vec![parse_literal("[1]").unwrap()];
        assert!(evaluate(&chain, args).unwrap().contains("chain"));
        assert!(resolve("nope").is_none());
        assert!(exported_names().contains(&"itertools.count".to_string()));
    }
}
