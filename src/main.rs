use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use verum::report::{ApplicationRow, CsvFormatter, PrettyFormatter, RuleRow};
use verum::{
    Derivation, Direction, Expression, OwnedPath, RuleCategory, RuleEngine, Substitution, parse,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rewrite propositional formulas with equivalence rules", long_about = None)]
struct Args {
    /// JSON rule catalog to use instead of the built-in one
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Log more (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a formula and print its canonical form
    Parse {
        expression: String,
        /// Also print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the rule catalog
    Rules {
        #[arg(long)]
        category: Option<RuleCategory>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Write the catalog as JSON to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List every way of rewriting a formula with a single rule
    Applications {
        expression: String,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Rewrite a formula with one rule
    Apply {
        expression: String,
        #[arg(long)]
        rule: String,
        /// Use the rule right-to-left
        #[arg(long)]
        reverse: bool,
        /// Position to rewrite at, e.g. `1,0`; the first match otherwise
        #[arg(long)]
        at: Option<OwnedPath>,
        /// Instantiate a variable introduced by the rule, e.g. `B=c`
        #[arg(long = "with", value_parser = parse_instantiation)]
        instantiations: Vec<(String, Expression)>,
    },
    /// Rewrite a formula with several rules in turn
    Chain {
        expression: String,
        /// Step written as `rule-id[:rtl][@1,0]`
        #[arg(long = "step", required = true)]
        steps: Vec<StepSpec>,
    },
    /// Show which variables a rule introduces in a direction
    NewVars {
        #[arg(long)]
        rule: String,
        #[arg(long)]
        reverse: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

#[derive(Clone, Debug)]
struct StepSpec {
    rule: String,
    direction: Direction,
    position: Option<OwnedPath>,
}

impl FromStr for StepSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, position) = match s.split_once('@') {
            Some((head, position)) => (
                head,
                Some(
                    position
                        .parse::<OwnedPath>()
                        .map_err(|error| format!("invalid position `{position}`: {error}"))?,
                ),
            ),
            None => (s, None),
        };
        let (rule, direction) = match head.split_once(':') {
            Some((rule, "rtl")) => (rule, Direction::RightToLeft),
            Some((rule, "ltr")) => (rule, Direction::LeftToRight),
            Some((_, other)) => {
                return Err(format!("unknown direction `{other}`, use `ltr` or `rtl`"));
            }
            None => (head, Direction::LeftToRight),
        };
        if rule.is_empty() {
            return Err("missing rule id".to_string());
        }

        Ok(StepSpec {
            rule: rule.to_string(),
            direction,
            position,
        })
    }
}

fn parse_instantiation(s: &str) -> Result<(String, Expression), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `NAME=FORMULA`, got `{s}`"))?;
    let expression = parse(value).map_err(|error| format!("invalid formula `{value}`: {error}"))?;
    Ok((name.trim().to_string(), expression))
}

fn direction_of(reverse: bool) -> Direction {
    if reverse {
        Direction::RightToLeft
    } else {
        Direction::LeftToRight
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_engine(rules: Option<&PathBuf>) -> Result<RuleEngine> {
    match rules {
        Some(path) => RuleEngine::from_json_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display())),
        None => Ok(RuleEngine::new()),
    }
}

fn parse_expression(engine: &RuleEngine, text: &str) -> Result<Expression> {
    engine
        .parse(text)
        .with_context(|| format!("failed to parse `{text}`"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let engine = load_engine(args.rules.as_ref())?;
    info!(rules = engine.catalog().len(), "rule engine ready");

    match args.command {
        Command::Parse { expression, json } => {
            let expression = parse_expression(&engine, &expression)?;
            println!("{}", expression.to_string().bold());
            if json {
                println!("{}", serde_json::to_string_pretty(&expression)?);
            }
        }
        Command::Rules {
            category,
            format,
            export,
        } => {
            let rules: Vec<_> = engine
                .catalog()
                .iter()
                .filter(|rule| category.is_none_or(|category| rule.category == category))
                .collect();

            match format {
                Format::Table => {
                    let rows: Vec<RuleRow> = rules.iter().copied().map(RuleRow::from).collect();
                    println!("{}", PrettyFormatter::format(&rows));
                }
                Format::Csv => {
                    let rows: Vec<RuleRow> = rules.iter().copied().map(RuleRow::from).collect();
                    print!("{}", CsvFormatter::format(&rows)?);
                }
                Format::Json => println!("{}", serde_json::to_string_pretty(&rules)?),
            }

            if let Some(path) = export {
                engine
                    .catalog()
                    .save_json_file(&path)
                    .with_context(|| format!("failed to export rules to {}", path.display()))?;
                println!("Exported {} rules to {}", engine.catalog().len(), path.display());
            }
        }
        Command::Applications { expression, format } => {
            let expression = parse_expression(&engine, &expression)?;
            let applications = engine.all_possible_applications(&expression);

            match format {
                Format::Table => {
                    println!("{}", expression.to_string().bold());
                    if applications.is_empty() {
                        println!("{}", "No rule applies.".yellow());
                    } else {
                        let rows = ApplicationRow::rows(&applications);
                        println!("{}", PrettyFormatter::format(&rows));
                    }
                }
                Format::Csv => print!(
                    "{}",
                    CsvFormatter::format(&ApplicationRow::rows(&applications))?
                ),
                Format::Json => println!("{}", serde_json::to_string_pretty(&applications)?),
            }
        }
        Command::Apply {
            expression,
            rule,
            reverse,
            at,
            instantiations,
        } => {
            let expression = parse_expression(&engine, &expression)?;
            let rule = engine
                .find_rule(&rule)
                .ok_or_else(|| anyhow!("unknown rule `{rule}`"))?;
            let direction = direction_of(reverse);
            let instantiations: Substitution = instantiations.into_iter().collect();

            let result = engine
                .apply_rule(
                    &expression,
                    rule,
                    direction,
                    at.as_ref().map(OwnedPath::as_path),
                    Some(&instantiations),
                )
                .ok_or_else(|| {
                    anyhow!(
                        "rule `{}` ({direction}) does not apply to `{expression}`{}",
                        rule.id,
                        at.as_ref()
                            .map(|position| format!(" at {position}"))
                            .unwrap_or_default()
                    )
                })?;

            println!("  {expression}");
            println!("≡ {}    [{}]", result.to_string().green().bold(), rule.id.cyan());

            let uninstantiated: Vec<_> = engine
                .detect_new_variables(rule, direction)
                .into_iter()
                .filter(|(name, _)| instantiations.at(name).is_none())
                .map(|(name, kind)| format!("{name} ({kind})"))
                .collect();
            if !uninstantiated.is_empty() {
                println!(
                    "{} {}",
                    "Introduced variables left as they are:".yellow(),
                    uninstantiated.join(", ")
                );
            }
        }
        Command::Chain { expression, steps } => {
            let mut derivation = Derivation::new(parse_expression(&engine, &expression)?);

            for (index, step) in steps.iter().enumerate() {
                let rule = engine
                    .find_rule(&step.rule)
                    .ok_or_else(|| anyhow!("step {}: unknown rule `{}`", index + 1, step.rule))?;
                let current = derivation.current().clone();
                let position = match &step.position {
                    Some(position) => position.clone(),
                    None => engine
                        .matches(&current, rule, step.direction)
                        .into_iter()
                        .next()
                        .map(|found| found.position)
                        .unwrap_or_default(),
                };

                let next = engine.apply_rule(
                    &current,
                    rule,
                    step.direction,
                    Some(position.as_path()),
                    None,
                );
                let Some(next) = next else {
                    println!("{derivation}");
                    bail!(
                        "step {}: rule `{}` ({}) does not apply to `{current}`",
                        index + 1,
                        rule.id,
                        step.direction
                    );
                };
                derivation.record(next, rule.clone(), step.direction, position);
            }

            println!("{derivation}");
        }
        Command::NewVars { rule, reverse } => {
            let rule = engine
                .find_rule(&rule)
                .ok_or_else(|| anyhow!("unknown rule `{rule}`"))?;
            let direction = direction_of(reverse);
            let introduced = engine.detect_new_variables(rule, direction);

            if introduced.is_empty() {
                println!("`{}` ({direction}) introduces no variables", rule.id);
            }
            for (name, kind) in introduced {
                println!("{} {kind}", name.cyan());
            }
        }
    }

    Ok(())
}
