use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command, value_parser};
use spraymask::data::PWD_LAST_SET;
use spraymask::date::display_date;
use spraymask::generate::read_lines;
use spraymask::output::create_output;
use spraymask::{
    AttributeSource, CacheFileSource, ErrorPolicy, ExpandOptions, Expander, MaskGenerator,
    OutputFormat, RecordSource, SprayWriter, expand_entries,
};
use tracing::{Level, info, warn};

const MASK_HELP: &str = "\
Mask Placeholders
- {cn} : Full Name
- {givenName} : First Name
- {sn} : Last Name
- {sAMAccountName} : Logon Name (Pre Windows 2000)
- {userPrincipalName} : Logon Name
- {description} : Description
- {info} : Notes
- {department} : Department
- {l} : City
- {postalCode} : Postal Code
- Last password change
    - {YYYY} : e.g. 2024
    - {YY} : e.g. 24
    - {MM} : e.g. 01
    - {M} : e.g. 1
    - {SeasonGerman} : e.g. Herbst
    - {SeasonAmerican} : e.g. Fall
    - {SeasonBritish} : e.g. Autumn
    - {MonthGerman} : e.g. Januar
    - {MonthEnglish} : e.g. January

Mask Placeholder Modifiers (chain with #, e.g. {sn#Reverse#Upper})
- #Reverse : Reverse the string
- #Upper / #Lower : Change case
- #Title : Title Case Every Word
- #Capitalize : Upper-case the first letter, lower-case the rest
- #AlternateLower / #AlternateUpper : aLtErNaTe case
- #LeetBasic : Substitute e:3, o:0, i:1, a:4
- #LeetBasicPlus : Substitute e:3, o:0, i:1, a:@, t:7
- #Pattern(from>to;from2>to2) : Literal replacements; escape ; ( ) > \\ # with \\";

const TEMPLATE_HELP: &str = "\
Template Slots
- [WORD] : nouns from --nouns, then {MonthGerman} {SeasonGerman} {sn} {givenName}
- [NUMBER] : {YY} {YYYY} 1 2 3 12 123
- [SPECIAL] : ! . # - _

A slot kind never repeats a value within one template.";

fn generate_command() -> Command {
    Command::new("generate")
        .about("Generate masks from templates with [WORD], [NUMBER] and [SPECIAL] slots")
        .after_help(TEMPLATE_HELP)
        .arg(
            Arg::new("pattern")
                .long("pattern")
                .short('p')
                .help("Template, e.g. [WORD][NUMBER][SPECIAL]"),
        )
        .arg(
            Arg::new("patterns-file")
                .long("patterns-file")
                .help("File with one template per line")
                .value_parser(value_parser!(PathBuf)),
        )
        .group(
            ArgGroup::new("templates")
                .args(["pattern", "patterns-file"])
                .required(true),
        )
        .arg(
            Arg::new("nouns")
                .long("nouns")
                .help("File with extra [WORD] values, one per line")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .help("Output file. Appends an incremental number if the file already exists")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .help("Stop after this many masks (0: no limit)")
                .value_parser(value_parser!(usize)),
        )
}

fn cli() -> Command {
    Command::new("spraymask")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate a password spraying list from cached directory user records")
        .after_help(MASK_HELP)
        .subcommand_negates_reqs(true)
        .subcommand(generate_command())
        .arg(
            Arg::new("mask")
                .long("mask")
                .short('m')
                .help("Password mask, e.g. Foobar{givenName#Reverse}{MonthGerman}{YYYY}!")
                .required(true),
        )
        .arg(
            Arg::new("cache-file")
                .long("cache-file")
                .help("JSON file holding the cached directory records")
                .default_value("ldap_cache.json")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .short('s')
                .help("Only accept a cache built against this server"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('P')
                .help("Server port for the cache check (default: 389)")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file. Appends an incremental number if the file already exists")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("outputformat")
                .long("outputformat")
                .help("kerbrute writes user:pass lines, netexec writes separate user and pass files")
                .default_value("kerbrute"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .help("Do not print the user attributes and the user:pass combos")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Abort on the first modifier error instead of using the unmodified value")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("date-modifiers")
                .long("date-modifiers")
                .help("Apply modifier chains to date placeholders too")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .help("Number of expansion workers (default: available parallelism)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let templates = match matches.get_one::<String>("pattern") {
        Some(pattern) => vec![pattern.clone()],
        None => {
            let path = matches
                .get_one::<PathBuf>("patterns-file")
                .context("missing --pattern or --patterns-file")?;
            read_lines(path)?
        }
    };
    let nouns = match matches.get_one::<PathBuf>("nouns") {
        Some(path) => read_lines(path)?,
        None => Vec::new(),
    };
    let limit = matches
        .get_one::<usize>("limit")
        .copied()
        .filter(|limit| *limit > 0);

    let generator = MaskGenerator::new(&nouns);
    info!(
        templates = templates.len(),
        words = generator.words().len(),
        "generating masks"
    );

    let masks = generator.generate(&templates, limit);
    match matches.get_one::<PathBuf>("out") {
        Some(out) => {
            let (mut file, path) = create_output(out)
                .with_context(|| format!("could not create {}", out.display()))?;
            let mut count = 0;
            for mask in masks {
                writeln!(file, "{mask}").context("could not write mask")?;
                count += 1;
            }
            file.flush().context("could not flush output")?;
            println!("{count} masks written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            for mask in masks {
                writeln!(stdout, "{mask}")?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("generate", sub)) => {
            init_logging(sub.get_count("verbose"));
            generate(sub)
        }
        _ => {
            init_logging(matches.get_count("verbose"));
            spray(&matches).await
        }
    }
}

async fn spray(matches: &ArgMatches) -> anyhow::Result<()> {
    let mask = matches
        .get_one::<String>("mask")
        .context("missing --mask")?;
    let cache_file = matches
        .get_one::<PathBuf>("cache-file")
        .context("missing --cache-file")?;
    let output_format: OutputFormat = matches
        .get_one::<String>("outputformat")
        .map_or(Ok(OutputFormat::default()), |format| format.parse())
        .map_err(anyhow::Error::msg)?;
    let silent = matches.get_flag("silent");
    let policy = if matches.get_flag("strict") {
        ErrorPolicy::Abort
    } else {
        ErrorPolicy::Fallback
    };
    let options = ExpandOptions {
        date_modifiers: matches.get_flag("date-modifiers"),
    };
    let workers = matches.get_one::<usize>("workers").copied().unwrap_or_else(|| {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    });

    let expander = Expander::with_options(mask, options);
    info!(mask = expander.mask(), "compiled mask");
    for (token, err) in expander.chain_errors() {
        if policy == ErrorPolicy::Abort {
            bail!("placeholder {token}: {err}");
        }
        warn!(placeholder = %token, error = %err, "modifier chain will be ignored");
    }

    let mut source = CacheFileSource::new(cache_file);
    match (matches.get_one::<String>("server"), matches.get_one::<u16>("port")) {
        (Some(server), port) => {
            source = source.expect_server(server, port.copied().unwrap_or(389));
        }
        (None, Some(_)) => bail!("--port requires --server"),
        (None, None) => {}
    }

    info!(source = source.source_name(), "fetching records");
    let records = source
        .fetch()
        .await
        .with_context(|| format!("could not load records from {}", source.source_name()))?;
    println!("Found {} user accounts", records.entries.len());

    if !silent {
        println!();
        println!("User attributes");
        for entry in &records.entries {
            for attribute in &records.attributes {
                let mut value = entry.attribute_value(attribute);
                if attribute == PWD_LAST_SET {
                    value = display_date(&value);
                }
                println!("{attribute}: {value}");
            }
            println!();
        }
    }

    let combos = expand_entries(Arc::new(expander), records.entries, policy, workers).await?;

    if !silent {
        println!("Pw spray combos");
        for combo in &combos {
            println!("{combo}");
        }
    }

    if let Some(output) = matches.get_one::<PathBuf>("output") {
        let mut writer = SprayWriter::create(output, output_format)
            .with_context(|| format!("could not create output for {}", output.display()))?;
        for combo in &combos {
            writer.write_combo(combo).context("could not write combo")?;
        }
        for path in writer.finish().context("could not flush output")? {
            println!("Spray list written to {}", path.display());
        }
    }

    Ok(())
}
