use clap::{Arg, ArgAction, Command};
use plugin_i18n::{
    Args, Environment, NumberFormatOptions, TranslateOptions, bootstrap, load_locale_from_file,
    load_plugin_options_from_file,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("plugin-i18n")
        .version("0.1.0")
        .about("Translate strings from a host plugin's exported options")
        .arg(
            Arg::new("options")
                .long("options")
                .short('o')
                .help("Plugin options JSON file (textDomain, i18n)")
                .required(true),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .short('l')
                .help("Jed-format locale JSON file to activate"),
        )
        .arg(
            Arg::new("env")
                .long("env")
                .short('e')
                .help("development, test or production (default: $APP_ENV)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("translate")
                .about("Translate a key")
                .arg(Arg::new("key").required(true).index(1))
                .arg(Arg::new("context").long("context").short('c'))
                .arg(Arg::new("plural").long("plural").short('p'))
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("arg")
                        .long("arg")
                        .short('a')
                        .help("Interpolation argument, repeatable")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("number-format")
                .about("Format a number for the active locale")
                .arg(
                    Arg::new("value")
                        .required(true)
                        .index(1)
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("decimals")
                        .long("decimals")
                        .short('d')
                        .default_value("0")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(Command::new("keys").about("List catalog keys"))
        .get_matches();

    let environment = match matches.get_one::<String>("env") {
        Some(env) => env.parse()?,
        None => Environment::from_env(),
    };

    let options_path = matches
        .get_one::<String>("options")
        .ok_or("--options is required")?;
    let options = load_plugin_options_from_file(Path::new(options_path))?;
    let translator = bootstrap(&options, environment);

    if let Some(locale_path) = matches.get_one::<String>("locale") {
        let mut locale = load_locale_from_file(Path::new(locale_path))?;
        // Host strings were harvested for this locale; keep them on top.
        locale.messages.extend(options.catalog.0.clone());
        translator.set_locale(locale);
    }

    match matches.subcommand() {
        Some(("translate", sub)) => {
            let key = sub.get_one::<String>("key").ok_or("missing key")?;
            let mut translate_options = TranslateOptions::new();
            if let Some(context) = sub.get_one::<String>("context") {
                translate_options = translate_options.with_context(context);
            }
            let count = sub.get_one::<u64>("count").copied();
            match sub.get_one::<String>("plural") {
                Some(plural) => {
                    translate_options = translate_options.with_plural(plural, count.unwrap_or(1));
                }
                None => translate_options.count = count,
            }
            if let Some(values) = sub.get_many::<String>("arg") {
                let args = values.fold(Args::new(), |args, value| args.with_arg(value));
                translate_options = translate_options.with_args(args);
            }
            println!("{}", translator.translate(key, &translate_options));
        }
        Some(("number-format", sub)) => {
            let value = *sub.get_one::<f64>("value").ok_or("missing value")?;
            let decimals = sub.get_one::<usize>("decimals").copied().unwrap_or(0);
            println!(
                "{}",
                translator.number_format(value, &NumberFormatOptions::from(decimals))
            );
        }
        Some(("keys", _)) => {
            let mut keys: Vec<&String> = options.catalog.keys().collect();
            keys.sort();
            for key in keys {
                println!("{}", key);
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
