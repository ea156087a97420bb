use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, error};

use mondaishuu::config::{StoreArgs, DEFAULT_OUTPUT};
use mondaishuu::{Config, EscapeMode};

#[derive(Parser, Debug)]
#[command(name = "問題集 (Mondaishū)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    store: StoreArgs,
    #[arg(short, long, value_name = "FILE", env = "MONDAISHUU_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Copy question text into the document without escaping LaTeX characters
    #[arg(long, default_value = "false")]
    raw: bool,
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            store: args.store.into(),
            output: args.output,
            escape: if args.raw {
                EscapeMode::Raw
            } else {
                EscapeMode::Escape
            },
        }
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = Config::from(args);
    debug!("[Setup] {:?}", config);

    match mondaishuu::run(&config) {
        Ok(path) => println!(
            "{}",
            format!("LaTeX file created: {}", path.display()).green()
        ),
        Err(err) => {
            error!("[Run] {:?}", err);
            eprintln!("{}", err.chain().red());
            std::process::exit(1);
        }
    }
}
