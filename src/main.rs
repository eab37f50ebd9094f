use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wine_site::{config, output, pipeline, serve};

/// Directory served over HTTP: the working directory, which is also where
/// the default output page lands.
const SERVE_ROOT: &str = ".";

#[derive(Parser)]
#[command(name = "wine-site")]
#[command(version)]
#[command(about = "Static storefront generator for a wine shop")]
#[command(long_about = "\
Static storefront generator for a wine shop

Reads the product list from a spreadsheet, groups it by category, writes a
single index.html and serves the working directory over HTTP.

Spreadsheet layout (first row is the header):

  Категория     | Название    | Сорт            | Цена | Картинка        | Акция
  Белые вина    | Белая леди  | Дамский пальчик | 399  | belaya_ledi.png | Выгодное предложение
  Напитки       | Коньяк      |                 | 350  | konyak.png      |

Settings resolve in order: flag > environment variable > config.toml > default.

Run 'wine-site gen-config' to print a documented config.toml.")]
struct Cli {
    /// Spreadsheet with the product list
    #[arg(long, env = "WINE_DATA_PATH", global = true)]
    file_path: Option<PathBuf>,

    /// Sheet to read
    #[arg(long, env = "WINE_SHEET_NAME", global = true)]
    sheet_name: Option<String>,

    /// Port for the HTTP server
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Build the page, then serve the working directory (default)
    Run,
    /// Build the page and exit
    Build,
    /// Serve the working directory without building
    Serve,
    /// Read and group the spreadsheet without writing anything
    Check,
    /// Print the grouped catalogue as JSON
    Scan,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let site_config = resolve_config(&cli)?;
            build(&site_config)?;
            serve(&site_config)?;
        }
        Command::Build => build(&resolve_config(&cli)?)?,
        Command::Serve => serve(&resolve_config(&cli)?)?,
        Command::Check => {
            let site_config = resolve_config(&cli)?;
            let catalog = pipeline::load_catalog(&site_config)?;
            output::print_check_output(
                &catalog,
                &site_config.source.path,
                &site_config.source.sheet,
            );
        }
        Command::Scan => {
            let catalog = pipeline::load_catalog(&resolve_config(&cli)?)?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Layer CLI flags and environment variables over `config.toml`.
///
/// clap has already merged flag and env for each option, so any `Some` here
/// outranks the file.
fn resolve_config(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(&cli.config_dir)?;
    if let Some(path) = &cli.file_path {
        site_config.source.path = path.clone();
    }
    if let Some(sheet) = &cli.sheet_name {
        site_config.source.sheet = sheet.clone();
    }
    if let Some(port) = cli.port {
        site_config.server.port = port;
    }
    site_config.validate()?;
    Ok(site_config)
}

fn build(site_config: &config::SiteConfig) -> Result<(), pipeline::BuildError> {
    let current_year = chrono::Local::now().year();
    let report = pipeline::build(site_config, current_year)?;
    output::print_build_output(&report);
    Ok(())
}

fn serve(site_config: &config::SiteConfig) -> Result<(), serve::ServeError> {
    let server = serve::Server::bind(&site_config.server.addr(), SERVE_ROOT)?;
    output::print_serve_banner(server.local_addr()?, server.root());
    server.serve_forever()
}
