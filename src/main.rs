use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use gameetl::config::{ETLConfig, LogFormat};
use gameetl::load::console::ConsoleLoader;
use gameetl::load::csv::CsvLoader;
use gameetl::load::json::JsonLoader;
use gameetl::load::memory::MemoryLoader;
use gameetl::logging::init_logging;
use gameetl::model::{GameRelease, ReleaseTable};
use gameetl::report::{NamedReport, ReportSet};
use gameetl::{Loader, Pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gameetl", version, about = "Limpeza e relatórios de avaliações de jogos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// CSV bruto de avaliações
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Arquivo de configuração TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Quantidade de desenvolvedores no ranking
    #[arg(long)]
    top: Option<usize>,

    /// Formato de log (pretty, compact, json)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Relatórios em JSON Lines em vez de texto
    #[arg(long)]
    json: bool,

    /// Só avisos e erros no log; relatórios não são impressos
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Limpa o CSV, grava a tabela limpa e os relatórios
    Clean {
        #[command(flatten)]
        common: Common,

        /// Destino da tabela limpa em CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Destino da tabela limpa em JSON
        #[arg(long)]
        output_json: Option<PathBuf>,

        /// Diretório para `<relatório>.json`
        #[arg(short, long)]
        reports_dir: Option<PathBuf>,
    },
    /// Limpa o CSV em memória e só imprime os relatórios
    Report {
        #[command(flatten)]
        common: Common,
    },
}

fn load_config(common: &Common) -> Result<ETLConfig> {
    let mut config = match &common.config {
        Some(path) => ETLConfig::from_file(path)
            .with_context(|| format!("lendo configuração {}", path.display()))?
            .with_env_overrides(),
        None => ETLConfig::from_env(),
    }
    .context("variáveis GAMEETL_*")?;

    if let Some(input) = &common.input {
        config.input.path = input.clone();
    }
    if let Some(top) = common.top {
        config.reports.top_developers = top;
    }
    if let Some(format) = common.log_format {
        config.observability.log_format = format;
    }
    if common.quiet {
        config.observability.log_level = "warn".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Executa a limpeza e devolve a tabela tipada
async fn clean_table(config: &ETLConfig) -> Result<ReleaseTable> {
    let table = MemoryLoader::new();
    let pipeline = Pipeline::from_config(config)?.load(table.clone()).build();

    let result = pipeline
        .execute()
        .await
        .with_context(|| format!("limpando {}", config.input.path.display()))?;
    tracing::info!(
        kept = result.rows_successful,
        dropped = result.rows_dropped(),
        success_rate = result.success_rate(),
        elapsed_ms = result.execution_time_ms,
        "Tabela limpa"
    );

    Ok(ReleaseTable::from_rows(&table.take())?)
}

async fn write_reports(config: &ETLConfig, reports: &[NamedReport]) -> Result<()> {
    let Some(dir) = &config.output.reports_dir else {
        return Ok(());
    };
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("criando {}", dir.display()))?;

    for report in reports {
        let path = dir.join(format!("{}.json", report.name));
        JsonLoader::new(&path)
            .with_pretty(config.output.pretty)
            .load(report.rows.clone())
            .await?;
        tracing::info!(report = %report.name, file = %path.display(), "Relatório gravado");
    }
    Ok(())
}

async fn print_reports(common: &Common, reports: Vec<NamedReport>) -> Result<()> {
    if common.quiet {
        return Ok(());
    }
    for report in reports {
        ConsoleLoader::new()
            .with_pretty(!common.json)
            .with_title(report.name)
            .load(report.rows)
            .await?;
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Clean {
            common,
            output,
            output_json,
            reports_dir,
        } => {
            let mut config = load_config(&common)?;
            if output.is_some() {
                config.output.cleaned_csv = output;
            }
            if output_json.is_some() {
                config.output.cleaned_json = output_json;
            }
            if reports_dir.is_some() {
                config.output.reports_dir = reports_dir;
            }
            init_logging(&config.observability)?;

            let table = clean_table(&config).await?;

            if let Some(path) = &config.output.cleaned_csv {
                CsvLoader::new(path).load(table.to_rows()).await?;
                tracing::info!(file = %path.display(), rows = table.len(), "Tabela limpa gravada");
            }
            if let Some(path) = &config.output.cleaned_json {
                JsonLoader::new(path)
                    .with_pretty(config.output.pretty)
                    .with_columns(&GameRelease::COLUMNS)
                    .load(table.to_rows())
                    .await?;
            }

            let reports = ReportSet::new(&config.reports).run(&table).await?;
            write_reports(&config, &reports).await?;
            print_reports(&common, reports).await
        }
        Commands::Report { common } => {
            let config = load_config(&common)?;
            init_logging(&config.observability)?;

            let table = clean_table(&config).await?;
            let reports = ReportSet::new(&config.reports).run(&table).await?;
            print_reports(&common, reports).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        if let Some(etl) = err.downcast_ref::<gameetl::ETLError>() {
            tracing::error!(code = etl.error_code(), "{:#}", err);
            if etl.is_data_error() {
                tracing::error!("corrija o arquivo de origem e execute novamente");
            }
        }
        return Err(err);
    }
    Ok(())
}
