use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use homebox::{Config, ServiceManager, StatusSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "homebox",
    about = "Orquestra os serviços docker-compose do homelab"
)]
struct Cli {
    /// Caminho do config.json (aceita ~)
    #[arg(long, env = "HOMEBOX_CONFIG", default_value = "config.json")]
    config: String,

    /// De onde ler o status dos serviços
    #[arg(long, value_enum, default_value = "inspect")]
    status_source: StatusSourceArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusSourceArg {
    /// Inspeção direta do runtime (quatro estados, com health)
    Inspect,
    /// `compose ps` (dois estados, sem health)
    ComposePs,
}

#[derive(Subcommand)]
enum Commands {
    /// Inicia um serviço específico
    Start { service: String },
    /// Para um serviço específico
    Stop { service: String },
    /// Inicia todos os serviços habilitados, na ordem da configuração
    StartAll,
    /// Para todos os serviços habilitados, em ordem reversa
    StopAll,
    /// Mostra o status de todos os serviços configurados
    Status,
    /// Verifica se os serviços habilitados estão todos saudáveis
    Health {
        /// Considera apenas os serviços core
        #[arg(long)]
        core: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = PathBuf::from(shellexpand::tilde(&cli.config).into_owned());
    let config = Config::load(&config_path)?;

    let status_source = match cli.status_source {
        StatusSourceArg::Inspect => ServiceManager::inspector_source(),
        StatusSourceArg::ComposePs => StatusSource::ComposePs,
    };
    let manager = ServiceManager::detect(config, status_source)?;

    match cli.command {
        Commands::Start { service } => {
            manager.start_service(&service)?;
            println!("✅ Serviço {service} iniciado com sucesso");
        }
        Commands::Stop { service } => {
            manager.stop_service(&service)?;
            println!("✅ Serviço {service} parado com sucesso");
        }
        Commands::StartAll => {
            manager.start_all_services()?;
            println!("✅ Serviços habilitados iniciados");
        }
        Commands::StopAll => {
            manager.stop_all_services()?;
            println!("✅ Serviços habilitados parados");
        }
        Commands::Status => {
            for (name, status) in manager.all_services_status() {
                println!("{name}: {status}");
            }
        }
        Commands::Health { core } => {
            let healthy = if core {
                manager.check_core_services_healthy()
            } else {
                manager.check_all_services_healthy()
            };

            if !healthy {
                println!("⚠️  Há serviços fora do ar ou sem health");
                manager.close();
                std::process::exit(1);
            }

            println!("✅ Todos os serviços estão saudáveis");
        }
    }

    Ok(())
}
