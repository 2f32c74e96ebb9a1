use super::*;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_buffer = logging::LogBuffer::new(200);
    logging::init(cli.verbose, log_buffer.clone());

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = PickerConfig::load(&config_path)
        .with_context(|| format!("load config from {}", config_path.display()))?;
    info!(
        command = command_label(&cli.command),
        config = %config_path.display(),
        "Running command"
    );

    match cli.command {
        Commands::Search(args) => handle_search(&config, args).await,
        Commands::Pick(args) => handle_pick(&config, args, log_buffer).await,
        Commands::ServedApp(args) => handle_served_app(args),
    }
}
