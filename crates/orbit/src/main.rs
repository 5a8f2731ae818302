use clap::Parser;
use orbit::app::App;
use orbit::config;
use orbit::sys::{protocol, runtime};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about = "Radial menu daemon", long_about = None)]
struct Args {
    /// Config file to use instead of the one in the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Control socket path
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Display scale factor of the output the menu appears on
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => Some(path),
        None => config::get_config_path()
            .map_err(|e| log::warn!("{}; settings will not be saved", e))
            .ok(),
    };
    let settings = config_path
        .as_deref()
        .map(config::load_or_default)
        .unwrap_or_default();
    let socket_path = args.socket.unwrap_or_else(protocol::socket_path);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone(), socket_path, config_path.clone());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut app = App::new(settings, config_path, tx);
    app.set_dpi_scale(args.scale);
    rt.block_on(app.run(rx));
    Ok(())
}
