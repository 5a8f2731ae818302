use clap::{Parser, Subcommand, ValueEnum};
use orbit::config;
use orbit::menu::{ConfirmHandle, Point};
use orbit::sys::protocol::{self, Command};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "orbitctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the orbit daemon
    #[arg(short, long, global = true)]
    socket: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Answer {
    Yes,
    No,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the menu, at the given screen position or under the last known pointer
    #[command(allow_negative_numbers = true)]
    Show {
        #[arg(requires = "y")]
        x: Option<f64>,
        y: Option<f64>,
    },
    /// Hide the menu
    Hide,
    /// Feed a pointer move (screen pixels)
    #[command(allow_negative_numbers = true)]
    Move { x: f64, y: f64 },
    /// Feed a button press
    #[command(allow_negative_numbers = true)]
    Down { x: f64, y: f64 },
    /// Feed a button release
    #[command(allow_negative_numbers = true)]
    Up { x: f64, y: f64 },
    /// Abort the drag in progress, restoring the original order
    Cancel,
    /// Close any open submenu
    Back,
    /// Report the process that now has the foreground
    Focus { process: String },
    /// Put up a confirmation. The daemon logs its handle
    Confirm {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Answer a pending confirmation
    Resolve {
        handle: u64,
        #[arg(value_enum)]
        answer: Answer,
    },
    /// Dismiss a pending confirmation without answering
    Dismiss { handle: u64 },
    /// Write the default config file if there is none and print its path
    Config,
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        Some(match self {
            Commands::Show { x: Some(x), y: Some(y) } => Command::Show(Some(Point::new(x, y))),
            Commands::Show { .. } => Command::Show(None),
            Commands::Hide => Command::Hide,
            Commands::Move { x, y } => Command::Move(Point::new(x, y)),
            Commands::Down { x, y } => Command::Down(Point::new(x, y)),
            Commands::Up { x, y } => Command::Up(Point::new(x, y)),
            Commands::Cancel => Command::Cancel,
            Commands::Back => Command::Back,
            Commands::Focus { process } => Command::Focus(process),
            Commands::Confirm { message } => Command::Confirm(message.join(" ")),
            Commands::Resolve { handle, answer } => {
                Command::Resolve(ConfirmHandle::from(handle), matches!(answer, Answer::Yes))
            }
            Commands::Dismiss { handle } => Command::Dismiss(ConfirmHandle::from(handle)),
            Commands::Config => return None,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let socket_path = cli.socket.unwrap_or_else(protocol::socket_path);

    match cli.command.into_command() {
        Some(command) => send_command(&socket_path, &command),
        None => {
            let path = config::get_config_path()?;
            config::write_default_config(&path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn send_command(socket_path: &Path, command: &Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbit daemon at {}: {}. Is orbit running?",
            socket_path.display(),
            e
        )
    })?;

    log::debug!("Sending '{}'", command);
    writeln!(stream, "{}", command)?;
    Ok(())
}
