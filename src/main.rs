use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use tictactoe::{
    init_logging, run_client, GameEngine, Mode, Server, Stub, TcpTransport, TttApi, TttService,
    DEFAULT_BIND_ADDR, DEFAULT_CONNECT_ADDR,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a match and serve any number of clients.
    Server {
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
    },
    /// Connect to a server and play or wait for the winner.
    Client {
        #[arg(long, default_value = DEFAULT_CONNECT_ADDR)]
        connect: String,
        #[arg(long, value_enum, help = "Skip the mode prompt")]
        mode: Option<Mode>,
    },
    /// Clear the board on a running server.
    Reset {
        #[arg(long, default_value = DEFAULT_CONNECT_ADDR)]
        connect: String,
    },
    /// Play a match on this machine without a server.
    Local,
}

async fn run_session<A: TttApi + ?Sized>(api: &A, mode: Option<Mode>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_client(api, mode, &mut input, &mut out).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Server { bind } => {
            let server = Server::bind(&bind, Arc::new(GameEngine::new())).await?;
            println!("Tic-tac-toe server listening on {}", server.local_addr()?);
            server.run().await?;
        }
        Commands::Client { connect, mode } => {
            println!("Connecting to {}...", connect);
            let stub = Stub::new(TcpTransport::connect(&connect).await?);
            info!("connected to {}", connect);
            run_session(&stub, mode).await?;
        }
        Commands::Reset { connect } => {
            let stub = Stub::new(TcpTransport::connect(&connect).await?);
            stub.reset().await?;
            println!("Board reset.");
        }
        Commands::Local => {
            let service = TttService::default();
            run_session(&service, Some(Mode::Play)).await?;
        }
    }
    Ok(())
}
