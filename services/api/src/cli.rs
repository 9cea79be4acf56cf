use crate::demo::{print_template, run_demo, DemoArgs, TemplateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use oficina_vital::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Oficina Vital",
    about = "Run the Oficina Vital maintenance service or a reporting demo from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed an in-memory workshop and print its analytics and financial report
    Demo(DemoArgs),
    /// List the inspection items due at a given mileage
    Template(TemplateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Bind address, overriding APP_HOST
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Listening port, overriding APP_PORT
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Template(args) => {
            print_template(&args);
            Ok(())
        }
    }
}
