use eyre::Report;
use log::info;
use maxpars::cli::maxpars_cli::{maxpars_parse_cli_args, MaxparsCommands};
use maxpars::commands::search::run::run_search;
use maxpars::commands::upgma::run::run_upgma;
use maxpars::utils::global_init::global_init;

fn main() -> Result<(), Report> {
  global_init();

  let args = maxpars_parse_cli_args()?;

  info!("{:#?}", &args);

  match args.command {
    MaxparsCommands::Search(search_args) => {
      run_search(&search_args)?;
    }
    MaxparsCommands::Upgma(upgma_args) => {
      run_upgma(&upgma_args)?;
    }
  }

  Ok(())
}
