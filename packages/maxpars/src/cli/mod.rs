pub mod maxpars_cli;
pub mod verbosity;
