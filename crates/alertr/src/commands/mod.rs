//! Command dispatch: loads the store from a topology and hands it to the
//! matching handler.

pub mod check;
pub mod show;

use std::path::Path;

use clap::CommandFactory;
use tracing::debug;

use alertr_config::{Config, load_config, seed_options};
use alertr_core::DataStore;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;
use crate::topology::{Rejection, Topology};

/// A store populated from config and a topology file.
pub struct Loaded {
    pub config: Config,
    pub store: DataStore,
    pub rejected: Vec<Rejection>,
}

/// Seed configured options, then apply the topology on top of them.
pub fn load(topology: &Path, global: &GlobalOpts) -> Result<Loaded, CliError> {
    let config = load_config(global.config.as_deref())?;
    let store = DataStore::new();
    seed_options(&config, &store);

    let rejected = Topology::from_path(topology)?.apply(&store);
    debug!(version = store.version(), "store loaded");

    Ok(Loaded {
        config,
        store,
        rejected,
    })
}

pub fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Check(args) => check::handle(&args, global),
        Command::Show(args) => show::handle(&args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "alertr", &mut std::io::stdout());
            Ok(())
        }
    }
}
