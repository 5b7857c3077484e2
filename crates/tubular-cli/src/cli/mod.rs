//! CLI for the tubular retirement and AMI tooling.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tubular_core::api::DEFAULT_COOL_OFF_DAYS;
use tubular_core::config::{self, TubularConfig};

use commands::{
    run_credentials_retire, run_ecommerce_retire, run_learners_to_retire, run_retirement_state,
    run_retrieve_latest_base_ami,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tubular")]
#[command(about = "Learner retirement service clients and base AMI lookup", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/tubular/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Look up the latest Ubuntu base AMI and write it as YAML.
    RetrieveLatestBaseAmi {
        /// Use this AMI id instead of looking one up.
        #[arg(long = "override", value_name = "AMI_ID")]
        override_ami: Option<String>,

        /// Ubuntu release to look up (16.04 or 18.04).
        #[arg(long, alias = "ubuntu_version")]
        ubuntu_version: Option<String>,

        /// AWS region for the AMI (default from config, else us-east-1).
        #[arg(long)]
        region: Option<String>,

        /// Output file for the AMI YAML; stdout when omitted.
        #[arg(long, alias = "out_file", value_name = "PATH")]
        out_file: Option<PathBuf>,
    },

    /// List learners waiting in the LMS retirement queue.
    LearnersToRetire {
        /// Retirement states to include.
        #[arg(long, required = true, num_args = 1..)]
        states: Vec<String>,

        /// Only learners whose last state change is at least this many days old.
        #[arg(long, default_value_t = DEFAULT_COOL_OFF_DAYS)]
        cool_off_days: u32,
    },

    /// Show a learner's retirement state.
    RetirementState {
        /// LMS username.
        username: String,
    },

    /// Retire a learner in the ecommerce service.
    EcommerceRetire {
        /// Original username of the learner.
        username: String,
    },

    /// Retire a learner in the credentials service.
    CredentialsRetire {
        /// Original username of the learner.
        username: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::RetrieveLatestBaseAmi {
                override_ami,
                ubuntu_version,
                region,
                out_file,
            } => run_retrieve_latest_base_ami(
                config_path,
                override_ami,
                ubuntu_version,
                region,
                out_file.as_deref(),
            )?,
            CliCommand::LearnersToRetire {
                states,
                cool_off_days,
            } => run_learners_to_retire(&load_config(config_path)?, &states, cool_off_days)?,
            CliCommand::RetirementState { username } => {
                run_retirement_state(&load_config(config_path)?, &username)?
            }
            CliCommand::EcommerceRetire { username } => {
                run_ecommerce_retire(&load_config(config_path)?, &username)?
            }
            CliCommand::CredentialsRetire { username } => {
                run_credentials_retire(&load_config(config_path)?, &username)?
            }
        }

        Ok(())
    }
}

/// Config for the service commands; creates the default file on first use.
fn load_config(path: Option<&Path>) -> Result<TubularConfig> {
    let cfg = match path {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
