//! CLI argument definitions using clap
//!
//! Commands:
//! - policyvet validate --config <path> --kind <kind> --id <n> --action <action>
//! - policyvet check --config <path> --kind <kind> --action <action> --file <path|->
//! - policyvet audit --config <path> --id <n>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::EntityId;
use crate::validation::{Action, EntityKind};

/// policyvet - validate policy, service and service-definition changes
#[derive(Parser, Debug)]
#[command(name = "policyvet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a stored entity by id
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./policyvet.json")]
        config: PathBuf,

        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long)]
        id: EntityId,

        #[arg(long, value_enum)]
        action: ActionArg,
    },

    /// Validate a proposed entity read from a JSON document
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./policyvet.json")]
        config: PathBuf,

        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long, value_enum)]
        action: ActionArg,

        /// JSON document to check; `-` reads stdin
        #[arg(long, default_value = "-")]
        file: PathBuf,
    },

    /// Print the effective audit flag of a stored policy
    Audit {
        /// Path to configuration file
        #[arg(long, default_value = "./policyvet.json")]
        config: PathBuf,

        #[arg(long)]
        id: EntityId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Policy,
    Service,
    ServiceDef,
}

impl From<KindArg> for EntityKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Policy => EntityKind::Policy,
            KindArg::Service => EntityKind::Service,
            KindArg::ServiceDef => EntityKind::ServiceDef,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Create,
    Update,
    Delete,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Create => Action::Create,
            ActionArg::Update => Action::Update,
            ActionArg::Delete => Action::Delete,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
