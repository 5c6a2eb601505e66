use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "opampctl", about = "Command-line client for the opampd fleet control plane", version)]
pub struct Cli {
    /// REST API base URL, e.g. http://localhost:4321. Overrides the cached
    /// value from `opampctl config set-server`.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Administrator identity sent as the `x-opampd-principal` header.
    #[arg(long, global = true, default_value = "opampctl")]
    pub principal: String,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one or more resources.
    Get {
        #[command(subcommand)]
        resource: GetResource,
    },
    /// Create or replace a resource from a YAML/JSON file.
    Apply {
        #[arg(short, long)]
        file: std::path::PathBuf,
        #[arg(long, value_enum)]
        resource: ApplyResource,
    },
    /// Request that a connected agent restart.
    Restart { instance_uid: String },
    /// Delete one or more resources.
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },
    /// Manage the cached client configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum GetResource {
    Agents { instance_uid: Option<String> },
    Agentgroups { name: Option<String> },
    Agentremoteconfigs { name: Option<String> },
    Agentpackages { name: Option<String> },
    Connections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApplyResource {
    Agentgroups,
    Agentremoteconfigs,
    Agentpackages,
}

#[derive(Subcommand, Debug)]
pub enum DeleteResource {
    Agents { instance_uid: String },
    Agentgroups { name: String },
    Agentremoteconfigs { name: String },
    Agentpackages { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Persist the REST API base URL for future invocations.
    SetServer { server: String },
}
