mod cli;
mod client;
mod config;
mod output;

use std::process::exit;

use clap::Parser;
use cli::{ApplyResource, Cli, Command, ConfigAction, DeleteResource, GetResource};
use client::ApiClient;

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::new("warn")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Config {
        action: ConfigAction::SetServer { server },
    } = &cli.command
    {
        let mut cached = config::load()?;
        cached.server = Some(server.clone());
        config::save(&cached)?;
        println!("server set to {server}");
        return Ok(());
    }

    let server = resolve_server(&cli)?;
    let client = ApiClient::new(server, cli.principal.clone());

    match cli.command {
        Command::Get { resource } => {
            let (path, single) = match &resource {
                GetResource::Agents { instance_uid: Some(uid) } => (format!("/api/v1/agents/{uid}"), true),
                GetResource::Agents { instance_uid: None } => ("/api/v1/agents".to_string(), false),
                GetResource::Agentgroups { name: Some(name) } => (format!("/api/v1/agentgroups/{name}"), true),
                GetResource::Agentgroups { name: None } => ("/api/v1/agentgroups".to_string(), false),
                GetResource::Agentremoteconfigs { name: Some(name) } => (format!("/api/v1/agentremoteconfigs/{name}"), true),
                GetResource::Agentremoteconfigs { name: None } => ("/api/v1/agentremoteconfigs".to_string(), false),
                GetResource::Agentpackages { name: Some(name) } => (format!("/api/v1/agentpackages/{name}"), true),
                GetResource::Agentpackages { name: None } => ("/api/v1/agentpackages".to_string(), false),
                GetResource::Connections => ("/api/v1/connections".to_string(), false),
            };
            let _ = single;
            let value = client.get(&path)?;
            output::render(&value, cli.output);
        }
        Command::Apply { file, resource } => {
            let contents = std::fs::read_to_string(&file)?;
            let document: serde_json::Value = serde_yaml::from_str(&contents)?;
            let path = apply_path(resource, &document)?;
            let value = client.put_json(&path, &document)?;
            output::render(&value, cli.output);
        }
        Command::Restart { instance_uid } => {
            let value = client.put_json(&format!("/api/v1/agents/{instance_uid}/restart"), &serde_json::Value::Null)?;
            output::render(&value, cli.output);
        }
        Command::Delete { resource } => {
            let path = match resource {
                DeleteResource::Agents { instance_uid } => format!("/api/v1/agents/{instance_uid}"),
                DeleteResource::Agentgroups { name } => format!("/api/v1/agentgroups/{name}"),
                DeleteResource::Agentremoteconfigs { name } => format!("/api/v1/agentremoteconfigs/{name}"),
                DeleteResource::Agentpackages { name } => format!("/api/v1/agentpackages/{name}"),
            };
            client.delete(&path)?;
            println!("deleted");
        }
        Command::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn resolve_server(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(server) = &cli.server {
        return Ok(server.clone());
    }
    let cached = config::load()?;
    cached
        .server
        .ok_or_else(|| "no server configured; pass --server or run `opampctl config set-server <url>`".into())
}

/// `apply -f` needs the resource's name to know which REST path to PUT to.
/// `AgentGroup` carries it as a flat `name` field; `AgentRemoteConfig` and
/// `AgentPackage` nest it under `metadata.name`.
fn apply_path(resource: ApplyResource, document: &serde_json::Value) -> Result<String, Box<dyn std::error::Error>> {
    let (segment, name) = match resource {
        ApplyResource::Agentgroups => (
            "agentgroups",
            document.get("name").and_then(serde_json::Value::as_str),
        ),
        ApplyResource::Agentremoteconfigs => (
            "agentremoteconfigs",
            document.get("metadata").and_then(|m| m.get("name")).and_then(serde_json::Value::as_str),
        ),
        ApplyResource::Agentpackages => (
            "agentpackages",
            document.get("metadata").and_then(|m| m.get("name")).and_then(serde_json::Value::as_str),
        ),
    };
    let name = name.ok_or("apply target is missing its resource name")?;
    Ok(format!("/api/v1/{segment}/{name}"))
}
