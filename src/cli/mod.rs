//! Command-line interface for flowgate.
//!
//! Provides commands for starting workflows, inspecting them, raising
//! events and driving their lifecycle through either API vintage.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use crate::config::{load_config, ResolvedComponent, ResolvedConfig};
use crate::core::{ApiError, ApiResult, ApiVersion, ReadySignal, WorkflowApi};
use crate::domain::{
    Empty, GetWorkflowRequest, GetWorkflowResponse, PauseWorkflowRequest, PurgeWorkflowRequest,
    RaiseEventWorkflowRequest, ResumeWorkflowRequest, StartWorkflowRequest, StartWorkflowResponse,
    TerminateWorkflowRequest,
};

/// flowgate - Versioned workflow lifecycle API over pluggable engines
#[derive(Parser, Debug)]
#[command(name = "flowgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: discover .flowgate/config.yaml)
    #[arg(long, global = true, env = "FLOWGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// API vintage to call
    #[arg(long, global = true, value_enum, default_value_t = ApiVersion::Beta1)]
    pub api: ApiVersion,

    /// Workflow component to use (default: the configured default component)
    #[arg(short, long, global = true)]
    pub component: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new workflow instance
    Start {
        /// Workflow type to run
        workflow_name: String,

        /// Instance ID (a random UUID if not provided)
        #[arg(short, long)]
        instance_id: Option<String>,

        /// Workflow input
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read workflow input from a file
        #[arg(long)]
        input_file: Option<PathBuf>,

        /// Start option as key=value (repeatable)
        #[arg(short, long = "option", value_parser = parse_key_val)]
        options: Vec<(String, String)>,
    },

    /// Show the state of a workflow instance
    Get {
        instance_id: String,
    },

    /// Raise an event on a workflow instance
    RaiseEvent {
        instance_id: String,

        /// Event name
        event_name: String,

        /// Event payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Pause a running workflow instance
    Pause {
        instance_id: String,
    },

    /// Resume a paused workflow instance
    Resume {
        instance_id: String,
    },

    /// Terminate a workflow instance
    Terminate {
        instance_id: String,
    },

    /// Remove a finished workflow instance and its state
    Purge {
        instance_id: String,
    },

    /// List configured workflow components
    Components,

    /// Show resolved configuration (debug)
    Config,
}

/// Parse a `key=value` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid option '{}': expected key=value", s))?;
    if key.is_empty() {
        return Err(format!("invalid option '{}': empty key", s));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;

        match self.command {
            Commands::Config => return show_config(&config),
            Commands::Components => return list_components(&config),
            _ => {}
        }

        let component = self
            .component
            .or_else(|| config.default_component.clone())
            .unwrap_or_default();
        let session = Session::connect(&config, self.api, component).await?;
        let json = self.json;

        match self.command {
            Commands::Start {
                workflow_name,
                instance_id,
                input,
                input_file,
                options,
            } => {
                let input = match (input, input_file) {
                    (Some(text), _) => text.into_bytes(),
                    (None, Some(path)) => std::fs::read(&path)
                        .with_context(|| format!("Failed to read input file: {}", path.display()))?,
                    (None, None) => Vec::new(),
                };
                let req = StartWorkflowRequest {
                    instance_id: instance_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    workflow_component: session.component.clone(),
                    workflow_name,
                    options: options.into_iter().collect::<HashMap<_, _>>(),
                    input,
                };
                let response = session.start(&req).await.map_err(to_anyhow)?;
                if json {
                    print_json(&response)?;
                } else {
                    println!("Started workflow instance {}", response.instance_id);
                }
            }
            Commands::Get { instance_id } => {
                let req = GetWorkflowRequest {
                    instance_id,
                    workflow_component: session.component.clone(),
                };
                let response = session.get(&req).await.map_err(to_anyhow)?;
                if json {
                    print_json(&response)?;
                } else {
                    print_state(&response);
                }
            }
            Commands::RaiseEvent {
                instance_id,
                event_name,
                data,
            } => {
                let req = RaiseEventWorkflowRequest {
                    instance_id,
                    workflow_component: session.component.clone(),
                    event_name,
                    event_data: data.map(String::into_bytes).unwrap_or_default(),
                };
                let ack = session.raise_event(&req).await.map_err(to_anyhow)?;
                let message = format!("Raised event '{}' on {}", req.event_name, req.instance_id);
                acknowledge(json, &ack, &message)?;
            }
            Commands::Pause { instance_id } => {
                let req = PauseWorkflowRequest {
                    instance_id,
                    workflow_component: session.component.clone(),
                };
                let ack = session.pause(&req).await.map_err(to_anyhow)?;
                acknowledge(json, &ack, &format!("Paused {}", req.instance_id))?;
            }
            Commands::Resume { instance_id } => {
                let req = ResumeWorkflowRequest {
                    instance_id,
                    workflow_component: session.component.clone(),
                };
                let ack = session.resume(&req).await.map_err(to_anyhow)?;
                acknowledge(json, &ack, &format!("Resumed {}", req.instance_id))?;
            }
            Commands::Terminate { instance_id } => {
                let req = TerminateWorkflowRequest {
                    instance_id,
                    workflow_component: session.component.clone(),
                };
                let ack = session.terminate(&req).await.map_err(to_anyhow)?;
                acknowledge(json, &ack, &format!("Terminated {}", req.instance_id))?;
            }
            Commands::Purge { instance_id } => {
                let req = PurgeWorkflowRequest {
                    instance_id,
                    workflow_component: session.component.clone(),
                };
                let ack = session.purge(&req).await.map_err(to_anyhow)?;
                acknowledge(json, &ack, &format!("Purged {}", req.instance_id))?;
            }
            // Served from config alone above
            Commands::Config | Commands::Components => {}
        }

        Ok(())
    }
}

/// One CLI invocation's view of the API
struct Session {
    api: WorkflowApi,
    version: ApiVersion,
    component: String,
    cancel: CancellationToken,
}

impl Session {
    /// Build the registry, open the readiness gate and wire Ctrl-C to cancellation
    async fn connect(
        config: &ResolvedConfig,
        version: ApiVersion,
        component: String,
    ) -> Result<Self> {
        let (gate, handle) = ReadySignal::new();
        let registry = config.build_registry().await?;
        let api = WorkflowApi::new(Arc::new(registry), Arc::new(gate));
        handle.mark_ready();

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling request");
                on_interrupt.cancel();
            }
        });

        Ok(Self {
            api,
            version,
            component,
            cancel,
        })
    }

    async fn get(&self, req: &GetWorkflowRequest) -> ApiResult<GetWorkflowResponse> {
        match self.version {
            ApiVersion::Alpha1 => self.api.get_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.get_workflow_beta1(req, &self.cancel).await,
        }
    }

    async fn start(&self, req: &StartWorkflowRequest) -> ApiResult<StartWorkflowResponse> {
        match self.version {
            ApiVersion::Alpha1 => self.api.start_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.start_workflow_beta1(req, &self.cancel).await,
        }
    }

    async fn terminate(&self, req: &TerminateWorkflowRequest) -> ApiResult<Empty> {
        match self.version {
            ApiVersion::Alpha1 => self.api.terminate_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.terminate_workflow_beta1(req, &self.cancel).await,
        }
    }

    async fn raise_event(&self, req: &RaiseEventWorkflowRequest) -> ApiResult<Empty> {
        match self.version {
            ApiVersion::Alpha1 => self.api.raise_event_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.raise_event_workflow_beta1(req, &self.cancel).await,
        }
    }

    async fn pause(&self, req: &PauseWorkflowRequest) -> ApiResult<Empty> {
        match self.version {
            ApiVersion::Alpha1 => self.api.pause_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.pause_workflow_beta1(req, &self.cancel).await,
        }
    }

    async fn resume(&self, req: &ResumeWorkflowRequest) -> ApiResult<Empty> {
        match self.version {
            ApiVersion::Alpha1 => self.api.resume_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.resume_workflow_beta1(req, &self.cancel).await,
        }
    }

    async fn purge(&self, req: &PurgeWorkflowRequest) -> ApiResult<Empty> {
        match self.version {
            ApiVersion::Alpha1 => self.api.purge_workflow_alpha1(req, &self.cancel).await,
            ApiVersion::Beta1 => self.api.purge_workflow_beta1(req, &self.cancel).await,
        }
    }
}

fn to_anyhow(err: ApiError) -> anyhow::Error {
    anyhow::anyhow!("{}: {}", err.code(), err)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{}", json);
    Ok(())
}

fn acknowledge(json: bool, ack: &Empty, message: &str) -> Result<()> {
    if json {
        print_json(ack)
    } else {
        println!("{}", message);
        Ok(())
    }
}

fn print_state(state: &GetWorkflowResponse) {
    println!("Instance ID: {}", state.instance_id);
    println!("Workflow: {}", state.workflow_name);
    println!("Status: {}", state.runtime_status);
    if let Some(created) = state.created_at {
        println!("Created: {}", created);
    }
    if let Some(updated) = state.last_updated_at {
        println!("Last updated: {}", updated);
    }

    if !state.properties.is_empty() {
        println!("\nProperties:");
        let mut keys: Vec<_> = state.properties.keys().collect();
        keys.sort();
        for key in keys {
            println!("  {}: {}", key, state.properties[key]);
        }
    }
}

fn list_components(config: &ResolvedConfig) -> Result<()> {
    for component in &config.components {
        let marker = if config.default_component.as_deref() == Some(component.name()) {
            " (default)"
        } else {
            ""
        };
        match component {
            ResolvedComponent::Memory { name } => println!("{}{}: memory", name, marker),
            ResolvedComponent::File { name, state_dir } => {
                println!("{}{}: file at {}", name, marker, state_dir.display())
            }
        }
    }
    Ok(())
}

fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("Home: {}", config.home.display());
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!(
        "Default component: {}",
        config.default_component.as_deref().unwrap_or("(none)")
    );
    println!("\nComponents:");
    for component in &config.components {
        println!("  {:?}", component);
    }
    Ok(())
}
