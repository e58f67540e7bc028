//! Command line front end for the auth templates module.
//!
//! Configuration is layered: built-in defaults, then an optional YAML file
//! (`--config`), then `AUTH_TEMPLATES_*` environment variables, then the
//! `--project` / `--storage-dir` flags. Results are printed to stdout as JSON;
//! logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use auth_templates::{AuthTemplates, AuthTemplatesConfig, TemplatePatch};
use clap::{Parser, Subcommand};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

/// Prefix of the environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "AUTH_TEMPLATES_";

/// Manage authentication probe templates
#[derive(Debug, Parser)]
#[command(name = "auth-templates", version, about)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Active project scope, overriding the configured one
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Root directory of the JSON file store, overriding the configured one
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Verbosity level (use -v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import every operation of an `OpenAPI` 3.x / Swagger 2.0 JSON file
    Import {
        /// Path of the JSON document
        file: PathBuf,
    },
    /// List all templates
    List,
    /// Create a blank template
    Add,
    /// Merge a JSON patch into a template
    Update {
        id: Uuid,
        /// Partial template, e.g. '{"authSuccessRegex":"HTTP/1[.]1 204"}'
        #[arg(long)]
        patch: String,
    },
    /// Delete a template
    Delete { id: Uuid },
    /// Delete every template
    Clear,
    /// Add or remove a role association
    ToggleRole { id: Uuid, role: String },
    /// Add or remove a user association
    ToggleUser { id: Uuid, user: String },
}

impl Cli {
    /// Install the stderr tracing subscriber. `RUST_LOG` wins over `-v`.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let directive = match self.verbose {
                0 => "info",
                1 => "auth_templates=debug,auth_templates_cli=debug",
                _ => "trace",
            };
            EnvFilter::new(directive)
        });

        fmt()
            .with_env_filter(filter)
            .with_target(self.verbose != 0)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Resolve the layered module configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML file or an environment override does not
    /// match the configuration schema.
    pub fn load_config(&self) -> Result<AuthTemplatesConfig> {
        let mut figment = Figment::from(Serialized::defaults(AuthTemplatesConfig::default()));
        if let Some(path) = &self.config {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        if let Some(project) = &self.project {
            figment = figment.merge(Serialized::default("project", project));
        }
        if let Some(dir) = &self.storage_dir {
            figment = figment.merge(Serialized::default("storage_dir", dir));
        }
        figment
            .extract()
            .context("invalid auth templates configuration")
    }

    /// Execute the selected command, writing its JSON result to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, I/O or the requested operation fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.load_config()?;
        debug!(?cfg, "Resolved configuration");

        let module = AuthTemplates::from_config(&cfg)?;
        let loaded = module.service().hydrate().await?;
        info!(loaded, "Template catalog ready");

        let client = module.client();
        match self.command {
            Command::Import { file } => {
                let raw = read_document(&file).await?;
                print_json(&client.import_spec(&raw).await?)
            }
            Command::List => print_json(&client.list_templates().await?),
            Command::Add => print_json(&client.add_template().await?),
            Command::Update { id, patch } => {
                let patch: TemplatePatch =
                    serde_json::from_str(&patch).context("--patch is not a valid template patch")?;
                let updated = client.update_template(id, patch).await?;
                print_json(&found(id, updated)?)
            }
            Command::Delete { id } => client.delete_template(id).await.map_err(Into::into),
            Command::Clear => client.clear_templates().await.map_err(Into::into),
            Command::ToggleRole { id, role } => {
                let updated = client.toggle_template_role(id, &role).await?;
                print_json(&found(id, updated)?)
            }
            Command::ToggleUser { id, user } => {
                let updated = client.toggle_template_user(id, &user).await?;
                print_json(&found(id, updated)?)
            }
        }
    }
}

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}

fn found<T>(id: Uuid, value: Option<T>) -> Result<T> {
    match value {
        Some(value) => Ok(value),
        None => bail!("template {id} not found"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_toggle_role() {
        let id = Uuid::from_u128(7);
        let arg = id.to_string();
        let cli =
            Cli::try_parse_from(["auth-templates", "toggle-role", arg.as_str(), "admin"]).unwrap();
        match cli.command {
            Command::ToggleRole { id: got, role } => {
                assert_eq!(got, id);
                assert_eq!(role, "admin");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn update_requires_patch() {
        let id = Uuid::from_u128(7).to_string();
        let id = id.as_str();
        assert!(Cli::try_parse_from(["auth-templates", "update", id]).is_err());
        assert!(Cli::try_parse_from(["auth-templates", "update", id, "--patch", "{}"]).is_ok());
    }

    #[test]
    fn rejects_malformed_id() {
        assert!(Cli::try_parse_from(["auth-templates", "delete", "not-a-uuid"]).is_err());
    }

    #[test]
    fn config_layers_file_then_flags() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "auth-templates.yaml",
                "project: from-file\nid_attempts: 3\n",
            )?;
            jail.set_env("AUTH_TEMPLATES_MAX_DOCUMENT_BYTES", "1024");

            let cli = Cli::try_parse_from([
                "auth-templates",
                "--config",
                "auth-templates.yaml",
                "list",
            ])
            .unwrap();
            let cfg = cli.load_config().unwrap();
            assert_eq!(cfg.project.as_deref(), Some("from-file"));
            assert_eq!(cfg.id_attempts, 3);
            assert_eq!(cfg.max_document_bytes, 1024);

            let cli = Cli::try_parse_from([
                "auth-templates",
                "--config",
                "auth-templates.yaml",
                "--project",
                "from-flag",
                "--storage-dir",
                "store",
                "list",
            ])
            .unwrap();
            let cfg = cli.load_config().unwrap();
            assert_eq!(cfg.project.as_deref(), Some("from-flag"));
            assert_eq!(cfg.storage_dir, Some(PathBuf::from("store")));
            Ok(())
        });
    }

    #[test]
    fn unknown_config_key_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "projekt: oops\n")?;
            let cli =
                Cli::try_parse_from(["auth-templates", "--config", "bad.yaml", "list"]).unwrap();
            assert!(cli.load_config().is_err());
            Ok(())
        });
    }

    #[test]
    fn missing_record_is_an_error() {
        assert!(found::<u8>(Uuid::nil(), None).is_err());
        assert_eq!(found(Uuid::nil(), Some(1)).unwrap(), 1);
    }
}
