use crate::cli::{Cli, Commands, TemplateCommands};
use anyhow::{Context, Result, bail};
use reportwriter::config::Config;
use reportwriter::form::FormState;
use reportwriter::history::ArtifactKind;
use reportwriter::providers::{ProxyClient, RequestEngine, RetryPolicy};
use reportwriter::session::ReportSession;
use reportwriter::templates::{JsonFileTemplateStore, TemplateRegistry};
use reportwriter::usage::{JsonFileUsageStore, SiteWideCounter, UsageCounter, UsageTracker};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::edit_loop;
use super::style;

fn open_registry(config: &Config) -> Result<TemplateRegistry> {
    TemplateRegistry::open(Box::new(JsonFileTemplateStore::new(config.templates_path())))
        .context("Failed to open template store")
}

fn build_usage(config: &Config) -> UsageTracker {
    let local = UsageCounter::new(Box::new(JsonFileUsageStore::new(config.usage_path())));
    let tracker = UsageTracker::new(local);
    match config.usage.endpoint.as_deref().filter(|e| !e.is_empty()) {
        Some(endpoint) => tracker.with_remote(SiteWideCounter::new(
            endpoint,
            config.usage.secret.clone().unwrap_or_default(),
        )),
        None => tracker,
    }
}

fn build_session(config: &Config) -> Result<ReportSession> {
    let engine = RequestEngine::new(Arc::new(ProxyClient::new(&config.proxy_url)))
        .with_policy(RetryPolicy::new(
            config.reliability.max_attempts,
            config.reliability.base_backoff_ms,
        ))
        .with_model(config.default_model.clone())
        .with_usage(Arc::new(build_usage(config)));
    Ok(ReportSession::new(open_registry(config)?, engine)?)
}

fn load_form(path: &Path) -> Result<FormState> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse form file {}", path.display()))
}

async fn run_generate(config: &Config, kind: ArtifactKind, form_path: &Path) -> Result<()> {
    let form = load_form(form_path)?;
    let session = build_session(config)?;
    info!(artifact = kind.label(), proxy = config.proxy_url.as_str(), "Requesting");

    let result = match session.generate(kind, &form).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", style::warn(session.text(kind).await));
            Err(e.into())
        }
    };
    flush_usage(config, &session).await;
    result
}

/// Let background site-wide syncs land before the runtime shuts down.
async fn flush_usage(config: &Config, session: &ReportSession) {
    if let Some(usage) = session.engine().usage() {
        usage
            .flush(Duration::from_millis(config.usage.flush_timeout_ms))
            .await;
    }
}

fn confirm_reset() -> Result<bool> {
    Ok(dialoguer::Confirm::new()
        .with_prompt("Delete all custom templates and restore the default?")
        .default(false)
        .interact()?)
}

fn run_templates(config: &Config, command: TemplateCommands) -> Result<()> {
    let mut registry = open_registry(config)?;

    match command {
        TemplateCommands::List => {
            let active = registry.get_active().id;
            println!("{}", style::header("Templates"));
            for template in registry.list() {
                let marker = if template.id == active { "●" } else { " " };
                let lock = if template.is_locked { " (locked)" } else { "" };
                println!(
                    "  {marker} {} {}{}",
                    style::label(&template.id),
                    template.name,
                    style::dim(lock)
                );
            }
            let stats = registry.stats();
            println!(
                "{}",
                style::dim(format!(
                    "{} total, {} custom, {} locked",
                    stats.total_templates, stats.custom_templates, stats.locked_templates
                ))
            );
        }
        TemplateCommands::Show { id } => {
            let template = registry
                .get(&id)
                .with_context(|| format!("Template {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(template)?);
        }
        TemplateCommands::Use { id } => {
            registry.try_set_active(&id)?;
            println!("{} Active template: {id}", style::success("✓"));
        }
        TemplateCommands::Duplicate { id } => {
            let copy = registry.try_duplicate(&id)?;
            println!(
                "{} Created {} ({})",
                style::success("✓"),
                copy.name,
                style::label(&copy.id)
            );
        }
        TemplateCommands::Delete { id } => {
            registry.try_delete(&id)?;
            println!("{} Deleted {id}", style::success("✓"));
        }
        TemplateCommands::Export { id, output } => {
            let Some(json) = registry.export(&id) else {
                bail!("Template {id} is locked or does not exist");
            };
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("{} Exported {id} to {}", style::success("✓"), path.display());
                }
                None => println!("{json}"),
            }
        }
        TemplateCommands::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let template = registry.import(&json)?;
            println!(
                "{} Imported {} as {}",
                style::success("✓"),
                template.name,
                style::label(&template.id)
            );
        }
        TemplateCommands::Reset { yes } => {
            if !yes && !confirm_reset()? {
                println!("{}", style::dim("Nothing changed."));
                return Ok(());
            }
            registry.reset_to_defaults()?;
            println!("{} Templates reset to default", style::success("✓"));
        }
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Report { form } => run_generate(&config, ArtifactKind::Report, &form).await,
        Commands::Strategies { form } => {
            run_generate(&config, ArtifactKind::Strategies, &form).await
        }
        Commands::Edit { form, start } => {
            let mut form = load_form(&form)?;
            let session = build_session(&config)?;
            let result = edit_loop::run(&session, &mut form, start).await;
            flush_usage(&config, &session).await;
            result
        }
        Commands::Templates { template_command } => run_templates(&config, template_command),
        Commands::Usage => {
            let usage = build_usage(&config);
            println!("{}", usage.display_line(config.usage.monthly_quota).await);
            Ok(())
        }
        Commands::Gateway { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            info!("Starting report proxy on {host}:{port}");
            reportwriter::gateway::run_gateway(&host, port, &config.gateway).await
        }
    }
}
