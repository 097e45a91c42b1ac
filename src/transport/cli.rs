//! Non-interactive CLI commands
//!
//! `add` and `validate` drive the same field-change pipeline as the TUI, so
//! the command line gets identical validation and preview behaviour.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::Config;
use crate::core::{
    EntryId, EntryPersistence, FieldKind, FieldName, FormEvent, PreviewLoader, Registry,
    ValidationErrors,
};
use crate::storage::JsonSlotStore;

/// Candidate fields as command-line flags
#[derive(Debug, Clone, Default, Args)]
pub struct CandidateArgs {
    /// Full name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Email address
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Phone number (10 digits)
    #[arg(short, long, default_value = "")]
    pub phone: String,

    /// Gender (Male, Female)
    #[arg(short, long)]
    pub gender: Option<String>,

    /// Skill to select; repeat for several (HTML, CSS, JavaScript, React)
    #[arg(short, long = "skill")]
    pub skills: Vec<String>,

    /// Profile picture file
    #[arg(long)]
    pub picture: Option<PathBuf>,
}

impl CandidateArgs {
    /// The flags as the field-change events a form would emit
    pub fn field_changes(&self) -> Vec<(&'static str, String, FieldKind)> {
        let mut changes = vec![
            (FieldName::FullName.as_str(), self.name.clone(), FieldKind::Text),
            (FieldName::Email.as_str(), self.email.clone(), FieldKind::Text),
            (FieldName::Phone.as_str(), self.phone.clone(), FieldKind::Text),
        ];
        if let Some(gender) = &self.gender {
            changes.push((FieldName::Gender.as_str(), gender.clone(), FieldKind::Radio));
        }
        // Each flag selects; repeating one must not toggle it back off
        let mut seen = HashSet::new();
        for skill in &self.skills {
            if seen.insert(skill.trim().to_lowercase()) {
                changes.push((FieldName::Skills.as_str(), skill.clone(), FieldKind::Checkbox));
            }
        }
        if let Some(picture) = &self.picture {
            changes.push((
                FieldName::ProfilePic.as_str(),
                picture.display().to_string(),
                FieldKind::File,
            ));
        }
        changes
    }
}

/// Feed the flags into the form and wait for the preview read, if any
pub async fn fill_form<P: EntryPersistence>(
    registry: &mut Registry<P>,
    args: &CandidateArgs,
    max_preview_bytes: u64,
) -> Result<()> {
    let (mut loader, mut preview_rx) = PreviewLoader::new(max_preview_bytes);

    for (name, value, kind) in args.field_changes() {
        let event = FormEvent::from_field_change(name, value.clone(), kind)
            .with_context(|| format!("Invalid value for {}: {:?}", name, value))?;
        if let Some(effect) = registry.dispatch(event) {
            loader.handle(effect);
        }
    }

    if loader.in_flight().is_some() {
        if let Some(ready) = preview_rx.recv().await {
            let event = loader.accept(ready);
            registry.dispatch(event);
        }
    }

    if registry.form().preview_pending() {
        println!("{}", "! No preview available for the selected picture".yellow());
    }
    Ok(())
}

fn print_errors(errors: &ValidationErrors) {
    println!("{}", "Registration rejected:".red().bold());
    for (field, message) in errors.iter() {
        println!("  {} {}: {}", "✗".red(), field.label(), message);
    }
}

/// Register a candidate. Returns `false` when validation rejected it.
pub async fn run_add(config: &Config, args: CandidateArgs) -> Result<bool> {
    let mut registry = Registry::open(JsonSlotStore::from_config(config));
    fill_form(&mut registry, &args, config.preview.max_bytes).await?;

    match registry.submit() {
        Ok(id) => {
            println!("{} Registered candidate {}", "✓".green(), id);
            Ok(true)
        }
        Err(errors) => {
            print_errors(&errors);
            Ok(false)
        }
    }
}

/// Check the flags without storing anything. Returns `false` when invalid.
pub async fn run_validate(config: &Config, args: CandidateArgs) -> Result<bool> {
    let mut registry = Registry::open(JsonSlotStore::from_config(config));
    fill_form(&mut registry, &args, config.preview.max_bytes).await?;

    let errors = registry.validate();
    if errors.is_empty() {
        println!("{} All fields valid", "✓".green());
        Ok(true)
    } else {
        print_errors(&errors);
        Ok(false)
    }
}

/// List registered candidates
pub fn run_list(config: &Config, format: &str) -> Result<()> {
    let registry = Registry::open(JsonSlotStore::from_config(config));

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(registry.entries())?);
        }
        _ => {
            #[derive(Tabled)]
            struct EntryRow {
                #[tabled(rename = "ID")]
                id: String,
                #[tabled(rename = "Registered")]
                registered: String,
                #[tabled(rename = "Name")]
                name: String,
                #[tabled(rename = "Email")]
                email: String,
                #[tabled(rename = "Phone")]
                phone: String,
                #[tabled(rename = "Gender")]
                gender: String,
                #[tabled(rename = "Skills")]
                skills: String,
                #[tabled(rename = "Picture")]
                picture: String,
            }

            if registry.entries().is_empty() {
                println!("No entries yet.");
                return Ok(());
            }

            println!("{}", "=== Registered Candidates ===".bold().cyan());
            let rows: Vec<EntryRow> = registry
                .entries()
                .iter()
                .map(|entry| EntryRow {
                    id: entry.id.to_string(),
                    registered: entry
                        .id
                        .timestamp()
                        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    name: entry.full_name.clone(),
                    email: entry.email.clone(),
                    phone: entry.phone.clone(),
                    gender: entry.gender.to_string(),
                    skills: entry.skills.joined(),
                    picture: match (&entry.profile_pic, &entry.preview) {
                        (Some(name), Some(_)) => name.clone(),
                        (Some(name), None) => format!("{} (no preview)", name),
                        (None, _) => "-".to_string(),
                    },
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }

    Ok(())
}

/// Delete a candidate by id; deleting an unknown id is not an error
pub fn run_delete(config: &Config, id: EntryId) -> Result<()> {
    let mut registry = Registry::open(JsonSlotStore::from_config(config));
    if registry.delete(id) {
        println!("{} Deleted entry {}", "✓".green(), id);
    } else {
        println!("No entry with id {}", id);
    }
    Ok(())
}

/// Print the effective configuration, or write it to `init_path`
pub fn run_config(config: &Config, init_path: Option<&Path>) -> Result<()> {
    if let Some(path) = init_path {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        config.save_to(path)?;
        println!("{} Wrote {}", "✓".green(), path.display());
        return Ok(());
    }

    let store = JsonSlotStore::from_config(config);
    println!("{}", toml::to_string_pretty(config)?);
    println!("# Storage: {}", store.path().display());
    match Config::config_path() {
        Some(path) => println!("# Config file: {}", path.display()),
        None => println!("# Config file: (no platform config directory)"),
    }
    Ok(())
}
