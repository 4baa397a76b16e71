//! Campaign and character-template JSON-file store
//!
//! Campaign state and character templates live as JSON files under the
//! root folder (`campaigns/<uuid>.json`, `templates/<name>.json`). Writes
//! go through a temp file plus rename so a crash mid-write never leaves a
//! truncated file behind. Template names are restricted to a safe
//! character set so caller input cannot escape the store directory.

use gmkit_common::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed store for campaign state and character templates
#[derive(Debug, Clone)]
pub struct CampaignStore {
    campaigns_dir: PathBuf,
    templates_dir: PathBuf,
}

impl CampaignStore {
    /// Open (and create if missing) the store directories under `root`
    pub fn new(root: &Path) -> Result<Self> {
        let campaigns_dir = root.join("campaigns");
        let templates_dir = root.join("templates");
        std::fs::create_dir_all(&campaigns_dir)?;
        std::fs::create_dir_all(&templates_dir)?;
        Ok(Self {
            campaigns_dir,
            templates_dir,
        })
    }

    /// Save (replace) a campaign's full state
    pub fn save_campaign(&self, campaign_id: Uuid, state: &Value) -> Result<()> {
        let path = self.campaigns_dir.join(format!("{campaign_id}.json"));
        write_json_atomic(&path, state)
    }

    /// Load a campaign's state, if present
    pub fn load_campaign(&self, campaign_id: Uuid) -> Result<Option<Value>> {
        read_json(&self.campaigns_dir.join(format!("{campaign_id}.json")))
    }

    /// Delete a campaign's state file. Returns false when absent.
    pub fn delete_campaign(&self, campaign_id: Uuid) -> Result<bool> {
        let path = self.campaigns_dir.join(format!("{campaign_id}.json"));
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }

    /// List ids of all stored campaigns
    pub fn list_campaigns(&self) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.campaigns_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json") {
                if let Ok(id) = Uuid::parse_str(stem) {
                    ids.push(id);
                }
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Save (replace) a character template under a validated name
    pub fn save_template(&self, name: &str, template: &Value) -> Result<()> {
        let name = validate_template_name(name)?;
        let path = self.templates_dir.join(format!("{name}.json"));
        write_json_atomic(&path, template)
    }

    /// Load a character template, if present
    pub fn load_template(&self, name: &str) -> Result<Option<Value>> {
        let name = validate_template_name(name)?;
        read_json(&self.templates_dir.join(format!("{name}.json")))
    }

    /// List names of all stored character templates, sorted
    pub fn list_templates(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.templates_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json") {
                names.push(stem.to_string());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}

/// Template names: lowercase alphanumerics, hyphen, underscore; non-empty
fn validate_template_name(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid template name '{name}': use lowercase letters, digits, '-' and '_'"
        )))
    }
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    // Unique temp name per write: concurrent saves of the same file must
    // not interleave through a shared temp path before the rename
    let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}
