//! Interactive creation of the `.env.local` secrets file.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{
    ANON_KEY_KEY, OPENAI_KEY_KEY, PERPLEXITY_KEY_KEY, SERVICE_ROLE_KEY_KEY, SUPABASE_URL_KEY,
};
use crate::prompt::{ask, confirm};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Secrets {
    pub supabase_url: String,
    pub anon_key: String,
    pub service_role_key: String,
    pub perplexity_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum SetupOutcome {
    Written(PathBuf),
    /// Existing file kept.
    Cancelled,
    /// A required answer was left empty; nothing written.
    MissingInput(&'static str),
}

pub fn render_env_file(secrets: &Secrets) -> String {
    let mut out = String::from("# Supabase Configuration\n");
    out.push_str(&format!("{}={}\n", SUPABASE_URL_KEY, secrets.supabase_url));
    out.push_str(&format!("{}={}\n", ANON_KEY_KEY, secrets.anon_key));
    out.push_str(&format!("{}={}\n", SERVICE_ROLE_KEY_KEY, secrets.service_role_key));
    out.push_str("\n# AI Configuration (optional)\n");
    if let Some(key) = &secrets.perplexity_api_key {
        out.push_str(&format!("{}={}\n", PERPLEXITY_KEY_KEY, key));
    }
    if let Some(key) = &secrets.openai_api_key {
        out.push_str(&format!("{}={}\n", OPENAI_KEY_KEY, key));
    }
    out
}

pub fn run_setup<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    target: &Path,
) -> Result<SetupOutcome> {
    writeln!(output, "Recipe crawler environment setup")?;
    writeln!(output, "{}", "=".repeat(50))?;
    writeln!(output, "Environment file: {}", target.display())?;

    if target.exists() {
        writeln!(output, "\n{} already exists.", target.display())?;
        if !confirm(input, output, "Overwrite?")? {
            writeln!(output, "Setup cancelled.")?;
            return Ok(SetupOutcome::Cancelled);
        }
    }

    writeln!(output, "\nEnter your Supabase settings.")?;
    writeln!(output, "(Supabase dashboard → Settings → API)")?;

    let supabase_url = ask(input, output, "\n1. Project URL (e.g. https://your-project.supabase.co): ")?;
    if supabase_url.is_empty() {
        writeln!(output, "Project URL is required.")?;
        return Ok(SetupOutcome::MissingInput(SUPABASE_URL_KEY));
    }
    let anon_key = ask(input, output, "\n2. anon public key: ")?;
    if anon_key.is_empty() {
        writeln!(output, "anon public key is required.")?;
        return Ok(SetupOutcome::MissingInput(ANON_KEY_KEY));
    }
    let service_role_key = ask(input, output, "\n3. service_role secret key: ")?;
    if service_role_key.is_empty() {
        writeln!(output, "service_role secret key is required.")?;
        return Ok(SetupOutcome::MissingInput(SERVICE_ROLE_KEY_KEY));
    }

    writeln!(output, "\nAI API keys (optional)")?;
    let perplexity = ask(input, output, "Perplexity API key (Enter to skip): ")?;
    let openai = ask(input, output, "OpenAI API key (Enter to skip): ")?;

    let secrets = Secrets {
        supabase_url,
        anon_key,
        service_role_key,
        perplexity_api_key: Some(perplexity).filter(|k| !k.is_empty()),
        openai_api_key: Some(openai).filter(|k| !k.is_empty()),
    };

    fs::write(target, render_env_file(&secrets))
        .with_context(|| format!("Failed to write {}", target.display()))?;
    info!("Wrote environment file: {}", target.display());

    writeln!(output, "\nCreated {}", target.display())?;
    writeln!(output, "\nNext steps:")?;
    writeln!(output, "1. Scrape recipes:  recipe_crawler collect")?;
    writeln!(output, "2. Import them:     recipe_crawler import")?;

    Ok(SetupOutcome::Written(target.to_path_buf()))
}
