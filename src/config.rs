//! Connection settings, resolved once at startup.
//!
//! Values come from the first `.env.local` found on the search path, with the
//! process environment taking priority over the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::normalize::DEFAULT_NOISE_TOKENS;

pub const ENV_FILE_NAME: &str = ".env.local";

pub const SUPABASE_URL_KEY: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const ANON_KEY_KEY: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const SERVICE_ROLE_KEY_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const PERPLEXITY_KEY_KEY: &str = "PERPLEXITY_API_KEY";
pub const OPENAI_KEY_KEY: &str = "OPENAI_API_KEY";
pub const NOISE_TOKENS_KEY: &str = "RECIPE_NOISE_TOKENS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required settings: {}", .keys.join(", "))]
    Missing {
        keys: Vec<&'static str>,
        searched: Vec<PathBuf>,
    },

    #[error("failed to read {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    /// Operator-facing steps to fix the configuration.
    pub fn remediation(&self) -> String {
        match self {
            ConfigError::Missing { keys, searched } => {
                let mut out = String::from("Set the following variables:\n");
                for key in keys {
                    out.push_str(&format!("  - {}\n", key));
                }
                out.push_str("\nEither export them, or create .env.local in one of:\n");
                for path in searched {
                    out.push_str(&format!("  - {}\n", path.display()));
                }
                out.push_str("\nRun `recipe_crawler setup` to create the file interactively.\n");
                out.push_str("Keys are under Supabase dashboard → Settings → API.");
                out
            }
            ConfigError::EnvFile { path, .. } => format!(
                "Fix the syntax of {} (KEY=value per line) or re-create it with `recipe_crawler setup`.",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub service_role_key: String,
    pub anon_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub noise_tokens: Vec<String>,
    /// The file the settings were read from, if any.
    pub env_file: Option<PathBuf>,
}

/// Directory this crate lives in; the project root is its parent.
pub fn anchor_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Where `setup` writes and `import` looks last.
pub fn project_env_file() -> PathBuf {
    anchor_dir().join("..").join(ENV_FILE_NAME)
}

/// Search order: working directory, its parent, then the project root.
pub fn search_paths(anchor: &Path) -> Vec<PathBuf> {
    vec![
        PathBuf::from(ENV_FILE_NAME),
        Path::new("..").join(ENV_FILE_NAME),
        anchor.join("..").join(ENV_FILE_NAME),
    ]
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&search_paths(&anchor_dir()), |key| std::env::var(key).ok())
    }

    pub fn load_from<F>(paths: &[PathBuf], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sources = Sources::open(paths, env)?;

        let supabase_url = sources.get(SUPABASE_URL_KEY);
        let service_role_key = sources.get(SERVICE_ROLE_KEY_KEY);
        let (supabase_url, service_role_key) = match (supabase_url, service_role_key) {
            (Some(url), Some(key)) => (url, key),
            (url, key) => {
                let mut keys = Vec::new();
                if url.is_none() {
                    keys.push(SUPABASE_URL_KEY);
                }
                if key.is_none() {
                    keys.push(SERVICE_ROLE_KEY_KEY);
                }
                return Err(ConfigError::Missing {
                    keys,
                    searched: paths.to_vec(),
                });
            }
        };

        Ok(Config {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            service_role_key,
            anon_key: sources.get(ANON_KEY_KEY),
            perplexity_api_key: sources.get(PERPLEXITY_KEY_KEY),
            openai_api_key: sources.get(OPENAI_KEY_KEY),
            noise_tokens: sources.noise_tokens(),
            env_file: sources.env_file,
        })
    }
}

/// Noise tokens alone, for commands that never talk to Supabase.
pub fn load_noise_tokens() -> Result<Vec<String>, ConfigError> {
    load_noise_tokens_from(&search_paths(&anchor_dir()), |key| std::env::var(key).ok())
}

pub fn load_noise_tokens_from<F>(paths: &[PathBuf], env: F) -> Result<Vec<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(Sources::open(paths, env)?.noise_tokens())
}

/// The first env file on the search path, layered under the process env.
struct Sources<F> {
    env: F,
    file_vars: HashMap<String, String>,
    env_file: Option<PathBuf>,
}

impl<F> Sources<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn open(paths: &[PathBuf], env: F) -> Result<Self, ConfigError> {
        let env_file = paths.iter().find(|p| p.is_file()).cloned();
        let file_vars = match &env_file {
            Some(path) => {
                let vars = read_env_file(path)?;
                info!("Loaded environment file: {}", path.display());
                vars
            }
            None => {
                warn!("{} not found; using process environment only", ENV_FILE_NAME);
                HashMap::new()
            }
        };
        Ok(Self {
            env,
            file_vars,
            env_file,
        })
    }

    /// Trimmed; blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .or_else(|| self.file_vars.get(key).cloned())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn noise_tokens(&self) -> Vec<String> {
        match self.get(NOISE_TOKENS_KEY) {
            Some(list) => list
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            None => DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_err = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };
    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_err)? {
        let (key, value) = item.map_err(to_err)?;
        vars.insert(key, value);
    }
    Ok(vars)
}
