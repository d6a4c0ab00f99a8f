//! Azure DevOps connection settings.
//!
//! Values come from command-line flags or the environment (a `.env` file is
//! loaded by `main` before parsing). `AzureArgs` is the raw clap view;
//! `AzureConfig` is the validated form handed to the client.

use clap::Args;
use secrecy::SecretString;

use crate::error::{AppError, Result};

pub const DEFAULT_API_VERSION: &str = "6.0";

#[derive(Debug, Clone, Args)]
pub struct AzureArgs {
    /// Organization URL, e.g. https://dev.azure.com/contoso
    #[arg(long = "org-url", env = "AZURE_ORGANIZATION_URL", global = true)]
    pub organization_url: Option<String>,

    /// Personal access token used for basic auth
    #[arg(long = "token", env = "AZURE_PERSONAL_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub personal_access_token: Option<String>,

    /// REST API version sent with every request
    #[arg(long, env = "AZURE_DEVOPS_API_VERSION", global = true, default_value = DEFAULT_API_VERSION)]
    pub api_version: String,
}

#[derive(Debug)]
pub struct AzureConfig {
    pub organization_url: String,
    pub personal_access_token: SecretString,
    pub api_version: String,
}

impl AzureConfig {
    pub fn from_args(args: &AzureArgs) -> Result<Self> {
        let organization_url = args
            .organization_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("AZURE_ORGANIZATION_URL is not set".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let token = args
            .personal_access_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::Config("AZURE_PERSONAL_ACCESS_TOKEN is not set".to_string())
            })?;

        Ok(Self {
            organization_url,
            personal_access_token: SecretString::from(token.to_string()),
            api_version: args.api_version.clone(),
        })
    }
}
