//! Server configuration
//!
//! All parameters come from the environment (optionally via a `.env`
//! file). Most have defaults so a near-empty environment still yields a
//! runnable dev setup; registry credentials and the clone URL have no
//! sensible defaults and are required.

use std::path::PathBuf;
use std::time::Duration;

use capstan_runner::DeploySettings;

/// Webhook server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    /// Shared secret for webhook signature verification
    pub webhook_secret: String,
    /// Registry credentials
    pub docker_username: String,
    pub docker_password: String,
    /// Image name prefix, e.g. "acme/nextjs-app"
    pub docker_repo: String,
    /// Working directory holding the source checkout
    pub project_dir: PathBuf,
    /// Clone source for the first-use checkout
    pub repo_url: String,
    /// Host/container port mapping for the deployed container
    pub host_port: u16,
    pub container_port: u16,
    /// Prefix of derived container names
    pub container_prefix: String,
    /// Upper bound on any single external command
    pub command_timeout: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - WEBHOOK_SECRET (default: your-webhook-secret)
    /// - DOCKER_USERNAME (required)
    /// - DOCKER_PASSWORD (required)
    /// - DOCKER_REPO (default: your-repo/nextjs-app)
    /// - PROJECT_DIR (default: /var/www/nextjs-project)
    /// - REPO_URL (required)
    /// - PORT (default: 3000)
    /// - HOST_PORT / CONTAINER_PORT (default: 3000 / 3000)
    /// - CONTAINER_NAME_PREFIX (default: nextjs-app)
    /// - COMMAND_TIMEOUT_SECS (default: 600)
    pub fn from_env() -> anyhow::Result<Self> {
        let docker_username = std::env::var("DOCKER_USERNAME")
            .map_err(|_| anyhow::anyhow!("DOCKER_USERNAME environment variable not set"))?;

        let docker_password = std::env::var("DOCKER_PASSWORD")
            .map_err(|_| anyhow::anyhow!("DOCKER_PASSWORD environment variable not set"))?;

        let repo_url = std::env::var("REPO_URL")
            .map_err(|_| anyhow::anyhow!("REPO_URL environment variable not set"))?;

        let webhook_secret = std::env::var("WEBHOOK_SECRET")
            .unwrap_or_else(|_| "your-webhook-secret".to_string());

        let docker_repo =
            std::env::var("DOCKER_REPO").unwrap_or_else(|_| "your-repo/nextjs-app".to_string());

        let project_dir = std::env::var("PROJECT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/www/nextjs-project"));

        let port = env_port("PORT", 3000);
        let host_port = env_port("HOST_PORT", 3000);
        let container_port = env_port("CONTAINER_PORT", 3000);

        let container_prefix = std::env::var("CONTAINER_NAME_PREFIX")
            .unwrap_or_else(|_| "nextjs-app".to_string());

        let command_timeout = std::env::var("COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(600));

        Ok(Self {
            port,
            webhook_secret,
            docker_username,
            docker_password,
            docker_repo,
            project_dir,
            repo_url,
            host_port,
            container_port,
            container_prefix,
            command_timeout,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.webhook_secret.is_empty() {
            anyhow::bail!("webhook_secret cannot be empty");
        }

        if self.docker_repo.is_empty() {
            anyhow::bail!("docker_repo cannot be empty");
        }

        if self.repo_url.is_empty() {
            anyhow::bail!("repo_url cannot be empty");
        }

        if self.container_prefix.is_empty() {
            anyhow::bail!("container_prefix cannot be empty");
        }

        if self.command_timeout.as_secs() == 0 {
            anyhow::bail!("command_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Deployment parameters handed to the pipeline driver.
    pub fn deploy_settings(&self) -> DeploySettings {
        DeploySettings {
            project_dir: self.project_dir.clone(),
            docker_repo: self.docker_repo.clone(),
            docker_username: self.docker_username.clone(),
            docker_password: self.docker_password.clone(),
            host_port: self.host_port,
            container_port: self.container_port,
            container_prefix: self.container_prefix.clone(),
        }
    }
}

fn env_port(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 3000,
            webhook_secret: "secret".to_string(),
            docker_username: "builder".to_string(),
            docker_password: "hunter2".to_string(),
            docker_repo: "acme/app".to_string(),
            project_dir: PathBuf::from("/var/www/app"),
            repo_url: "git@example.com:acme/app.git".to_string(),
            host_port: 3000,
            container_port: 3000,
            container_prefix: "app".to_string(),
            command_timeout: Duration::from_secs(600),
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_fails_validation() {
        let mut config = test_config();
        config.webhook_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_repo_url_fails_validation() {
        let mut config = test_config();
        config.repo_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let mut config = test_config();
        config.command_timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deploy_settings_mirror_config() {
        let config = test_config();
        let settings = config.deploy_settings();

        assert_eq!(settings.project_dir, config.project_dir);
        assert_eq!(settings.docker_repo, "acme/app");
        assert_eq!(settings.host_port, 3000);
        assert_eq!(settings.container_prefix, "app");
    }
}
