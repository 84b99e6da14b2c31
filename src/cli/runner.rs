//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::cli::server::{serve, ServerConfig};
use crate::config::AppConfig;
use crate::database::DuckDbStore;
use crate::error::{Error, Result};
use crate::pagination::{PageFetcher, PageRequest};
use crate::store::{Generation, Visibility};
use std::fs;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { port, page_size } => {
                let config = AppConfig {
                    port: port.unwrap_or(config.port),
                    page_size: page_size.unwrap_or(config.page_size),
                    ..config
                };
                self.serve(config).await
            }
            Commands::Page {
                page,
                visibility,
                page_size,
                pretty,
            } => {
                let config = AppConfig {
                    page_size: page_size.unwrap_or(config.page_size),
                    visibility: visibility.unwrap_or(config.visibility),
                    ..config
                };
                self.page(&config, page.as_deref(), *pretty).await
            }
            Commands::Import { file } => self.import(&config, file),
        }
    }

    /// Load the config file (if any) and apply global overrides
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(database) = &self.cli.database {
            config.database.clone_from(database);
        }
        config.validate()?;
        Ok(config)
    }

    /// Open the configured database, creating the schema if needed
    fn open_store(config: &AppConfig) -> Result<DuckDbStore> {
        let store = DuckDbStore::open(&config.database)?;
        store.init_schema()?;
        Ok(store)
    }

    async fn serve(&self, config: AppConfig) -> Result<()> {
        config.validate()?;
        let store = Self::open_store(&config)?;
        if self.cli.verbose {
            tracing::info!(
                database = %store.location(),
                visible = store.count(Visibility::VisibleOnly)?,
                total = store.count(Visibility::All)?,
                "Database ready"
            );
        }

        let fetcher = PageFetcher::new(store).with_page_size(config.page_size);
        let server_config = ServerConfig {
            port: config.port,
            visibility: config.visibility,
            cors: config.cors,
        };
        serve(fetcher, server_config).await
    }

    async fn page(&self, config: &AppConfig, raw_page: Option<&str>, pretty: bool) -> Result<()> {
        config.validate()?;
        let store = Self::open_store(config)?;
        let fetcher = PageFetcher::new(store).with_page_size(config.page_size);

        let response = fetcher
            .fetch(PageRequest::from_query(raw_page), &config.visibility)
            .await?;

        let output = if pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        println!("{output}");
        Ok(())
    }

    fn import(&self, config: &AppConfig, file: &Path) -> Result<()> {
        let generations = read_generations(file)?;
        let store = Self::open_store(config)?;
        let count = store.insert(&generations)?;
        println!("Imported {count} generations into {}", store.location());
        Ok(())
    }
}

/// Read a JSON array of generations from a file
pub fn read_generations(file: &Path) -> Result<Vec<Generation>> {
    let content = fs::read_to_string(file).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: file.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::generations;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_parse_page_command() {
        let cli = Cli::parse_from([
            "gallery-pager",
            "--database",
            "gallery.duckdb",
            "page",
            "--page",
            "abc",
            "--visibility",
            "hidden-only",
        ]);
        assert_eq!(cli.database.as_deref(), Some("gallery.duckdb"));
        match cli.command {
            Commands::Page {
                page, visibility, ..
            } => {
                assert_eq!(page.as_deref(), Some("abc"));
                assert_eq!(visibility, Some(Visibility::HiddenOnly));
            }
            other => panic!("Expected Page, got {other:?}"),
        }
    }

    #[test]
    fn test_database_flag_overrides_config() {
        let cli = Cli::parse_from(["gallery-pager", "-d", "other.duckdb", "serve"]);
        let config = Runner::new(cli).load_config().unwrap();
        assert_eq!(config.database, "other.duckdb");
        assert_eq!(config.page_size, 50);
    }

    #[tokio::test]
    async fn test_oversized_page_size_flag_rejected() {
        let cli = Cli::parse_from([
            "gallery-pager",
            "page",
            "--page-size",
            "18446744073709551615",
        ]);
        let err = Runner::new(cli).run().await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { ref field, .. } if field == "page_size"
        ));
    }

    #[test]
    fn test_read_generations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&generations(3)).unwrap();
        write!(file, "{json}").unwrap();

        let read = read_generations(file.path()).unwrap();
        assert_eq!(read.len(), 3);
        assert_eq!(read[0].id, "gen-0000");
    }

    #[test]
    fn test_read_generations_missing_file() {
        let err = read_generations(Path::new("/nonexistent/generations.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_import_then_page() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("gallery.duckdb");
        let input = dir.path().join("generations.json");
        fs::write(&input, serde_json::to_string(&generations(12)).unwrap()).unwrap();

        let db = db.to_str().unwrap().to_string();
        let import = Cli::parse_from([
            "gallery-pager",
            "--database",
            db.as_str(),
            "import",
            input.to_str().unwrap(),
        ]);
        Runner::new(import).run().await.unwrap();

        let store = DuckDbStore::open(&db).unwrap();
        assert_eq!(store.count(Visibility::All).unwrap(), 12);
        drop(store);

        let page = Cli::parse_from([
            "gallery-pager",
            "--database",
            db.as_str(),
            "page",
            "--page",
            "2",
            "--page-size",
            "5",
        ]);
        Runner::new(page).run().await.unwrap();
    }
}
