//! Catalog command and product catalog sources.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use console::style;
use tracing::{debug, info};

use labelgen_core::models::config::CatalogConfig;
use labelgen_core::{Catalog, Product};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,

    #[command(flatten)]
    source: SourceArgs,
}

/// Catalog source overrides shared by commands that need product data.
#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Local catalog file (.json or .csv)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Base URL of the hosted product table
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List all products
    List,

    /// Show a single product
    Show {
        /// Product id
        id: u64,
    },
}

/// Where the catalog snapshot is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// Local JSON or CSV export.
    File(PathBuf),
    /// Hosted product table.
    Remote {
        url: String,
        table: String,
        api_key: Option<String>,
        timeout: Duration,
    },
}

impl CatalogSource {
    /// Resolve the source from command-line overrides, then configuration.
    pub fn resolve(args: &SourceArgs, config: &CatalogConfig) -> anyhow::Result<Self> {
        if let Some(path) = &args.catalog {
            return Ok(Self::File(path.clone()));
        }

        let url = args.catalog_url.clone().or_else(|| config.url.clone());
        if let Some(url) = url {
            let api_key = std::env::var(&config.api_key_env).ok();
            if api_key.is_none() {
                debug!("{} is not set, requesting catalog without a key", config.api_key_env);
            }
            return Ok(Self::Remote {
                url,
                table: config.table.clone(),
                api_key,
                timeout: Duration::from_secs(config.timeout_secs),
            });
        }

        if let Some(path) = &config.path {
            return Ok(Self::File(path.clone()));
        }

        anyhow::bail!(
            "No product catalog configured. Use --catalog, --catalog-url, \
             or set catalog.path / catalog.url with 'labelgen config set'."
        )
    }

    /// Fetch a fresh catalog snapshot.
    pub async fn load(&self) -> anyhow::Result<Catalog> {
        let catalog = match self {
            Self::File(path) => load_file(path)?,
            Self::Remote {
                url,
                table,
                api_key,
                timeout,
            } => fetch_remote(url, table, api_key.as_deref(), *timeout).await?,
        };

        info!("Loaded {} products", catalog.len());
        Ok(catalog)
    }
}

fn load_file(path: &Path) -> anyhow::Result<Catalog> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    debug!("Reading catalog from {}", path.display());

    match extension.as_str() {
        "json" => {
            let content = std::fs::read_to_string(path)?;
            Ok(Catalog::from_json(&content)?)
        }
        "csv" => {
            let mut reader = csv::Reader::from_path(path)?;
            let products = reader
                .deserialize::<Product>()
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Catalog::from_products(products)?)
        }
        _ => anyhow::bail!("Unsupported catalog format: {}", extension),
    }
}

async fn fetch_remote(
    url: &str,
    table: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> anyhow::Result<Catalog> {
    let endpoint = format!("{}/rest/v1/{}", url.trim_end_matches('/'), table);
    debug!("Fetching catalog from {}", endpoint);

    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let mut request = client
        .get(&endpoint)
        .query(&[("select", "*")])
        .header("Accept", "application/json");

    if let Some(key) = api_key {
        request = request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key));
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        anyhow::bail!(
            "Catalog request failed with HTTP {}: {}",
            response.status(),
            endpoint
        );
    }

    let products: Vec<Product> = response.json().await?;
    Ok(Catalog::from_products(products)?)
}

pub async fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let catalog = CatalogSource::resolve(&args.source, &config.catalog)?
        .load()
        .await?;

    match args.command {
        CatalogCommand::List => {
            println!("{:>6}  {:>10}  Name", "Id", "Package");
            for product in catalog.iter() {
                println!(
                    "{:>6}  {:>10}  {}",
                    product.id,
                    product.package_size.normalize(),
                    product.name
                );
            }
            println!();
            println!(
                "{} {} products",
                style("ℹ").blue(),
                catalog.len()
            );
        }
        CatalogCommand::Show { id } => {
            let product = catalog
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("Product not found in catalog: {}", id))?;
            println!("{}", serde_json::to_string_pretty(product)?);
            println!();
            println!("Label text: {}", product.label_description());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::io::Write;

    fn remote(server: &MockServer, api_key: Option<&str>) -> CatalogSource {
        CatalogSource::Remote {
            url: server.base_url(),
            table: "produtos".to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_remote_fetch_sends_key_headers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/produtos")
                .query_param("select", "*")
                .header("apikey", "secret")
                .header("Authorization", "Bearer secret");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 7, "produto": "Bread", "produtopacote": 0.5},
                    {"id": 3, "produto": "Sample", "produtopacote": null}
                ]));
        });

        let catalog = remote(&server, Some("secret")).load().await.unwrap();

        api_mock.assert();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name(7), Some("Bread"));
        assert_eq!(catalog.package_size(3), Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_remote_fetch_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/rest/v1/produtos");
            then.status(401);
        });

        let result = remote(&server, None).load().await;

        api_mock.assert();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_load_csv_export() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,produto,produtopacote,ingredientes,prazovalidade").unwrap();
        writeln!(file, "7,Bread,0.5,Flour,3").unwrap();
        writeln!(file, "12,Cookies,6,,").unwrap();
        file.flush().unwrap();

        let catalog = CatalogSource::File(file.path().to_path_buf())
            .load()
            .await
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(7).unwrap().shelf_life_days, Some(3));
        assert_eq!(catalog.get(12).unwrap().ingredients, None);
        assert_eq!(catalog.package_size(12), Some(Decimal::from(6)));
    }

    #[test]
    fn test_resolve_prefers_command_line() {
        let mut config = CatalogConfig::default();
        config.path = Some(PathBuf::from("configured.json"));

        let args = SourceArgs {
            catalog: Some(PathBuf::from("override.json")),
            catalog_url: None,
        };
        assert_eq!(
            CatalogSource::resolve(&args, &config).unwrap(),
            CatalogSource::File(PathBuf::from("override.json"))
        );

        assert_eq!(
            CatalogSource::resolve(&SourceArgs::default(), &config).unwrap(),
            CatalogSource::File(PathBuf::from("configured.json"))
        );
    }

    #[test]
    fn test_resolve_without_source_fails() {
        let result = CatalogSource::resolve(&SourceArgs::default(), &CatalogConfig::default());
        assert!(result.is_err());
    }
}
