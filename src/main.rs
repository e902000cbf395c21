use anyhow::{Context as _, Result};
use clap::Parser;
use ibpt::{Client, ClientOption, Context, LookupKind, Request, lookup};
use log::debug;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// ibpt - IBPT tax-rate lookup
///
/// Queries the IBPT service for the tax rates that apply to a product (NCM)
/// or service (NBS/LC116) code and prints the answer as JSON.
///
/// The token and CNPJ may also be given through IBPT_TOKEN and IBPT_CNPJ.
///
/// Examples:
///   ibpt --code 21050010 --uf SP --description Sorvete --unit PT --value 10
///   ibpt --kind service --code 0107 --uf RJ --description Consultoria --unit UN
#[derive(Parser, Debug)]
#[command(author, version = env!("IBPT_VERSION"), about)]
struct Cli {
    /// Lookup kind: product or service
    #[arg(long, short = 'k', value_name = "KIND", default_value = "product")]
    kind: LookupKind,

    /// API token issued by IBPT
    #[arg(long, env = "IBPT_TOKEN", hide_env_values = true, default_value = "")]
    token: String,

    /// CNPJ of the company performing the lookup
    #[arg(long, env = "IBPT_CNPJ", default_value = "")]
    cnpj: String,

    /// NCM or NBS code to look up
    #[arg(long, short = 'c')]
    code: String,

    /// State code (required for codes longer than 2 characters)
    #[arg(long, default_value = "")]
    uf: String,

    /// Fiscal exception number
    #[arg(long, default_value_t = 0)]
    ex: i32,

    /// Internal product code
    #[arg(long = "internal-code", default_value = "")]
    internal_code: String,

    /// Free-text description of the product or service
    #[arg(long, short = 'd', default_value = "")]
    description: String,

    /// Unit of measurement (e.g. UN, KG, PT)
    #[arg(long = "unit", short = 'u', default_value = "")]
    unit_measurement: String,

    /// Unit value
    #[arg(long, default_value_t = 0.0)]
    value: f64,

    /// GTIN/EAN barcode
    #[arg(long, default_value = "")]
    gtin: String,

    /// Endpoint URL (defaults to the IBPT endpoint for the chosen kind)
    #[arg(long, env = "IBPT_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    timeout: u64,

    /// Maximum number of attempts (1 means no retry)
    #[arg(long, value_name = "N", default_value_t = 1)]
    retries: usize,
}

impl Cli {
    fn request(&self) -> Request {
        Request {
            token: self.token.clone(),
            cnpj: self.cnpj.clone(),
            code: self.code.clone(),
            uf: self.uf.clone(),
            ex: self.ex,
            internal_code: self.internal_code.clone(),
            description: self.description.clone(),
            unit_measurement: self.unit_measurement.clone(),
            value: self.value,
            gtin: self.gtin.clone(),
        }
    }

    fn options(&self) -> Vec<ClientOption> {
        let mut options = vec![ClientOption::Timeout(Duration::from_secs(self.timeout))];
        if let Some(endpoint) = &self.endpoint {
            options.push(ClientOption::Endpoint(endpoint.clone()));
        }
        options
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let client = Client::new(cli.kind, cli.options()).context("Invalid client configuration")?;

    let shutdown = CancellationToken::new();
    let ctx = Context::from_token(shutdown.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling lookup");
            shutdown.cancel();
        }
    });

    let response = lookup::resolve(&client, &ctx, &cli.request(), cli.retries)
        .await
        .with_context(|| format!("Lookup of {} {} failed", cli.kind, cli.code))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
