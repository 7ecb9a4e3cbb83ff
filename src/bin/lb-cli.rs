use clap::{Parser, Subcommand};
use reqwest::{Method, Response, Url};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "lb-cli")]
#[command(about = "Management CLI for the service load balancer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered services
    List,
    /// Show hosts, routes and health of a service
    Show { name: String },
    /// Report the status code of a host
    Health {
        name: String,
        host: String,
        #[arg(default_value_t = 200)]
        status: i64,
    },
    /// Delete a service
    Delete { name: String },
    /// Save all services to the server's snapshot file
    Save,
    /// Ask which host a request would be forwarded to
    Forward { name: String, route: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (method, url) = endpoint(&cli.url, &cli.command)?;
    let res = client.request(method, url).send().await?;
    print_response(res).await
}

/// Method and URL for a command. Every name, host and route segment is
/// percent-encoded.
fn endpoint(base: &str, command: &Commands) -> Result<(Method, Url), Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    let method = {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| format!("{base} cannot be used as a base URL"))?;
        path.pop_if_empty();

        match command {
            Commands::List => {
                path.push("services");
                Method::GET
            }
            Commands::Show { name } => {
                path.extend(["services", name.as_str()]);
                Method::GET
            }
            Commands::Delete { name } => {
                path.extend(["services", name.as_str()]);
                Method::DELETE
            }
            Commands::Health { name, host, .. } => {
                path.extend(["services", name.as_str(), host.as_str()]);
                Method::POST
            }
            Commands::Save => {
                path.extend(["services", "save"]);
                Method::POST
            }
            Commands::Forward { name, route } => {
                path.push(name);
                path.extend(route.trim_start_matches('/').split('/'));
                Method::GET
            }
        }
    };

    if let Commands::Health { status, .. } = command {
        url.query_pairs_mut().append_pair("status", &status.to_string());
    }
    Ok((method, url))
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = match res.json().await {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: API returned status {status} with an unreadable body: {e}");
            return Ok(());
        }
    };

    if !status.is_success() {
        eprintln!("Error: API returned status {status}");
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
