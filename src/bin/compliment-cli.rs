use std::io::Write;

use clap::Parser;
use futures_util::StreamExt;
use serde_json::json;

use compliment_proxy::streaming::LineFramer;

#[derive(Parser)]
#[command(name = "compliment-cli")]
#[command(about = "Request a compliment from a running compliment-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Person the compliment is addressed to.
    #[arg(short, long)]
    name: String,

    /// Attribute to mention; repeat for several.
    #[arg(short, long = "attribute", required = true)]
    attributes: Vec<String>,

    /// Language tag, e.g. "cs-CZ" or "en".
    #[arg(short, long, default_value = "en")]
    lang: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/generate-compliment", cli.url.trim_end_matches('/')))
        .json(&json!({
            "employeeName": cli.name,
            "attributes": cli.attributes,
            "lang": cli.lang,
        }))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    let mut framer = LineFramer::new();
    let mut stream = res.bytes_stream();

    while let Some(chunk) = stream.next().await {
        framer.push(&chunk?);
        while let Some(line) = framer.next_line() {
            if line == "event: done" {
                writeln!(stdout)?;
                return Ok(());
            }
            if let Some(text) = line.strip_prefix("data: ") {
                write!(stdout, "{}", from_markup(text))?;
                stdout.flush()?;
            }
        }
    }

    eprintln!("\nStream ended before completion");
    Ok(())
}

/// Undo the `<br>` markup applied by the proxy.
fn from_markup(text: &str) -> String {
    text.replace("<br>", "\n")
}
