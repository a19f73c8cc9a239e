use anyhow::Context;
use greeting::{DEFAULT_THEME, GreetingClient, GreetingConfig, GreetingSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("greeting/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let theme = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let theme = if theme.trim().is_empty() {
        DEFAULT_THEME.to_string()
    } else {
        theme
    };

    let config = GreetingConfig::load().context("failed to load greeting configuration")?;
    if config.api_key.is_none() {
        log::warn!("No API key found; the greeting will be empty");
    }
    log::info!("Requesting greeting from {} (theme: {})", config.model, theme);

    let client = GreetingClient::new(config).context("failed to build HTTP client")?;
    let text = client.request_greeting(&theme).await;

    if text.is_empty() {
        log::warn!("No greeting produced");
    } else {
        println!("{}", text);
    }
    Ok(())
}
