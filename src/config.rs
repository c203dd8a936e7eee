use clap::Parser;

/// Sports schedule API with interest-based game ranking
#[derive(Parser, Debug, Clone)]
#[command(name = "courtside", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// ESPN site API base URL (up to and including /sports)
    #[arg(
        long,
        env = "ESPN_API_URL",
        default_value = "https://site.api.espn.com/apis/site/v2/sports"
    )]
    pub espn_api_url: String,

    /// Timeout for a single upstream HTTP request (seconds)
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    pub upstream_timeout_secs: u64,

    /// Per-league time budget for the importance fan-out fetch (seconds)
    #[arg(long, env = "LEAGUE_FETCH_TIMEOUT_SECS", default_value = "5")]
    pub league_fetch_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("upstream_timeout_secs must be positive");
        }
        if self.league_fetch_timeout_secs == 0 {
            anyhow::bail!("league_fetch_timeout_secs must be positive");
        }
        if !self.espn_api_url.starts_with("http") {
            anyhow::bail!("espn_api_url must be an http(s) URL");
        }
        Ok(())
    }
}
