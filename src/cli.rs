//! Command-line interface definitions.
//!
//! Every value defaults to the production setup (local FlareSolverr-style
//! proxy, Jugantor's latest-news endpoint, `rss.xml` in the working
//! directory) so a scheduler can invoke the binary with no arguments, while
//! tests and alternate deployments can point it elsewhere.

use clap::Parser;

/// Command-line arguments for the Jugantor RSS generator.
///
/// # Examples
///
/// ```sh
/// # Production defaults
/// jugantor_rss
///
/// # Alternate proxy and output location
/// jugantor_rss --proxy-url http://solver:8191/v1 -o /var/www/feeds/jugantor.xml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Endpoint of the browser-emulation proxy used to bypass bot detection
    #[arg(long, env = "PROXY_URL", default_value = "http://localhost:8191/v1")]
    pub proxy_url: String,

    /// Upstream latest-news JSON endpoint, fetched through the proxy
    #[arg(
        long,
        default_value = "https://www.jugantor.com/ajax/load/latestnews/30/0/0"
    )]
    pub target_url: String,

    /// Output path for the generated RSS document (overwritten each run)
    #[arg(short, long, default_value = "rss.xml")]
    pub output: String,

    /// Page-load budget handed to the proxy, in milliseconds. Browser
    /// emulation is slow; tens of seconds is normal.
    #[arg(long, default_value_t = 60_000)]
    pub max_timeout_ms: u64,
}
