use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "shiki")]
#[command(about = "A CLI for the Shikimori GraphQL API", version)]
#[command(after_help = "EXAMPLES:
    shiki --query-file query.graphql                    Fetch with an existing token
    shiki --query-file query.graphql -o out.json        Write results to a file
    shiki --auth-code CODE --query-file query.graphql   Mint a token first
    shiki --refresh-if-expired --query-file query.graphql")]
pub struct Cli {
    /// Authorization code for initial access token generation
    #[arg(long, env = "SHIKI_AUTH_CODE")]
    pub auth_code: Option<String>,

    /// Access token for API access
    #[arg(long, env = "SHIKI_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Refresh token for obtaining a new access token
    #[arg(long, env = "SHIKI_REFRESH_TOKEN")]
    pub refresh_token: Option<String>,

    /// GraphQL endpoint URL
    #[arg(long, env = "SHIKI_GRAPHQL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Refresh the access token before querying
    #[arg(long)]
    pub refresh_if_expired: bool,

    /// Path to the file containing the GraphQL query
    #[arg(long, short = 'q')]
    pub query_file: PathBuf,

    /// Write the JSON result here instead of stdout
    #[arg(long, short = 'o')]
    pub response_file: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long, default_value = "200")]
    pub max_pages: u32,

    /// Suppress the progress spinner
    #[arg(long)]
    pub quiet: bool,

    /// Verbose logging and full error chains
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["shiki", "--query-file", "query.graphql"]);
        assert_eq!(cli.query_file, PathBuf::from("query.graphql"));
        assert_eq!(cli.max_pages, 200);
        assert!(!cli.refresh_if_expired);
        assert!(cli.response_file.is_none());
    }

    #[test]
    fn parses_full_invocation() {
        let cli = Cli::parse_from([
            "shiki",
            "--endpoint",
            "https://shikimori.one/api/graphql",
            "--access-token",
            "at",
            "--refresh-token",
            "rt",
            "--refresh-if-expired",
            "-q",
            "query.graphql",
            "-o",
            "out.json",
            "--max-pages",
            "5",
        ]);
        assert_eq!(cli.access_token.as_deref(), Some("at"));
        assert!(cli.refresh_if_expired);
        assert_eq!(cli.max_pages, 5);
        assert_eq!(cli.response_file, Some(PathBuf::from("out.json")));
    }
}
