use clap::Parser;
use semver::Version;
use tracing_subscriber::EnvFilter;

use bump_pr::bump::checker::bump_dependency;
use bump_pr::config::BackendConfig;
use bump_pr::git::github::GithubProvider;
use bump_pr::git::repository::Provider;

#[derive(Parser)]
#[command(name = "bump-pr")]
#[command(version, about = "Opens a pull request bumping a single package.json dependency")]
struct Cli {
    /// Package to bump inside the manifest's dependencies
    package: String,

    /// Target version, fully resolved (not a range)
    #[arg(value_name = "VERSION")]
    target_version: Version,

    /// Repository owner
    owner: String,

    /// Repository name
    repo: String,

    /// Authentication token for the GitHub API
    #[arg(long, env = "GITHUB_AUTH", hide_env_values = true)]
    token: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let provider = GithubProvider::new(BackendConfig::default().with_token(cli.token));
    let repository = provider.repository(&cli.owner, &cli.repo).await?;
    bump_dependency(repository.as_ref(), &cli.package, &cli.target_version).await?;
    Ok(())
}
