//! issue-token - 为运维人员签发管理员 / 读者令牌
//!
//! 使用与服务端相同的配置（`NOVELIST_AUTH__JWT_SECRET` 等）

use clap::Parser;

use novelist::config::load_config;
use novelist::infrastructure::auth::{Role, TokenService};

#[derive(Debug, Parser)]
#[command(name = "issue-token", version, about = "Mint a bearer token for the novelist API")]
struct Args {
    /// Token subject, usually the operator's email
    #[arg(short, long)]
    subject: String,

    /// Role claim embedded in the token
    #[arg(short, long, value_enum, default_value = "admin")]
    role: Role,

    /// Override the configured lifetime in seconds
    #[arg(long, env = "NOVELIST_TOKEN_TTL")]
    ttl: Option<u64>,

    /// Override the configured signing secret
    #[arg(long, env = "NOVELIST_JWT_SECRET", hide_env_values = true)]
    secret: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let secret = args.secret.unwrap_or(config.auth.jwt_secret);
    let ttl = args.ttl.unwrap_or(config.auth.token_ttl_secs);

    let token = TokenService::new(&secret, ttl).issue(&args.subject, args.role)?;
    println!("{}", token);

    Ok(())
}
