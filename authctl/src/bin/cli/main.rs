use std::sync::Arc;

use anyhow::Context;
use authkit::authenticator::AuthenticatorService;
use authkit::authenticator::AuthenticatorSettings;
use authkit::authenticator::ExpirationValidator;
use authkit::authenticator::JwtReader;
use authkit::authenticator::JwtWriter;
use authkit::authenticator::LoginInfo;
use authkit::authenticator::SlidingWindowValidator;
use authkit::authenticator::ValidationContext;
use authkit::authenticator::ValidatorChain;
use authkit::authenticator::Validity;
use authkit::config::Config;
use authkit::password::PasswordHasher;
use chrono::Utc;
use clap::Parser;
use clap::Subcommand;
use http::Request;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Operator tool for password hashes and authenticator tokens
#[derive(Parser, Debug)]
#[command(name = "authctl")]
#[command(about = "Hash passwords, issue and inspect authenticator tokens", long_about = None)]
struct Args {
    /// Directory holding default.toml and {RUN_MODE}.toml
    #[arg(long, env = "AUTHCTL_CONFIG_DIR", default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash a password with the current hasher and print the password info
    Hash {
        password: String,
    },

    /// Issue a JWT for a fresh authenticator
    Issue {
        /// Provider that authenticated the subject
        #[arg(long, default_value = "credentials")]
        provider: String,

        /// Subject key at the provider
        #[arg(long)]
        key: String,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Decode a JWT and check the authenticator it carries
    Inspect {
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authctl=info,authkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::load_from(&args.config_dir).context("Failed to load configuration")?;
    tracing::debug!(
        config_dir = %args.config_dir,
        algorithm = config.jwt.algorithm.as_ref().map(|a| a.name()).unwrap_or("none"),
        "Configuration loaded"
    );

    match args.command {
        Command::Hash { password } => hash(&config, &password),
        Command::Issue {
            provider,
            key,
            tags,
        } => issue(&config, LoginInfo::new(provider, key), tags).await,
        Command::Inspect { token } => inspect(&config, &token),
    }
}

fn hash(config: &Config, password: &str) -> Result<(), anyhow::Error> {
    let registry = config.password.registry()?;
    let info = registry.current().hash(password)?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn issue(
    config: &Config,
    login_info: LoginInfo,
    tags: Vec<String>,
) -> Result<(), anyhow::Error> {
    let codec = config.jwt.codec()?;
    let settings = AuthenticatorSettings {
        // no client to fingerprint
        fingerprinting: false,
        ..config.authenticator.settings()?
    };

    let service = AuthenticatorService::new(
        JwtWriter::new(codec.clone(), config.jwt.settings()),
        JwtReader::new(codec),
        config.authenticator.carrier()?,
        settings,
    )
    .with_id_generator(Arc::new(config.authenticator.id_generator()?));

    let authenticator = service
        .create(login_info, &Request::new(()))
        .with_tags(tags);
    let token = service.init(&authenticator).await?;

    tracing::info!(
        authenticator_id = %authenticator.id,
        login_info = %authenticator.login_info,
        expires = ?authenticator.expires,
        "Token issued"
    );
    println!("{}", token);
    Ok(())
}

fn inspect(config: &Config, token: &str) -> Result<(), anyhow::Error> {
    let reader = JwtReader::new(config.jwt.codec()?);
    let authenticator = reader.read_token(token)?;

    let mut validators = ValidatorChain::new().with(ExpirationValidator);
    if let Some(window) = config.authenticator.settings()?.idle_timeout {
        validators = validators.with(SlidingWindowValidator::new(window));
    }

    println!("{}", serde_json::to_string_pretty(&authenticator)?);
    match validators.validate(&authenticator, &ValidationContext::new(Utc::now())) {
        Validity::Valid => println!("valid"),
        Validity::Invalid(reason) => println!("invalid: {}", reason),
    }
    Ok(())
}
