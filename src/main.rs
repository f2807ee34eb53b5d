use clap::Parser;
use schedgen::app::App;
use schedgen::cli::Args;
use schedgen::logging::setup_logging;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config and set up logging before App::new() so startup logs are
    // never silently dropped.
    let early_config = {
        use figment::providers::Env;
        use figment::value::UncasedStr;
        figment::Figment::new()
            .merge(Env::raw().map(|k| {
                if k == UncasedStr::new("RAILWAY_DEPLOYMENT_DRAINING_SECONDS") {
                    "SHUTDOWN_TIMEOUT".into()
                } else {
                    k.into()
                }
            }))
            .extract::<schedgen::config::Config>()
            .expect("failed to load config for logging setup")
    };
    setup_logging(&early_config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting schedgen"
    );

    let app = match App::new(args.port).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = ?e, "failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    app.run().await
}
