mod demo;
mod vm;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use quiz_api::ApiConfig;
use quiz_core::model::QuizId;
use services::catalog_service::recommended;
use services::results_service::recent;
use services::{AppServices, Clock, DEFAULT_RECOMMENDATIONS, ResultPeriod, ResultStats};

use vm::{TakeQuizIntent, TakeQuizOutcome, TakeQuizVm};

/// Results shown on the dashboard.
const RECENT_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Period {
    All,
    Week,
    Month,
}

impl From<Period> for ResultPeriod {
    fn from(period: Period) -> Self {
        match period {
            Period::All => Self::All,
            Period::Week => Self::LastWeek,
            Period::Month => Self::LastMonth,
        }
    }
}

/// Browse public quizzes, take one, and review your results.
#[derive(Parser)]
#[command(name = "quiz", version, about)]
struct Cli {
    /// Backend base URL (falls back to QUIZ_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (falls back to QUIZ_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds (falls back to QUIZ_API_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Use a built-in demo backend instead of the network
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List public quizzes
    Quizzes,
    /// Take a quiz interactively
    Take {
        /// Id of the quiz to start
        quiz_id: QuizId,
    },
    /// Show your results and statistics
    Results {
        #[arg(long, value_enum, default_value = "all")]
        period: Period,
    },
    /// Recent results and quizzes you have not taken yet
    Dashboard,
}

impl Cli {
    fn api_config(&self) -> anyhow::Result<ApiConfig> {
        let mut config = ApiConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(token) = &self.token {
            config = config.with_token(Some(token.clone()));
        }
        match self.timeout_secs {
            Some(0) => bail!("--timeout-secs must be positive"),
            Some(secs) => config = config.with_timeout(Duration::from_secs(secs)),
            None => {}
        }
        Ok(config)
    }
}

/// Logs go to stderr and stay quiet unless `RUST_LOG` asks for more.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let clock = Clock::default_clock();

    let services = if cli.offline {
        tracing::info!("using the built-in demo backend");
        AppServices::new(clock, Arc::new(demo::backend(clock)?))
    } else {
        AppServices::new_http(cli.api_config()?, clock)?
    };

    match cli.command {
        Commands::Quizzes => {
            let quizzes = services.catalog().list_public_quizzes().await?;
            println!("{}", vm::render_catalog(&quizzes));
        }
        Commands::Take { quiz_id } => take(&services, clock, quiz_id).await?,
        Commands::Results { period } => {
            let records = services.results().list_results(period.into()).await?;
            let stats = ResultStats::from_records(&records);
            println!("{}", vm::render_history(&records, &stats));
        }
        Commands::Dashboard => {
            let (catalog, results) = (services.catalog(), services.results());
            let (quizzes, records) = tokio::try_join!(
                catalog.list_public_quizzes(),
                results.list_results(ResultPeriod::All),
            )?;
            let suggested = recommended(&quizzes, &records, DEFAULT_RECOMMENDATIONS);
            println!(
                "{}",
                vm::render_dashboard(&recent(&records, RECENT_RESULTS), &suggested)
            );
        }
    }
    Ok(())
}

async fn take(services: &AppServices, clock: Clock, quiz_id: QuizId) -> anyhow::Result<()> {
    let controller = services.controller();
    let session = controller
        .start_session(quiz_id)
        .await
        .with_context(|| format!("could not start quiz {quiz_id}"))?;
    let title = session.title().to_owned();

    let mut view = TakeQuizVm::new(controller, clock, quiz_id);
    println!("{}\n\n{}\n", view.render(), vm::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let intent = match line.parse::<TakeQuizIntent>() {
            Ok(intent) => intent,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match view.handle(intent).await {
            Ok(TakeQuizOutcome::Continue { feedback }) => {
                print_feedback(feedback);
                println!("\n{}", view.render());
            }
            Ok(TakeQuizOutcome::ConfirmFinish {
                unanswered,
                feedback,
            }) => {
                print_feedback(feedback);
                println!(
                    "You have {unanswered} unanswered questions; they will be marked incorrect. \
                     Type `f` again to finish."
                );
            }
            Ok(TakeQuizOutcome::Finished { result, feedback }) => {
                print_feedback(feedback);
                println!("\n{}", vm::render_result(&title, &result));
                services.controller().dismiss_result();
                return Ok(());
            }
            Ok(TakeQuizOutcome::Help) => println!("{}", vm::HELP),
            Ok(TakeQuizOutcome::Quit) => {
                println!("Quiz abandoned.");
                return Ok(());
            }
            Err(err) => println!("{err}"),
        }
    }

    // Input closed before the quiz was finished.
    services.controller().reset_session();
    Ok(())
}

fn print_feedback(feedback: Option<bool>) {
    match feedback {
        Some(true) => println!("Correct!"),
        Some(false) => println!("Not quite right."),
        None => {}
    }
}
