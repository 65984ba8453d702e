use chrono::Local;
use tracing_subscriber::EnvFilter;
use workout_log::dashboard::{build_dashboard, log_workout};
use workout_log::exercises::{ExercisesClient, ExercisesConfig};
use workout_log::store::{StoreClient, StoreConfig};

#[tokio::main]
async fn main() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  if let Err(e) = run().await {
    eprintln!("{}", e);
    std::process::exit(1);
  }
}

/// `workout-log log <minutes> [areas...]` records today's session; with no
/// arguments, one dashboard pass runs and the payload prints as JSON.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
  let store = StoreClient::new(StoreConfig::from_env()?);
  let today = Local::now().date_naive();

  let args: Vec<String> = std::env::args().skip(1).collect();
  if args.first().map(String::as_str) == Some("log") {
    let minutes: i64 = args
      .get(1)
      .ok_or("usage: workout-log log <minutes> [areas...]")?
      .parse()?;
    let areas = args[2..].to_vec();

    log_workout(&store, today, minutes, areas).await?;
    println!("Workout for {} logged. Well done!", today);
    return Ok(());
  }

  let exercises = ExercisesClient::new(ExercisesConfig::from_env()?);
  let mut rng = rand::thread_rng();

  let dashboard = build_dashboard(&store, &exercises, today, &mut rng).await;
  println!("{}", serde_json::to_string_pretty(&dashboard)?);

  Ok(())
}
