use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use quiz_player::attempt::AttemptSnapshot;
use quiz_player::protocol::{Credentials, Registration};
use quiz_player::storage::TOKEN_KEY;
use quiz_player::{
    ApiClient, AttemptController, AttemptKey, AttemptResults, CatalogQuery, Config, FileStorage,
    LocalGateway, QuizError, QuizResult, SortOrder, Storage, StreakTracker, categories,
    filter_quizzes, load_quiz_from_json, logging, player,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the quiz API (overrides QUIZ_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for saved attempts, login token and streak (overrides QUIZ_STORAGE_DIR)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available quizzes
    List {
        /// Only quizzes whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only quizzes in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only your favorites
        #[arg(long)]
        favorites: bool,
        #[arg(long, value_enum, default_value_t = SortOrder::Title)]
        sort: SortOrder,
    },
    /// Play a quiz from the server, or offline from a JSON file
    Play {
        #[arg(required_unless_present = "file")]
        id: Option<String>,
        #[arg(short, long, conflicts_with = "id")]
        file: Option<PathBuf>,
    },
    /// Play today's daily quiz
    Daily,
    /// Log in and remember the session token
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the session token
    Logout,
    /// Add a quiz to favorites, or remove it with --remove
    Favorite {
        id: String,
        #[arg(long)]
        remove: bool,
    },
    /// Show your daily quiz streak
    Streak,
    /// Discard a saved attempt
    Reset {
        #[arg(required_unless_present = "daily")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        daily: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(storage_dir) = args.storage_dir {
        config.log_file = storage_dir.join("quiz-player.log");
        config.storage_dir = storage_dir;
    }

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Logging disabled: {}", e);
    }

    if let Err(e) = run(args.command, &config).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> QuizResult<()> {
    let storage = FileStorage::open(&config.storage_dir)?;
    let token = storage.get(TOKEN_KEY)?;
    let api = ApiClient::from_config(config)?.with_token(token.clone());

    match command {
        Command::List {
            search,
            category,
            favorites,
            sort,
        } => {
            let quizzes = api.list_quizzes().await?;
            let favorite_ids: HashSet<String> = if token.is_some() {
                api.favorites().await?.into_iter().map(|q| q.id).collect()
            } else if favorites {
                return Err(QuizError::Unauthorized("log in to see favorites".to_string()));
            } else {
                HashSet::new()
            };

            let query = CatalogQuery {
                search,
                category,
                favorites_only: favorites,
                sort,
            };
            let found = filter_quizzes(&quizzes, &query, &favorite_ids);
            if found.is_empty() {
                println!("No quizzes match.");
                if query.category.is_some() {
                    println!("Categories: {}", categories(&quizzes).join(", "));
                }
            }
            for quiz in found {
                let star = if favorite_ids.contains(&quiz.id) { "★" } else { " " };
                let rating = quiz
                    .average_rating
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {:>8}  {:<40} {:<14} {:>4}",
                    star,
                    quiz.id,
                    quiz.title,
                    quiz.category.as_deref().unwrap_or(""),
                    rating
                );
            }
        }
        Command::Play { id, file } => {
            let results = match (id, file) {
                (_, Some(path)) => {
                    let quiz = load_quiz_from_json(path)?;
                    let gateway = LocalGateway::new(quiz.clone());
                    let attempt = AttemptController::for_quiz(quiz, &storage)?;
                    player::run(attempt, &gateway).await?
                }
                (Some(id), None) => {
                    let quiz = api.get_quiz(&id).await?;
                    let attempt = AttemptController::for_quiz(quiz, &storage)?;
                    player::run(attempt, &api).await?
                }
                (None, None) => {
                    return Err(QuizError::Validation(
                        "give a quiz id or --file".to_string(),
                    ));
                }
            };
            print_outcome(results.as_ref());
        }
        Command::Daily => {
            let today = Local::now().date_naive();
            let quiz = api.daily_quiz().await?;
            let attempt = AttemptController::for_daily(quiz, today, &storage)?;
            let results = player::run(attempt, &api).await?;
            print_outcome(results.as_ref());

            if let Some(results) = &results {
                let mut streak = StreakTracker::load(&storage)?;
                if let Some(day) = streak.record_completion(results)? {
                    println!("Daily streak: {} day(s)", streak.current(day));
                }
            }
        }
        Command::Login { username, password } => {
            let auth = api.login(&Credentials { username, password }).await?;
            storage.set(TOKEN_KEY, &auth.token)?;
            println!("Logged in as {}", auth.username.as_deref().unwrap_or("you"));
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = api
                .register(&Registration {
                    username,
                    email,
                    password,
                })
                .await?;
            storage.set(TOKEN_KEY, &auth.token)?;
            println!("Account created");
        }
        Command::Logout => {
            storage.remove(TOKEN_KEY)?;
            println!("Logged out");
        }
        Command::Favorite { id, remove } => {
            if remove {
                api.remove_favorite(&id).await?;
                println!("Removed {} from favorites", id);
            } else {
                api.add_favorite(&id).await?;
                println!("Added {} to favorites", id);
            }
        }
        Command::Streak => {
            let today = Local::now().date_naive();
            let summary = StreakTracker::load(&storage)?.summary(today);
            println!(
                "Current streak: {} day(s), longest: {} day(s){}",
                summary.current,
                summary.longest,
                if summary.completed_today {
                    ""
                } else {
                    " · today's quiz is still open"
                }
            );
        }
        Command::Reset { id, daily } => {
            match id {
                Some(id) if !daily => AttemptSnapshot::clear(&storage, &AttemptKey::Quiz(id))?,
                _ => {
                    AttemptSnapshot::clear_daily(&storage, None)?;
                }
            }
            println!("Saved attempt discarded");
        }
    }

    Ok(())
}

fn print_outcome(results: Option<&AttemptResults>) {
    match results {
        Some(results) => println!(
            "{}: {}/{} ({:.0}%)",
            results.title,
            results.score,
            results.total,
            results.percentage()
        ),
        None => println!("Progress saved. Run the same command to resume."),
    }
}
