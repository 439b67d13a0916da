//! Open Donate CLI
//!
//! Resolve a location, find donation centers around it, check donation
//! figures and use the community board from the terminal.

use clap::{Parser, Subcommand};
use opendonate_centers::Category;
use opendonate_cli::{OutputFormat, Status};
use opendonate_community::PostCategory;
use opendonate_core::config::Config;
use opendonate_core::error::{exit_codes, Error, ErrorKind, MSG_SERVICE_FAILURE};
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod app;
mod commands;

use app::App;
use commands::{centers, community, location, stats};

/// Find donation centers near you
#[derive(Parser)]
#[command(name = "opendonate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, allow_negative_numbers = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to .opendonate.toml when present)
    #[arg(long, global = true, env = "OPENDONATE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract district and neighborhood from an address (offline)
    Resolve {
        /// Free-form address, e.g. "서울특별시 강남구 역삼동 123-45"
        address: String,
    },

    /// Resolve a device position and save it as your location
    Locate {
        /// Latitude reported by the device
        #[arg(long)]
        lat: f64,

        /// Longitude reported by the device
        #[arg(long)]
        lng: f64,
    },

    /// Search places by keyword
    Search {
        /// Place name or address keyword (at least 2 characters)
        keyword: String,
    },

    /// Search and save one of the results as your location
    Select {
        /// Place name or address keyword
        keyword: String,

        /// Result number to pick (1-based)
        #[arg(short, long, default_value = "1")]
        index: usize,
    },

    /// Show, set or clear the saved location
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Centers in your neighborhood, falling back to centers nearby
    Centers {
        /// District (구) to match instead of the saved location
        #[arg(short, long)]
        district: Option<String>,

        /// Neighborhood (동) to match
        #[arg(short, long, requires = "district")]
        neighborhood: Option<String>,

        /// Latitude for the nearby fallback
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude for the nearby fallback
        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        /// Fallback radius in kilometers (defaults to matching.radius_km)
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// Centers ordered by distance
    Nearby {
        /// Latitude (defaults to the saved location)
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude (defaults to the saved location)
        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        /// Maximum number of centers
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Centers supporting a donation category
    Category {
        /// Category id or label, e.g. "elderly" or "어르신"
        category: Category,

        /// Restrict to a district instead of the saved location
        #[arg(short, long, conflicts_with = "all")]
        district: Option<String>,

        /// Ignore the saved location and list every district
        #[arg(short, long)]
        all: bool,
    },

    /// Center details with donation figures
    Center {
        /// Center id
        id: String,
    },

    /// List donation categories
    Categories,

    /// Donation figures for a user, a center or the whole platform
    Stats {
        /// User id for personal figures
        #[arg(short, long, conflicts_with = "center")]
        user: Option<String>,

        /// Center id for center figures
        #[arg(short, long)]
        center: Option<String>,
    },

    /// Community board
    Community {
        /// Act as this signed-in user id
        #[arg(short, long, global = true)]
        user: Option<String>,

        /// Display name for the signed-in user
        #[arg(long, global = true, requires = "user")]
        name: Option<String>,

        #[command(subcommand)]
        action: CommunityAction,
    },
}

#[derive(Subcommand)]
enum LocationAction {
    /// Show the saved location
    Show,

    /// Resolve a coordinate and save it
    Set {
        /// Latitude
        #[arg(long)]
        lat: f64,

        /// Longitude
        #[arg(long)]
        lng: f64,
    },

    /// Forget the saved location
    Clear,
}

#[derive(Subcommand)]
enum CommunityAction {
    /// List posts, pinned first then newest
    List {
        /// Board: review, free, notice (or the Korean label)
        #[arg(short, long)]
        board: Option<PostCategory>,
    },

    /// Show a post with its comments
    Show {
        /// Post id
        id: String,
    },

    /// Publish a post
    Write {
        /// Board: review, free, notice
        #[arg(short, long, default_value = "free")]
        board: PostCategory,

        /// Title (at most 60 characters)
        #[arg(short, long)]
        title: String,

        /// Body text
        #[arg(short, long)]
        content: String,

        /// Attachment URL (repeatable)
        #[arg(short, long = "attach")]
        attachments: Vec<String>,
    },

    /// Like a post
    Like {
        /// Post id
        id: String,
    },

    /// Comment on a post
    Comment {
        /// Post id
        id: String,

        /// Comment text
        content: String,
    },

    /// Delete one of your posts
    Delete {
        /// Post id
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report(&anyhow::Error::new(e));
            return ExitCode::from(exit_codes::CONFIG_ERROR as u8);
        }
    };

    let mut telemetry = config.schema.telemetry.clone();
    if let Some(level) = opendonate_telemetry::verbosity_filter(cli.verbose) {
        telemetry.log_level = level.to_string();
    }
    if let Err(e) = opendonate_telemetry::init_with_config(&telemetry) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let app = App::new(config, cli.format);

    let result = match cli.command {
        Commands::Resolve { address } => location::resolve(&app, &address),
        Commands::Locate { lat, lng } => location::locate(&app, lat, lng).await,
        Commands::Search { keyword } => location::search(&app, &keyword).await,
        Commands::Select { keyword, index } => location::select(&app, &keyword, index).await,
        Commands::Location { action } => match action {
            LocationAction::Show => location::show(&app),
            LocationAction::Set { lat, lng } => location::set(&app, lat, lng).await,
            LocationAction::Clear => location::clear(&app),
        },

        Commands::Centers {
            district,
            neighborhood,
            lat,
            lng,
            radius,
        } => {
            let origin = lat.zip(lng);
            centers::find(&app, district, neighborhood, origin, radius)
        }
        Commands::Nearby { lat, lng, limit } => centers::nearby(&app, lat.zip(lng), limit),
        Commands::Category {
            category,
            district,
            all,
        } => centers::category(&app, category, district, all),
        Commands::Center { id } => centers::detail(&app, &id),
        Commands::Categories => centers::categories(&app),

        Commands::Stats { user, center } => {
            stats::run(&app, user.as_deref(), center.as_deref())
        }

        Commands::Community { user, name, action } => {
            let board = app.community(user, name);
            match action {
                CommunityAction::List { board: category } => {
                    community::list(&app, &board, category).await
                }
                CommunityAction::Show { id } => community::show(&app, &board, &id).await,
                CommunityAction::Write {
                    board: category,
                    title,
                    content,
                    attachments,
                } => {
                    community::write(&app, &board, category, title, content, attachments).await
                }
                CommunityAction::Like { id } => community::like(&app, &board, &id).await,
                CommunityAction::Comment { id, content } => {
                    community::comment(&app, &board, &id, &content).await
                }
                CommunityAction::Delete { id } => community::delete(&app, &board, &id).await,
            }
        }
    };

    tracing::debug!(metrics = %opendonate_telemetry::metrics().export_json(), "Run complete");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

/// Print an error, preferring the user-facing message when there is one
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(e) if e.user_message() != MSG_SERVICE_FAILURE || e.kind() == ErrorKind::Service => {
            Status::error(e.user_message());
            eprintln!("  {}", e.to_string().dimmed());
        }
        Some(e) => Status::error(&e.to_string()),
        None => Status::error(&format!("{err:#}")),
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    let Some(e) = err.downcast_ref::<Error>() else {
        return exit_codes::FAILURE;
    };
    match e.code.code() / 1000 {
        3 => exit_codes::CONFIG_ERROR,
        4 => exit_codes::LOCATION_ERROR,
        5 => exit_codes::SERVICE_ERROR,
        6 => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    }
}
