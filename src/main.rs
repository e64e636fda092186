use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use grandstand_lib::channel::{self, ChannelDescriptor};
use grandstand_lib::config::AppConfig;
use grandstand_lib::feed::{FeedClient, StoreHandle};
use grandstand_lib::filter::{self, FilterCriteria, SportFilter};
use grandstand_lib::resolver;
use grandstand_lib::{Event, EventStore};

const CARD_CHANNELS: usize = 3;

#[derive(Parser, Debug)]
#[command(version, about = "Sports broadcast listings from the GrandStand feed", long_about = None)]
struct Args {
    /// Override the feed URL from the config file
    #[arg(long, global = true)]
    feed_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List dates that have events
    Dates,
    /// List sports across all dates
    Sports,
    /// List events for a date, optionally filtered by sport and search term
    List {
        /// YYYY-MM-DD, defaults to today in the configured time zone
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, default_value = "All")]
        sport: String,
        #[arg(short = 'q', long, default_value = "")]
        search: String,
    },
    /// Show an event and all of its channels
    Show { slug: String },
    /// Pick a channel of an event and list the alternatives
    Watch {
        slug: String,
        channel: String,
        /// Open the channel in the system browser
        #[arg(long)]
        open: bool,
    },
    /// Print the time zone used for listings, or save a new one
    Timezone {
        /// IANA name such as `Europe/London`
        zone: Option<String>,
    },
    /// Print or flip the saved dark-mode preference
    Theme {
        #[arg(long)]
        toggle: bool,
        /// Value reported by the desktop when nothing is saved
        #[arg(long)]
        system_dark: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,grandstand=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load()?;

    match &args.command {
        Command::Theme {
            toggle,
            system_dark,
        } => {
            let dark = if *toggle {
                config.toggle_dark_mode(*system_dark)?
            } else {
                config.dark_mode_or(*system_dark)
            };
            println!("{}", if dark { "dark" } else { "light" });
            return Ok(());
        }
        Command::Timezone { zone } => {
            if let Some(zone) = zone {
                config.set_timezone(zone)?;
                config.save()?;
            }
            println!("{}", config.get_user_timezone());
            return Ok(());
        }
        _ => {}
    }

    // run-only overrides, applied after any command that saves the config
    if let Some(url) = args.feed_url {
        config.feed_url = url;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }

    let handle = StoreHandle::new();
    let client = FeedClient::from_config(&config);
    let store = match handle.refresh(&client).await {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{}", err.user_message());
            eprintln!("{}", err.diagnostics());
            std::process::exit(1);
        }
    };
    let tz = config.user_tz();

    match args.command {
        Command::Dates => {
            for date in store.dates_sorted() {
                println!("{}", date);
            }
        }
        Command::Sports => {
            for sport in filter::sport_options(&store) {
                println!("{}", sport);
            }
        }
        Command::List {
            date,
            sport,
            search,
        } => {
            let date = date.unwrap_or_else(|| today_in(&tz));
            let criteria = FilterCriteria::for_date(date)
                .with_sport(SportFilter::parse(&sport))
                .with_search(search);
            print_listing(&store, &criteria, &tz);
        }
        Command::Show { slug } => match resolver::resolve_slug(&store, &slug) {
            Ok(event) => print_event(event, &tz),
            Err(err) => {
                eprintln!("{} ({})", err.user_message(), err);
                std::process::exit(2);
            }
        },
        Command::Watch {
            slug,
            channel: channel_url,
            open,
        } => match resolver::resolve_slug(&store, &slug) {
            Ok(event) => {
                let current = channel::describe(&channel_url);
                println!("{} - {}", event.matchup, format_channel(&current));
                println!("{}", channel_url);

                let others: Vec<&str> = event.other_channels(&channel_url).collect();
                if !others.is_empty() {
                    println!();
                    println!("More channels for {}:", event.matchup);
                    for other in others {
                        println!("  {}", format_channel(&channel::describe(other)));
                    }
                }

                if open {
                    webbrowser::open(&channel_url)?;
                }
            }
            Err(err) => {
                eprintln!("{} ({})", err.user_message(), err);
                std::process::exit(2);
            }
        },
        // answered before the feed is fetched
        Command::Theme { .. } | Command::Timezone { .. } => {}
    }

    Ok(())
}

fn print_listing(store: &EventStore, criteria: &FilterCriteria, tz: &Tz) {
    let events = filter::apply(store, criteria);

    let mut header = format_date(&criteria.date);
    if let SportFilter::Named(sport) = &criteria.sport {
        header.push_str(&format!(" [{}]", sport));
    }
    if !criteria.search_term.is_empty() {
        header.push_str(&format!(" \"{}\"", criteria.search_term));
    }
    println!("{} - {} events ({})", header, events.len(), criteria.to_path());

    if events.is_empty() {
        println!("No events found. Try changing your date, sport type, or search term.");
        return;
    }

    for event in events {
        println!();
        println!(
            "{}  {}  {}",
            format_time(event, tz),
            event.sport,
            event.tournament
        );
        println!("  {}", event.matchup);
        println!("  /event/{}", event.slug());

        let preview = channel::preview(&event.channels, CARD_CHANNELS);
        let mut names: Vec<String> = preview.shown.iter().map(format_channel).collect();
        if preview.remaining > 0 {
            names.push(format!("+{} more", preview.remaining));
        }
        println!(
            "  Available on {} channels: {}",
            event.channels.len(),
            names.join(", ")
        );
    }
}

fn print_event(event: &Event, tz: &Tz) {
    println!("{}", event.sport);
    println!("{}", event.matchup);
    println!("{}", event.tournament);
    if let Some(start) = event.start_time() {
        let local = start.with_timezone(tz);
        println!("{}", local.format("%B %-d, %Y"));
        println!("{}", local.format("%-I:%M %p"));
    }
    println!();
    println!("Available Channels");
    for ch in &event.channels {
        println!("  {}", format_channel(&channel::describe(ch)));
        println!("    /watch/{}/{}", event.slug(), urlencoding::encode(ch));
    }
}

fn format_channel(desc: &ChannelDescriptor) -> String {
    match &desc.country {
        Some(country) => format!("{} ({})", desc.name, country),
        None => desc.name.clone(),
    }
}

fn format_time(event: &Event, tz: &Tz) -> String {
    event
        .start_time()
        .map(|t| t.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn format_date(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn today_in(tz: &Tz) -> String {
    Utc::now().with_timezone(tz).format("%Y-%m-%d").to_string()
}
