use std::time::Duration;

use chrono::{Local, Utc};
use clap::Subcommand;
use teamroom_core::poker::RoomSnapshot;
use teamroom_core::shared::format_date;
use teamroom_core::{
    ApiResponse, Config, CoreError, Database, PokerSession, RoomLink, SessionSettings,
    ValidationError,
};

/// The CLI's current room, stored as `{room, invited}` JSON.
const CURRENT_ROOM_KEY: &str = "teamroom-current-room";

type Session<'a> = PokerSession<&'a Database>;

#[derive(Subcommand)]
pub enum PokerAction {
    /// Room management
    Room {
        #[command(subcommand)]
        action: RoomAction,
    },
    /// Display name management
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Play a card for the current round
    Vote {
        /// Card face, e.g. 5 or ?
        card: String,
    },
    /// Participants and who has voted
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Votes and statistics for the current round
    Results {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all votes and start a new round
    Reset,
    /// Stay in the room, refreshing presence until Ctrl-C
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Show the configured deck
    Deck,
}

#[derive(Subcommand)]
pub enum RoomAction {
    /// Leave the current room for a new one
    New,
    /// Join a room by share link or id
    Join {
        /// Share URL (with ?room=) or bare room id
        target: String,
    },
    /// Show the current room
    Show,
    /// Print the share link
    Link {
        /// Open the link in the browser
        #[arg(long)]
        open: bool,
    },
    /// Remove yourself from the room's participant list
    Leave,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Set your display name
    Set {
        /// Display name
        name: String,
    },
    /// Print your display name
    Show,
}

fn load_link(db: &Database) -> Result<RoomLink, Box<dyn std::error::Error>> {
    if let Some(json) = db.kv_get(CURRENT_ROOM_KEY)? {
        match serde_json::from_str::<RoomLink>(&json) {
            Ok(link) => return Ok(link),
            Err(e) => tracing::debug!(error = %e, "ignoring unreadable current room"),
        }
    }
    let link = RoomLink::generate(&mut rand::thread_rng());
    save_link(db, &link)?;
    tracing::info!(room = %link.room, "created room");
    Ok(link)
}

fn save_link(db: &Database, link: &RoomLink) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(link)?;
    db.kv_set(CURRENT_ROOM_KEY, &json)?;
    Ok(())
}

fn open_session<'a>(
    db: &'a Database,
    config: &Config,
) -> Result<Session<'a>, Box<dyn std::error::Error>> {
    let settings = SessionSettings {
        deck: config.poker.deck()?,
        stale_after: config.poker.stale_after(),
    };
    Ok(PokerSession::open(db, load_link(db)?, settings)?)
}

pub fn run(action: PokerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut session = open_session(&db, &config)?;

    match action {
        PokerAction::Room { action } => run_room(action, &db, &config, &mut session)?,
        PokerAction::User { action } => match action {
            UserAction::Set { name } => {
                let name = session.set_user_name(&name)?.to_string();
                session.refresh(Utc::now())?;
                println!("user name set: {name}");
            }
            UserAction::Show => match session.user_name() {
                Some(name) => println!("{name}"),
                None => println!("no user name set"),
            },
        },
        PokerAction::Vote { card } => {
            let vote = match session.select_card(&card, Utc::now()) {
                Err(CoreError::Validation(ValidationError::MissingUserName)) => {
                    return Err(
                        "enter a user name before voting: teamroom poker user set <name>".into(),
                    );
                }
                other => other?,
            };
            session.refresh(Utc::now())?;
            println!("{} voted {} in room {}", vote.user_name, vote.value, session.room());
        }
        PokerAction::Status { json } => {
            let snapshot = session.refresh(Utc::now())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(&snapshot))?);
            } else {
                print_status(&snapshot, &config.display.locale);
            }
        }
        PokerAction::Results { json } => {
            session.show_results();
            let snapshot = session.refresh(Utc::now())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(&snapshot))?);
            } else {
                print_results(&snapshot);
            }
        }
        PokerAction::Reset => {
            let removed = session.new_round()?;
            println!("cleared {removed} vote(s) in room {}", session.room());
        }
        PokerAction::Watch { ticks } => {
            watch(&session, config.poker.heartbeat_interval(), ticks, &config.display.locale)?;
        }
        PokerAction::Deck => println!("{}", session.deck()),
    }
    Ok(())
}

fn run_room(
    action: RoomAction,
    db: &Database,
    config: &Config,
    session: &mut Session<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoomAction::New => {
            let room = session.create_new_room(&mut rand::thread_rng())?.clone();
            save_link(db, session.link())?;
            println!("created room {room}");
            println!("{}", session.link().share_url(&config.share.base_url)?);
        }
        RoomAction::Join { target } => {
            let link = RoomLink::resolve(&target)?;
            session.join(link)?;
            save_link(db, session.link())?;
            println!("joined room {}", session.room());
        }
        RoomAction::Show => {
            let invited = if session.is_invited() { " (invited)" } else { "" };
            println!("room: {}{invited}", session.room());
            println!("link: {}", session.link().share_url(&config.share.base_url)?);
        }
        RoomAction::Link { open } => {
            let url = session.link().share_url(&config.share.base_url)?;
            println!("{url}");
            if open {
                open::that(url.as_str())?;
            }
        }
        RoomAction::Leave => {
            session.leave()?;
            println!("left room {}", session.room());
        }
    }
    Ok(())
}

/// Heartbeat every `interval` until Ctrl-C (or `ticks` refreshes), then
/// leave the room.
fn watch(
    session: &Session<'_>,
    interval: Duration,
    ticks: Option<u64>,
    locale: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(async {
        let mut timer = tokio::time::interval(interval);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut count = 0u64;
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    let snapshot = session.refresh(Utc::now())?;
                    println!("--- {} ---", Local::now().format("%H:%M:%S"));
                    print_status(&snapshot, locale);
                    count += 1;
                    if ticks.is_some_and(|n| count >= n) {
                        break;
                    }
                }
                _ = &mut ctrl_c => break,
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    });

    leave_after(session, outcome)
}

/// Leave the room whatever `outcome` is, then report the loop's error first.
fn leave_after(
    session: &Session<'_>,
    outcome: Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let left = session.leave();
    outcome?;
    left?;
    Ok(())
}

fn print_status(snapshot: &RoomSnapshot, locale: &str) {
    let invited = if snapshot.invited { " (invited)" } else { "" };
    println!(
        "Room {}{invited}  {}",
        snapshot.room,
        format_date(&Local::now(), locale)
    );
    match (&snapshot.user_name, &snapshot.my_vote) {
        (Some(name), Some(vote)) => println!("You: {name}, voted {}", vote.value),
        (Some(name), None) => println!("You: {name}, not voted yet"),
        (None, _) => println!("You: (no user name; run `teamroom poker user set <name>`)"),
    }

    if snapshot.users.is_empty() {
        println!("Nobody is in the room yet");
        return;
    }
    println!(
        "Participants ({}/{} voted):",
        snapshot.voted_count,
        snapshot.users.len()
    );
    for status in &snapshot.vote_status {
        let mark = if status.has_voted { "x" } else { " " };
        let you = if status.is_current_user { " (you)" } else { "" };
        println!("  [{mark}] {}{you}", status.user_name);
    }
}

fn print_results(snapshot: &RoomSnapshot) {
    if snapshot.votes.is_empty() {
        println!("No votes yet");
        return;
    }

    let summary = &snapshot.summary;
    if let Some(stats) = &summary.stats {
        println!(
            "Average {:.1}  Min {}  Max {}  Median {:.1}",
            stats.average, stats.min, stats.max, stats.median
        );
        println!();
    }

    println!("Votes ({}):", summary.total_votes);
    for vote in &snapshot.votes {
        println!("  {:<20} {}", vote.user_name, vote.value);
    }

    if !summary.distribution.is_empty() {
        println!();
        println!("Distribution:");
        for bucket in &summary.distribution {
            let bar = "#".repeat((bucket.percentage / 5.0).round() as usize);
            println!("  {:>4} {:<20} {}", bucket.value, bar, bucket.count);
        }
    }
    if summary.unsure_count > 0 {
        println!("  {:>4} {}", "?", summary.unsure_count);
    }
}
