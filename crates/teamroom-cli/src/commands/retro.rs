use clap::Subcommand;
use teamroom_core::retro::{find_method, recommend, render_sheet, METHODS};
use teamroom_core::{ApiResponse, Config, Feeling, Purpose, TimeBudget};

#[derive(Subcommand)]
pub enum RetroAction {
    /// List the available methods
    Methods,
    /// Recommend methods for how you feel and what you want
    Recommend {
        /// How you feel (e.g. frustrated, tired, want-clarity)
        #[arg(long)]
        feeling: Feeling,
        /// What you want out of it (e.g. solve-problems, keep-simple)
        #[arg(long)]
        purpose: Purpose,
        /// Time available (e.g. 5-10, 15-30, 30-45)
        #[arg(long, default_value = "15-30")]
        time: TimeBudget,
        /// Number of methods to show [default: retro.top_n]
        #[arg(long)]
        top: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a question sheet for a method
    Sheet {
        /// Method key (e.g. kpt, four-ls, gibbs)
        method: String,
    },
}

pub fn run(action: RetroAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RetroAction::Methods => {
            for method in &METHODS {
                println!(
                    "{:<9} {:<26} {:>10}  {} / {}",
                    method.key,
                    method.name,
                    method.time_label(),
                    method.feeling.label(),
                    method.purpose.label()
                );
            }
        }
        RetroAction::Recommend {
            feeling,
            purpose,
            time,
            top,
            json,
        } => {
            let top = top.unwrap_or_else(|| Config::load_or_default().retro.top_n);
            let recs: Vec<_> = recommend(feeling, purpose, time).into_iter().take(top).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(&recs))?);
                return Ok(());
            }

            println!("{} / {} / {time}", feeling.label(), purpose.label());
            println!();
            for (i, rec) in recs.iter().enumerate() {
                let mark = |hit: bool| if hit { "x" } else { " " };
                println!(
                    "{}. {} ({})  score {}",
                    i + 1,
                    rec.method.name,
                    rec.method.time_label(),
                    rec.score
                );
                println!(
                    "   [{}] feeling  [{}] purpose  [{}] time",
                    mark(rec.feeling_match),
                    mark(rec.purpose_match),
                    mark(rec.fits_time)
                );
                for question in rec.method.questions {
                    println!("   - {question}");
                }
            }
        }
        RetroAction::Sheet { method } => {
            let method = find_method(&method)?;
            println!("{}", render_sheet(method));
        }
    }
    Ok(())
}
