use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use service::gallery::{grid, MomentCalendar};
use tracing::info;

use crate::{
    app::AppState,
    render::{parse_month, render_calendar, render_grid, render_moment},
};

/// Read-only access to the daily moments of an account
#[derive(Parser, Debug)]
#[command(name = "moments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the moments of an account
    List {
        /// Account address
        #[arg(short, long)]
        address: String,
        #[arg(long, value_enum, default_value_t = View::Grid)]
        view: View,
        /// Month shown by the calendar view, `yyyy-MM`. Defaults to the month of the latest moment
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
    },
    /// Show the moment of a day
    Show {
        #[arg(short, long)]
        address: String,
        /// `yyyy-MM-dd`
        #[arg(short, long)]
        date: NaiveDate,
    },
    /// Tell whether a moment can still be created today
    Quota {
        #[arg(short, long)]
        address: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Grid,
    Calendar,
}

pub async fn run(command: Command, app_state: &AppState) -> anyhow::Result<()> {
    let moments = &app_state.moment_service;

    match command {
        Command::List { address, view, month } => {
            let assets = moments.moments_or_empty(&address).await;
            info!("Listing {} moments of '{address}'", assets.len());

            let rendered = match view {
                View::Grid => render_grid(&grid(&assets)),
                View::Calendar => {
                    let calendar = MomentCalendar::new(&assets);
                    let month = month
                        .or_else(|| calendar.latest())
                        .unwrap_or_else(|| chrono::Utc::now().date_naive());
                    render_calendar(&calendar, month)
                }
            };
            println!("{rendered}");
        }
        Command::Show { address, date } => {
            let assets = moments.moments_or_empty(&address).await;
            let calendar = MomentCalendar::new(&assets);

            match calendar.moment_on(date) {
                Some(moment) => println!("{}", render_moment(moment)),
                None => println!("No moment on {date}"),
            }
        }
        Command::Quota { address } => {
            if moments.has_uploaded_today(&address).await {
                println!("You can only upload one moment per day, come back tomorrow");
            } else {
                println!("Today's moment is still to be created");
            }
        }
    }

    Ok(())
}
