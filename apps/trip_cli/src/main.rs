use std::{path::PathBuf, rc::Rc};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use shared::{
    domain::{OfferId, PointId, PointType},
    protocol::{FilterType, SortType},
};
use tracing_subscriber::EnvFilter;
use trip_model::SystemClock;

mod config;
mod seed;
mod session;

use config::load_settings;
use seed::{load_seed, save_seed};
use session::{CreateRequest, EditRequest, Session};

#[derive(Parser, Debug)]
#[command(about = "Trip board over a JSON data file")]
struct Cli {
    /// Trip data file; overrides the configured path.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Write the resulting points back to the data file.
    #[arg(long, global = true)]
    write: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Render {
        #[arg(long, default_value_t = FilterType::Everything)]
        filter: FilterType,
        #[arg(long, default_value_t = SortType::Day)]
        sort: SortType,
    },
    Create {
        #[arg(long = "type")]
        point_type: Option<PointType>,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        from: DateTime<Utc>,
        #[arg(long)]
        to: DateTime<Utc>,
        #[arg(long)]
        price: u32,
        #[arg(long = "offer")]
        offers: Vec<i64>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        price: Option<u32>,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long)]
        to: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let data_path = cli.data.unwrap_or(settings.data_path);
    let mut seed = load_seed(&data_path)?;

    let filter = match &cli.command {
        Command::Render { filter, .. } => *filter,
        _ => FilterType::Everything,
    };
    let session = Session::new(
        &seed,
        settings.default_point_type,
        filter,
        Rc::new(SystemClock),
    )?;

    match cli.command {
        Command::Render { sort, .. } => session.sort(sort),
        Command::Create {
            point_type,
            destination,
            from,
            to,
            price,
            offers,
        } => {
            let created = session.create(CreateRequest {
                point_type: point_type.unwrap_or(settings.default_point_type),
                destination,
                date_from: from,
                date_to: to,
                base_price: price,
                offers: offers.into_iter().map(OfferId).collect(),
            })?;
            println!("created point_id={}", created.id);
        }
        Command::Delete { id } => {
            session.delete(PointId(id))?;
            println!("deleted point_id={id}");
        }
        Command::Edit {
            id,
            price,
            from,
            to,
        } => {
            session.edit(
                PointId(id),
                EditRequest {
                    base_price: price,
                    date_from: from,
                    date_to: to,
                },
            )?;
            println!("updated point_id={id}");
        }
    }

    println!("{}", session.snapshot());

    if cli.write {
        seed.points = session.points();
        save_seed(&data_path, &seed)?;
    }

    Ok(())
}
