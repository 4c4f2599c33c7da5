//! Search command - debounced place search with deliverability

use super::{set_location, usage};
use crate::app::App;
use anyhow::Result;
use bitzy_cli::{format_count, format_distance, progress, Status};
use bitzy_location::{
    CandidateView, Offline, PlaceSearch, PlaceSearchSession, SearchOutcome, SearchSettings,
};
use clap::Args;
use owo_colors::OwoColorize;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Place to look for
    pub query: String,

    /// Store the N-th result (1-based) as the delivery location
    #[arg(short, long)]
    pub select: Option<usize>,

    /// Do not call the geocoding service
    #[arg(long)]
    pub offline: bool,
}

pub async fn run(app: &App, args: SearchArgs) -> Result<()> {
    let area = app.resolver_settings()?.service_area;
    let settings = SearchSettings::from_config(&app.config.schema.search, area);

    if args.offline {
        search(app, PlaceSearchSession::new(Offline, settings), &args).await
    } else {
        let client = app.geo_client()?;
        search(app, PlaceSearchSession::new(client.nominatim(), settings), &args).await
    }
}

async fn search<P: PlaceSearch>(
    app: &App,
    session: PlaceSearchSession<P>,
    args: &SearchArgs,
) -> Result<()> {
    let spinner = progress::spinner(&format!("Searching for {}...", args.query));
    let outcome = session.query(&args.query).await;
    progress::finish_clear(&spinner);

    let views = match outcome {
        SearchOutcome::Applied(views) => views,
        SearchOutcome::Superseded => session.results(),
    };

    let Some(index) = args.select else {
        return print_results(app, &views);
    };

    let Some(view) = index.checked_sub(1).and_then(|i| views.get(i)) else {
        return usage(format!(
            "No result number {index} ({})",
            format_count(views.len(), "result", "results")
        ));
    };

    let location = session.select(&view.candidate);
    set_location::apply(app, Some(location))?.print(app)
}

fn print_results(app: &App, views: &[CandidateView]) -> Result<()> {
    if app.is_json() {
        return app.print_json(views);
    }

    if views.is_empty() {
        Status::info("No places found");
        return Ok(());
    }

    Status::header(&format_count(views.len(), "place", "places"));
    for (i, view) in views.iter().enumerate() {
        let delivery = if view.can_deliver {
            "delivers".green().to_string()
        } else {
            "out of area".yellow().to_string()
        };
        println!(
            "  {:>2}. {}  {}  {}",
            i + 1,
            view.candidate.name.bold(),
            format_distance(view.distance_km).dimmed(),
            delivery
        );
        println!("      {}", view.candidate.display_name.dimmed());
    }
    Ok(())
}
