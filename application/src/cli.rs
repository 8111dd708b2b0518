//! Execution of the [`Command`]s.

use itertools::Itertools as _;
use service::{
    domain::{user, Layout, Plot},
    query, read,
    workflow::Desk,
    Query as _,
};
use tracing as log;
use url::Url;

use crate::{Command, Service};

/// Runs the provided [`Command`], printing its outcome to stdout.
///
/// Pending migrations are expected to be applied already.
///
/// # Errors
///
/// If the [`Command`] fails. The reason is logged before returning.
pub async fn run(
    service: &Service,
    images: &Url,
    command: Command,
) -> Result<(), ()> {
    match command {
        Command::Migrate => {
            log::info!("database is up to date");
        }
        Command::Layouts { owner } => {
            let layouts = match owner {
                Some(id) => {
                    service.execute(query::layouts::OfOwner::by(id)).await
                }
                None => service.execute(query::layouts::All::by(())).await,
            }
            .map_err(|e| log::error!("failed to load layouts: {e}"))?;

            for layout in &layouts {
                let stats = service
                    .execute(query::plots::Stats(layout.id))
                    .await
                    .map_err(|e| {
                        log::error!(
                            "failed to count plots of `Layout(id: {})`: {e}",
                            layout.id,
                        );
                    })?;
                println!("{}", describe_layout(layout, images, stats));
            }
        }
        Command::Plots { layout } => {
            let plots = service
                .execute(query::plots::OfLayout::by(layout))
                .await
                .map_err(|e| {
                    log::error!(
                        "failed to load plots of `Layout(id: {layout})`: {e}",
                    );
                })?;
            let stats = read::plot::Stats::of(&plots);

            println!(
                "{}",
                plots.iter().format_with("\n", |p, f| f(&describe_plot(p))),
            );
            println!("{}", describe_stats(stats));
        }
        Command::Bookings { operator } => {
            let desk = Desk::open(service, user::Identity::operator(operator))
                .await
                .map_err(|e| log::error!("failed to open desk: {e}"))?;

            println!(
                "{}",
                desk.entries().iter().format_with("\n", |e, f| {
                    let b = &e.booking;
                    f(&format_args!(
                        "{}\tplot {} of {}\t{}\t{} <{}> {}\t{}",
                        b.id,
                        e.plot_number,
                        e.layout_id,
                        b.status,
                        b.contact.name,
                        b.contact.email,
                        b.contact.mobile,
                        b.created_at,
                    ))
                }),
            );
        }
        Command::Advance {
            booking,
            status,
            operator,
        } => {
            let mut desk =
                Desk::open(service, user::Identity::operator(operator))
                    .await
                    .map_err(|e| log::error!("failed to open desk: {e}"))?;

            let advanced =
                desk.advance_status(booking, status).await.map_err(|e| {
                    log::error!(
                        "failed to move `Booking(id: {booking})` into \
                         `{status}`: {e}",
                    );
                })?;
            println!("{}\t{}", advanced.id, advanced.status);
        }
    }
    Ok(())
}

/// Describes the provided [`Layout`] as a single line.
fn describe_layout(
    layout: &Layout,
    images: &Url,
    stats: read::plot::Stats,
) -> String {
    let image = layout.image_url.resolve(images).map_or_else(
        |e| {
            log::warn!("cannot resolve `{}`: {e}", layout.image_url);
            layout.image_url.to_string()
        },
        String::from,
    );
    [
        layout.id.to_string(),
        layout.title.to_string(),
        layout.location.iter().join(""),
        layout.dimensions.to_string(),
        image,
        describe_stats(stats),
    ]
    .iter()
    .join("\t")
}

/// Describes the provided [`Plot`] as a single line.
fn describe_plot(plot: &Plot) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        plot.id, plot.number, plot.status, plot.area, plot.price, plot.facing,
    )
}

/// Describes the provided [`read::plot::Stats`].
fn describe_stats(stats: read::plot::Stats) -> String {
    let read::plot::Stats {
        available,
        booked,
        sold,
    } = stats;
    format!(
        "{} plots: {available} available, {booked} booked, {sold} sold",
        stats.total(),
    )
}

#[cfg(test)]
mod spec {
    use service::read::plot::Stats;

    use super::describe_stats;

    #[test]
    fn stats_line() {
        let stats = Stats {
            available: 2,
            booked: 1,
            sold: 0,
        };

        assert_eq!(
            describe_stats(stats),
            "3 plots: 2 available, 1 booked, 0 sold",
        );
    }
}
