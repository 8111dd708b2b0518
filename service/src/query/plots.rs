//! [`Query`] collection related to the multiple [`Plot`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{layout, Plot},
    infra::{database, Database},
    read, Query, Service,
};

use super::DatabaseQuery;

/// Queries the [`Plot`]s drawn on a layout, in creation order.
pub type OfLayout = DatabaseQuery<By<Vec<Plot>, layout::Id>>;

/// [`Query`] counting [`Plot`]s of a layout per status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stats(pub layout::Id);

impl<Db> Query<Stats> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Plot>, layout::Id>>,
        Ok = Vec<Plot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::plot::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Stats(layout_id): Stats,
    ) -> Result<Self::Ok, Self::Err> {
        let plots = self
            .database()
            .execute(Select(By::<Vec<Plot>, _>::new(layout_id)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(read::plot::Stats::of(&plots))
    }
}

#[cfg(test)]
mod spec {
    use super::Stats;
    use crate::{
        command::{AdvanceBookingStatus, CreateBooking},
        domain::{booking, user},
        fixture, Command as _,
    };

    #[tokio::test]
    async fn counts_per_status() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let mut plots = vec![];
        for n in ["1", "2", "3", "4"] {
            plots.push(
                fixture::plot(&svc, &layout, n, fixture::square()).await,
            );
        }
        for p in &plots[..2] {
            let b = svc
                .execute(CreateBooking {
                    buyer: fixture::buyer(),
                    plot_id: p.id,
                    contact: fixture::contact(),
                })
                .await
                .unwrap();
            if p.id == plots[0].id {
                let operator = user::Identity::operator(owner.id);
                for (expected, target) in [
                    (booking::Status::Pending, booking::Status::Confirmed),
                    (booking::Status::Confirmed, booking::Status::Sold),
                ] {
                    _ = svc
                        .execute(AdvanceBookingStatus {
                            operator,
                            booking_id: b.id,
                            expected,
                            target,
                        })
                        .await
                        .unwrap();
                }
            }
        }

        let stats = svc.execute(Stats(layout.id)).await.unwrap();

        assert_eq!(stats.available, 2);
        assert_eq!(stats.booked, 1);
        assert_eq!(stats.sold, 1);
        assert_eq!(stats.total(), 4);
    }
}
