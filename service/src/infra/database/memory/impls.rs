//! [`Memory`] implementations of storage operations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{booking, layout, plot, user, Booking, Layout, Plot},
    infra::{database, Database},
    read::booking::{Active, Buyer, Entry, Owner},
};

use super::{upsert, Memory, State, Store};

impl<C: Store> Database<Select<By<Option<Layout>, layout::Id>>> for Memory<C> {
    type Ok = Option<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Layout>, layout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .with(|s| s.layouts.iter().find(|l| l.id == id).cloned())
            .await)
    }
}

impl<C: Store> Database<Select<By<Vec<Layout>, ()>>> for Memory<C> {
    type Ok = Vec<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Layout>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .with(|s| s.layouts.iter().rev().cloned().collect())
            .await)
    }
}

impl<C: Store> Database<Select<By<Vec<Layout>, user::Id>>> for Memory<C> {
    type Ok = Vec<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Layout>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id = by.into_inner();
        Ok(self
            .with(|s| {
                s.layouts
                    .iter()
                    .rev()
                    .filter(|l| l.owner_id == owner_id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<C: Store> Database<Insert<Layout>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(layout): Insert<Layout>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(layout)).await
    }
}

impl<C: Store> Database<Update<Layout>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(layout): Update<Layout>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| upsert(&mut s.layouts, layout, |a, b| a.id == b.id))
            .await;
        Ok(())
    }
}

impl<C: Store> Database<Delete<By<Layout, layout::Id>>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Layout, layout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.with(|s| {
            let State {
                layouts,
                plots,
                bookings,
                ..
            } = s;
            layouts.retain(|l| l.id != id);
            plots.retain(|p| p.layout_id != id);
            bookings.retain(|b| plots.iter().any(|p| p.id == b.plot_id));
        })
        .await;
        Ok(())
    }
}

impl<C: Store> Database<Insert<layout::Image>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(image): Insert<layout::Image>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| {
            if !s.images.iter().any(|i| i.url == image.url) {
                s.images.push(image);
            }
        })
        .await;
        Ok(())
    }
}

impl<C: Store> Database<Select<By<Option<layout::Image>, layout::ImageUrl>>>
    for Memory<C>
{
    type Ok = Option<layout::Image>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<layout::Image>, layout::ImageUrl>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = by.into_inner();
        Ok(self
            .with(|s| s.images.iter().find(|i| i.url == url).cloned())
            .await)
    }
}

impl<C: Store> Database<Select<By<Vec<Plot>, layout::Id>>> for Memory<C> {
    type Ok = Vec<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Plot>, layout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let layout_id = by.into_inner();
        Ok(self
            .with(|s| {
                s.plots
                    .iter()
                    .filter(|p| p.layout_id == layout_id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<C: Store> Database<Select<By<Option<Plot>, plot::Id>>> for Memory<C> {
    type Ok = Option<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Plot>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .with(|s| s.plots.iter().find(|p| p.id == id).cloned())
            .await)
    }
}

impl<C: Store> Database<Insert<Plot>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(plot): Insert<Plot>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(plot)).await
    }
}

impl<C: Store> Database<Update<Plot>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(plot): Update<Plot>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.upsert_plot(plot))
            .await
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C: Store> Database<Lock<By<Plot, plot::Id>>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Plot, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // A transaction already owns the whole state exclusively.
        Ok(())
    }
}

impl<C: Store> Database<Insert<Booking>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await
    }
}

impl<C: Store> Database<Update<Booking>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.upsert_booking(booking))
            .await
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C: Store> Database<Select<By<Option<Booking>, booking::Id>>>
    for Memory<C>
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .with(|s| s.bookings.iter().find(|b| b.id == id).cloned())
            .await)
    }
}

impl<C: Store> Database<Select<By<Option<Active<Booking>>, plot::Id>>>
    for Memory<C>
{
    type Ok = Option<Active<Booking>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Active<Booking>>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let plot_id = by.into_inner();
        Ok(self
            .with(|s| {
                s.bookings
                    .iter()
                    .find(|b| b.plot_id == plot_id && b.is_active())
                    .cloned()
                    .map(Active)
            })
            .await)
    }
}

impl<C: Store> Database<Select<By<Vec<Entry>, Owner>>> for Memory<C> {
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Entry>, Owner>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owner(owner_id) = by.into_inner();
        Ok(self
            .with(|s| {
                let s: &State = s;
                entries(s, |_, p| {
                    s.layouts
                        .iter()
                        .any(|l| l.id == p.layout_id && l.owner_id == owner_id)
                })
            })
            .await)
    }
}

impl<C: Store> Database<Select<By<Vec<Entry>, Buyer>>> for Memory<C> {
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Entry>, Buyer>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Buyer(user_id) = by.into_inner();
        Ok(self
            .with(|s| entries(s, |b, _| b.user_id == user_id))
            .await)
    }
}

/// Lists [`Entry`]s of the [`Booking`]s passing the `filter`, newest first.
fn entries(
    state: &State,
    filter: impl Fn(&Booking, &Plot) -> bool,
) -> Vec<Entry> {
    state
        .bookings
        .iter()
        .rev()
        .filter_map(|b| {
            let plot = state.plots.iter().find(|p| p.id == b.plot_id)?;
            filter(b, plot).then(|| Entry {
                booking: b.clone(),
                plot_number: plot.number.clone(),
                layout_id: plot.layout_id,
            })
        })
        .collect()
}
