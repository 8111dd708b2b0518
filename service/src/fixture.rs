//! Shared fixtures of unit tests.

use std::cell::Cell;

use common::{money::Currency, Handler, Money};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    command::{
        advance_booking_status, create_booking, AdvanceBookingStatus,
        CreateBooking, CreateLayout, CreatePlot, UploadLayoutImage,
    },
    domain::{booking, layout, plot, user, Booking, Layout, Plot},
    geometry::Polygon,
    infra::{database, memory, Memory},
    query,
    read::booking::Entry,
    Config, Service,
};

/// Minimal 1x1 GIF.
pub(crate) const GIF_1X1: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x01, 0x00,
    0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
    0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

pub(crate) fn service() -> Service<Memory> {
    Service::new(Config::default(), Memory::new())
}

pub(crate) fn operator() -> user::Identity {
    user::Identity::operator(user::Id::new())
}

pub(crate) fn buyer() -> user::Identity {
    user::Identity::buyer(user::Id::new())
}

pub(crate) fn square() -> Polygon {
    "10,10 100,10 100,100 10,100".parse().unwrap()
}

pub(crate) fn contact() -> booking::Contact {
    booking::Contact {
        name: booking::Name::new("Asha Rao").unwrap(),
        email: booking::Email::new("asha@example.com").unwrap(),
        mobile: booking::Phone::new("9876543210").unwrap(),
    }
}

pub(crate) async fn layout(
    svc: &Service<Memory>,
    owner: user::Identity,
) -> Layout {
    let image_url = svc
        .execute(UploadLayoutImage {
            uploader: owner,
            bytes: GIF_1X1.to_vec(),
        })
        .await
        .unwrap();
    svc.execute(CreateLayout {
        owner,
        title: layout::Title::new("Green Meadows").unwrap(),
        location: None,
        description: None,
        image_url,
    })
    .await
    .unwrap()
}

pub(crate) fn new_plot(
    layout_id: layout::Id,
    author: user::Identity,
    number: &str,
    polygon: Polygon,
) -> CreatePlot {
    CreatePlot {
        author,
        layout_id,
        number: plot::Number::new(number).unwrap(),
        polygon,
        area: plot::Area::new(Decimal::new(12_000, 1)).unwrap(),
        price: Money {
            amount: Decimal::new(2_500_000, 0),
            currency: Currency::Inr,
        },
        facing: plot::Facing::East,
        description: None,
    }
}

pub(crate) async fn plot(
    svc: &Service<Memory>,
    layout: &Layout,
    number: &str,
    polygon: Polygon,
) -> Plot {
    let owner = user::Identity::operator(layout.owner_id);
    svc.execute(new_plot(layout.id, owner, number, polygon))
        .await
        .unwrap()
}

/// [`Service`] whose listings start failing once [`Flaky::failing`] is set,
/// while everything else keeps working.
#[derive(Debug)]
pub(crate) struct Flaky<'s> {
    pub(crate) inner: &'s Service<Memory>,
    pub(crate) failing: Cell<bool>,
}

impl<'s> Flaky<'s> {
    pub(crate) fn new(inner: &'s Service<Memory>) -> Self {
        Self {
            inner,
            failing: Cell::new(false),
        }
    }

    fn check(&self) -> Result<(), Traced<database::Error>> {
        if self.failing.get() {
            return Err(tracerr::new!(database::Error::from(
                memory::Error::UniqueViolation("listing"),
            )));
        }
        Ok(())
    }
}

impl Handler<query::layout::ById> for Flaky<'_> {
    type Ok = Option<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        q: query::layout::ById,
    ) -> Result<Self::Ok, Self::Err> {
        self.inner.execute(q).await
    }
}

impl Handler<query::plots::OfLayout> for Flaky<'_> {
    type Ok = Vec<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        q: query::plots::OfLayout,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        self.inner.execute(q).await
    }
}

impl Handler<query::bookings::OfOwner> for Flaky<'_> {
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        q: query::bookings::OfOwner,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        self.inner.execute(q).await
    }
}

impl Handler<CreateBooking> for Flaky<'_> {
    type Ok = Booking;
    type Err = Traced<create_booking::ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        self.inner.execute(cmd).await
    }
}

impl Handler<AdvanceBookingStatus> for Flaky<'_> {
    type Ok = Booking;
    type Err = Traced<advance_booking_status::ExecutionError>;

    async fn execute(
        &self,
        cmd: AdvanceBookingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        self.inner.execute(cmd).await
    }
}
