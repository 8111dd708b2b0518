//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, plot, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::booking::{Active, Buyer, Entry, Owner},
};

/// Columns of the `bookings` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    b.id, b.plot_id, b.user_id, \
    b.contact_name, b.contact_email, b.contact_mobile, \
    b.status, b.created_at, b.updated_at";

/// Reads a [`Booking`] from the provided [`Row`] of [`COLUMNS`].
fn from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        plot_id: row.get("plot_id"),
        user_id: row.get("user_id"),
        contact: booking::Contact {
            name: row.get("contact_name"),
            email: row.get("contact_email"),
            mobile: row.get("contact_mobile"),
        },
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Reads an [`Entry`] from the provided [`Row`] of [`COLUMNS`] joined with
/// the booked plot.
fn entry_from_row(row: &Row) -> Entry {
    Entry {
        booking: from_row(row),
        plot_number: row.get("plot_number"),
        layout_id: row.get("layout_id"),
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            plot_id,
            user_id,
            contact:
                booking::Contact {
                    name,
                    email,
                    mobile,
                },
            status,
            created_at,
            updated_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, plot_id, user_id, \
                contact_name, contact_email, contact_mobile, \
                status, created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, $8::TIMESTAMPTZ, $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET contact_name = EXCLUDED.contact_name, \
                contact_email = EXCLUDED.contact_email, \
                contact_mobile = EXCLUDED.contact_mobile, \
                status = EXCLUDED.status, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &plot_id,
                &user_id,
                &name,
                &email,
                &mobile,
                &status,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: booking::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings AS b \
             WHERE b.id = $1::UUID",
        );
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<Active<Booking>>, plot::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Active<Booking>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Active<Booking>>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let plot_id: plot::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings AS b \
             WHERE b.plot_id = $1::UUID \
               AND b.status IN ($2::INT2, $3::INT2) \
             LIMIT 1",
        );
        Ok(self
            .query_opt(
                sql.as_str(),
                &[
                    &plot_id,
                    &booking::Status::Pending,
                    &booking::Status::Confirmed,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(|row| Active(from_row(row))))
    }
}

impl<C> Database<Select<By<Vec<Entry>, Owner>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Entry>, Owner>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owner(owner_id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS}, \
                    p.number AS plot_number, p.layout_id \
             FROM bookings AS b \
             INNER JOIN plots AS p ON p.id = b.plot_id \
             INNER JOIN layouts AS l ON l.id = p.layout_id \
             WHERE l.owner_id = $1::UUID \
             ORDER BY b.created_at DESC, b.id",
        );
        Ok(self
            .query(sql.as_str(), &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(entry_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Entry>, Buyer>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Entry>, Buyer>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Buyer(user_id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS}, \
                    p.number AS plot_number, p.layout_id \
             FROM bookings AS b \
             INNER JOIN plots AS p ON p.id = b.plot_id \
             WHERE b.user_id = $1::UUID \
             ORDER BY b.created_at DESC, b.id",
        );
        Ok(self
            .query(sql.as_str(), &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(entry_from_row)
            .collect())
    }
}
