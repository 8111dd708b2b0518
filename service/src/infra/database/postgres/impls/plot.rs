//! [`Plot`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{layout, plot, Plot},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `plots` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    id, layout_id, number, polygon, area, \
    price_amount, price_currency, facing, description, status, created_at";

/// Reads a [`Plot`] from the provided [`Row`] of [`COLUMNS`].
fn from_row(row: &Row) -> Plot {
    Plot {
        id: row.get("id"),
        layout_id: row.get("layout_id"),
        number: row.get("number"),
        polygon: row.get("polygon"),
        area: row.get("area"),
        price: Money {
            amount: row.get("price_amount"),
            currency: row.get("price_currency"),
        },
        facing: row.get("facing"),
        description: row.get("description"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<Plot>, layout::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Plot>, layout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let layout_id: layout::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM plots \
             WHERE layout_id = $1::UUID \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(sql.as_str(), &[&layout_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Plot>, plot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Plot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Plot>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: plot::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM plots \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<Plot>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Plot>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(plot): Insert<Plot>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(plot)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Plot>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(plot): Update<Plot>,
    ) -> Result<Self::Ok, Self::Err> {
        let Plot {
            id,
            layout_id,
            number,
            polygon,
            area,
            price,
            facing,
            description,
            status,
            created_at,
        } = plot;

        const SQL: &str = "\
            INSERT INTO plots (\
                id, layout_id, number, polygon, area, \
                price_amount, price_currency, \
                facing, description, status, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::TEXT, $5::NUMERIC, \
                $6::NUMERIC, $7::INT2, \
                $8::INT2, $9::TEXT, $10::INT2, $11::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                polygon = EXCLUDED.polygon, \
                area = EXCLUDED.area, \
                price_amount = EXCLUDED.price_amount, \
                price_currency = EXCLUDED.price_currency, \
                facing = EXCLUDED.facing, \
                description = EXCLUDED.description, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &layout_id,
                &number,
                &polygon,
                &area,
                &price.amount,
                &price.currency,
                &facing,
                &description,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Plot, plot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Plot, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: plot::Id = by.into_inner();

        // Held until the transaction ends.
        const SQL: &str = "\
            SELECT id \
            FROM plots \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
