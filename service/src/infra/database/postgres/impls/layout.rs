//! [`Layout`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{layout, user, Layout},
    geometry::Dimensions,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `layouts` table, in [`from_row()`] order.
const COLUMNS: &str = "\
    id, owner_id, title, location, description, image_url, \
    width, height, created_at";

/// Reads a [`Layout`] from the provided [`Row`] of [`COLUMNS`].
fn from_row(row: &Row) -> Layout {
    let side =
        |c: &str| u32::try_from(row.get::<_, i32>(c)).unwrap_or_default();
    Layout {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        location: row.get("location"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        dimensions: Dimensions::new(side("width"), side("height"))
            .unwrap_or(Dimensions::FALLBACK),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Layout>, layout::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Layout>, layout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: layout::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM layouts \
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

impl<C> Database<Select<By<Vec<Layout>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Layout>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM layouts \
             ORDER BY created_at DESC, id",
        );
        Ok(self
            .query(sql.as_str(), &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Layout>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Layout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Layout>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id: user::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM layouts \
             WHERE owner_id = $1::UUID \
             ORDER BY created_at DESC, id",
        );
        Ok(self
            .query(sql.as_str(), &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Layout>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Layout>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(layout): Insert<Layout>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(layout)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Layout>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(layout): Update<Layout>,
    ) -> Result<Self::Ok, Self::Err> {
        let Layout {
            id,
            owner_id,
            title,
            location,
            description,
            image_url,
            dimensions,
            created_at,
        } = layout;

        // Sides of a decoded image never reach `i32::MAX`.
        let width = i32::try_from(dimensions.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(dimensions.height()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            INSERT INTO layouts (\
                id, owner_id, title, location, description, image_url, \
                width, height, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::TEXT, $6::VARCHAR, \
                $7::INT4, $8::INT4, \
                $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                location = EXCLUDED.location, \
                description = EXCLUDED.description, \
                image_url = EXCLUDED.image_url, \
                width = EXCLUDED.width, \
                height = EXCLUDED.height";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &title,
                &location,
                &description,
                &image_url,
                &width,
                &height,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Layout, layout::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Layout, layout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: layout::Id = by.into_inner();

        // Plots and their bookings go along through `ON DELETE CASCADE`.
        const SQL: &str = "\
            DELETE FROM layouts \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<layout::Image>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(image): Insert<layout::Image>,
    ) -> Result<Self::Ok, Self::Err> {
        let layout::Image {
            url,
            bytes,
            created_at,
        } = image;

        // Same `url` means same content, so the first upload is kept.
        const SQL: &str = "\
            INSERT INTO layout_images (url, bytes, created_at) \
            VALUES ($1::VARCHAR, $2::BYTEA, $3::TIMESTAMPTZ) \
            ON CONFLICT (url) DO NOTHING";
        self.exec(SQL, &[&url, &bytes, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<layout::Image>, layout::ImageUrl>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<layout::Image>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<layout::Image>, layout::ImageUrl>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url: layout::ImageUrl = by.into_inner();

        const SQL: &str = "\
            SELECT bytes, created_at \
            FROM layout_images \
            WHERE url = $1::VARCHAR";
        Ok(self
            .query_opt(SQL, &[&url])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| layout::Image {
                url,
                bytes: row.get("bytes"),
                created_at: row.get("created_at"),
            }))
    }
}
