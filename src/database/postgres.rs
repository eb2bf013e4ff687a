use async_trait::async_trait;
use sqlx::postgres::PgConnection;

use crate::database::gateway::Gateway;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Auto, AutoRow, Marke};

const SELECT_AUTOS: &str = r#"
    SELECT
        a.id_autos, a.modell, a.baujahr, a.gewicht::FLOAT8 AS gewicht, a.leistung,
        a.verbrenner, a.produktion, a.fs_marken,
        m.id_marken AS marke_id, m.name AS marke_name
    FROM autos a
    LEFT JOIN marken m ON m.id_marken = a.fs_marken
"#;

/// PostgreSQL gateway. Opens a connection per call and always releases it,
/// whether the statement succeeded or not.
#[derive(Debug, Clone)]
pub struct PgGateway {
    db: DatabaseManager,
}

impl PgGateway {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    async fn fetch_autos(conn: &mut PgConnection, filter: &str, year: Option<i32>) -> Result<Vec<Auto>, DatabaseError> {
        let sql = format!("{} {} ORDER BY a.id_autos", SELECT_AUTOS, filter);
        let mut query = sqlx::query_as::<_, AutoRow>(&sql);
        if let Some(year) = year {
            query = query.bind(year);
        }
        let rows = query.fetch_all(conn).await?;
        Ok(rows.into_iter().map(AutoRow::assemble).collect())
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn read_marke_by_id(&self, id: i32) -> Result<Option<Marke>, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query_as::<_, Marke>("SELECT id_marken, name FROM marken WHERE id_marken = $1")
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?)
    }

    async fn list_marken(&self) -> Result<Vec<Marke>, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query_as::<_, Marke>("SELECT id_marken, name FROM marken ORDER BY id_marken")
            .fetch_all(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?)
    }

    async fn insert_marke(&self, name: &str) -> Result<u64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query("INSERT INTO marken (name) VALUES ($1)")
            .bind(name)
            .execute(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn delete_marke(&self, id: i32) -> Result<u64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query("DELETE FROM marken WHERE id_marken = $1")
            .bind(id)
            .execute(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn read_auto_by_id(&self, id: i32) -> Result<Option<Auto>, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let sql = format!("{} WHERE a.id_autos = $1", SELECT_AUTOS);
        let result = sqlx::query_as::<_, AutoRow>(&sql)
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?.map(AutoRow::assemble))
    }

    async fn list_autos(&self) -> Result<Vec<Auto>, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = Self::fetch_autos(&mut conn, "", None).await;
        self.db.release(conn).await;
        result
    }

    async fn list_autos_by_year(&self, year: i32) -> Result<Vec<Auto>, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = Self::fetch_autos(
            &mut conn,
            "WHERE EXTRACT(YEAR FROM a.baujahr)::INTEGER = $1",
            Some(year),
        )
        .await;
        self.db.release(conn).await;
        result
    }

    async fn insert_auto(&self, auto: &Auto) -> Result<u64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO autos (modell, baujahr, gewicht, leistung, verbrenner, produktion, fs_marken)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&auto.modell)
        .bind(auto.baujahr)
        .bind(auto.gewicht)
        .bind(auto.leistung)
        .bind(auto.verbrenner)
        .bind(auto.produktion)
        .bind(auto.fs_marken)
        .execute(&mut conn)
        .await;
        self.db.release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn update_auto(&self, auto: &Auto) -> Result<u64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            r#"
            UPDATE autos
            SET modell = $1, baujahr = $2, gewicht = $3, leistung = $4,
                verbrenner = $5, produktion = $6, fs_marken = $7
            WHERE id_autos = $8
            "#,
        )
        .bind(&auto.modell)
        .bind(auto.baujahr)
        .bind(auto.gewicht)
        .bind(auto.leistung)
        .bind(auto.verbrenner)
        .bind(auto.produktion)
        .bind(auto.fs_marken)
        .bind(auto.id_autos)
        .execute(&mut conn)
        .await;
        self.db.release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn delete_auto(&self, id: i32) -> Result<u64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query("DELETE FROM autos WHERE id_autos = $1")
            .bind(id)
            .execute(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn delete_all_autos(&self) -> Result<u64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query("DELETE FROM autos").execute(&mut conn).await;
        self.db.release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn count_autos(&self) -> Result<i64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM autos")
            .fetch_one(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?)
    }

    async fn marke_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM marken WHERE id_marken = $1")
            .bind(id)
            .fetch_one(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result? > 0)
    }

    async fn auto_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM autos WHERE id_autos = $1")
            .bind(id)
            .fetch_one(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result? > 0)
    }

    async fn count_autos_referencing(&self, marke_id: i32) -> Result<i64, DatabaseError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM autos WHERE fs_marken = $1")
            .bind(marke_id)
            .fetch_one(&mut conn)
            .await;
        self.db.release(conn).await;
        Ok(result?)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
