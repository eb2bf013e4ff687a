//! Live PostgreSQL checks for the gateway. Skipped unless
//! `AUTOS_API_TEST_DATABASE_URL` points at a disposable database.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::Executor;

use autos_api::database::{Auto, DatabaseManager, Gateway, PgGateway};

const SCHEMA: &str = include_str!("../sql/schema.sql");

fn test_url() -> Option<String> {
    std::env::var("AUTOS_API_TEST_DATABASE_URL").ok()
}

async fn reset(db: &DatabaseManager) -> Result<()> {
    let mut conn = db.connect().await?;
    conn.execute(SCHEMA).await?;
    conn.execute("TRUNCATE autos, marken RESTART IDENTITY").await?;
    db.release(conn).await;
    Ok(())
}

fn auto(modell: &str, baujahr: NaiveDate, fs_marken: i32) -> Auto {
    Auto {
        id_autos: 0,
        modell: modell.to_string(),
        baujahr,
        gewicht: 1500.5,
        leistung: 150,
        verbrenner: true,
        produktion: true,
        fs_marken,
        marke: None,
    }
}

#[tokio::test]
async fn postgres_gateway_round_trip() -> Result<()> {
    let Some(url) = test_url() else {
        eprintln!("AUTOS_API_TEST_DATABASE_URL not set; skipping");
        return Ok(());
    };

    let db = DatabaseManager::from_url(&url, Duration::from_secs(5), false)?;
    reset(&db).await?;
    let gateway = PgGateway::new(db.clone());

    gateway.health_check().await?;

    assert_eq!(gateway.insert_marke("Volkswagen").await?, 1);
    let marken = gateway.list_marken().await?;
    assert_eq!(marken.len(), 1);
    let vw = marken[0].id_marke;
    assert!(gateway.marke_exists(vw).await?);
    assert!(!gateway.marke_exists(vw + 1).await?);

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    gateway.insert_auto(&auto("Golf GTI", date(2020, 5, 15), vw)).await?;
    gateway.insert_auto(&auto("Passat", date(2019, 12, 31), vw)).await?;

    let all = gateway.list_autos().await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].modell, "Golf GTI");
    assert_eq!(all[0].gewicht, 1500.5);
    assert_eq!(all[0].marke.as_ref().map(|m| m.name.as_str()), Some("Volkswagen"));

    let in_2020 = gateway.list_autos_by_year(2020).await?;
    assert_eq!(in_2020.len(), 1);
    assert_eq!(in_2020[0].id_autos, all[0].id_autos);

    assert_eq!(gateway.count_autos().await?, 2);
    assert_eq!(gateway.count_autos_referencing(vw).await?, 2);

    let mut golf = all[0].clone();
    golf.modell = "Golf R".to_string();
    golf.leistung = 320;
    assert_eq!(gateway.update_auto(&golf).await?, 1);
    let reread = gateway.read_auto_by_id(golf.id_autos).await?.unwrap();
    assert_eq!(reread.modell, "Golf R");
    assert_eq!(reread.leistung, 320);

    let mut ghost = golf.clone();
    ghost.id_autos = 99_999;
    assert_eq!(gateway.update_auto(&ghost).await?, 0);
    assert!(!gateway.auto_exists(99_999).await?);

    assert_eq!(gateway.delete_auto(golf.id_autos).await?, 1);
    assert!(gateway.read_auto_by_id(golf.id_autos).await?.is_none());
    assert_eq!(gateway.delete_all_autos().await?, 1);
    assert_eq!(gateway.count_autos().await?, 0);

    assert_eq!(gateway.delete_marke(vw).await?, 1);
    assert!(gateway.read_marke_by_id(vw).await?.is_none());

    reset(&db).await?;
    Ok(())
}
