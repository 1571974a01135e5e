//! Executor tests against a live database.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file is honoured).

use pgqdsl::prelude::*;
use tokio_postgres::{NoTls, Row};

async fn try_connect() -> Option<tokio_postgres::Client> {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

async fn setup(client: &tokio_postgres::Client) {
    client
        .batch_execute(
            "CREATE TEMP TABLE alerts (
                id BIGSERIAL PRIMARY KEY,
                uuid TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                level INT NOT NULL,
                resolved_at TIMESTAMPTZ
            )",
        )
        .await
        .expect("create temp table");
}

#[derive(Debug, Default, PartialEq)]
struct Alert {
    uuid: String,
    name: String,
    level: i32,
}

impl FromRow for Alert {
    fn from_row(row: &Row) -> QdslResult<Self> {
        Ok(Self {
            uuid: row.try_get_column("uuid")?,
            name: row.try_get_column("name")?,
            level: row.try_get_column("level")?,
        })
    }
}

fn seed() -> pgqdsl::InsertQb {
    insert_into("alerts")
        .columns(["uuid", "name", "level"])
        .values(params!["a-1", "disk full", 3i32])
        .values(params!["a-2", "O'Brien's cpu", 1i32])
        .values(params!["a-3", "latency", 2i32])
}

#[tokio::test]
async fn insert_select_update_delete_roundtrip() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client).await;
    let exec = Executor::new(&client);

    assert_eq!(exec.execute(&seed()).await.unwrap(), 3);

    let alerts: Vec<Alert> = exec
        .fetch_all(
            &select(["uuid", "name", "level"])
                .from("alerts")
                .filter(or(vec![gte("level", 2i32), like("name", "zzz%")]))
                .order_by_desc("level"),
        )
        .await
        .unwrap();
    assert_eq!(
        alerts.iter().map(|a| a.uuid.as_str()).collect::<Vec<_>>(),
        ["a-1", "a-3"]
    );

    let updated = exec
        .execute(
            &update("alerts")
                .set("level", 5i32)
                .set_raw("resolved_at", "now()")
                .in_list("uuid", ["a-1", "a-2"]),
        )
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let one: Alert = exec
        .fetch_one(&select(["*"]).from("alerts").eq("uuid", "a-2"))
        .await
        .unwrap();
    assert_eq!(one.name, "O'Brien's cpu");
    assert_eq!(one.level, 5);

    let deleted = exec
        .execute(&delete_from("alerts").is_not_null("resolved_at"))
        .await
        .unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn fetch_one_zero_rows_is_not_found() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client).await;
    let exec = Executor::new(&client);

    let err = exec
        .fetch_one::<Alert>(&select(["*"]).from("alerts").eq("uuid", "nope"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let none = exec
        .fetch_opt::<Alert>(&select(["*"]).from("alerts").eq("uuid", "nope"))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn named_bridge_mode_runs_raw_named_fragments() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client).await;
    let config = ExecConfig::new()
        .bind_mode(BindMode::NamedBridge)
        .log_debug_sql(true);
    let exec = Executor::with_config(&client, config);

    exec.execute(&seed()).await.unwrap();

    let stmt = select(["uuid", "name", "level"])
        .from("alerts")
        .filter(raw_named(
            "(level = @lvl OR level = @lvl + 1)",
            [("lvl", Param::new(2i32))],
        ))
        .order_by_asc("level")
        .limit(10);
    let alerts: Vec<Alert> = exec.fetch_all(&stmt).await.unwrap();
    assert_eq!(
        alerts.iter().map(|a| a.level).collect::<Vec<_>>(),
        [2, 3]
    );
}

#[tokio::test]
async fn row_mapper_ignores_extra_columns_and_rejects_missing_ones() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client).await;
    let exec = Executor::new(&client);
    exec.execute(&seed()).await.unwrap();

    let mapper = RowMapper::<Alert>::new()
        .column("uuid", |a, v: String| a.uuid = v)
        .column("level", |a, v: i32| a.level = v);

    let alerts = exec
        .fetch_all_with(&select(["*"]).from("alerts").order_by_asc("uuid"), &mapper)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0].uuid, "a-1");
    assert_eq!(alerts[0].level, 3);
    assert!(alerts[0].name.is_empty());

    let err = exec
        .fetch_one_with(&select(["uuid"]).from("alerts").limit(1), &mapper)
        .await
        .unwrap_err();
    assert!(matches!(err, QdslError::Decode { ref column, .. } if column == "level"));
}

#[tokio::test]
async fn executor_runs_inside_a_transaction() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client).await;

    let tx = client.transaction().await.unwrap();
    {
        let exec = Executor::new(&tx);
        exec.execute(&seed()).await.unwrap();
        let count: (i64,) = exec
            .fetch_one(&select(["COUNT(*)"]).from("alerts"))
            .await
            .unwrap();
        assert_eq!(count.0, 3);
    }
    tx.rollback().await.unwrap();

    let exec = Executor::new(&client);
    let count: (i64,) = exec
        .fetch_one(&select(["COUNT(*)"]).from("alerts"))
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[cfg(feature = "pool")]
#[tokio::test]
async fn pooled_client_executes() {
    let _ = dotenvy::dotenv();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let pool = create_pool_with_config(&database_url, 2).unwrap();
    let client = pool.get().await.unwrap();
    let exec = Executor::new(&client);

    let (n,): (i32,) = exec
        .fetch_one(&select(["1::int4"]))
        .await
        .unwrap();
    assert_eq!(n, 1);
}
