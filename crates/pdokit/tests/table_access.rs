//! Reader/Writer behaviour against an in-memory executor.

mod common;

use common::MockExecutor;
use pdokit::{
    Conditions, Direction, FindOptions, Focus, MemoryCache, Record, Row, Table, TableConfig,
    TableSchema, Value,
};
use std::sync::Arc;

fn users() -> Arc<TableSchema> {
    TableSchema::builder("users")
        .columns(["id", "email", "name", "age"])
        .primary_key(["id"])
        .index("by_email", ["email"])
        .build()
        .unwrap()
}

fn ann_row() -> Row {
    Row::from_pairs([
        ("id", Value::Int(1)),
        ("email", Value::from("ann@example.com")),
        ("name", Value::from("ann")),
        ("age", Value::Int(30)),
    ])
}

fn cached_table(exec: MockExecutor) -> Table<MockExecutor> {
    Table::new(users(), exec).with_cache(Arc::new(MemoryCache::new(16)))
}

#[tokio::test]
async fn fetch_by_primary_key() {
    let table = Table::new(users(), MockExecutor::new());
    table.executor().push_rows(vec![ann_row()]);

    let record = table.reader().fetch(&Focus::primary(1)).await.unwrap().unwrap();
    assert_eq!(record.get("name"), Some(&Value::from("ann")));

    let stmt = table.executor().last();
    assert_eq!(
        stmt.query,
        "SELECT `id`, `email`, `name`, `age` FROM `users` WHERE (`id` = :c__id__0) LIMIT :limit"
    );
    assert_eq!(stmt.parameters.get("c__id__0").unwrap().value, Value::Int(1));
    assert_eq!(stmt.parameters.get("limit").unwrap().value, Value::Int(1));
}

#[tokio::test]
async fn fetch_missing_row_is_none() {
    let table = Table::new(users(), MockExecutor::new());
    assert!(table.reader().fetch(&Focus::primary(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn fetch_by_index_with_null_value() {
    let table = Table::new(users(), MockExecutor::new());
    let records = table
        .reader()
        .fetch_all(&Focus::index("by_email", vec![Value::Null]))
        .await
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(
        table.executor().last().query,
        "SELECT `id`, `email`, `name`, `age` FROM `users` WHERE (`email` IS NULL)"
    );
}

#[tokio::test]
async fn focus_errors_surface_before_execution() {
    let table = Table::new(users(), MockExecutor::new());
    let err = table
        .reader()
        .fetch(&Focus::primary_composite(vec![Value::Int(1), Value::Int(2)]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = table
        .reader()
        .fetch(&Focus::index("by_name", vec![Value::from("ann")]))
        .await
        .unwrap_err();
    assert!(err.is_domain());
    assert_eq!(table.executor().count(), 0);
}

#[tokio::test]
async fn primary_reads_are_cached_until_written() {
    let table = cached_table(MockExecutor::new());
    table.executor().push_rows(vec![ann_row()]);

    let first = table.reader().fetch(&Focus::primary(1)).await.unwrap();
    let second = table.reader().fetch(&Focus::primary(1)).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(table.executor().count(), 1);

    let patch = Record::new(users()).with("name", "bob").unwrap();
    table.writer().update(&Focus::primary(1), &patch).await.unwrap();

    table.executor().push_rows(vec![ann_row()]);
    table.reader().fetch(&Focus::primary(1)).await.unwrap();
    assert_eq!(table.executor().count(), 3);
}

#[tokio::test]
async fn cache_can_be_disabled_per_table() {
    let table = cached_table(MockExecutor::new()).with_config(TableConfig::new().cache_enabled(false));
    table.executor().push_rows(vec![ann_row()]);
    table.executor().push_rows(vec![ann_row()]);

    table.reader().fetch(&Focus::primary(1)).await.unwrap();
    table.reader().fetch(&Focus::primary(1)).await.unwrap();
    assert_eq!(table.executor().count(), 2);
}

#[tokio::test]
async fn find_renders_matcher_conditions() {
    let exec = MockExecutor::new();
    exec.set_found_rows(42);
    exec.push_rows(vec![ann_row()]);
    let table = Table::new(users(), exec);

    let conditions = Conditions::new().push("age", ">= 18").push("name", "!%%bot%");
    let options = FindOptions::new()
        .order("name", Direction::Desc)
        .limit(10)
        .count_rows(true);
    let found = table.reader().find(&conditions, &options).await.unwrap();

    assert_eq!(found.records.len(), 1);
    assert_eq!(found.found_rows, Some(42));
    assert_eq!(
        table.executor().last().query,
        "SELECT SQL_CALC_FOUND_ROWS `id`, `email`, `name`, `age` FROM `users` \
         WHERE (`age` >= 18 AND `name` NOT LIKE '%bot%') ORDER BY `name` DESC LIMIT :limit"
    );
}

#[tokio::test]
async fn find_rejects_unknown_columns() {
    let table = Table::new(users(), MockExecutor::new());
    let err = table
        .reader()
        .find(&Conditions::new().push("password", "x"), &FindOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_domain());

    let err = table
        .reader()
        .find(&Conditions::new(), &FindOptions::new().order("nope", Direction::Asc))
        .await
        .unwrap_err();
    assert!(err.is_domain());

    // Raw keys are not checked against the schema.
    let ok = table
        .reader()
        .find(&Conditions::new().push_raw("LENGTH(`name`)", "> 3"), &FindOptions::new())
        .await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn count_reads_the_aggregate() {
    let table = Table::new(users(), MockExecutor::new());
    table
        .executor()
        .push_rows(vec![Row::from_pairs([("n", Value::Int(3))])]);

    let n = table
        .reader()
        .count(&Conditions::new().push("age", "< 18"))
        .await
        .unwrap();
    assert_eq!(n, 3);
    assert_eq!(
        table.executor().last().query,
        "SELECT COUNT(*) AS n FROM `users` WHERE (`age` < 18)"
    );
}

#[tokio::test]
async fn insert_update_delete() {
    let exec = MockExecutor::new();
    exec.set_outcome(1, Some(7));
    let table = Table::new(users(), exec);

    let record = Record::new(users())
        .with("email", "ann@example.com")
        .unwrap()
        .with("name", "ann")
        .unwrap();
    let inserted = table.writer().insert(&record).await.unwrap();
    assert_eq!(inserted.last_insert_id, Some(7));
    assert_eq!(
        table.executor().last().query,
        "INSERT INTO `users` (`email`,`name`) VALUE (:_email_,:_name_)"
    );

    let patch = Record::new(users()).with("age", 31).unwrap();
    let updated = table.writer().update(&Focus::primary(7), &patch).await.unwrap();
    assert_eq!(updated.affected, 1);
    assert_eq!(
        table.executor().last().query,
        "UPDATE `users` SET `age`=:_age_ WHERE (`id` = :c__id__0)"
    );

    table.writer().delete(&Focus::primary(7)).await.unwrap();
    assert_eq!(
        table.executor().last().query,
        "DELETE FROM `users` WHERE (`id` = :c__id__0)"
    );
}

#[tokio::test]
async fn writes_reject_foreign_or_empty_records() {
    let table = Table::new(users(), MockExecutor::new());
    let posts = TableSchema::builder("posts").columns(["id"]).build().unwrap();
    let foreign = Record::new(posts).with("id", 1).unwrap();
    assert!(table.writer().insert(&foreign).await.unwrap_err().is_domain());

    let empty = Record::new(users());
    assert!(table.writer().insert(&empty).await.unwrap_err().is_invalid_argument());
    let err = table
        .writer()
        .update(&Focus::primary(1), &empty)
        .await
        .unwrap_err();
    assert!(err.is_state());
    assert_eq!(table.executor().count(), 0);
}

#[tokio::test]
async fn conditional_writes_require_conditions() {
    let table = cached_table(MockExecutor::new());
    let patch = Record::new(users()).with("name", "x").unwrap();

    let err = table
        .writer()
        .update_where(&Conditions::new(), &patch)
        .await
        .unwrap_err();
    assert!(err.is_state());
    assert!(table.writer().delete_where(&Conditions::new()).await.unwrap_err().is_state());

    table
        .writer()
        .delete_where(&Conditions::new().push("age", vec![1, 2]))
        .await
        .unwrap();
    assert_eq!(
        table.executor().last().query,
        "DELETE FROM `users` WHERE ((`age` = 1 OR `age` = 2))"
    );
}

#[tokio::test]
async fn conditional_writes_clear_the_table_cache() {
    let table = cached_table(MockExecutor::new());
    table.executor().push_rows(vec![ann_row()]);
    table.reader().fetch(&Focus::primary(1)).await.unwrap();

    let patch = Record::new(users()).with("age", 40).unwrap();
    table
        .writer()
        .update_where(&Conditions::new().push("age", ">= 18"), &patch)
        .await
        .unwrap();
    assert_eq!(
        table.executor().last().query,
        "UPDATE `users` SET `age`=:_age_ WHERE (`age` >= 18)"
    );

    table.reader().fetch(&Focus::primary(1)).await.unwrap();
    assert_eq!(table.executor().count(), 3);
}

#[tokio::test]
async fn writes_invalidate_reads_keyed_with_another_value_type() {
    let table = cached_table(MockExecutor::new());
    table.executor().push_rows(vec![ann_row()]);

    // Key read as text, e.g. straight from a request path.
    let stale = table.reader().fetch(&Focus::primary("1")).await.unwrap().unwrap();
    assert_eq!(stale.get("name"), Some(&Value::from("ann")));

    let patch = Record::new(users()).with("name", "bob").unwrap();
    table.writer().update(&Focus::primary(1), &patch).await.unwrap();

    table.executor().push_rows(vec![Row::from_pairs([
        ("id", Value::Int(1)),
        ("email", Value::from("ann@example.com")),
        ("name", Value::from("bob")),
        ("age", Value::Int(30)),
    ])]);
    let fresh = table.reader().fetch(&Focus::primary("1")).await.unwrap().unwrap();
    assert_eq!(fresh.get("name"), Some(&Value::from("bob")));
    assert_eq!(table.executor().count(), 3);
}

#[tokio::test]
async fn find_with_offset_only_pages_without_a_limit() {
    let table = Table::new(users(), MockExecutor::new());
    table
        .reader()
        .find(&Conditions::new(), &FindOptions::new().offset(5))
        .await
        .unwrap();

    let stmt = table.executor().last();
    assert_eq!(
        stmt.query,
        "SELECT `id`, `email`, `name`, `age` FROM `users` LIMIT :limit OFFSET :offset"
    );
    assert_eq!(stmt.parameters.get("limit").unwrap().value, Value::Int(i64::MAX));
    assert_eq!(stmt.parameters.get("offset").unwrap().value, Value::Int(5));
}
