//! Builders driven through the `Executor` seam.

mod common;

use common::MockExecutor;
use pdokit::executor::to_positional;
use pdokit::osql::{self, Condition, ConditionGroup, Query};
use pdokit::{Direction, FromRow, PdoError, PdoResult, Row, Value};

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    name: String,
    nickname: Option<String>,
}

impl FromRow for User {
    fn from_row(row: &Row) -> PdoResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            nickname: row.try_get("nickname")?,
        })
    }
}

fn user_row(id: i64, name: &str) -> Row {
    Row::from_pairs([
        ("id", Value::Int(id)),
        ("name", Value::from(name)),
        ("nickname", Value::Null),
    ])
}

#[tokio::test]
async fn select_fetch_collects_rows() {
    let exec = MockExecutor::new();
    exec.push_rows(vec![user_row(1, "ann"), user_row(2, "bob")]);

    let result = osql::select()
        .from("users")
        .where_(Condition::gt("age", 18).unwrap())
        .fetch(&exec)
        .await
        .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.found_rows, None);
    assert_eq!(exec.last().query, "SELECT * FROM users WHERE age > :c_age_0");
}

#[tokio::test]
async fn counted_select_reports_found_rows() {
    let exec = MockExecutor::new();
    exec.set_found_rows(120);
    exec.push_rows(vec![user_row(1, "ann")]);

    let result = osql::select()
        .from("users")
        .count_rows(true)
        .limit(1)
        .unwrap()
        .fetch(&exec)
        .await
        .unwrap();
    assert_eq!(result.found_rows, Some(120));
    assert!(exec.last().query.starts_with("SELECT SQL_CALC_FOUND_ROWS *"));
}

#[tokio::test]
async fn fetch_as_maps_rows() {
    let exec = MockExecutor::new();
    exec.push_rows(vec![user_row(1, "ann")]);

    let users: Vec<User> = osql::select()
        .get(["id", "name", "nickname"])
        .unwrap()
        .from("users")
        .order("id", Direction::Asc)
        .fetch_as(&exec)
        .await
        .unwrap();
    assert_eq!(
        users,
        vec![User {
            id: 1,
            name: "ann".into(),
            nickname: None
        }]
    );
}

#[tokio::test]
async fn fetch_opt_on_empty_result() {
    let exec = MockExecutor::new();
    let row = osql::select().from("users").fetch_opt(&exec).await.unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn decode_errors_name_the_column() {
    let exec = MockExecutor::new();
    exec.push_rows(vec![Row::from_pairs([
        ("id", Value::from("x")),
        ("name", Value::from("ann")),
        ("nickname", Value::Null),
    ])]);

    let err = osql::select()
        .from("users")
        .fetch_as::<User>(&exec)
        .await
        .unwrap_err();
    assert!(matches!(err, PdoError::Decode { ref column, .. } if column == "id"));
}

#[tokio::test]
async fn writes_report_outcomes() {
    let exec = MockExecutor::new();
    exec.set_outcome(1, Some(55));

    let inserted = osql::insert_into("users")
        .set("name", "ann")
        .execute(&exec)
        .await
        .unwrap();
    assert_eq!((inserted.affected, inserted.last_insert_id), (1, Some(55)));

    exec.set_outcome(3, None);
    let updated = osql::update("users")
        .set("active", false)
        .where_(Condition::lt("last_seen", "2020-01-01").unwrap())
        .execute(&exec)
        .await
        .unwrap();
    assert_eq!(updated.affected, 3);

    let deleted = osql::delete_from("users")
        .where_(Condition::eq("id", 9).unwrap())
        .execute(&exec)
        .await
        .unwrap();
    assert_eq!(deleted.affected, 3);

    let kinds: Vec<String> = exec.statements().iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, ["INSERT", "UPDATE", "DELETE"]);
}

#[tokio::test]
async fn render_errors_never_reach_the_executor() {
    let exec = MockExecutor::new();
    assert!(osql::select().fetch(&exec).await.unwrap_err().is_state());
    assert!(
        osql::update("users")
            .execute(&exec)
            .await
            .unwrap_err()
            .is_state()
    );
    assert_eq!(exec.count(), 0);
}

#[test]
fn positional_rewrite_follows_render_order() {
    let stmt = osql::select()
        .from("users")
        .where_(Condition::eq("name", "a:b").unwrap())
        .and(
            ConditionGroup::or()
                .with(Condition::in_list("id", vec![1, 2]).unwrap())
                .with(Condition::is_null("deleted_at").unwrap()),
        )
        .limit(5)
        .unwrap()
        .render()
        .unwrap();

    let (sql, binds) = to_positional(&stmt).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE name = ? AND (id IN (?,?) OR deleted_at IS NULL) LIMIT ?"
    );
    let values: Vec<&Value> = binds.iter().map(|p| &p.value).collect();
    assert_eq!(
        values,
        [&Value::from("a:b"), &Value::Int(1), &Value::Int(2), &Value::Int(5)]
    );
}
