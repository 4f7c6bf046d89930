//! Statement shapes, numbering and malformed inputs.

use pretty_assertions::assert_eq;

use crate::error::GenError;
use crate::model::fixtures::*;
use crate::schema::TableKind;
use crate::synth::*;

fn postgres() -> Synthesizer {
    Synthesizer::new(Dialect::Postgres, "", Escape::default())
}

fn sql(s: &Synthesizer, op: Operation, target: Target<'_>) -> String {
    s.synthesize(op, target).unwrap().sql()
}

#[test]
fn test_insert_skips_sequence() {
    let users = users();
    let stmt = postgres().synthesize(Operation::Insert, Target::Table(&users)).unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id"
    );
    assert_eq!(stmt.params.len(), 2);
    assert_eq!(stmt.generated_key, GeneratedKey::Returning);
    let fields: Vec<_> = stmt.params.iter().map(|p| p.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "email"]);
}

#[test]
fn test_insert_all_fields() {
    let users = users();
    let stmt = postgres().synthesize(Operation::InsertAll, Target::Table(&users)).unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO users (id, name, email) VALUES ($1, $2, $3)");
    assert_eq!(stmt.params.len(), 3);
    assert_eq!(stmt.generated_key, GeneratedKey::None);
}

#[test]
fn test_insert_manual_table() {
    let items = order_items();
    let stmt = postgres().synthesize(Operation::Insert, Target::Table(&items)).unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO order_items (order_id, line, sku, qty) VALUES ($1, $2, $3, $4)"
    );
    assert_eq!(stmt.params.len(), 4);
    assert_eq!(stmt.generated_key, GeneratedKey::None);
}

#[test]
fn test_update_numbering_continues() {
    let users = users();
    let stmt = postgres().synthesize(Operation::Update, Target::Table(&users)).unwrap();
    assert_eq!(stmt.sql(), "UPDATE users SET name = $1, email = $2 WHERE id = $3");
    let pk = stmt.params.last().unwrap();
    assert_eq!(pk.field, "id");
    assert_eq!(pk.slot, Slot::Positional(2));
}

#[test]
fn test_update_composite_key() {
    let items = order_items();
    assert_eq!(
        sql(&postgres(), Operation::Update, Target::Table(&items)),
        "UPDATE order_items SET sku = $1, qty = $2 WHERE order_id = $3 AND line = $4"
    );
}

#[test]
fn test_update_without_columns_is_malformed() {
    let tags = tags();
    let stmt = postgres().synthesize(Operation::Update, Target::Table(&tags)).unwrap();
    assert!(stmt.is_malformed());
    assert_eq!(stmt.fragments.len(), 1);
    assert!(stmt.sql().starts_with("[[ ERROR: "));
    assert!(stmt.params.is_empty());
}

#[test]
fn test_delete() {
    let items = order_items();
    let stmt = postgres().synthesize(Operation::Delete, Target::Table(&items)).unwrap();
    assert_eq!(stmt.sql(), "DELETE FROM order_items WHERE order_id = $1 AND line = $2");
    assert_eq!(stmt.params.len(), 2);
}

#[test]
fn test_delete_without_primary_key_is_malformed() {
    let mut users = users();
    users.primary_keys.clear();
    let stmt = postgres().synthesize(Operation::Delete, Target::Table(&users)).unwrap();
    assert!(stmt.is_malformed());
}

#[test]
fn test_select_by_index() {
    let idx = users_email_idx();
    let stmt = postgres().synthesize(Operation::SelectByIndex, Target::Index(&idx)).unwrap();
    assert_eq!(stmt.sql(), "SELECT id, name, email FROM users WHERE email = $1");
    assert_eq!(stmt.params.len(), 1);
    assert_eq!(stmt.params[0].ty, "Optional[str]");
}

#[test]
fn test_upsert_on_conflict() {
    let users = users();
    assert_eq!(
        sql(&postgres(), Operation::Upsert, Target::Table(&users)),
        "INSERT INTO users (id, name, email) VALUES ($1, $2, $3) \
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, email = EXCLUDED.email"
    );
}

#[test]
fn test_upsert_key_only_does_nothing() {
    let tags = tags();
    assert_eq!(
        sql(&postgres(), Operation::Upsert, Target::Table(&tags)),
        "INSERT INTO tags (tag) VALUES ($1) ON CONFLICT (tag) DO NOTHING"
    );
}

#[test]
fn test_escape_and_schema() {
    let users = users();
    let s = Synthesizer::new(Dialect::Postgres, "public", Escape::all());
    assert_eq!(
        sql(&s, Operation::Delete, Target::Table(&users)),
        r#"DELETE FROM "public"."users" WHERE "id" = $1"#
    );

    let s = Synthesizer::new(
        Dialect::Postgres,
        "public",
        Escape::parse(&["table"]).unwrap(),
    );
    assert_eq!(
        sql(&s, Operation::Delete, Target::Table(&users)),
        r#"DELETE FROM public."users" WHERE id = $1"#
    );
}

#[test]
fn test_escape_parse() {
    assert_eq!(Escape::parse(&["all", "none"]).unwrap(), Escape::default());
    assert_eq!(
        Escape::parse(&["schema", "column"]).unwrap(),
        Escape {
            schema: true,
            table: false,
            column: true
        }
    );
    let err = Escape::parse(&["rows"]).unwrap_err();
    assert!(matches!(err, GenError::UnknownEscape(ref s) if s == "rows"));
}

#[test]
fn test_writes_on_view_are_unsupported() {
    let mut view = users();
    view.kind = TableKind::View;
    let err = postgres()
        .synthesize(Operation::Insert, Target::Table(&view))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported insert on view for postgres");
}

#[test]
fn test_mismatched_target_is_unsupported() {
    let users = users();
    let err = postgres()
        .synthesize(Operation::SelectByIndex, Target::Table(&users))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported select-by-index on table for postgres");
}
